//! Command definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::handler::{CommandContext, FnHandler, Handler, ParsedValues};
use crate::hooks::{HookError, PostValidationFn};
use crate::ordering::required_first;
use crate::param::Param;
use crate::types::ParamKind;

/// Maximum number of positional arguments per command.
pub const MAX_POSITIONAL_ARGS: usize = 10;

/// A named unit with flags, positional arguments, required environment
/// variables and a handler.
///
/// Definition problems (duplicate names, too many positional arguments, ...)
/// are reported by [`AppBuilder::build`](crate::AppBuilder::build).
///
/// # Example
///
/// ```
/// use argot::{Command, Constraints, Param, ValueType};
///
/// let start = Command::new("start", "Start the game", |_ctx| 0)
///     .flag(Param::new("verbose").alias('v').value_type(ValueType::Bool))
///     .flag(
///         Param::new("username")
///             .alias('u')
///             .placeholder("USERNAME")
///             .value_type(ValueType::Alphanumeric)
///             .constraints(Constraints::REQUIRED | Constraints::ALLOW_DOTS),
///     )
///     .arg(Param::new("input").placeholder("FILE").value_type(ValueType::PathFile).required())
///     .arg(Param::new("difficulty").placeholder("DIFFICULTY").value_type(ValueType::Int));
///
/// assert_eq!(start.sorted_args(), vec!["input", "difficulty"]);
/// ```
pub struct Command {
    name: String,
    usage: String,
    flags: BTreeMap<String, Param>,
    args: Vec<Param>,
    env: BTreeMap<String, Param>,
    handler: Box<dyn Handler>,
    post_validation: Option<PostValidationFn>,
    duplicates: Vec<(ParamKind, String)>,
}

impl Command {
    /// Creates a command with a closure handler.
    pub fn new<F>(name: impl Into<String>, usage: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&CommandContext) -> i32 + 'static,
    {
        Self::with_handler(name, usage, FnHandler::new(handler))
    }

    /// Creates a command with a struct handler.
    pub fn with_handler<H>(name: impl Into<String>, usage: impl Into<String>, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        Self {
            name: name.into(),
            usage: usage.into(),
            flags: BTreeMap::new(),
            args: Vec::new(),
            env: BTreeMap::new(),
            handler: Box::new(handler),
            post_validation: None,
            duplicates: Vec::new(),
        }
    }

    /// Adds a flag (`--name`, and `-a` when the param has an alias).
    pub fn flag(mut self, param: Param) -> Self {
        let param = param.into_kind(ParamKind::Flag);
        if let Some(previous) = self.flags.insert(param.name().to_string(), param) {
            self.duplicates
                .push((ParamKind::Flag, previous.name().to_string()));
        }
        self
    }

    /// Adds a positional argument. Declaration order is kept.
    pub fn arg(mut self, param: Param) -> Self {
        let param = param.into_kind(ParamKind::Argument);
        match self.args.iter_mut().find(|a| a.name() == param.name()) {
            Some(existing) => {
                self.duplicates
                    .push((ParamKind::Argument, param.name().to_string()));
                *existing = param;
            }
            None => self.args.push(param),
        }
        self
    }

    /// Adds a required environment variable.
    ///
    /// Environment variables are always validated as required, whatever
    /// constraints they were declared with.
    pub fn env(mut self, param: Param) -> Self {
        let mut param = param.into_kind(ParamKind::EnvVar);
        param.force_required();
        if let Some(previous) = self.env.insert(param.name().to_string(), param) {
            self.duplicates
                .push((ParamKind::EnvVar, previous.name().to_string()));
        }
        self
    }

    /// Sets the hook run after validation and before the handler.
    pub fn on_post_validation<F>(mut self, f: F) -> Self
    where
        F: Fn(&Command, &ParsedValues) -> Result<(), HookError> + 'static,
    {
        self.post_validation = Some(Rc::new(f));
        self
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The usage text.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Flags in name order.
    pub fn flags(&self) -> impl Iterator<Item = &Param> {
        self.flags.values()
    }

    /// Positional arguments in declaration order.
    pub fn args(&self) -> &[Param] {
        &self.args
    }

    /// Required environment variables in name order.
    pub fn env_vars(&self) -> impl Iterator<Item = &Param> {
        self.env.values()
    }

    /// Looks up a flag by long name.
    pub fn get_flag(&self, name: &str) -> Option<&Param> {
        self.flags.get(name)
    }

    /// Looks up a positional argument by name.
    pub fn get_arg(&self, name: &str) -> Option<&Param> {
        self.args.iter().find(|a| a.name() == name)
    }

    /// Positional argument names, required ones first, each group in
    /// declaration order.
    pub fn sorted_args(&self) -> Vec<&str> {
        required_first(&self.args, |a| a.get_constraints().is_required())
            .into_iter()
            .map(Param::name)
            .collect()
    }

    /// Flag names in lexicographic order.
    pub fn sorted_flags(&self) -> Vec<&str> {
        self.flags.keys().map(String::as_str).collect()
    }

    /// Environment variable names in lexicographic order.
    pub fn sorted_env(&self) -> Vec<&str> {
        self.env.keys().map(String::as_str).collect()
    }

    pub(crate) fn duplicates(&self) -> &[(ParamKind, String)] {
        &self.duplicates
    }

    pub(crate) fn post_validation(&self) -> Option<&PostValidationFn> {
        self.post_validation.as_ref()
    }

    pub(crate) fn handler_mut(&mut self) -> &mut dyn Handler {
        self.handler.as_mut()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("flags", &self.flags)
            .field("args", &self.args)
            .field("env", &self.env)
            .field("post_validation", &self.post_validation.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Implication;
    use crate::types::{Constraints, ValueType};

    fn sample() -> Command {
        Command::new("cmd", "Sample", |_ctx| 0)
            .flag(
                Param::new("flag1")
                    .alias('a')
                    .placeholder("int")
                    .value_type(ValueType::Int)
                    .required(),
            )
            .flag(
                Param::new("flag2")
                    .alias('b')
                    .value_type(ValueType::PathFile)
                    .constraints(Constraints::MUST_BE_REGULAR_FILE),
            )
            .flag(
                Param::new("flag3")
                    .alias('c')
                    .value_type(ValueType::Bool)
                    .on_true(Implication::flag("flag2").add(Constraints::MUST_EXIST)),
            )
            .arg(
                Param::new("arg1")
                    .placeholder("ARG1")
                    .value_type(ValueType::Int)
                    .required(),
            )
            .arg(Param::new("arg2").placeholder("ARG2").value_type(ValueType::Alphanumeric))
            .env(Param::new("ENVVAR1").value_type(ValueType::Int))
    }

    #[test]
    fn params_are_registered() {
        let cmd = sample();
        assert_eq!(cmd.sorted_flags(), vec!["flag1", "flag2", "flag3"]);
        assert_eq!(cmd.sorted_args(), vec!["arg1", "arg2"]);
        assert_eq!(cmd.sorted_env(), vec!["ENVVAR1"]);
        assert!(cmd.duplicates().is_empty());
    }

    #[test]
    fn kinds_are_assigned_on_insert() {
        let cmd = Command::new("cmd", "", |_ctx| 0)
            .arg(Param::new("file").alias('f'))
            .flag(Param::new("force").alias('f'));
        let arg = cmd.get_arg("file").unwrap();
        assert_eq!(arg.kind(), ParamKind::Argument);
        assert_eq!(arg.get_alias(), None);
        assert_eq!(cmd.get_flag("force").unwrap().kind(), ParamKind::Flag);
        assert_eq!(cmd.get_flag("force").unwrap().get_alias(), Some('f'));
    }

    #[test]
    fn env_vars_are_forced_required() {
        let cmd = sample();
        let env = cmd.env_vars().next().unwrap();
        assert!(env.get_constraints().is_required());
        assert_eq!(env.kind(), ParamKind::EnvVar);
    }

    #[test]
    fn optional_arg_declared_first_sorts_after_required() {
        let cmd = Command::new("cmd", "", |_ctx| 0)
            .arg(Param::new("opt1"))
            .arg(Param::new("req1").required());
        assert_eq!(cmd.sorted_args(), vec!["req1", "opt1"]);
    }

    #[test]
    fn duplicates_are_recorded_last_write_wins() {
        let cmd = Command::new("cmd", "", |_ctx| 0)
            .flag(Param::new("x").usage("first"))
            .flag(Param::new("x").usage("second"))
            .arg(Param::new("a"))
            .arg(Param::new("a").required())
            .env(Param::new("E"))
            .env(Param::new("E"));

        assert_eq!(cmd.get_flag("x").unwrap().get_usage(), "second");
        assert_eq!(cmd.args().len(), 1);
        assert!(cmd.get_arg("a").unwrap().get_constraints().is_required());
        assert_eq!(
            cmd.duplicates(),
            &[
                (ParamKind::Flag, "x".to_string()),
                (ParamKind::Argument, "a".to_string()),
                (ParamKind::EnvVar, "E".to_string()),
            ]
        );
    }

    #[test]
    fn handler_runs() {
        let mut cmd = Command::new("cmd", "", |ctx| if ctx.command == "cmd" { 7 } else { 1 });
        let ctx = CommandContext {
            command: "cmd".into(),
            ..Default::default()
        };
        assert_eq!(cmd.handler_mut().handle(&ctx), 7);
    }
}
