//! The application registry and its builder.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

use crate::command::{Command, MAX_POSITIONAL_ARGS};
use crate::engine;
use crate::env::{EnvReader, RealEnv};
use crate::hooks::Target;
use crate::param::Param;
use crate::setup::SetupError;
use crate::types::{Constraints, ParamKind};

/// Captured result of [`App::run_to_output`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Builder for [`App`].
///
/// ```
/// use argot::{App, Command, Param};
///
/// let app = App::builder("Greeter", "Greets people", "Jane Doe")
///     .env("GREET_AUDIENCE", "Who is listening")
///     .command(
///         Command::new("print", "Prints greeting", |ctx| {
///             println!("Hello {}", ctx.arg("first"));
///             0
///         })
///         .arg(Param::new("first").placeholder("FIRST_NAME").required()),
///     )
///     .build()
///     .unwrap();
///
/// assert!(app.command("print").is_some());
/// ```
pub struct AppBuilder {
    name: String,
    usage: String,
    author: String,
    commands: Vec<Command>,
    env: Vec<Param>,
    env_reader: Option<Box<dyn EnvReader>>,
    strict_flags: bool,
}

impl AppBuilder {
    /// Registers a command.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Adds an environment variable every command requires.
    pub fn env(mut self, name: impl Into<String>, usage: impl Into<String>) -> Self {
        let mut param = Param::new(name).usage(usage).into_kind(ParamKind::EnvVar);
        param.force_required();
        self.env.push(param);
        self
    }

    /// Replaces the process environment, mostly for tests.
    pub fn env_reader<R: EnvReader + 'static>(mut self, reader: R) -> Self {
        self.env_reader = Some(Box::new(reader));
        self
    }

    /// Makes malformed flag syntax end the run with exit code 1.
    ///
    /// By default the parse error is printed and the run continues with
    /// whatever flags were parsed before it.
    pub fn strict_flags(mut self, strict: bool) -> Self {
        self.strict_flags = strict;
        self
    }

    /// Checks every definition and builds the app.
    pub fn build(self) -> Result<App, SetupError> {
        let mut env = BTreeMap::new();
        for param in self.env {
            let name = param.name().to_string();
            if env.insert(name.clone(), param).is_some() {
                return Err(SetupError::DuplicateEnvVar(name));
            }
        }

        let mut commands = BTreeMap::new();
        for command in self.commands {
            check_command(&command)?;
            let name = command.name().to_string();
            if commands.contains_key(&name) {
                return Err(SetupError::DuplicateCommand(name));
            }
            commands.insert(name, command);
        }

        tracing::debug!(
            app = %self.name,
            commands = commands.len(),
            env = env.len(),
            "app built"
        );

        Ok(App {
            name: self.name,
            usage: self.usage,
            author: self.author,
            commands,
            env,
            env_reader: self.env_reader.unwrap_or_else(|| Box::new(RealEnv)),
            strict_flags: self.strict_flags,
        })
    }
}

fn check_command(command: &Command) -> Result<(), SetupError> {
    let cmd = command.name();
    check_name(cmd, cmd)?;

    if let Some((kind, name)) = command.duplicates().first() {
        return Err(SetupError::DuplicateParam {
            command: cmd.to_string(),
            kind: *kind,
            name: name.clone(),
        });
    }

    if command.args().len() > MAX_POSITIONAL_ARGS {
        return Err(SetupError::TooManyPositionalArguments {
            command: cmd.to_string(),
            count: command.args().len(),
            max: MAX_POSITIONAL_ARGS,
        });
    }

    let params = command
        .flags()
        .chain(command.args())
        .chain(command.env_vars());
    for param in params {
        check_name(cmd, param.name())?;
        if conflicting_path_rules(param.get_constraints()) {
            return Err(SetupError::ConflictingConstraints {
                command: cmd.to_string(),
                name: param.name().to_string(),
            });
        }
        // Implications only fire from boolean flags.
        let fires = param.kind() == ParamKind::Flag && param.is_bool();
        if !fires && !param.implications().is_empty() {
            return Err(SetupError::InvalidImplicationSource {
                command: cmd.to_string(),
                name: param.name().to_string(),
            });
        }
    }

    let mut aliases: HashMap<char, &str> = HashMap::new();
    for flag in command.flags() {
        if let Some(alias) = flag.get_alias() {
            if !alias.is_ascii_alphanumeric() {
                return Err(SetupError::InvalidAlias {
                    command: cmd.to_string(),
                    name: flag.name().to_string(),
                    alias,
                });
            }
            if let Some(first) = aliases.insert(alias, flag.name()) {
                return Err(SetupError::DuplicateAlias {
                    command: cmd.to_string(),
                    alias,
                    first: first.to_string(),
                    second: flag.name().to_string(),
                });
            }
        }

        for implication in flag.implications() {
            let target = implication.target();
            let declared = match target {
                Target::Flag(name) => command.get_flag(name),
                Target::Arg(name) => command.get_arg(name),
            };
            let Some(declared) = declared else {
                return Err(SetupError::UnknownImplicationTarget {
                    command: cmd.to_string(),
                    flag: flag.name().to_string(),
                    target: target.clone(),
                });
            };
            if conflicting_path_rules(implication.apply(declared.get_constraints())) {
                return Err(SetupError::ConflictingConstraints {
                    command: cmd.to_string(),
                    name: declared.name().to_string(),
                });
            }
        }
    }

    Ok(())
}

fn conflicting_path_rules(constraints: Constraints) -> bool {
    constraints.contains(Constraints::MUST_EXIST | Constraints::MUST_NOT_EXIST)
}

fn check_name(command: &str, name: &str) -> Result<(), SetupError> {
    let malformed = name.is_empty()
        || name.starts_with('-')
        || name.contains('=')
        || name.chars().any(char::is_whitespace);
    if malformed {
        return Err(SetupError::InvalidName {
            command: command.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// A set of commands sharing a name, author and required environment.
///
/// Runs are independent: parsed values live in the [`CommandContext`]
/// handed to the handler and nothing is kept between runs.
///
/// [`CommandContext`]: crate::CommandContext
pub struct App {
    name: String,
    usage: String,
    author: String,
    pub(crate) commands: BTreeMap<String, Command>,
    pub(crate) env: BTreeMap<String, Param>,
    pub(crate) env_reader: Box<dyn EnvReader>,
    pub(crate) strict_flags: bool,
}

impl App {
    /// Starts building an app. Name, usage and author appear in the help.
    pub fn builder(
        name: impl Into<String>,
        usage: impl Into<String>,
        author: impl Into<String>,
    ) -> AppBuilder {
        AppBuilder {
            name: name.into(),
            usage: usage.into(),
            author: author.into(),
            commands: Vec::new(),
            env: Vec::new(),
            env_reader: None,
            strict_flags: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Looks up a command by exact name.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Command names in lexicographic order.
    pub fn sorted_commands(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Global environment variable names in lexicographic order.
    pub fn sorted_env(&self) -> Vec<&str> {
        self.env.keys().map(String::as_str).collect()
    }

    /// Runs with the process arguments, stdout and stderr. Returns the exit code.
    pub fn run(&mut self) -> i32 {
        let args: Vec<String> = std::env::args_os()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.run_with_writers(args, &mut stdout.lock(), &mut stderr.lock())
    }

    /// Runs with the given arguments. The first one is the program path.
    pub fn run_from<I, T>(&mut self, args: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.run_with_writers(args, &mut stdout.lock(), &mut stderr.lock())
    }

    /// Runs with the given arguments and output streams.
    pub fn run_with_writers<I, T>(&mut self, args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let code = engine::run(self, &args, out, err);
        let _ = out.flush();
        let _ = err.flush();
        code
    }

    /// Runs with the given arguments and captures both streams.
    ///
    /// ```
    /// use argot::App;
    ///
    /// let mut app = App::builder("Greeter", "Greets people", "Jane").build().unwrap();
    /// let output = app.run_to_output(["greet", "nope"]);
    /// assert_eq!(output.exit_code, 1);
    /// assert!(output.stderr.starts_with("Invalid command: nope"));
    /// ```
    pub fn run_to_output<I, T>(&mut self, args: I) -> RunOutput
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let exit_code = self.run_with_writers(args, &mut out, &mut err);
        RunOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("author", &self.author)
            .field("commands", &self.commands)
            .field("env", &self.env)
            .field("strict_flags", &self.strict_flags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Implication;
    use crate::types::ValueType;

    fn builder() -> AppBuilder {
        App::builder("Test", "Test app", "Tester")
    }

    fn noop(name: &str) -> Command {
        Command::new(name, "", |_ctx| 0)
    }

    #[test]
    fn commands_are_sorted() {
        let app = builder()
            .command(noop("zeta"))
            .command(noop("alpha"))
            .env("B_VAR", "")
            .env("A_VAR", "")
            .build()
            .unwrap();
        assert_eq!(app.sorted_commands(), vec!["alpha", "zeta"]);
        assert_eq!(app.sorted_env(), vec!["A_VAR", "B_VAR"]);
    }

    #[test]
    fn global_env_is_required_string() {
        let app = builder().env("TOKEN", "Token").build().unwrap();
        let param = app.env.get("TOKEN").unwrap();
        assert_eq!(param.kind(), ParamKind::EnvVar);
        assert_eq!(param.get_value_type(), ValueType::String);
        assert!(param.get_constraints().is_required());
    }

    #[test]
    fn duplicate_command_rejected() {
        let err = builder().command(noop("a")).command(noop("a")).build().unwrap_err();
        assert_eq!(err, SetupError::DuplicateCommand("a".into()));
    }

    #[test]
    fn duplicate_global_env_rejected() {
        let err = builder().env("X", "").env("X", "").build().unwrap_err();
        assert_eq!(err, SetupError::DuplicateEnvVar("X".into()));
    }

    #[test]
    fn duplicate_param_rejected() {
        let err = builder()
            .command(noop("a").flag(Param::new("x")).flag(Param::new("x")))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::DuplicateParam {
                command: "a".into(),
                kind: ParamKind::Flag,
                name: "x".into(),
            }
        );
    }

    #[test]
    fn too_many_positional_arguments() {
        let cmd = (0..=MAX_POSITIONAL_ARGS).fold(noop("a"), |cmd, i| {
            cmd.arg(Param::new(format!("arg{i}")).placeholder(format!("ARG{i}")))
        });
        let err = builder().command(cmd).build().unwrap_err();
        assert_eq!(
            err,
            SetupError::TooManyPositionalArguments {
                command: "a".into(),
                count: 11,
                max: 10,
            }
        );

        let cmd = (0..MAX_POSITIONAL_ARGS).fold(noop("a"), |cmd, i| cmd.arg(Param::new(format!("arg{i}"))));
        assert!(builder().command(cmd).build().is_ok());
    }

    #[test]
    fn exist_and_not_exist_conflict() {
        let err = builder()
            .command(noop("a").arg(
                Param::new("path")
                    .value_type(ValueType::PathFile)
                    .constraints(Constraints::MUST_EXIST | Constraints::MUST_NOT_EXIST),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SetupError::ConflictingConstraints { name, .. } if name == "path"));
    }

    #[test]
    fn malformed_names_rejected() {
        for bad in ["", "-x", "a b", "a=b"] {
            let err = builder()
                .command(noop("a").flag(Param::new(bad)))
                .build()
                .unwrap_err();
            assert!(matches!(err, SetupError::InvalidName { .. }), "{bad:?}");
        }
        let err = builder().command(noop("--help")).build().unwrap_err();
        assert!(matches!(err, SetupError::InvalidName { .. }));
    }

    #[test]
    fn alias_checks() {
        let err = builder()
            .command(noop("a").flag(Param::new("x").alias('-')))
            .build()
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidAlias { alias: '-', .. }));

        let err = builder()
            .command(
                noop("a")
                    .flag(Param::new("one").alias('o'))
                    .flag(Param::new("other").alias('o')),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::DuplicateAlias {
                command: "a".into(),
                alias: 'o',
                first: "one".into(),
                second: "other".into(),
            }
        );
    }

    #[test]
    fn implication_targets_must_exist() {
        let err = builder()
            .command(noop("a").flag(
                Param::new("force")
                    .value_type(ValueType::Bool)
                    .on_true(Implication::arg("output").require()),
            ))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::UnknownImplicationTarget {
                command: "a".into(),
                flag: "force".into(),
                target: Target::Arg("output".into()),
            }
        );
    }

    #[test]
    fn implication_cannot_create_path_conflict() {
        let out = || {
            Param::new("out")
                .value_type(ValueType::PathFile)
                .constraints(Constraints::MUST_NOT_EXIST)
        };
        let err = builder()
            .command(noop("a").flag(out()).flag(
                Param::new("x")
                    .value_type(ValueType::Bool)
                    .on_true(Implication::flag("out").add(Constraints::MUST_EXIST)),
            ))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::ConflictingConstraints {
                command: "a".into(),
                name: "out".into(),
            }
        );

        // Swapping one rule for the other is fine.
        let swap = Implication::flag("out")
            .add(Constraints::MUST_EXIST)
            .remove(Constraints::MUST_NOT_EXIST);
        let built = builder()
            .command(
                noop("a")
                    .flag(out())
                    .flag(Param::new("x").value_type(ValueType::Bool).on_true(swap)),
            )
            .build();
        assert!(built.is_ok());
    }

    #[test]
    fn implications_need_boolean_flag() {
        let err = builder()
            .command(
                noop("a")
                    .flag(Param::new("level").on_true(Implication::flag("out").require()))
                    .flag(Param::new("out")),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SetupError::InvalidImplicationSource {
                command: "a".into(),
                name: "level".into(),
            }
        );

        let err = builder()
            .command(
                noop("a")
                    .flag(Param::new("out"))
                    .arg(Param::new("file").on_true(Implication::flag("out").require())),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SetupError::InvalidImplicationSource { name, .. } if name == "file"));
    }

    #[test]
    fn run_to_output_captures_help() {
        let mut app = builder().command(noop("list")).build().unwrap();
        let output = app.run_to_output(["/usr/bin/test"]);
        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.starts_with("Test by Tester\nTest app\n"));
        assert!(output.stdout.contains("Run 'test COMMAND --help' for command syntax."));
        assert!(output.stderr.is_empty());
    }
}
