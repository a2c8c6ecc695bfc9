//! The parse/dispatch engine.
//!
//! ```text
//! Start ─┬─ no command / -h ─────────────────────────────→ app help, 0
//!        └─ CommandLookup ─┬─ unknown ───────────────────→ error + app help, 1
//!                          ├─ CMD -h ────────────────────→ command help, 0
//!                          └─ EnvCheck → FlagParse → Implications
//!                               → FlagValidate → ArgValidate
//!                               → PostValidation → handler ──→ handler's code
//! ```
//!
//! Any failure after the lookup ends the run with exit code 1.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::app::App;
use crate::command::Command;
use crate::env::EnvReader;
use crate::error::DispatchError;
use crate::handler::{CommandContext, ParsedValues};
use crate::help::{print_app_help, print_command_help};
use crate::hooks::ConstraintOverlay;
use crate::ordering::required_first;
use crate::param::Param;
use crate::parse::tokenize;
use crate::validate::validate_value;

/// Settings the validation pass reads from the app.
pub(crate) struct RunSettings<'a> {
    pub global_env: &'a BTreeMap<String, Param>,
    pub env_reader: &'a dyn EnvReader,
    pub strict_flags: bool,
}

/// Runs one invocation. `args[0]` is the program path.
pub(crate) fn run(
    app: &mut App,
    args: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let program = program_name(args.first(), app.name());

    let name = match args.get(1) {
        Some(token) if !is_help(token) => token.as_str(),
        _ => {
            tracing::debug!("no command given, printing help");
            app_help(app, &program, out, err);
            return 0;
        }
    };

    let Some(command) = app.commands.get_mut(name) else {
        tracing::debug!(command = name, "unknown command");
        let _ = write!(err, "{}\n\n", DispatchError::UnknownCommand(name.to_string()));
        app_help(app, &program, out, err);
        return 1;
    };

    if args.get(2).is_some_and(|token| is_help(token)) {
        print_command_help(command, &program, out, err);
        return 0;
    }

    let settings = RunSettings {
        global_env: &app.env,
        env_reader: app.env_reader.as_ref(),
        strict_flags: app.strict_flags,
    };
    let tokens = args.get(2..).unwrap_or_default();

    let values = match validate(&settings, command, tokens, err) {
        Ok(values) => values,
        Err(error) => {
            tracing::debug!(command = name, %error, "run rejected");
            let _ = writeln!(err, "ERROR: {}", error);
            if error.shows_help() {
                print_command_help(command, &program, out, err);
            }
            return 1;
        }
    };

    let ctx = CommandContext {
        program,
        command: name.to_string(),
        values,
    };
    tracing::debug!(command = name, "dispatching to handler");
    let code = command.handler_mut().handle(&ctx);
    tracing::debug!(command = name, code, "handler finished");
    code
}

/// Checks environment variables, flags and arguments of one run, then the
/// post-validation hook. Returns the values the handler will see.
///
/// A flag parse error is fatal only in strict mode. Otherwise it is written
/// to `err` and whatever clap managed to parse is used.
pub(crate) fn validate(
    settings: &RunSettings<'_>,
    command: &Command,
    tokens: &[String],
    err: &mut dyn Write,
) -> Result<ParsedValues, DispatchError> {
    let mut values = ParsedValues::new();

    // Global variables first, then the command's own, each in name order.
    for param in settings.global_env.values().chain(command.env_vars()) {
        let value = settings.env_reader.var(param.name()).unwrap_or_default();
        param
            .validate(&value)
            .map_err(|e| DispatchError::invalid(param, e))?;
        tracing::trace!(env = param.name(), "environment variable validated");
        values.insert_env(param.name(), value);
    }

    let tokenized = tokenize(command, tokens);
    if let Some(message) = tokenized.error {
        let error = DispatchError::MalformedFlags(message);
        if settings.strict_flags {
            return Err(error);
        }
        tracing::debug!(command = command.name(), %error, "continuing with partially parsed flags");
        let _ = writeln!(err, "ERROR: {}", error);
    }
    let raw = tokenized.invocation;

    // Every implication fires before any value is validated.
    let mut overlay = ConstraintOverlay::new();
    for flag in command.flags().filter(|f| f.is_bool()) {
        if raw.switched(flag.name()) {
            for implication in flag.implications() {
                tracing::debug!(flag = flag.name(), target = %implication.target(), "applying implication");
                overlay.apply(command, implication);
            }
        }
    }

    for flag in command.flags() {
        if flag.is_bool() {
            values.insert_flag(flag.name(), raw.switched(flag.name()).to_string());
            continue;
        }

        let (long, short) = raw.values(flag.name());
        if let Some(alias) = flag.get_alias() {
            if !long.is_empty() && !short.is_empty() {
                return Err(DispatchError::ConflictingFlagForms {
                    name: flag.name().to_string(),
                    alias,
                });
            }
        }

        let value = if long.is_empty() { short } else { long };
        validate_value(flag.get_value_type(), overlay.effective(flag), value)
            .map_err(|e| DispatchError::invalid(flag, e))?;
        tracing::trace!(flag = flag.name(), value, "flag validated");
        values.insert_flag(flag.name(), value);
    }

    let ordered = required_first(command.args(), |a| overlay.effective(a).is_required());
    let positionals = raw.positionals();
    if positionals.len() > ordered.len() {
        tracing::trace!(
            command = command.name(),
            ignored = positionals.len() - ordered.len(),
            "extra positional tokens"
        );
    }
    for (index, arg) in ordered.into_iter().enumerate() {
        let value = positionals.get(index).map(String::as_str).unwrap_or_default();
        validate_value(arg.get_value_type(), overlay.effective(arg), value)
            .map_err(|e| DispatchError::invalid(arg, e))?;
        tracing::trace!(arg = arg.name(), value, "argument validated");
        values.insert_arg(arg.name(), value);
    }

    if let Some(hook) = command.post_validation() {
        hook(command, &values).map_err(DispatchError::PostValidationRejected)?;
    }

    Ok(values)
}

fn app_help(app: &App, program: &str, out: &mut dyn Write, err: &mut dyn Write) {
    print_app_help(
        app.name(),
        app.usage(),
        app.author(),
        program,
        app.env.values(),
        app.commands.values(),
        out,
        err,
    );
}

fn is_help(token: &str) -> bool {
    token == "-h" || token == "--help"
}

/// Basename of `argv[0]`, falling back to the app name.
fn program_name(arg0: Option<&String>, fallback: &str) -> String {
    arg0.and_then(|a| Path::new(a).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}
