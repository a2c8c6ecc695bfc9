//! Help output for apps and commands.
//!
//! Help is extracted into serializable data structs and rendered through
//! minijinja templates:
//!
//! - `app.txt`: program banner, required global environment variables and
//!   the command list
//! - `command.txt`: usage line with positional placeholders, required
//!   environment variables, required and optional flags

pub(crate) mod data;
mod render;

use std::io::Write;

use crate::command::Command;
use crate::param::Param;

pub(crate) use data::{extract_app_help, extract_command_help};
pub(crate) use render::{render_app_help, render_command_help};

const RENDER_FAILED: &str = "ERROR: Unable to build help message";

/// Writes rendered help to `out`, or the failure notice to `err`.
pub(crate) fn write_help(
    rendered: Result<String, minijinja::Error>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) {
    let written = match rendered {
        Ok(text) => out.write_all(text.as_bytes()),
        Err(e) => {
            tracing::warn!(error = %e, "help template failed to render");
            Err(std::io::Error::other(e.to_string()))
        }
    };
    if written.is_err() {
        let _ = writeln!(err, "{}", RENDER_FAILED);
    }
}

/// Renders and writes the help of `command`.
pub(crate) fn print_command_help(
    command: &Command,
    program: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) {
    let data = extract_command_help(command, program);
    write_help(render_command_help(&data), out, err);
}

/// Renders and writes the top-level help.
#[allow(clippy::too_many_arguments)]
pub(crate) fn print_app_help<'a>(
    name: &str,
    usage: &str,
    author: &str,
    program: &str,
    env: impl Iterator<Item = &'a Param>,
    commands: impl Iterator<Item = &'a Command>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) {
    let data = extract_app_help(name, usage, author, program, env, commands);
    write_help(render_app_help(&data), out, err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failure_goes_to_stderr() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let broken = minijinja::Environment::new().render_str("{% if %}", ());
        write_help(broken, &mut out, &mut err);
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "ERROR: Unable to build help message\n");
    }
}
