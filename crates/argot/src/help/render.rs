//! Help rendering functions.

use minijinja::Environment;
use serde::Serialize;

use super::data::{AppHelp, CommandHelp};

/// Renders the top-level help.
pub(crate) fn render_app_help(data: &AppHelp) -> Result<String, minijinja::Error> {
    render(include_str!("app.txt"), data)
}

/// Renders the help of one command.
pub(crate) fn render_command_help(data: &CommandHelp) -> Result<String, minijinja::Error> {
    render(include_str!("command.txt"), data)
}

fn render<S: Serialize>(template: &str, data: &S) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.render_str(template, data)
}
