//! Help data extraction from apps and commands.

use serde::Serialize;

use crate::command::Command;
use crate::ordering::required_first;
use crate::param::Param;

/// Spaces between the label column and the text column.
const COLUMN_GAP: usize = 2;

#[derive(Debug, Serialize)]
pub(crate) struct AppHelp {
    pub name: String,
    pub author: String,
    pub usage: String,
    pub program: String,
    pub env: Vec<Row>,
    pub commands: Vec<Row>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommandHelp {
    pub program: String,
    pub command: String,
    pub usage: String,
    pub args_line: String,
    pub env: Vec<Row>,
    pub required_flags: Vec<Row>,
    pub optional_flags: Vec<Row>,
}

/// One line of a two-column listing.
#[derive(Debug, Serialize)]
pub(crate) struct Row {
    pub label: String,
    pub padding: String,
    pub text: String,
}

pub(crate) fn extract_app_help<'a>(
    name: &str,
    usage: &str,
    author: &str,
    program: &str,
    env: impl Iterator<Item = &'a Param>,
    commands: impl Iterator<Item = &'a Command>,
) -> AppHelp {
    let env = env
        .map(|p| (p.name().to_string(), p.get_usage().to_string()))
        .collect();
    let commands = commands
        .map(|c| (c.name().to_string(), c.usage().to_string()))
        .collect();

    AppHelp {
        name: name.to_string(),
        author: author.to_string(),
        usage: usage.to_string(),
        program: program.to_string(),
        env: rows(env),
        commands: rows(commands),
    }
}

pub(crate) fn extract_command_help(command: &Command, program: &str) -> CommandHelp {
    let env = command
        .env_vars()
        .map(|p| (p.name().to_string(), p.get_usage().to_string()))
        .collect();

    let (required, optional): (Vec<&Param>, Vec<&Param>) = command
        .flags()
        .partition(|f| f.get_constraints().is_required());
    let label = |f: &&Param| (f.flag_label(), f.get_usage().to_string());
    let required: Vec<_> = required.iter().map(label).collect();
    let optional: Vec<_> = optional.iter().map(label).collect();

    // Both flag sections share one column width.
    let width = column_width(required.iter().chain(optional.iter()));

    CommandHelp {
        program: program.to_string(),
        command: command.name().to_string(),
        usage: command.usage().to_string(),
        args_line: args_line(command),
        env: rows(env),
        required_flags: rows_with_width(required, width),
        optional_flags: rows_with_width(optional, width),
    }
}

/// ` REQ1 REQ2 [OPT1] [OPT2]`, by declared constraints.
fn args_line(command: &Command) -> String {
    required_first(command.args(), |a| a.get_constraints().is_required())
        .into_iter()
        .map(|arg| {
            if arg.get_constraints().is_required() {
                format!(" {}", arg.get_placeholder())
            } else {
                format!(" [{}]", arg.get_placeholder())
            }
        })
        .collect()
}

fn column_width<'a>(entries: impl Iterator<Item = &'a (String, String)>) -> usize {
    entries
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
}

fn rows(entries: Vec<(String, String)>) -> Vec<Row> {
    let width = column_width(entries.iter());
    rows_with_width(entries, width)
}

fn rows_with_width(entries: Vec<(String, String)>, width: usize) -> Vec<Row> {
    entries
        .into_iter()
        .map(|(label, text)| {
            let pad = width.saturating_sub(label.chars().count()) + COLUMN_GAP;
            Row {
                label,
                padding: " ".repeat(pad),
                text,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueType;

    fn command() -> Command {
        Command::new("print", "Prints greeting", |_ctx| 0)
            .flag(Param::new("language-file").alias('l').placeholder("PATH").usage("File").required())
            .flag(Param::new("alternative").alias('a').value_type(ValueType::Bool).usage("Alt"))
            .flag(Param::new("line").placeholder("NUM").usage("Line"))
            .arg(Param::new("last").placeholder("LAST_NAME"))
            .arg(Param::new("first").placeholder("FIRST_NAME").required())
            .env(Param::new("HOME").usage("Home directory"))
    }

    #[test]
    fn args_line_lists_required_then_optional() {
        assert_eq!(args_line(&command()), " FIRST_NAME [LAST_NAME]");
    }

    #[test]
    fn flags_split_by_requirement() {
        let help = extract_command_help(&command(), "greet");
        let required: Vec<_> = help.required_flags.iter().map(|r| r.label.as_str()).collect();
        let optional: Vec<_> = help.optional_flags.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(required, vec!["-l, --language-file PATH"]);
        assert_eq!(optional, vec!["-a, --alternative", "    --line NUM"]);
    }

    #[test]
    fn flag_columns_align_across_sections() {
        let help = extract_command_help(&command(), "greet");
        let ends: Vec<usize> = help
            .required_flags
            .iter()
            .chain(help.optional_flags.iter())
            .map(|r| r.label.len() + r.padding.len())
            .collect();
        assert!(ends.iter().all(|&e| e == ends[0]));
        assert_eq!(ends[0], "-l, --language-file PATH".len() + COLUMN_GAP);
    }

    #[test]
    fn app_help_rows() {
        let cmd = command();
        let env = vec![Param::new("API_TOKEN").usage("Token")];
        let help = extract_app_help(
            "greet",
            "Greets people",
            "Jane",
            "greet",
            env.iter(),
            std::iter::once(&cmd),
        );
        assert_eq!(help.env.len(), 1);
        assert_eq!(help.env[0].padding, "  ");
        assert_eq!(help.commands[0].label, "print");
        assert_eq!(help.commands[0].text, "Prints greeting");
    }
}
