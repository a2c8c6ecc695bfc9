//! Flag tokenizer.
//!
//! Turns the tokens after the command name into raw flag values and
//! positional candidates. No validation happens here.
//!
//! Every declared flag is registered with clap twice when it has an alias:
//! once as `--name` and once as `-a`, under different ids. The engine needs
//! both raw values to detect `-a x --name y`, which a single clap argument
//! with a short and a long form would silently merge.

use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction, ArgMatches};
use std::collections::HashMap;

use crate::command::Command;
use crate::param::Param;

const POSITIONALS: &str = "argot.positionals";

/// Raw value(s) of one flag, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawFlag {
    /// Boolean flag: true if either form was switched on.
    Switch(bool),
    /// Valued flag: what `--name` and `-a` carried, empty when absent.
    Value { long: String, short: String },
}

/// Tokens of one run, split into flags and positional candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawInvocation {
    flags: HashMap<String, RawFlag>,
    positionals: Vec<String>,
}

impl RawInvocation {
    /// Returns true if the boolean flag `name` was switched on.
    pub(crate) fn switched(&self, name: &str) -> bool {
        matches!(self.flags.get(name), Some(RawFlag::Switch(true)))
    }

    /// The long-form and alias-form values of flag `name`.
    pub(crate) fn values(&self, name: &str) -> (&str, &str) {
        match self.flags.get(name) {
            Some(RawFlag::Value { long, short }) => (long, short),
            _ => ("", ""),
        }
    }

    /// Leftover tokens, in order.
    pub(crate) fn positionals(&self) -> &[String] {
        &self.positionals
    }
}

/// Result of tokenizing: whatever could be parsed, plus the parse error.
#[derive(Debug)]
pub(crate) struct Tokenized {
    pub invocation: RawInvocation,
    pub error: Option<String>,
}

/// Tokenizes `tokens` against the flags declared on `command`.
///
/// On a clap error the tokens are parsed again with errors ignored. The
/// invocation then holds what clap had committed before the offending token:
/// flags with attached values (`--name=x`) and switches, but not a value
/// still waiting for its flag to be closed.
pub(crate) fn tokenize(command: &Command, tokens: &[String]) -> Tokenized {
    match clap_command(command, false).try_get_matches_from(tokens) {
        Ok(matches) => Tokenized {
            invocation: collect(command, &matches),
            error: None,
        },
        Err(e) => {
            let message = describe(&e);
            tracing::debug!(command = command.name(), kind = ?e.kind(), %message, "flag parsing failed");
            let invocation = clap_command(command, true)
                .try_get_matches_from(tokens)
                .map(|matches| collect(command, &matches))
                .unwrap_or_default();
            Tokenized {
                invocation,
                error: Some(message),
            }
        }
    }
}

fn clap_command(command: &Command, lenient: bool) -> clap::Command {
    let positionals = Arg::new(POSITIONALS)
        .num_args(1..)
        .action(ArgAction::Append)
        .allow_negative_numbers(true);

    command.flags().fold(
        clap::Command::new(command.name().to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .ignore_errors(lenient)
            .arg(positionals),
        |cmd, flag| {
            let cmd = cmd.arg(flag_arg(flag, long_id(flag)).long(flag.name().to_string()));
            match flag.get_alias() {
                Some(alias) => cmd.arg(flag_arg(flag, short_id(alias)).short(alias)),
                None => cmd,
            }
        },
    )
}

fn flag_arg(flag: &Param, id: String) -> Arg {
    let arg = Arg::new(id);
    if flag.is_bool() {
        // `--flag=false` is accepted; `--flag POS` leaves POS alone.
        arg.action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(BoolishValueParser::new())
    } else {
        arg.action(ArgAction::Set)
            .num_args(0..=1)
            .default_missing_value("")
            .allow_hyphen_values(true)
    }
}

fn long_id(flag: &Param) -> String {
    format!("--{}", flag.name())
}

fn short_id(alias: char) -> String {
    format!("-{}", alias)
}

fn collect(command: &Command, matches: &ArgMatches) -> RawInvocation {
    let flags = command
        .flags()
        .map(|flag| {
            let short = flag.get_alias().map(short_id);
            let raw = if flag.is_bool() {
                let on = switch(matches, &long_id(flag))
                    || short.as_deref().is_some_and(|id| switch(matches, id));
                RawFlag::Switch(on)
            } else {
                RawFlag::Value {
                    long: value(matches, &long_id(flag)),
                    short: short.as_deref().map(|id| value(matches, id)).unwrap_or_default(),
                }
            };
            (flag.name().to_string(), raw)
        })
        .collect();

    let positionals = matches
        .try_get_many::<String>(POSITIONALS)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    RawInvocation { flags, positionals }
}

fn switch(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

fn value(matches: &ArgMatches, id: &str) -> String {
    matches
        .try_get_one::<String>(id)
        .ok()
        .flatten()
        .cloned()
        .unwrap_or_default()
}

/// First line of a clap error, without the `error: ` prefix.
fn describe(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
