//! `greet`: prints greetings read from a language file.
//!
//! ```text
//! greet print FIRST_NAME [LAST_NAME] -l PATH [-a] [-n LINE] [-c -g TEXT]
//! greet lines -l PATH
//! ```
//!
//! Both commands need `GREET_AUDIENCE` in the environment. Set `RUST_LOG`
//! to see what the library does, e.g. `RUST_LOG=argot=debug`.

mod greetings;

use anyhow::{Context, Result};
use argot::{
    App, Command, CommandContext, Constraints, HookError, Implication, Param, ParsedValues,
    ValueType,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const AUDIENCE: &str = "GREET_AUDIENCE";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let mut app = build_app().context("invalid command definitions")?;
    let code = app.run();
    std::process::exit(code);
}

fn build_app() -> Result<App, argot::SetupError> {
    App::builder("Greeter", "Prints greetings from a language file", "Jane Doe")
        .env(AUDIENCE, "Who the greeting is for, shown before it")
        .command(print_command())
        .command(lines_command())
        .build()
}

fn language_file() -> Param {
    Param::new("language-file")
        .alias('l')
        .placeholder("PATH")
        .usage("File with one 'hello:alternative' greeting per line")
        .value_type(ValueType::PathFile)
        .constraints(Constraints::REQUIRED | Constraints::MUST_EXIST | Constraints::MUST_BE_REGULAR_FILE)
}

fn print_command() -> Command {
    Command::new("print", "Prints a greeting", |ctx| report(print(ctx)))
        .flag(language_file())
        .flag(
            Param::new("alternative")
                .alias('a')
                .usage("Use the alternative greeting")
                .value_type(ValueType::Bool),
        )
        .flag(
            Param::new("line")
                .alias('n')
                .placeholder("LINE")
                .usage("Line of the language file to use, from 1")
                .value_type(ValueType::Int),
        )
        .flag(
            Param::new("custom")
                .alias('c')
                .usage("Use the greeting given with --greeting")
                .value_type(ValueType::Bool)
                .on_true(Implication::flag("greeting").require()),
        )
        .flag(
            Param::new("greeting")
                .alias('g')
                .placeholder("TEXT")
                .usage("Custom greeting, needs --custom"),
        )
        .arg(
            Param::new("first")
                .placeholder("FIRST_NAME")
                .usage("First name")
                .value_type(ValueType::Alphanumeric)
                .constraints(Constraints::REQUIRED | Constraints::ALLOW_HYPHEN),
        )
        .arg(
            Param::new("last")
                .placeholder("LAST_NAME")
                .usage("Last name")
                .value_type(ValueType::Alphanumeric)
                .constraints(Constraints::ALLOW_HYPHEN),
        )
        .on_post_validation(check_names)
}

fn lines_command() -> Command {
    Command::new("lines", "Lists the greetings of a language file", |ctx| {
        report(lines(ctx))
    })
    .flag(language_file())
}

fn check_names(_cmd: &Command, values: &ParsedValues) -> Result<(), HookError> {
    if values.is_set("custom") || values.flag("greeting").is_empty() {
        return Ok(());
    }
    Err(HookError::new("--greeting is only used together with --custom"))
}

fn print(ctx: &CommandContext) -> Result<()> {
    let greetings = greetings::load(Path::new(ctx.flag("language-file")))?;
    let line = match ctx.values.flag_as::<usize>("line") {
        Some(parsed) => parsed.context("line number out of range")?,
        None => 1,
    };
    let greeting = greetings::pick(&greetings, line)?;

    let word = if ctx.values.is_set("custom") {
        ctx.flag("greeting")
    } else if ctx.values.is_set("alternative") {
        greeting.alternative.as_str()
    } else {
        greeting.hello.as_str()
    };

    tracing::debug!(line, word, "greeting chosen");
    println!(
        "[{}] {}",
        ctx.values.env(AUDIENCE),
        greetings::format(word, ctx.arg("first"), ctx.arg("last"))
    );
    Ok(())
}

fn lines(ctx: &CommandContext) -> Result<()> {
    let greetings = greetings::load(Path::new(ctx.flag("language-file")))?;
    for (index, greeting) in greetings.iter().enumerate() {
        println!("{:>3}  {} / {}", index + 1, greeting.hello, greeting.alternative);
    }
    Ok(())
}

/// Turns a handler result into an exit code.
fn report(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argot::MockEnv;
    use std::fs;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> (App, String) {
        let path = dir.path().join("en.txt");
        fs::write(&path, "Hello:Hi\nGood morning:Morning\n").unwrap();

        let app = App::builder("Greeter", "", "")
            .env(AUDIENCE, "")
            .env_reader(MockEnv::new().with_var(AUDIENCE, "all"))
            .command(print_command())
            .command(lines_command())
            .build()
            .unwrap();
        (app, path.to_string_lossy().into_owned())
    }

    #[test]
    fn definitions_are_valid() {
        assert!(build_app().is_ok());
    }

    #[test]
    fn prints_greeting() {
        let dir = TempDir::new().unwrap();
        let (mut app, path) = app(&dir);
        let output = app.run_to_output(["greet", "print", "-l", path.as_str(), "John"]);
        assert_eq!(output.exit_code, 0, "{}", output.stderr);
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn custom_needs_greeting() {
        let dir = TempDir::new().unwrap();
        let (mut app, path) = app(&dir);

        let output = app.run_to_output(["greet", "print", "-l", path.as_str(), "-c", "John"]);
        assert_eq!(output.exit_code, 1);
        assert!(output
            .stderr
            .starts_with("ERROR: Flag greeting: param value missing"));

        let output = app.run_to_output([
            "greet",
            "print",
            "-l",
            path.as_str(),
            "-c",
            "-g",
            "Howdy",
            "John",
        ]);
        assert_eq!(output.exit_code, 0, "{}", output.stderr);
    }

    #[test]
    fn greeting_without_custom_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut app, path) = app(&dir);
        let output = app.run_to_output(["greet", "print", "-l", path.as_str(), "-g", "Yo", "John"]);
        assert_eq!(output.exit_code, 1);
        assert_eq!(
            output.stderr.lines().next(),
            Some("ERROR: --greeting is only used together with --custom")
        );
    }

    #[test]
    fn line_out_of_range_is_handler_error() {
        let dir = TempDir::new().unwrap();
        let (mut app, path) = app(&dir);
        let output = app.run_to_output(["greet", "print", "-l", path.as_str(), "-n", "5", "John"]);
        assert_eq!(output.exit_code, 2);
    }

    #[test]
    fn missing_language_file() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app(&dir);
        let missing = dir.path().join("fr.txt").to_string_lossy().into_owned();
        let output = app.run_to_output(["greet", "lines", "--language-file", missing.as_str()]);
        assert_eq!(output.exit_code, 1);
        assert!(output.stderr.contains("file does not exist"));
    }
}
