//! Declarative commands, flags, positional arguments and environment
//! variables with typed validation.
//!
//! `argot` maps a process invocation `PROG COMMAND [FLAGS] [ARGS]` onto a
//! registered [`Command`], checks every declared value against its
//! [`ValueType`] and [`Constraints`], and hands the validated values to the
//! command's handler. The handler's return value is the exit code.
//!
//! # Features
//!
//! - **Typed values**: strings, booleans, integers, floats, alphanumerics
//!   (with optional `.`, `_`, `-`) and filesystem paths
//! - **Lists**: `1,2,3` / `a:b` / `x;y` with [`Constraints::ALLOW_MULTIPLE_VALUES`]
//! - **Path checks**: existence, kind and JSON contents
//! - **Implications**: a boolean flag can make other parameters required
//! - **Post-validation hook**: cross-parameter checks before the handler
//! - **Help**: top-level and per-command help rendered from templates
//!
//! # Example
//!
//! ```
//! use argot::{App, Command, Constraints, Implication, MockEnv, Param, ValueType};
//!
//! let mut app = App::builder("Greeter", "Greets people", "Jane Doe")
//!     .env("GREET_AUDIENCE", "Who is listening")
//!     .env_reader(MockEnv::new().with_var("GREET_AUDIENCE", "world"))
//!     .command(
//!         Command::new("print", "Prints greeting", |ctx| {
//!             if ctx.values.is_set("shout") { 2 } else { 0 }
//!         })
//!         .flag(
//!             Param::new("shout")
//!                 .alias('s')
//!                 .value_type(ValueType::Bool)
//!                 .on_true(Implication::flag("times").require()),
//!         )
//!         .flag(Param::new("times").alias('t').placeholder("N").value_type(ValueType::Int))
//!         .arg(
//!             Param::new("first")
//!                 .placeholder("FIRST_NAME")
//!                 .value_type(ValueType::Alphanumeric)
//!                 .constraints(Constraints::REQUIRED | Constraints::ALLOW_HYPHEN),
//!         ),
//!     )
//!     .build()?;
//!
//! assert_eq!(app.run_to_output(["greet", "print", "Mary-Jane"]).exit_code, 0);
//! assert_eq!(app.run_to_output(["greet", "print", "-s", "-t", "3", "Mary"]).exit_code, 2);
//!
//! // --shout makes --times required.
//! let output = app.run_to_output(["greet", "print", "-s", "Mary"]);
//! assert_eq!(output.exit_code, 1);
//! assert!(output.stderr.starts_with("ERROR: Flag times: param value missing"));
//! # Ok::<(), argot::SetupError>(())
//! ```
//!
//! # Run order
//!
//! Environment variables are checked first (global ones, then the command's
//! own), then flags are tokenized, implications of boolean flags are
//! applied, flags are validated in name order, positional arguments in
//! required-first order, and finally the post-validation hook runs.
//! The first failure prints `ERROR: ...` to stderr and ends the run with
//! exit code 1.

mod app;
mod command;
mod engine;
pub mod env;
mod error;
mod handler;
mod help;
mod hooks;
mod ordering;
mod param;
mod parse;
mod setup;
mod types;
mod validate;

pub use app::{App, AppBuilder, RunOutput};
pub use command::{Command, MAX_POSITIONAL_ARGS};
pub use env::{EnvReader, MockEnv, RealEnv};
pub use error::DispatchError;
pub use handler::{CommandContext, FnHandler, Handler, ParsedValues};
pub use hooks::{ConstraintOverlay, HookError, Implication, PostValidationFn, Target};
pub use ordering::required_first;
pub use param::Param;
pub use setup::SetupError;
pub use types::{Constraints, ParamKind, ValueType};
pub use validate::{validate_value, ValidationError};
