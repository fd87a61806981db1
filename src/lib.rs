//! Argot: a declarative command-line argument parser.
//!
//! A spec tree of commands and arguments is declared up front, validated
//! once, and matched against already-tokenized command lines. Matching walks
//! the token stream left to right in a single greedy pass, descending through
//! sub-commands, resolving options by long name, short name, bundled short
//! flags, or attached values, applying per-argument consumption rules
//! (`nargs`), and converting consumed tokens into typed values. Any violation
//! aborts the parse with a path-qualified diagnostic.
//!
//! ```
//! use argot::{ArgSpec, ArgType, CommandSpec, ParseOutcome, Parser, ParserConfig};
//!
//! let spec = CommandSpec::new("calc")
//!     .arg(ArgSpec::new("value").typed(ArgType::int()).help("input value"))
//!     .command(CommandSpec::new("double").help("double the input"));
//!
//! let parser = Parser::new(spec, ParserConfig::default()).unwrap();
//! match parser.parse(&["double", "-21"]).unwrap() {
//!     ParseOutcome::Command { matches, command, .. } => {
//!         assert_eq!(command.name, "double");
//!         assert_eq!(matches.get_int("value"), Some(-21));
//!     }
//!     ParseOutcome::Root(_) => unreachable!(),
//! }
//! ```

pub use crate::engine::{Matches, ParseOutcome, Parser};
pub use crate::errors::{ArgotError, CommandPath, ErrorKind};
pub use crate::spec::{
    Action, ArgSpec, ArgType, CommandSpec, Converter, Handler, Nargs, ParserConfig,
};
pub use crate::validate::validate;
pub use crate::value::Value;

pub mod convert;
pub mod engine;
pub mod errors;
pub mod help;
pub mod spec;
pub mod symbols;
pub mod validate;
pub mod value;

mod consume;
