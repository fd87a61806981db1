//! Unified error type for every failure mode of the parser.
//!
//! Every error carries the command path taken so far, so a failure deep in a
//! sub-command tree reads as `app sync remote: ...` rather than a bare
//! message. Spec errors (`InvalidCommand`, `InvalidOption`) are only produced
//! by validation, before any parsing begins; the remaining kinds are terminal
//! parse failures. There is no recovery and no partial result: the first
//! error aborts the whole parse.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// The ordered sequence of command names visited so far, starting at the
/// root command. Used purely for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPath(Vec<String>);

impl CommandPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.0.join(" "))
        }
    }
}

/// Type-safe classification of an [`ArgotError`], for programmatic matching
/// without string inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The declared spec violates a structural invariant (command form).
    InvalidCommand,
    /// The declared spec violates a structural invariant (argument form).
    InvalidOption,
    /// A token matched no sub-command, known option, or pending positional.
    UnknownArgument,
    /// A required argument was never supplied, or a non-leaf command was
    /// reached without a sub-command and has no handler.
    MissingArgument,
    /// A token failed conversion, a constraint check, or a count requirement.
    InvalidArgument,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCommand => "InvalidCommand",
            ErrorKind::InvalidOption => "InvalidOption",
            ErrorKind::UnknownArgument => "UnknownArgument",
            ErrorKind::MissingArgument => "MissingArgument",
            ErrorKind::InvalidArgument => "InvalidArgument",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All parser failure modes. The caller is expected to render this (usage
/// text appended if desired) and exit non-zero; the library itself never
/// prints or exits.
#[derive(Debug, Error, Diagnostic)]
pub enum ArgotError {
    #[error("{path}: invalid command spec: {reason}")]
    #[diagnostic(
        code(argot::invalid_command),
        help("fix the command declaration before constructing a parser")
    )]
    InvalidCommand { path: CommandPath, reason: String },

    #[error("{path}: invalid argument spec `{name}`: {reason}")]
    #[diagnostic(
        code(argot::invalid_option),
        help("fix the argument declaration before constructing a parser")
    )]
    InvalidOption {
        path: CommandPath,
        name: String,
        reason: String,
    },

    #[error("{path}: unrecognized argument `{token}`")]
    #[diagnostic(code(argot::unknown_argument))]
    UnknownArgument { path: CommandPath, token: String },

    #[error("{path}: required argument `{name}` was not provided")]
    #[diagnostic(code(argot::missing_argument))]
    MissingArgument { path: CommandPath, name: String },

    #[error("{path}: invalid argument `{name}`: {reason}")]
    #[diagnostic(code(argot::invalid_argument))]
    InvalidArgument {
        path: CommandPath,
        name: String,
        /// The offending raw token, empty when the failure is a token-count
        /// shortfall rather than a single bad value.
        value: String,
        reason: String,
    },
}

impl ArgotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArgotError::InvalidCommand { .. } => ErrorKind::InvalidCommand,
            ArgotError::InvalidOption { .. } => ErrorKind::InvalidOption,
            ArgotError::UnknownArgument { .. } => ErrorKind::UnknownArgument,
            ArgotError::MissingArgument { .. } => ErrorKind::MissingArgument,
            ArgotError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }

    /// The command path at the point of failure.
    pub fn path(&self) -> &CommandPath {
        match self {
            ArgotError::InvalidCommand { path, .. }
            | ArgotError::InvalidOption { path, .. }
            | ArgotError::UnknownArgument { path, .. }
            | ArgotError::MissingArgument { path, .. }
            | ArgotError::InvalidArgument { path, .. } => path,
        }
    }
}
