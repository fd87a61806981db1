//! The declarative spec model: argument descriptors, command trees, and
//! parser configuration.
//!
//! A spec is plain data with builder-style constructors and no behavior of
//! its own; structural invariants are checked once by [`crate::validate`]
//! before a parser is built. A validated tree is immutable and may be shared
//! across any number of concurrent parses.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::engine::Matches;
use crate::value::Value;

/// User-supplied conversion from a raw token to a typed value. Failures are
/// normalized into the same invalid-argument failure as the built-in types.
#[derive(Clone)]
pub struct Converter(Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>);

impl Converter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        (self.0)(raw)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter(..)")
    }
}

impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Opaque callable attached to a command. The engine never invokes it; it is
/// handed back through the parse outcome for an external dispatcher.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(&Matches) + Send + Sync>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Matches) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn invoke(&self, matches: &Matches) {
        (self.0)(matches)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// The closed set of argument types, each carrying its own constraint
/// payload. Conversion sites match exhaustively over this enum.
#[derive(Debug, Clone)]
pub enum ArgType {
    /// Exact literals `true`/`false`; doubles as a zero-argument flag.
    Bool,
    /// Signed integer with optional inclusive bounds.
    Int { min: Option<i64>, max: Option<i64> },
    /// Float with optional inclusive bounds; accepts a bare integer literal.
    Float { min: Option<f64>, max: Option<f64> },
    /// String, optionally required to match a pattern.
    Str { pattern: Option<Regex> },
    /// Like `Str` but produces a byte sequence.
    Bytes { pattern: Option<Regex> },
    /// Interned symbol. `existing_only` refuses names not already interned.
    Symbol { existing_only: bool },
    /// User-supplied converter.
    Custom(Converter),
}

impl ArgType {
    pub fn int() -> Self {
        ArgType::Int {
            min: None,
            max: None,
        }
    }

    pub fn int_in(min: Option<i64>, max: Option<i64>) -> Self {
        ArgType::Int { min, max }
    }

    pub fn float() -> Self {
        ArgType::Float {
            min: None,
            max: None,
        }
    }

    pub fn float_in(min: Option<f64>, max: Option<f64>) -> Self {
        ArgType::Float { min, max }
    }

    pub fn string() -> Self {
        ArgType::Str { pattern: None }
    }

    pub fn string_matching(pattern: Regex) -> Self {
        ArgType::Str {
            pattern: Some(pattern),
        }
    }

    pub fn bytes() -> Self {
        ArgType::Bytes { pattern: None }
    }

    pub fn bytes_matching(pattern: Regex) -> Self {
        ArgType::Bytes {
            pattern: Some(pattern),
        }
    }

    pub fn symbol() -> Self {
        ArgType::Symbol {
            existing_only: false,
        }
    }

    pub fn symbol_existing() -> Self {
        ArgType::Symbol {
            existing_only: true,
        }
    }

    pub(crate) fn is_bool(&self) -> bool {
        matches!(self, ArgType::Bool)
    }
}

impl PartialEq for ArgType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ArgType::Bool, ArgType::Bool) => true,
            (
                ArgType::Int { min: a, max: b },
                ArgType::Int { min: c, max: d },
            ) => a == c && b == d,
            (
                ArgType::Float { min: a, max: b },
                ArgType::Float { min: c, max: d },
            ) => a == c && b == d,
            (ArgType::Str { pattern: a }, ArgType::Str { pattern: b })
            | (ArgType::Bytes { pattern: a }, ArgType::Bytes { pattern: b }) => {
                match (a, b) {
                    (None, None) => true,
                    (Some(x), Some(y)) => x.as_str() == y.as_str(),
                    _ => false,
                }
            }
            (
                ArgType::Symbol { existing_only: a },
                ArgType::Symbol { existing_only: b },
            ) => a == b,
            (ArgType::Custom(a), ArgType::Custom(b)) => a == b,
            _ => false,
        }
    }
}

/// What to do with a converted value.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Last write wins.
    Store,
    /// Ignore any token; store a fixed value.
    StoreConst(Value),
    /// Accumulate into an ordered list.
    Append,
    /// Ignore any token; append a fixed value.
    AppendConst(Value),
    /// Increment an integer; consumes nothing.
    Count,
    /// Splice a converted list into the accumulated list.
    Extend,
}

impl Action {
    /// Constant-valued actions never claim a token, independent of nargs.
    pub(crate) fn consumes_tokens(&self) -> bool {
        !matches!(
            self,
            Action::StoreConst(_) | Action::AppendConst(_) | Action::Count
        )
    }
}

/// How many tokens an argument claims from the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Nargs {
    /// Exactly `n` tokens (n >= 1).
    Exact(usize),
    /// Zero or one; the declared default is used when absent.
    Maybe,
    /// Zero or one; the carried constant is used when absent.
    MaybeWith(Value),
    /// Zero or more, until the next option boundary.
    List,
    /// One or more, until the next option boundary.
    NonEmptyList,
    /// Every remaining token, unconditionally.
    All,
}

impl Default for Nargs {
    fn default() -> Self {
        Nargs::Exact(1)
    }
}

impl Nargs {
    pub(crate) fn accepts_zero(&self) -> bool {
        matches!(
            self,
            Nargs::Maybe | Nargs::MaybeWith(_) | Nargs::List | Nargs::All
        )
    }

    pub(crate) fn yields_list(&self) -> bool {
        match self {
            Nargs::Exact(n) => *n > 1,
            Nargs::List | Nargs::NonEmptyList | Nargs::All => true,
            Nargs::Maybe | Nargs::MaybeWith(_) => false,
        }
    }
}

/// One declared parameter. Presence of `short` or `long` makes it an option;
/// absence of both makes it positional.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: String,
    pub short: Option<char>,
    pub long: Option<String>,
    /// `None` until validation derives the default (true for positionals
    /// that cannot be empty, false otherwise).
    pub required: Option<bool>,
    pub default: Option<Value>,
    pub arg_type: ArgType,
    pub action: Action,
    pub nargs: Nargs,
    pub help: String,
}

impl ArgSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            long: None,
            required: None,
            default: None,
            arg_type: ArgType::string(),
            action: Action::Store,
            nargs: Nargs::default(),
            help: String::new(),
        }
    }

    pub fn short(mut self, c: char) -> Self {
        self.short = Some(c);
        self
    }

    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long = Some(name.into());
        self
    }

    pub fn required(mut self, yes: bool) -> Self {
        self.required = Some(yes);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn typed(mut self, ty: ArgType) -> Self {
        self.arg_type = ty;
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn nargs(mut self, nargs: Nargs) -> Self {
        self.nargs = nargs;
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    pub fn is_positional(&self) -> bool {
        self.short.is_none() && self.long.is_none()
    }

    /// Whether this option can sit inside a bundled short-flag token: it must
    /// not require a value from the stream.
    pub(crate) fn is_flag_like(&self) -> bool {
        !self.action.consumes_tokens() || self.arg_type.is_bool()
    }
}

/// A node in the command tree. Positional order in `args` is the match order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub name: String,
    pub help: String,
    pub args: Vec<ArgSpec>,
    pub commands: Vec<CommandSpec>,
    pub handler: Option<Handler>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            args: Vec::new(),
            commands: Vec::new(),
            handler: None,
        }
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    pub fn arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    pub fn command(mut self, cmd: CommandSpec) -> Self {
        self.commands.push(cmd);
        self
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn find_command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }
}

/// Parser configuration: the set of characters that introduce an option.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    pub prefixes: Vec<char>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { prefixes: vec!['-'] }
    }
}

impl ParserConfig {
    pub fn with_prefixes(prefixes: Vec<char>) -> Self {
        Self { prefixes }
    }

    pub(crate) fn is_prefix(&self, c: char) -> bool {
        self.prefixes.contains(&c)
    }
}
