//! The matching state machine: the top-level driver that walks a token
//! stream left to right, descending through sub-commands, resolving options
//! by long name, short name, or bundled short flags, and feeding the
//! consumption engine.
//!
//! The walk is greedy and one-pass: it never looks ahead more than one
//! decision needs and never backtracks once a token is classified. Each parse
//! owns a fresh [`ParserState`]; the validated spec tree is read-only and may
//! be shared across concurrent parses.

use std::collections::{HashMap, VecDeque};

use crate::consume::{ClaimError, Consumer};
use crate::convert::is_number;
use crate::errors::{ArgotError, CommandPath};
use crate::spec::{Action, ArgSpec, CommandSpec, ParserConfig};
use crate::validate;
use crate::value::Value;

/// The accumulated result map: argument name -> value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matches {
    values: HashMap<String, Value>,
}

impl Matches {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Append one element, promoting a pre-existing scalar to a list.
    pub(crate) fn append(&mut self, name: &str, value: Value) {
        let mut items = self.take_list(name);
        items.push(value);
        self.values.insert(name.to_string(), Value::List(items));
    }

    /// Splice a sequence of elements onto the accumulated list.
    pub(crate) fn extend(&mut self, name: &str, values: Vec<Value>) {
        let mut items = self.take_list(name);
        items.extend(values);
        self.values.insert(name.to_string(), Value::List(items));
    }

    pub(crate) fn bump(&mut self, name: &str) {
        let n = match self.values.get(name) {
            Some(Value::Int(n)) => *n,
            _ => 0,
        };
        self.values.insert(name.to_string(), Value::Int(n + 1));
    }

    fn take_list(&mut self, name: &str) -> Vec<Value> {
        match self.values.remove(name) {
            Some(Value::List(items)) => items,
            Some(other) => vec![other],
            None => Vec::new(),
        }
    }
}

/// Outcome of a successful parse: either the bare result map when no
/// sub-command was traversed, or the map paired with the terminal command.
#[derive(Debug)]
pub enum ParseOutcome<'a> {
    Root(Matches),
    Command {
        matches: Matches,
        /// Full command path including the root name.
        path: Vec<String>,
        command: &'a CommandSpec,
    },
}

impl ParseOutcome<'_> {
    pub fn matches(&self) -> &Matches {
        match self {
            ParseOutcome::Root(matches) => matches,
            ParseOutcome::Command { matches, .. } => matches,
        }
    }
}

/// A validated spec tree plus configuration. Construction validates once;
/// `parse` may then run any number of times, concurrently if shared.
#[derive(Debug, Clone)]
pub struct Parser {
    spec: CommandSpec,
    config: ParserConfig,
}

impl Parser {
    pub fn new(spec: CommandSpec, config: ParserConfig) -> Result<Self, ArgotError> {
        let spec = validate::validate(spec, &config)?;
        Ok(Self { spec, config })
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse an already-tokenized command line.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParseOutcome<'_>, ArgotError> {
        let stream: VecDeque<String> =
            tokens.iter().map(|t| t.as_ref().to_string()).collect();
        ParserState::new(&self.spec, &self.config).run(stream)
    }
}

/// Transient per-parse state, owned exclusively by the token loop and
/// discarded at completion or failure.
struct ParserState<'p> {
    config: &'p ParserConfig,
    matches: Matches,
    path: CommandPath,
    current: &'p CommandSpec,
    /// Not-yet-matched positionals, consumed strictly front to back.
    positionals: VecDeque<&'p ArgSpec>,
    /// Options visible in the current and all ancestor scopes.
    short: HashMap<char, &'p ArgSpec>,
    long: HashMap<String, &'p ArgSpec>,
    /// Registration order, for the end-of-stream required/default pass.
    options: Vec<&'p ArgSpec>,
    /// True once any known option could be confused with a negative number.
    ambiguous: bool,
    descended: bool,
}

impl<'p> ParserState<'p> {
    fn new(root: &'p CommandSpec, config: &'p ParserConfig) -> Self {
        let mut state = Self {
            config,
            matches: Matches::default(),
            path: CommandPath::new(vec![root.name.clone()]),
            current: root,
            positionals: VecDeque::new(),
            short: HashMap::new(),
            long: HashMap::new(),
            options: Vec::new(),
            ambiguous: false,
            descended: false,
        };
        state.enter(root);
        state
    }

    fn run(mut self, mut tokens: VecDeque<String>) -> Result<ParseOutcome<'p>, ArgotError> {
        while let Some(token) = tokens.pop_front() {
            match self.option_body(&token) {
                Some(body) => self.match_option(token, body, &mut tokens)?,
                None => {
                    if let Some(sub) = self.current.find_command(&token) {
                        self.descend(sub);
                    } else {
                        self.match_positional(token, &mut tokens)?;
                    }
                }
            }
        }
        self.finish()
    }

    /// The token text after the leading run of prefix characters, when the
    /// token is option-shaped.
    fn option_body(&self, token: &str) -> Option<String> {
        let first = token.chars().next()?;
        if !self.config.is_prefix(first) {
            return None;
        }
        Some(
            token
                .trim_start_matches(|c| self.config.is_prefix(c))
                .to_string(),
        )
    }

    /// Precedence for an option-shaped token: exact long match first (long
    /// beats short, even for a single character), then short with bundle
    /// expansion or attached value, then negative-number reclassification,
    /// then unknown-argument.
    fn match_option(
        &mut self,
        token: String,
        body: String,
        tokens: &mut VecDeque<String>,
    ) -> Result<(), ArgotError> {
        if let Some(arg) = self.long.get(body.as_str()).copied() {
            return self.consume_option(arg, tokens);
        }

        let mut chars = body.chars();
        if let Some(first) = chars.next() {
            let rest = chars.as_str();
            if let Some(arg) = self.short.get(&first).copied() {
                if rest.is_empty() {
                    return self.consume_option(arg, tokens);
                }
                // A bundle expands only when every character denotes a known,
                // argument-free flag; otherwise the remainder is the first
                // option's attached value.
                let all_flags = arg.is_flag_like()
                    && rest
                        .chars()
                        .all(|c| self.short.get(&c).is_some_and(|a| a.is_flag_like()));
                if all_flags {
                    let prefix = token.chars().next().unwrap_or('-');
                    for c in body.chars().rev() {
                        tokens.push_front(format!("{prefix}{c}"));
                    }
                    return Ok(());
                }
                tokens.push_front(rest.to_string());
                return self.consume_option(arg, tokens);
            }
        }

        // Unmatched option shape: a dash-led token that reads as a negative
        // number is reclassified as a positional value while no registered
        // option could be confused with one.
        if token.starts_with('-') && !self.ambiguous && is_number(&token) {
            return self.match_positional(token, tokens);
        }

        Err(ArgotError::UnknownArgument {
            path: self.path.clone(),
            token,
        })
    }

    fn consume_option(
        &mut self,
        arg: &'p ArgSpec,
        tokens: &mut VecDeque<String>,
    ) -> Result<(), ArgotError> {
        match &arg.action {
            Action::StoreConst(value) => {
                self.matches.insert(&arg.name, value.clone());
                Ok(())
            }
            Action::AppendConst(value) => {
                self.matches.append(&arg.name, value.clone());
                Ok(())
            }
            Action::Count => {
                self.matches.bump(&arg.name);
                Ok(())
            }
            Action::Store | Action::Append | Action::Extend => {
                let consumer = Consumer {
                    config: self.config,
                    ambiguous: self.ambiguous,
                };
                let value = consumer
                    .claim(arg, tokens)
                    .map_err(|e| self.claim_error(arg, e))?;
                self.store(arg, value);
                Ok(())
            }
        }
    }

    /// A non-option token lands on the next pending positional; the token is
    /// re-injected so the consumption engine sees the full remaining stream.
    fn match_positional(
        &mut self,
        token: String,
        tokens: &mut VecDeque<String>,
    ) -> Result<(), ArgotError> {
        let Some(arg) = self.positionals.front().copied() else {
            return Err(ArgotError::UnknownArgument {
                path: self.path.clone(),
                token,
            });
        };
        tokens.push_front(token);
        let consumer = Consumer {
            config: self.config,
            ambiguous: self.ambiguous,
        };
        let value = consumer
            .claim(arg, tokens)
            .map_err(|e| self.claim_error(arg, e))?;
        // Positionals are never revisited.
        self.positionals.pop_front();
        self.store(arg, value);
        Ok(())
    }

    fn store(&mut self, arg: &ArgSpec, value: Value) {
        match &arg.action {
            Action::Append => self.matches.append(&arg.name, value),
            Action::Extend => match value {
                Value::List(items) => self.matches.extend(&arg.name, items),
                other => self.matches.append(&arg.name, other),
            },
            _ => self.matches.insert(&arg.name, value),
        }
    }

    /// Descend into a sub-command: its options become visible for the rest
    /// of the parse, its positionals join the back of the pending queue.
    fn descend(&mut self, sub: &'p CommandSpec) {
        self.descended = true;
        self.path.push(sub.name.clone());
        self.current = sub;
        self.enter(sub);
    }

    fn enter(&mut self, cmd: &'p CommandSpec) {
        for arg in &cmd.args {
            if arg.is_positional() {
                self.positionals.push_back(arg);
                continue;
            }
            self.options.push(arg);
            if let Some(c) = arg.short {
                self.short.insert(c, arg);
                if c.is_ascii_digit() {
                    self.ambiguous = true;
                }
            }
            if let Some(long) = &arg.long {
                self.long.insert(long.clone(), arg);
                if is_number(long) {
                    self.ambiguous = true;
                }
            }
        }
    }

    /// End of stream: defaults for absent arguments, missing-argument checks
    /// front to back, then the non-leaf command rule.
    fn finish(mut self) -> Result<ParseOutcome<'p>, ArgotError> {
        while let Some(arg) = self.positionals.pop_front() {
            self.finalize_absent(arg, true)?;
        }
        let options = std::mem::take(&mut self.options);
        for arg in options {
            self.finalize_absent(arg, false)?;
        }

        // A command with children must either have had one selected or own a
        // handler of its own.
        if !self.current.commands.is_empty() && self.current.handler.is_none() {
            return Err(ArgotError::MissingArgument {
                path: self.path.clone(),
                name: "command".to_string(),
            });
        }

        if self.descended {
            Ok(ParseOutcome::Command {
                matches: self.matches,
                path: self.path.segments().to_vec(),
                command: self.current,
            })
        } else {
            Ok(ParseOutcome::Root(self.matches))
        }
    }

    fn finalize_absent(&mut self, arg: &ArgSpec, positional: bool) -> Result<(), ArgotError> {
        if self.matches.contains(&arg.name) {
            return Ok(());
        }
        if let Some(default) = &arg.default {
            self.matches.insert(&arg.name, default.clone());
            return Ok(());
        }
        if arg.required.unwrap_or(positional) {
            return Err(ArgotError::MissingArgument {
                path: self.path.clone(),
                name: arg.name.clone(),
            });
        }
        // Absent and optional: no placeholder is inserted.
        Ok(())
    }

    fn claim_error(&self, arg: &ArgSpec, err: ClaimError) -> ArgotError {
        match err {
            ClaimError::Invalid { value, reason } => ArgotError::InvalidArgument {
                path: self.path.clone(),
                name: arg.name.clone(),
                value,
                reason,
            },
            ClaimError::Insufficient { needed, got } => ArgotError::InvalidArgument {
                path: self.path.clone(),
                name: arg.name.clone(),
                value: String::new(),
                reason: format!("expected {needed} value(s), found {got}"),
            },
        }
    }
}
