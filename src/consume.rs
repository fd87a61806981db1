//! The nargs engine: decides exactly which prefix of the remaining token
//! stream belongs to one argument, converts it, and hands back the value to
//! store.
//!
//! Boundary detection shares the matching engine's negative-number rule: a
//! dash-prefixed token is only an option boundary if some registered option
//! could be confused with a negative number, or the token does not parse as
//! one.

use std::collections::VecDeque;

use crate::convert::{self, is_number};
use crate::spec::{ArgSpec, Nargs, ParserConfig};
use crate::value::Value;

/// A claim failure, wrapped by the engine with path and argument name.
#[derive(Debug)]
pub(crate) enum ClaimError {
    /// A consumed token failed conversion or a constraint check.
    Invalid { value: String, reason: String },
    /// Too few tokens for an exact count, or zero for a nonempty list.
    Insufficient { needed: usize, got: usize },
}

/// Per-parse consumption context: prefix set plus the ambiguity flag
/// computed from the registered options.
pub(crate) struct Consumer<'a> {
    pub config: &'a ParserConfig,
    pub ambiguous: bool,
}

impl Consumer<'_> {
    /// Whether `token` ends greedy consumption. Option-prefixed tokens are
    /// boundaries, except dash-led tokens that read as negative numbers while
    /// no registered option can be confused with one.
    pub(crate) fn is_boundary(&self, token: &str) -> bool {
        let Some(first) = token.chars().next() else {
            return false;
        };
        if !self.config.is_prefix(first) {
            return false;
        }
        if first == '-' && !self.ambiguous && is_number(token) {
            return false;
        }
        true
    }

    /// Claim the tokens belonging to `arg` from the front of the stream and
    /// convert them. Constant-valued actions never reach this point.
    pub(crate) fn claim(
        &self,
        arg: &ArgSpec,
        tokens: &mut VecDeque<String>,
    ) -> Result<Value, ClaimError> {
        // Boolean arguments special-case the literal next token regardless of
        // nargs: exactly `true`/`false` is consumed, anything else leaves the
        // stream untouched and the argument behaves as a flag.
        if arg.arg_type.is_bool() {
            return Ok(match tokens.front().map(String::as_str) {
                Some("true") => {
                    tokens.pop_front();
                    Value::Bool(true)
                }
                Some("false") => {
                    tokens.pop_front();
                    Value::Bool(false)
                }
                _ => Value::Bool(true),
            });
        }

        match &arg.nargs {
            Nargs::Exact(n) => {
                let taken = self.take_up_to(tokens, *n);
                if taken.len() < *n {
                    return Err(ClaimError::Insufficient {
                        needed: *n,
                        got: taken.len(),
                    });
                }
                if *n == 1 {
                    self.convert_one(arg, &taken[0])
                } else {
                    self.convert_list(arg, &taken)
                }
            }
            Nargs::All => {
                let taken: Vec<String> = tokens.drain(..).collect();
                self.convert_list(arg, &taken)
            }
            Nargs::List | Nargs::NonEmptyList => {
                let taken = self.take_up_to(tokens, usize::MAX);
                if taken.is_empty() && matches!(arg.nargs, Nargs::NonEmptyList) {
                    return Err(ClaimError::Insufficient { needed: 1, got: 0 });
                }
                self.convert_list(arg, &taken)
            }
            Nargs::Maybe => match self.take_one(tokens) {
                Some(token) => self.convert_one(arg, &token),
                // Validation guarantees a default is declared.
                None => arg.default.clone().ok_or_else(|| ClaimError::Invalid {
                    value: String::new(),
                    reason: "no value supplied and no default declared".to_string(),
                }),
            },
            Nargs::MaybeWith(fallback) => match self.take_one(tokens) {
                Some(token) => self.convert_one(arg, &token),
                None => Ok(fallback.clone()),
            },
        }
    }

    /// Pop up to `limit` non-boundary tokens.
    fn take_up_to(&self, tokens: &mut VecDeque<String>, limit: usize) -> Vec<String> {
        let mut taken = Vec::new();
        while taken.len() < limit {
            match self.take_one(tokens) {
                Some(token) => taken.push(token),
                None => break,
            }
        }
        taken
    }

    fn take_one(&self, tokens: &mut VecDeque<String>) -> Option<String> {
        match tokens.front() {
            Some(token) if !self.is_boundary(token) => tokens.pop_front(),
            _ => None,
        }
    }

    fn convert_one(&self, arg: &ArgSpec, token: &str) -> Result<Value, ClaimError> {
        convert::convert(&arg.arg_type, token).map_err(|reason| ClaimError::Invalid {
            value: token.to_string(),
            reason,
        })
    }

    fn convert_list(&self, arg: &ArgSpec, taken: &[String]) -> Result<Value, ClaimError> {
        let mut out = Vec::with_capacity(taken.len());
        for token in taken {
            out.push(self.convert_one(arg, token)?);
        }
        Ok(Value::List(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ArgSpec, ArgType, Nargs, ParserConfig};

    fn stream(tokens: &[&str]) -> VecDeque<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn consumer(config: &ParserConfig, ambiguous: bool) -> Consumer<'_> {
        Consumer { config, ambiguous }
    }

    #[test]
    fn list_stops_at_option_boundary() {
        let config = ParserConfig::default();
        let arg = ArgSpec::new("xs").typed(ArgType::int()).nargs(Nargs::List);
        let mut tokens = stream(&["1", "2", "--other"]);
        let value = consumer(&config, false).claim(&arg, &mut tokens).unwrap();
        assert_eq!(value, Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(tokens, stream(&["--other"]));
    }

    #[test]
    fn negative_numbers_are_values_when_unambiguous() {
        let config = ParserConfig::default();
        let arg = ArgSpec::new("xs").typed(ArgType::int()).nargs(Nargs::List);

        let mut tokens = stream(&["1", "-2"]);
        let value = consumer(&config, false).claim(&arg, &mut tokens).unwrap();
        assert_eq!(value, Value::List(vec![Value::Int(1), Value::Int(-2)]));

        // With the ambiguity flag raised the same token is a boundary.
        let mut tokens = stream(&["1", "-2"]);
        let value = consumer(&config, true).claim(&arg, &mut tokens).unwrap();
        assert_eq!(value, Value::List(vec![Value::Int(1)]));
        assert_eq!(tokens, stream(&["-2"]));
    }

    #[test]
    fn all_consumes_even_option_shaped_tokens() {
        let config = ParserConfig::default();
        let arg = ArgSpec::new("rest").nargs(Nargs::All);
        let mut tokens = stream(&["a", "--b", "-1"]);
        let value = consumer(&config, true).claim(&arg, &mut tokens).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Str("a".into()),
                Value::Str("--b".into()),
                Value::Str("-1".into())
            ])
        );
        assert!(tokens.is_empty());
    }

    #[test]
    fn exact_count_shortfall_is_reported() {
        let config = ParserConfig::default();
        let arg = ArgSpec::new("pair").nargs(Nargs::Exact(2));
        let mut tokens = stream(&["only"]);
        let err = consumer(&config, false).claim(&arg, &mut tokens).unwrap_err();
        assert!(matches!(err, ClaimError::Insufficient { needed: 2, got: 1 }));
    }

    #[test]
    fn boolean_literal_is_consumed_but_other_tokens_are_not() {
        let config = ParserConfig::default();
        let arg = ArgSpec::new("flag").typed(ArgType::Bool);

        let mut tokens = stream(&["false", "rest"]);
        let value = consumer(&config, false).claim(&arg, &mut tokens).unwrap();
        assert_eq!(value, Value::Bool(false));
        assert_eq!(tokens, stream(&["rest"]));

        let mut tokens = stream(&["rest"]);
        let value = consumer(&config, false).claim(&arg, &mut tokens).unwrap();
        assert_eq!(value, Value::Bool(true));
        assert_eq!(tokens, stream(&["rest"]));
    }
}
