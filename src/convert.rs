//! Type conversion and constraint checking.
//!
//! A pure function of (declared type, raw token) -> typed value or a reason
//! string. The matching engine wraps failures into path-qualified
//! [`crate::ArgotError::InvalidArgument`] values; nothing here knows about
//! the command tree.

use crate::spec::ArgType;
use crate::symbols;
use crate::value::Value;

/// Convert one raw token per the declared type.
pub fn convert(ty: &ArgType, raw: &str) -> Result<Value, String> {
    match ty {
        ArgType::Bool => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err("expected `true` or `false`".to_string()),
        },
        ArgType::Int { min, max } => {
            let n: i64 = raw
                .parse()
                .map_err(|_| format!("`{raw}` is not an integer"))?;
            if let Some(lo) = min {
                if n < *lo {
                    return Err(format!("{n} is below the minimum {lo}"));
                }
            }
            if let Some(hi) = max {
                if n > *hi {
                    return Err(format!("{n} is above the maximum {hi}"));
                }
            }
            Ok(Value::Int(n))
        }
        ArgType::Float { min, max } => {
            // f64 parsing already widens a bare integer literal.
            let x: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a float"))?;
            if let Some(lo) = min {
                if x < *lo {
                    return Err(format!("{x} is below the minimum {lo}"));
                }
            }
            if let Some(hi) = max {
                if x > *hi {
                    return Err(format!("{x} is above the maximum {hi}"));
                }
            }
            Ok(Value::Float(x))
        }
        ArgType::Str { pattern } => {
            if let Some(re) = pattern {
                if !re.is_match(raw) {
                    return Err(format!("does not match pattern `{}`", re.as_str()));
                }
            }
            Ok(Value::Str(raw.to_string()))
        }
        ArgType::Bytes { pattern } => {
            if let Some(re) = pattern {
                if !re.is_match(raw) {
                    return Err(format!("does not match pattern `{}`", re.as_str()));
                }
            }
            Ok(Value::Bytes(raw.as_bytes().to_vec()))
        }
        ArgType::Symbol { existing_only } => {
            if *existing_only {
                symbols::lookup(raw)
                    .map(Value::Symbol)
                    .ok_or_else(|| format!("unknown symbol `{raw}`"))
            } else {
                Ok(Value::Symbol(symbols::intern(raw)))
            }
        }
        ArgType::Custom(converter) => converter.convert(raw),
    }
}

/// Whether a token reads as a signed integer or float. Drives the
/// negative-number disambiguation in the matching engine. Word-shaped
/// float literals (`inf`, `NaN`) do not count: only digit-bearing tokens
/// can be mistaken for numbers on a command line.
pub(crate) fn is_number(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && (token.parse::<i64>().is_ok() || token.parse::<f64>().is_ok())
}
