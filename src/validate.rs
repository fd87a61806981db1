//! Spec validation and normalization.
//!
//! Runs once, before any parsing. Normalization strips option-prefix
//! characters from long names and fills the derived `required` flag, so
//! validating an already-validated tree is the identity. The matching engine
//! relies on these postconditions and never re-checks them.

use std::collections::HashSet;

use crate::errors::{ArgotError, CommandPath};
use crate::spec::{Action, ArgSpec, CommandSpec, Nargs, ParserConfig};

/// Validate and normalize a command tree. Pure and idempotent.
pub fn validate(spec: CommandSpec, config: &ParserConfig) -> Result<CommandSpec, ArgotError> {
    let path = CommandPath::new(vec![spec.name.clone()]);
    validate_command(spec, path, config)
}

fn validate_command(
    mut cmd: CommandSpec,
    path: CommandPath,
    config: &ParserConfig,
) -> Result<CommandSpec, ArgotError> {
    if cmd.name.is_empty() {
        return Err(invalid_command(&path, "command name is empty"));
    }
    if cmd
        .name
        .chars()
        .next()
        .is_some_and(|c| config.is_prefix(c))
    {
        return Err(invalid_command(
            &path,
            "command name starts with an option prefix character",
        ));
    }

    let mut names: HashSet<String> = HashSet::new();
    let mut shorts: HashSet<char> = HashSet::new();
    let mut longs: HashSet<String> = HashSet::new();
    for arg in &mut cmd.args {
        validate_arg(arg, &path, config)?;

        if !names.insert(arg.name.clone()) {
            return Err(invalid_option(
                &path,
                &arg.name,
                "duplicate argument name in one command scope",
            ));
        }
        if let Some(c) = arg.short {
            if !shorts.insert(c) {
                return Err(invalid_option(
                    &path,
                    &arg.name,
                    &format!("short option `{c}` declared twice in one command scope"),
                ));
            }
        }
        if let Some(long) = &arg.long {
            if !longs.insert(long.clone()) {
                return Err(invalid_option(
                    &path,
                    &arg.name,
                    &format!("long option `{long}` declared twice in one command scope"),
                ));
            }
        }
    }

    let mut children: HashSet<String> = HashSet::new();
    cmd.commands = cmd
        .commands
        .into_iter()
        .map(|child| {
            if !children.insert(child.name.clone()) {
                return Err(invalid_command(
                    &path,
                    &format!("duplicate sub-command `{}`", child.name),
                ));
            }
            let mut child_path = path.clone();
            child_path.push(child.name.clone());
            validate_command(child, child_path, config)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(cmd)
}

fn validate_arg(
    arg: &mut ArgSpec,
    path: &CommandPath,
    config: &ParserConfig,
) -> Result<(), ArgotError> {
    if arg.name.is_empty() {
        return Err(invalid_option(path, "(unnamed)", "argument name is empty"));
    }

    if let Some(c) = arg.short {
        if config.is_prefix(c) {
            return Err(invalid_option(
                path,
                &arg.name,
                "short option is itself a prefix character",
            ));
        }
    }

    // Normalize: long names are stored without their leading prefix run, so
    // `--force` and `force` declare the same option.
    if let Some(long) = arg.long.take() {
        let trimmed = long.trim_start_matches(|c| config.is_prefix(c));
        if trimmed.is_empty() {
            return Err(invalid_option(
                path,
                &arg.name,
                "long option name is empty after stripping prefix characters",
            ));
        }
        arg.long = Some(trimmed.to_string());
    }

    if matches!(arg.nargs, Nargs::Exact(0)) {
        return Err(invalid_option(
            path,
            &arg.name,
            "nargs count must be positive",
        ));
    }

    if matches!(arg.nargs, Nargs::Maybe)
        && arg.default.is_none()
        && !arg.arg_type.is_bool()
        && arg.action.consumes_tokens()
    {
        return Err(invalid_option(
            path,
            &arg.name,
            "nargs `maybe` requires a declared default",
        ));
    }

    if matches!(arg.action, Action::Extend) && !arg.nargs.yields_list() {
        return Err(invalid_option(
            path,
            &arg.name,
            "action `extend` requires a list-producing nargs",
        ));
    }

    if arg.is_positional() && !arg.action.consumes_tokens() {
        return Err(invalid_option(
            path,
            &arg.name,
            "constant-valued actions require a short or long form",
        ));
    }

    if arg.required == Some(true) && arg.default.is_some() {
        return Err(invalid_option(
            path,
            &arg.name,
            "a required argument cannot carry a default",
        ));
    }

    // Normalize: derive the required flag. Positionals are required unless
    // they have a default or their nargs accepts zero tokens.
    if arg.required.is_none() {
        let derived = arg.is_positional()
            && arg.default.is_none()
            && !arg.nargs.accepts_zero()
            && arg.action.consumes_tokens();
        arg.required = Some(derived);
    }

    Ok(())
}

fn invalid_command(path: &CommandPath, reason: &str) -> ArgotError {
    ArgotError::InvalidCommand {
        path: path.clone(),
        reason: reason.to_string(),
    }
}

fn invalid_option(path: &CommandPath, name: &str, reason: &str) -> ArgotError {
    ArgotError::InvalidOption {
        path: path.clone(),
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
