//! Usage text rendering from a validated spec tree.
//!
//! This is a read-only collaborator of the engine: callers typically append
//! the rendered text to a parse failure for the command path at the point of
//! failure. Traversal stops at the deepest resolvable path segment.

use crate::spec::{ArgSpec, CommandSpec};

/// Render help text for the command reached by walking `path` (sub-command
/// names, root excluded) down from `spec`.
pub fn render(spec: &CommandSpec, path: &[&str]) -> String {
    let mut current = spec;
    let mut qualified = vec![spec.name.as_str()];
    for segment in path {
        match current.find_command(segment) {
            Some(child) => {
                current = child;
                qualified.push(child.name.as_str());
            }
            None => break,
        }
    }
    render_command(current, &qualified.join(" "))
}

fn render_command(cmd: &CommandSpec, qualified: &str) -> String {
    let mut out = String::new();
    if cmd.help.is_empty() {
        out.push_str(qualified);
    } else {
        out.push_str(&format!("{qualified} - {}", cmd.help.trim()));
    }
    out.push('\n');

    out.push_str(&format!("\nUsage: {}", usage_line(cmd, qualified)));
    out.push('\n');

    let positionals: Vec<&ArgSpec> = cmd.args.iter().filter(|a| a.is_positional()).collect();
    let options: Vec<&ArgSpec> = cmd.args.iter().filter(|a| !a.is_positional()).collect();

    if !positionals.is_empty() {
        out.push_str("\nArguments:\n");
        push_rows(
            &mut out,
            positionals.iter().map(|a| (positional_left(a), arg_help(a))),
        );
    }

    if !options.is_empty() {
        out.push_str("\nOptions:\n");
        push_rows(&mut out, options.iter().map(|a| (option_left(a), arg_help(a))));
    }

    if !cmd.commands.is_empty() {
        out.push_str("\nCommands:\n");
        push_rows(
            &mut out,
            cmd.commands
                .iter()
                .map(|c| (c.name.clone(), c.help.trim().to_string())),
        );
    }

    out
}

fn usage_line(cmd: &CommandSpec, qualified: &str) -> String {
    let mut line = qualified.to_string();
    if cmd.args.iter().any(|a| !a.is_positional()) {
        line.push_str(" [OPTIONS]");
    }
    for arg in cmd.args.iter().filter(|a| a.is_positional()) {
        line.push(' ');
        line.push_str(&positional_left(arg));
    }
    if !cmd.commands.is_empty() {
        line.push_str(" [COMMAND]");
    }
    line
}

fn positional_left(arg: &ArgSpec) -> String {
    let many = arg.nargs.yields_list();
    let name = &arg.name;
    match (arg.required.unwrap_or(false), many) {
        (true, true) => format!("<{name}>..."),
        (true, false) => format!("<{name}>"),
        (false, true) => format!("[{name}]..."),
        (false, false) => format!("[{name}]"),
    }
}

fn option_left(arg: &ArgSpec) -> String {
    let mut left = match (arg.short, arg.long.as_deref()) {
        (Some(s), Some(l)) => format!("-{s}, --{l}"),
        (Some(s), None) => format!("-{s}"),
        (None, Some(l)) => format!("    --{l}"),
        (None, None) => unreachable!("options carry a short or long form"),
    };
    if arg.action.consumes_tokens() && !arg.arg_type.is_bool() {
        left.push_str(&format!(" <{}>", arg.name.to_ascii_uppercase()));
    }
    left
}

fn arg_help(arg: &ArgSpec) -> String {
    let mut text = arg.help.trim().to_string();
    if arg.required == Some(true) && !arg.is_positional() {
        if text.is_empty() {
            text.push_str("required");
        } else {
            text.push_str(" (required)");
        }
    }
    if let Some(default) = &arg.default {
        if text.is_empty() {
            text.push_str(&format!("[default: {default}]"));
        } else {
            text.push_str(&format!(" [default: {default}]"));
        }
    }
    text
}

fn push_rows(out: &mut String, rows: impl Iterator<Item = (String, String)>) {
    let rows: Vec<(String, String)> = rows.collect();
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}
