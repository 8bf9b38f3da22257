//! Shell escaping and quoting utilities.

use crate::error::{Error, Result};

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'\''` (end quote, escaped quote, start quote).
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a single argument for shell execution.
/// - Empty strings become `''`
/// - Strings with shell metacharacters are wrapped in single quotes
/// - Embedded single quotes are escaped
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    // Characters that require quoting
    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~',
    ];

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", escape_single_quote_content(arg))
}

/// Quote a path for shell execution (always quotes).
pub fn quote_path(path: &str) -> String {
    format!("'{}'", escape_single_quote_content(path))
}

/// Wrap a command with cd to a directory.
pub fn cd_and(dir: &str, command: &str) -> Result<String> {
    let dir = dir.trim();
    let command = command.trim();

    if dir.is_empty() {
        return Err(Error::validation_invalid_argument(
            "dir",
            "Directory cannot be empty",
        ));
    }

    if command.is_empty() {
        return Err(Error::validation_invalid_argument(
            "command",
            "Command cannot be empty",
        ));
    }

    Ok(format!("cd {} && {}", quote_path(dir), command))
}

/// Render `export NAME=value ...` for the given variables.
///
/// Returns `None` when there is nothing to export. Variable names must be
/// valid POSIX identifiers; values are quoted as needed.
pub fn export_vars<'a, I>(vars: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut assignments = Vec::new();

    for (name, value) in vars {
        if !is_valid_var_name(name) {
            return Err(Error::validation_invalid_argument(
                "env",
                format!("'{}' is not a valid environment variable name", name),
            ));
        }
        assignments.push(format!("{}={}", name, quote_arg(value)));
    }

    if assignments.is_empty() {
        return Ok(None);
    }

    Ok(Some(format!("export {}", assignments.join(" "))))
}

fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
