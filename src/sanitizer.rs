//! Validation of model-produced shell commands.
//!
//! The sanitizer is a narrow deny-list: it rejects the metacharacters that
//! chain or substitute commands (`;`, `&&`, `||`, backticks, `$(`) and checks
//! that the command starts with the program the caller asked for. It does not
//! parse shell grammar, so pipes, redirections and globs pass through
//! unchanged. Treat a sanitized command as "shaped like what we asked for",
//! not as "safe to run".

use thiserror::Error;

/// Substrings that are never allowed in a sanitized command.
pub const FORBIDDEN_SEQUENCES: &[&str] = &[";", "&&", "||", "`", "$("];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    #[error("command contains forbidden sequence '{sequence}': {command}")]
    InjectionRisk { command: String, sequence: String },

    #[error("command does not start with '{expected}': {command}")]
    MalformedCommand { command: String, expected: String },
}

/// Normalizes and validates `candidate`.
///
/// Returns the normalized command when it contains none of
/// [`FORBIDDEN_SEQUENCES`] and begins with `expected_prefix`.
pub fn sanitize(candidate: &str, expected_prefix: &str) -> Result<String, SanitizeError> {
    let command = normalize(candidate);
    reject_forbidden(&command)?;

    if !has_prefix(&command, expected_prefix) {
        return Err(SanitizeError::MalformedCommand {
            command,
            expected: expected_prefix.to_string(),
        });
    }

    Ok(command)
}

/// Fails with [`SanitizeError::InjectionRisk`] when `command` contains any of
/// [`FORBIDDEN_SEQUENCES`].
pub fn reject_forbidden(command: &str) -> Result<(), SanitizeError> {
    match FORBIDDEN_SEQUENCES.iter().find(|seq| command.contains(*seq)) {
        Some(sequence) => Err(SanitizeError::InjectionRisk {
            command: command.to_string(),
            sequence: sequence.to_string(),
        }),
        None => Ok(()),
    }
}

/// First trimmed line of a model response that is neither empty nor a
/// markdown fence. The line is otherwise left as the model wrote it.
pub fn first_line(raw: &str) -> &str {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("```"))
        .unwrap_or("")
}

/// Reduces a model response to a single command line.
///
/// Markdown fence lines are dropped, the first non-empty line is kept, a
/// trailing `#` comment is removed and whitespace runs collapse to one space.
pub fn normalize(raw: &str) -> String {
    collapse_whitespace(strip_comment(first_line(raw)))
}

/// True when `command` is exactly `prefix` or `prefix` followed by a space.
pub fn has_prefix(command: &str, prefix: &str) -> bool {
    match command.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

fn strip_comment(line: &str) -> &str {
    let mut previous = ' ';
    for (idx, ch) in line.char_indices() {
        if ch == '#' && previous.is_whitespace() {
            return &line[..idx];
        }
        previous = ch;
    }
    line
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
