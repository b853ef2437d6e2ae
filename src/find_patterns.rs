//! Table-driven translation of free-text file searches into `find` commands.
//!
//! Used directly for canned shortcuts and as the fallback whenever the model
//! cannot be reached or its answer is rejected. Never fails, never touches
//! the network.

use regex::Regex;
use std::sync::OnceLock;

/// Command returned when the query yields no predicates.
pub const DEFAULT_FIND: &str = "find . -type f";

/// Keyword → predicate fragment.
const KEYWORD_TABLE: &[(&[&str], &str)] = &[
    (&["python", "py"], "-type f -name '*.py'"),
    (&["rust", "rs"], "-type f -name '*.rs'"),
    (&["javascript", "js"], "-type f -name '*.js'"),
    (&["typescript", "ts"], "-type f -name '*.ts'"),
    (&["shell", "sh", "bash", "scripts"], "-type f -name '*.sh'"),
    (&["markdown", "md"], "-type f -name '*.md'"),
    (&["json"], "-type f -name '*.json'"),
    (&["yaml", "yml"], "-type f \\( -name '*.yaml' -o -name '*.yml' \\)"),
    (&["toml"], "-type f -name '*.toml'"),
    (&["text", "txt"], "-type f -name '*.txt'"),
    (&["log", "logs"], "-type f -name '*.log'"),
    (
        &["image", "images", "pictures", "photos"],
        "-type f \\( -name '*.png' -o -name '*.jpg' -o -name '*.jpeg' -o -name '*.gif' \\)",
    ),
    (&["recent"], "-mtime -7"),
    (&["today"], "-mtime -1"),
    (&["large", "big", "huge"], "-size +10M"),
    (&["small", "tiny"], "-size -100k"),
    (&["empty"], "-empty"),
    (
        &["directory", "directories", "dir", "dirs", "folder", "folders"],
        "-type d",
    ),
    (&["hidden"], "-name '.*'"),
];

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\.?[a-z0-9_]+").expect("token pattern is valid"))
}

fn keyword_fragment(token: &str) -> Option<&'static str> {
    KEYWORD_TABLE
        .iter()
        .find(|(keywords, _)| keywords.contains(&token))
        .map(|(_, fragment)| *fragment)
}

fn token_fragment(token: &str) -> Option<String> {
    if let Some(fragment) = keyword_fragment(token) {
        return Some(fragment.to_string());
    }

    if let Some(ext) = token.strip_prefix('.') {
        if !ext.is_empty() {
            return Some(format!("-type f -name '*.{}'", ext));
        }
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        return Some(format!("-size +{}M", token));
    }

    None
}

/// Builds a `find` command from a natural-language query.
///
/// ```
/// use hintsh::find_patterns::resolve_find;
///
/// assert_eq!(resolve_find("python files"), "find . -type f -name '*.py'");
/// assert_eq!(resolve_find("something vague"), "find . -type f");
/// ```
pub fn resolve_find(query: &str) -> String {
    let lowered = query.to_lowercase();
    let mut fragments: Vec<String> = Vec::new();

    for token in token_pattern().find_iter(&lowered).map(|m| m.as_str()) {
        if let Some(fragment) = token_fragment(token) {
            if !fragments.contains(&fragment) {
                fragments.push(fragment);
            }
        }
    }

    if fragments.is_empty() {
        DEFAULT_FIND.to_string()
    } else {
        format!("find . {}", fragments.join(" "))
    }
}
