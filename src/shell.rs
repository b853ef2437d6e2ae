//! Interactive read–dispatch–render loop.

use crate::command_router::{CommandRouter, Reply};
use crate::panel::Renderer;
use anyhow::Result;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Helper commands offered after `!`.
const BANG_COMMANDS: &[&str] = &["explain", "git", "find", "help"];

/// Completion and hinting for the prompt: `!` commands, filenames otherwise.
pub struct ShellHelper {
    files: FilenameCompleter,
    hinter: HistoryHinter,
}

impl ShellHelper {
    pub fn new() -> Self {
        Self {
            files: FilenameCompleter::new(),
            hinter: HistoryHinter {},
        }
    }
}

impl Default for ShellHelper {
    fn default() -> Self {
        Self::new()
    }
}

/// Completions for a line starting with `!`, or `None` when the line is
/// not a helper command in progress.
pub fn bang_completions(line: &str, pos: usize) -> Option<(usize, Vec<Pair>)> {
    let typed = line.get(..pos)?;
    let partial = typed.strip_prefix('!')?;
    if partial.contains(char::is_whitespace) {
        return None;
    }

    let candidates = BANG_COMMANDS
        .iter()
        .filter(|cmd| cmd.starts_with(partial))
        .map(|cmd| Pair {
            display: format!("!{} - AI helper", cmd),
            replacement: cmd.to_string(),
        })
        .collect();
    Some((1, candidates))
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        if line.starts_with('?') {
            return Ok((pos, Vec::new()));
        }
        if let Some(completions) = bang_completions(line, pos) {
            return Ok(completions);
        }
        self.files.complete(line, pos, ctx)
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Replaces a leading home directory with `~`.
pub fn display_dir(cwd: &Path, home: Option<&Path>) -> String {
    match home.and_then(|home| cwd.strip_prefix(home).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => cwd.display().to_string(),
    }
}

fn current_dir_display() -> String {
    std::env::current_dir()
        .map(|cwd| display_dir(&cwd, dirs::home_dir().as_deref()))
        .unwrap_or_else(|_| "?".to_string())
}

pub struct Shell {
    router: CommandRouter,
    renderer: Renderer,
    history_path: Option<PathBuf>,
}

impl Shell {
    pub fn new(router: CommandRouter, history_path: Option<PathBuf>) -> Self {
        Self {
            router,
            renderer: Renderer::new(),
            history_path,
        }
    }

    /// Handles one line and renders the reply. Returns false on exit.
    pub async fn handle_line(&self, line: &str) -> bool {
        match self.router.handle_line(line).await {
            Ok(Reply::Exit) => false,
            Ok(reply) => {
                self.renderer.render_reply(&reply);
                true
            }
            Err(e) => {
                self.renderer.render_error(&e);
                true
            }
        }
    }

    pub async fn run(&self) -> Result<()> {
        let config = Config::builder().auto_add_history(true).build();
        let mut editor: Editor<ShellHelper, FileHistory> = Editor::with_config(config)?;
        editor.set_helper(Some(ShellHelper::new()));

        if let Some(path) = &self.history_path {
            if let Err(e) = editor.load_history(path) {
                debug!("No history loaded from {}: {}", path.display(), e);
            }
        }

        self.renderer.render_banner(&current_dir_display());

        loop {
            let prompt = format!("hintsh {}> ", current_dir_display());
            match editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if !self.handle_line(line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    self.renderer.show_interrupt_hint();
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    warn!("Line editor failed: {}", e);
                    break;
                }
            }
        }

        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = editor.save_history(path) {
                warn!("Failed to save history to {}: {}", path.display(), e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(line: &str) -> Vec<String> {
        let (start, pairs) = bang_completions(line, line.len()).unwrap();
        assert_eq!(start, 1);
        pairs.into_iter().map(|p| p.replacement).collect()
    }

    #[test]
    fn test_bang_completes_all_helpers() {
        assert_eq!(replacements("!"), vec!["explain", "git", "find", "help"]);
    }

    #[test]
    fn test_bang_filters_by_prefix() {
        assert_eq!(replacements("!g"), vec!["git"]);
        assert_eq!(replacements("!fi"), vec!["find"]);
        assert!(replacements("!zz").is_empty());
    }

    #[test]
    fn test_bang_with_arguments_is_not_completed() {
        assert!(bang_completions("!git pu", 7).is_none());
        assert!(bang_completions("ls", 2).is_none());
    }

    #[test]
    fn test_display_dir_abbreviates_home() {
        let home = Path::new("/home/ada");

        assert_eq!(display_dir(Path::new("/home/ada"), Some(home)), "~");
        assert_eq!(display_dir(Path::new("/home/ada/src/x"), Some(home)), "~/src/x");
        assert_eq!(display_dir(Path::new("/tmp"), Some(home)), "/tmp");
        assert_eq!(display_dir(Path::new("/tmp"), None), "/tmp");
    }
}
