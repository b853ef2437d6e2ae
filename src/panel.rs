//! Terminal rendering of replies as bordered panels.
//!
//! Every method has a `_with_io` variant that writes to an injected writer so
//! output can be asserted in tests; the plain variants write to stdout.

use crate::command_router::{RepairOutcome, Reply};
use crate::synthesizer::CommandCandidate;
use colored::{Color, Colorize};
use std::io::{self, Write};
use textwrap::core::display_width;

/// Total panel width including borders.
pub const PANEL_WIDTH: usize = 80;

const HELP_LINES: &[(&str, &str)] = &[
    ("?[query]", "Ask anything"),
    ("!explain [cmd]", "Explain a shell command"),
    ("!git [action]", "Smart git helper"),
    ("!find [query]", "Natural language file search"),
    ("cd [path]", "Change directory"),
    ("exit / quit", "Leave the shell"),
];

/// A titled, bordered block of text.
pub struct Panel<'a> {
    title: &'a str,
    body: String,
    color: Color,
    subtitle: Option<&'a str>,
}

impl<'a> Panel<'a> {
    pub fn new(title: &'a str, body: impl Into<String>, color: Color) -> Self {
        Self {
            title,
            body: body.into(),
            color,
            subtitle: None,
        }
    }

    pub fn subtitle(mut self, subtitle: &'a str) -> Self {
        self.subtitle = Some(subtitle);
        self
    }

    pub fn render<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let inner = PANEL_WIDTH - 4;

        writeln!(output, "{}", top_border(self.title, PANEL_WIDTH).color(self.color))?;
        for raw_line in self.body.lines() {
            for line in textwrap::wrap(raw_line, inner) {
                let padding = inner.saturating_sub(display_width(&line));
                writeln!(
                    output,
                    "{} {}{} {}",
                    "│".color(self.color),
                    line,
                    " ".repeat(padding),
                    "│".color(self.color)
                )?;
            }
        }
        writeln!(
            output,
            "{}",
            bottom_border(self.subtitle.unwrap_or(""), PANEL_WIDTH).color(self.color)
        )?;
        Ok(())
    }
}

fn top_border(title: &str, width: usize) -> String {
    if title.is_empty() {
        return format!("╭{}╮", "─".repeat(width - 2));
    }
    let label = format!(" {} ", title);
    let fill = (width - 3).saturating_sub(label.chars().count());
    format!("╭─{}{}╮", label, "─".repeat(fill))
}

fn bottom_border(subtitle: &str, width: usize) -> String {
    if subtitle.is_empty() {
        return format!("╰{}╯", "─".repeat(width - 2));
    }
    let label = format!(" {} ", subtitle);
    let fill = (width - 3).saturating_sub(label.chars().count());
    format!("╰{}{}─╯", "─".repeat(fill), label)
}

fn suggestion_body(candidate: &CommandCandidate) -> String {
    format!("{}\n\n[{}]", candidate.command, candidate.provenance)
}

/// Renders router replies and errors.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    // Core methods with I/O injection (testable)
    // =========================================================================

    pub fn render_reply_with_io<W: Write>(&self, reply: &Reply, output: &mut W) -> io::Result<()> {
        match reply {
            Reply::Answer(text) => Panel::new("Answer", text.as_str(), Color::Blue).render(output),
            Reply::Explanation(text) => {
                Panel::new("Explanation", text.as_str(), Color::Yellow).render(output)
            }
            Reply::GitSuggestion(candidate) => {
                Panel::new("Git Suggestion", suggestion_body(candidate), Color::Green).render(output)
            }
            Reply::FindSuggestion(candidate) => {
                Panel::new("File Search", suggestion_body(candidate), Color::Cyan).render(output)
            }
            Reply::DirectoryChanged(_) | Reply::Exit => Ok(()),
            Reply::DirectoryChangeFailed(e) => writeln!(output, "{} {}", "Error:".red(), e),
            Reply::Help => self.render_help_with_io(output),
            Reply::Executed { result, repair } => {
                if !result.stdout.is_empty() {
                    write!(output, "{}", result.stdout)?;
                    if !result.stdout.ends_with('\n') {
                        writeln!(output)?;
                    }
                }
                if !result.stderr.is_empty() {
                    writeln!(output, "{}", result.stderr.trim_end().red())?;
                }
                match repair {
                    Some(RepairOutcome::Suggested(fix)) => {
                        Panel::new("Try This", fix.as_str(), Color::Red).render(output)
                    }
                    Some(RepairOutcome::Failed(message)) => self.render_error_message_with_io(message, output),
                    None => Ok(()),
                }
            }
        }
    }

    pub fn render_help_with_io<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let body = HELP_LINES
            .iter()
            .map(|(usage, description)| format!("{:<16} - {}", usage, description))
            .collect::<Vec<_>>()
            .join("\n");
        Panel::new("Help", format!("COMMAND HELP\n{}", body), Color::Blue).render(output)
    }

    /// Generic failure panel, with a reminder of the help command.
    pub fn render_error_message_with_io<W: Write>(&self, message: &str, output: &mut W) -> io::Result<()> {
        Panel::new(
            "",
            format!("Error: {}\nType !help for assistance", message),
            Color::Red,
        )
        .render(output)
    }

    pub fn render_banner_with_io<W: Write>(&self, cwd: &str, output: &mut W) -> io::Result<()> {
        Panel::new(
            "hintsh",
            "hintsh smart shell (type !help for commands)",
            Color::BrightBlue,
        )
        .subtitle(cwd)
        .render(output)
    }

    // =========================================================================
    // Convenience methods using standard I/O
    // =========================================================================

    pub fn render_reply(&self, reply: &Reply) {
        let _ = self.render_reply_with_io(reply, &mut io::stdout());
    }

    pub fn render_error(&self, error: &anyhow::Error) {
        let _ = self.render_error_message_with_io(&format!("{:#}", error), &mut io::stdout());
    }

    pub fn render_banner(&self, cwd: &str) {
        let _ = self.render_banner_with_io(cwd, &mut io::stdout());
    }

    pub fn show_interrupt_hint(&self) {
        println!("{}", "Use 'exit' to quit".yellow());
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutionResult;

    fn rendered(reply: &Reply) -> String {
        colored::control::set_override(false);
        let mut output = Vec::new();
        Renderer::new().render_reply_with_io(reply, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_panel_lines_have_fixed_width() {
        colored::control::set_override(false);
        let mut output = Vec::new();
        Panel::new("Title", "short\nlines", Color::Blue).render(&mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        for line in text.lines() {
            assert_eq!(line.chars().count(), PANEL_WIDTH, "{line:?}");
        }
        assert!(text.starts_with("╭─ Title ─"));
    }

    #[test]
    fn test_long_words_are_broken_to_keep_width() {
        colored::control::set_override(false);
        let url = format!("git clone https://example.com/{}.git", "a".repeat(90));
        let mut output = Vec::new();
        Panel::new("Git Suggestion", url.as_str(), Color::Green).render(&mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.lines().count() > 3);
        for line in text.lines() {
            assert_eq!(line.chars().count(), PANEL_WIDTH, "{line:?}");
        }
    }

    #[test]
    fn test_wrapped_lines_keep_inner_spacing() {
        colored::control::set_override(false);
        let body = format!("{}  two  spaces", "word ".repeat(20));
        let mut output = Vec::new();
        Panel::new("", body, Color::Blue).render(&mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("two  spaces"), "{text}");
    }

    #[test]
    fn test_suggestion_shows_command_and_provenance() {
        let text = rendered(&Reply::GitSuggestion(CommandCandidate::pattern("git push --force-with-lease")));

        assert!(text.contains("Git Suggestion"));
        assert!(text.contains("git push --force-with-lease"));
        assert!(text.contains("[pattern-fallback]"));
    }

    #[test]
    fn test_executed_with_repair_suggestion() {
        let reply = Reply::Executed {
            result: ExecutionResult {
                stdout: "partial".to_string(),
                stderr: "gti: not found\n".to_string(),
                exit_code: 127,
            },
            repair: Some(RepairOutcome::Suggested("git status".to_string())),
        };

        let text = rendered(&reply);

        assert!(text.starts_with("partial\n"));
        assert!(text.contains("gti: not found"));
        assert!(text.contains("Try This"));
        assert!(text.contains("git status"));
    }

    #[test]
    fn test_failed_repair_renders_error_panel_with_help_hint() {
        let reply = Reply::Executed {
            result: ExecutionResult {
                stdout: String::new(),
                stderr: "boom".to_string(),
                exit_code: 1,
            },
            repair: Some(RepairOutcome::Failed("all 3 models failed".to_string())),
        };

        let text = rendered(&reply);

        assert!(text.contains("Error: all 3 models failed"));
        assert!(text.contains("Type !help for assistance"));
    }

    #[test]
    fn test_help_lists_every_command() {
        let text = rendered(&Reply::Help);
        for (usage, _) in HELP_LINES {
            assert!(text.contains(usage), "missing {usage}");
        }
    }

    #[test]
    fn test_exit_and_directory_change_are_silent() {
        assert!(rendered(&Reply::Exit).is_empty());
        assert!(rendered(&Reply::DirectoryChanged("/tmp".into())).is_empty());
    }
}
