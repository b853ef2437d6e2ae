//! Classification of input lines into intents.

/// The purpose of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `?<question>`
    AskAnything(String),
    /// `!explain <command>`
    Explain(String),
    /// `!git <args...>`
    GitHelp(Vec<String>),
    /// `!find <query>`
    FindHelp(String),
    /// `cd [path]`, defaulting to `~`
    ChangeDirectory(String),
    /// `!help`
    Help,
    /// Anything else, forwarded to the shell.
    RawShell(String),
    /// `exit` / `quit`
    Exit,
}

/// Classifies a raw input line. Rules are checked in priority order on the
/// trimmed line; the first match wins.
///
/// ```
/// use hintsh::intent::{classify, Intent};
///
/// assert_eq!(classify("!git push --force"), Intent::GitHelp(vec!["push".into(), "--force".into()]));
/// assert_eq!(classify("ls -la"), Intent::RawShell("ls -la".into()));
/// ```
pub fn classify(line: &str) -> Intent {
    let line = line.trim();

    if let Some(question) = line.strip_prefix('?') {
        return Intent::AskAnything(question.trim().to_string());
    }
    if let Some(command) = line.strip_prefix("!explain") {
        return Intent::Explain(command.trim().to_string());
    }
    if let Some(args) = line.strip_prefix("!git") {
        return Intent::GitHelp(args.split_whitespace().map(String::from).collect());
    }
    if let Some(query) = line.strip_prefix("!find") {
        return Intent::FindHelp(query.trim().to_string());
    }
    if let Some(path) = cd_target(line) {
        let path = path.trim();
        let path = if path.is_empty() { "~" } else { path };
        return Intent::ChangeDirectory(path.to_string());
    }
    if line == "!help" {
        return Intent::Help;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Intent::Exit;
    }

    Intent::RawShell(line.to_string())
}

fn cd_target(line: &str) -> Option<&str> {
    if line == "cd" {
        return Some("");
    }
    line.strip_prefix("cd ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question() {
        assert_eq!(classify("?what is a symlink"), Intent::AskAnything("what is a symlink".into()));
        assert_eq!(classify("  ? spaced  "), Intent::AskAnything("spaced".into()));
    }

    #[test]
    fn test_explain() {
        assert_eq!(classify("!explain tar -xzf a.tgz"), Intent::Explain("tar -xzf a.tgz".into()));
    }

    #[test]
    fn test_git_splits_arguments() {
        assert_eq!(
            classify("!git commit -m  fix   bug"),
            Intent::GitHelp(vec!["commit".into(), "-m".into(), "fix".into(), "bug".into()])
        );
        assert_eq!(classify("!git"), Intent::GitHelp(vec![]));
    }

    #[test]
    fn test_find() {
        assert_eq!(classify("!find python files"), Intent::FindHelp("python files".into()));
    }

    #[test]
    fn test_cd_variants() {
        assert_eq!(classify("cd"), Intent::ChangeDirectory("~".into()));
        assert_eq!(classify("cd   "), Intent::ChangeDirectory("~".into()));
        assert_eq!(classify("cd /tmp"), Intent::ChangeDirectory("/tmp".into()));
        assert_eq!(classify("cd ~/src "), Intent::ChangeDirectory("~/src".into()));
    }

    #[test]
    fn test_cd_prefix_of_other_command_is_raw() {
        assert_eq!(classify("cdrecord -v"), Intent::RawShell("cdrecord -v".into()));
    }

    #[test]
    fn test_help_is_exact() {
        assert_eq!(classify("!help"), Intent::Help);
        assert_eq!(classify("!helpme"), Intent::RawShell("!helpme".into()));
    }

    #[test]
    fn test_exit_case_insensitive() {
        assert_eq!(classify("exit"), Intent::Exit);
        assert_eq!(classify("QUIT"), Intent::Exit);
        assert_eq!(classify("Exit "), Intent::Exit);
        assert_eq!(classify("exit 1"), Intent::RawShell("exit 1".into()));
    }

    #[test]
    fn test_priority_question_beats_everything() {
        assert_eq!(classify("?!git push"), Intent::AskAnything("!git push".into()));
    }

    #[test]
    fn test_everything_else_is_raw_shell() {
        assert_eq!(classify("ls -la | grep rs"), Intent::RawShell("ls -la | grep rs".into()));
        assert_eq!(classify("!unknown"), Intent::RawShell("!unknown".into()));
    }
}
