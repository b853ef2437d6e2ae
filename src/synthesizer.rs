//! AI-assisted synthesis of `git` and `find` commands.
//!
//! Both synthesizers follow the same shape: answer well-known requests from a
//! table, otherwise ask the model for a single command line, normalize and
//! sanitize it, and fall back to a deterministic answer on any failure.

use crate::find_patterns::resolve_find;
use crate::git_patterns::{self, GitResolver};
use crate::model::ModelAccess;
use crate::sanitizer::{self, SanitizeError, has_prefix, normalize};
use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

const FIND_PREFIX: &str = "find .";
const GIT_PREFIX: &str = "git";

/// Exact-match canned `find` queries (lower-cased, whitespace-normalized).
const CANNED_FIND: &[(&str, &str)] = &[
    ("sh files", "find . -type f -name '*.sh' | wc -l"),
    ("count files", "find . -type f | wc -l"),
    ("empty dirs", "find . -type d -empty"),
    ("empty files", "find . -type f -empty"),
];

/// One-word git shortcuts answered without the model.
const GIT_SHORTCUTS: &[(&str, &str)] = &[
    ("status", "git status"),
    ("log", "git log --oneline -n 10"),
    ("branch", "git branch -vv"),
    ("stash", "git stash list"),
    ("diff", "git diff --cached"),
];

/// Where a suggested command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    PatternFallback,
    AiSynthesized,
}

impl Provenance {
    pub fn tag(self) -> &'static str {
        match self {
            Provenance::PatternFallback => "pattern-fallback",
            Provenance::AiSynthesized => "ai-synthesized",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A shell command suggested to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCandidate {
    pub command: String,
    pub provenance: Provenance,
}

impl CommandCandidate {
    pub fn pattern(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            provenance: Provenance::PatternFallback,
        }
    }

    pub fn synthesized(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            provenance: Provenance::AiSynthesized,
        }
    }
}

fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

pub struct FindSynthesizer {
    model: Arc<ModelAccess>,
}

impl FindSynthesizer {
    pub fn new(model: Arc<ModelAccess>) -> Self {
        Self { model }
    }

    /// Turns a natural-language file search into a `find` command.
    ///
    /// Never fails: model, post-processing and sanitizer errors all fall
    /// back to [`resolve_find`] on the original query.
    pub async fn synthesize(&self, query: &str) -> CommandCandidate {
        let key = normalize_query(query);
        if let Some((_, command)) = CANNED_FIND.iter().find(|(canned, _)| *canned == key) {
            return CommandCandidate::pattern(*command);
        }
        if key.is_empty() {
            return CommandCandidate::pattern(resolve_find(query));
        }

        match self.ask_model(query).await {
            Ok(command) => {
                info!("Synthesized find command: {}", command);
                CommandCandidate::synthesized(command)
            }
            Err(e) => {
                warn!("Find synthesis failed, using pattern fallback: {}", e);
                CommandCandidate::pattern(resolve_find(query))
            }
        }
    }

    async fn ask_model(&self, query: &str) -> Result<String> {
        let response = self.model.generate(&build_find_prompt(query)).await?;
        let command = coerce_find_prefix(&normalize(&response));
        Ok(sanitizer::sanitize(&command, FIND_PREFIX)?)
    }
}

pub fn build_find_prompt(query: &str) -> String {
    format!(
        "Convert this file search request into a single `find` command.\n\
         Rules:\n\
         - Output exactly one line and nothing else.\n\
         - The line must start with `find .`\n\
         - Use only -name, -type, -size, -o, -a and parentheses.\n\
         - Quote every name pattern with single quotes.\n\
         - Append `| wc -l` only if the request explicitly asks for a count.\n\
         \n\
         Request: {}\n",
        query.trim()
    )
}

/// Forces the canonical `find .` prefix onto a normalized model answer.
pub fn coerce_find_prefix(command: &str) -> String {
    if has_prefix(command, FIND_PREFIX) {
        return command.to_string();
    }
    if let Some(rest) = command.strip_prefix("find.") {
        return format!("{} {}", FIND_PREFIX, rest.trim_start()).trim_end().to_string();
    }
    if let Some(rest) = command.strip_prefix("find ") {
        return format!("{} {}", FIND_PREFIX, rest.trim_start());
    }
    format!("{} {}", FIND_PREFIX, command).trim_end().to_string()
}

pub struct GitSynthesizer {
    model: Arc<ModelAccess>,
    resolver: GitResolver,
}

impl GitSynthesizer {
    pub fn new(model: Arc<ModelAccess>, resolver: GitResolver) -> Self {
        Self { model, resolver }
    }

    /// Turns `!git` arguments into a git command.
    ///
    /// Verbs with a dedicated resolver rule never reach the model. When the
    /// model fails, the request is reconstructed verbatim as `git <args>`.
    /// Requests containing a command-chaining sequence are refused up front,
    /// since several paths echo the user's words back.
    pub async fn synthesize(&self, args: &[String]) -> Result<CommandCandidate, SanitizeError> {
        let Some(verb) = args.first() else {
            return Ok(CommandCandidate::pattern("git status"));
        };
        sanitizer::reject_forbidden(&args.join(" "))?;

        if args.len() == 1 {
            if let Some((_, command)) = GIT_SHORTCUTS.iter().find(|(word, _)| *word == verb.as_str()) {
                return Ok(CommandCandidate::pattern(*command));
            }
        }

        if git_patterns::has_rule(verb) {
            return Ok(CommandCandidate::pattern(self.resolver.resolve(args)));
        }

        Ok(match self.ask_model(args).await {
            Ok(command) => {
                info!("Synthesized git command: {}", command);
                CommandCandidate::synthesized(command)
            }
            Err(e) => {
                warn!("Git synthesis failed, reconstructing verbatim: {}", e);
                CommandCandidate::pattern(format!("git {}", args.join(" ")))
            }
        })
    }

    async fn ask_model(&self, args: &[String]) -> Result<String> {
        let response = self.model.generate(&build_git_prompt(args)).await?;
        let line = normalize(&response);
        let command = if has_prefix(&line, GIT_PREFIX) {
            line
        } else {
            format!("git {}", line)
        };
        Ok(sanitizer::sanitize(&command, GIT_PREFIX)?)
    }
}

pub fn build_git_prompt(args: &[String]) -> String {
    format!(
        "Convert this natural language Git request to a SINGLE executable Git command.\n\
         Return ONLY the command without any explanations or formatting.\n\
         \n\
         Request: git {}\n\
         \n\
         Command: git ",
        args.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::testing::{ScriptedBackend, model_access};
    use crate::providers::FixedBranchProvider;

    fn find_synth(backend: &Arc<ScriptedBackend>) -> FindSynthesizer {
        FindSynthesizer::new(Arc::new(model_access(backend, &["m1", "m2"])))
    }

    fn git_synth(backend: &Arc<ScriptedBackend>) -> GitSynthesizer {
        GitSynthesizer::new(
            Arc::new(model_access(backend, &["m1"])),
            GitResolver::with_branch_provider(Box::new(FixedBranchProvider::new("main"))),
        )
    }

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[tokio::test]
    async fn test_find_offline_falls_back_to_patterns() {
        let backend = Arc::new(ScriptedBackend::always_failing());
        let candidate = find_synth(&backend).synthesize("python files").await;

        assert_eq!(candidate, CommandCandidate::pattern("find . -type f -name '*.py'"));
        assert_eq!(backend.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_canned_query_skips_model() {
        let backend = Arc::new(ScriptedBackend::always_failing());
        let candidate = find_synth(&backend).synthesize("  SH   files ").await;

        assert_eq!(candidate.command, "find . -type f -name '*.sh' | wc -l");
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_uses_sanitized_model_answer() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok(
            "```\nfind .  -type f   -size +1M  # big ones\n```",
        )]));
        let candidate = find_synth(&backend).synthesize("files bigger than a megabyte").await;

        assert_eq!(candidate, CommandCandidate::synthesized("find . -type f -size +1M"));
    }

    #[tokio::test]
    async fn test_find_injection_falls_back() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("find . -name '*.log'; rm -rf /")]));
        let candidate = find_synth(&backend).synthesize("log files").await;

        assert_eq!(candidate, CommandCandidate::pattern("find . -type f -name '*.log'"));
    }

    #[tokio::test]
    async fn test_find_prompt_carries_query_and_rules() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("find . -name '*.toml'")]));
        find_synth(&backend).synthesize("toml configs").await;

        let calls = backend.calls.lock().unwrap();
        let prompt = &calls[0].1;
        assert!(prompt.contains("Request: toml configs"));
        assert!(prompt.contains("start with `find .`"));
        assert!(prompt.contains("| wc -l"));
    }

    #[test]
    fn test_coerce_find_prefix() {
        assert_eq!(coerce_find_prefix("find . -type d"), "find . -type d");
        assert_eq!(coerce_find_prefix("find. -type d"), "find . -type d");
        assert_eq!(coerce_find_prefix("find.-type d"), "find . -type d");
        assert_eq!(coerce_find_prefix("find -name x"), "find . -name x");
        assert_eq!(coerce_find_prefix("-name '*.rs'"), "find . -name '*.rs'");
        assert_eq!(coerce_find_prefix("find."), "find .");
    }

    #[tokio::test]
    async fn test_git_refuses_chained_request() {
        let backend = Arc::new(ScriptedBackend::always_failing());

        let err = git_synth(&backend).synthesize(&args("lg; rm -rf ~")).await.unwrap_err();

        assert!(matches!(err, SanitizeError::InjectionRisk { .. }));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_git_without_args_is_status() {
        let backend = Arc::new(ScriptedBackend::always_failing());
        let candidate = git_synth(&backend).synthesize(&[]).await.unwrap();

        assert_eq!(candidate.command, "git status");
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_git_single_word_shortcuts() {
        let backend = Arc::new(ScriptedBackend::always_failing());
        let synth = git_synth(&backend);

        assert_eq!(synth.synthesize(&args("log")).await.unwrap().command, "git log --oneline -n 10");
        assert_eq!(synth.synthesize(&args("stash")).await.unwrap().command, "git stash list");
        assert_eq!(synth.synthesize(&args("diff")).await.unwrap().command, "git diff --cached");
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_git_force_push_resolved_without_model() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("git push --force")]));
        let candidate = git_synth(&backend).synthesize(&args("push --force")).await.unwrap();

        assert_eq!(candidate, CommandCandidate::pattern("git push --force-with-lease"));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_git_model_answer_gets_prefix() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("reflog -n 5")]));
        let candidate = git_synth(&backend).synthesize(&args("list what I did recently")).await.unwrap();

        assert_eq!(candidate, CommandCandidate::synthesized("git reflog -n 5"));
        let calls = backend.calls.lock().unwrap();
        assert!(calls[0].1.contains("Request: git list what I did recently"));
    }

    #[tokio::test]
    async fn test_git_model_failure_reconstructs_verbatim() {
        let backend = Arc::new(ScriptedBackend::always_failing());
        let candidate = git_synth(&backend).synthesize(&args("squash last three")).await.unwrap();

        assert_eq!(candidate, CommandCandidate::pattern("git squash last three"));
    }

    #[tokio::test]
    async fn test_git_rejected_answer_reconstructs_verbatim() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("git add . && git commit")]));
        let candidate = git_synth(&backend).synthesize(&args("save everything")).await.unwrap();

        assert_eq!(candidate, CommandCandidate::pattern("git save everything"));
    }

    #[test]
    fn test_provenance_tags() {
        assert_eq!(Provenance::PatternFallback.to_string(), "pattern-fallback");
        assert_eq!(Provenance::AiSynthesized.to_string(), "ai-synthesized");
    }
}
