use crate::{
    executor::{DirectoryChangeError, ExecutionResult, Executor},
    git_patterns::GitResolver,
    intent::{Intent, classify},
    model::ModelAccess,
    repair::RepairEngine,
    synthesizer::{CommandCandidate, FindSynthesizer, GitSynthesizer},
};
use anyhow::{Result, anyhow};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of asking the model to fix a failed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    Suggested(String),
    Failed(String),
}

/// What the renderer should show for one handled line.
#[derive(Debug)]
pub enum Reply {
    Answer(String),
    Explanation(String),
    GitSuggestion(CommandCandidate),
    FindSuggestion(CommandCandidate),
    DirectoryChanged(PathBuf),
    DirectoryChangeFailed(DirectoryChangeError),
    Help,
    Executed {
        result: ExecutionResult,
        repair: Option<RepairOutcome>,
    },
    Exit,
}

pub struct CommandRouter {
    model: Arc<ModelAccess>,
    git: GitSynthesizer,
    find: FindSynthesizer,
    executor: Executor,
    repair: RepairEngine,
}

impl CommandRouter {
    pub fn new(model: Arc<ModelAccess>) -> Self {
        Self::with_parts(model, Executor::new(), GitResolver::new())
    }

    pub fn with_parts(model: Arc<ModelAccess>, executor: Executor, resolver: GitResolver) -> Self {
        Self {
            git: GitSynthesizer::new(model.clone(), resolver),
            find: FindSynthesizer::new(model.clone()),
            repair: RepairEngine::new(model.clone()),
            executor,
            model,
        }
    }

    pub async fn handle_line(&self, line: &str) -> Result<Reply> {
        let intent = classify(line);
        info!("Classified input as {:?}", intent);
        self.dispatch(intent).await
    }

    pub async fn dispatch(&self, intent: Intent) -> Result<Reply> {
        match intent {
            Intent::AskAnything(question) => {
                if question.is_empty() {
                    return Err(anyhow!("Nothing to ask. Type your question right after '?'"));
                }
                Ok(Reply::Answer(self.model.generate(&question).await?))
            }
            Intent::Explain(command) => {
                if command.is_empty() {
                    return Err(anyhow!("Nothing to explain. Usage: !explain <command>"));
                }
                let prompt = format!("Explain this shell command in one line:\n{}", command);
                Ok(Reply::Explanation(self.model.generate(&prompt).await?))
            }
            Intent::GitHelp(args) => Ok(Reply::GitSuggestion(self.git.synthesize(&args).await?)),
            Intent::FindHelp(query) => Ok(Reply::FindSuggestion(self.find.synthesize(&query).await)),
            Intent::ChangeDirectory(path) => match self.executor.change_directory(&path) {
                Ok(dir) => Ok(Reply::DirectoryChanged(dir)),
                Err(e) => {
                    warn!("{}", e);
                    Ok(Reply::DirectoryChangeFailed(e))
                }
            },
            Intent::Help => Ok(Reply::Help),
            Intent::RawShell(command) => self.run_raw(&command).await,
            Intent::Exit => Ok(Reply::Exit),
        }
    }

    async fn run_raw(&self, command: &str) -> Result<Reply> {
        let result = self.executor.run(command)?;

        let repair = if result.success() {
            None
        } else {
            Some(match self.repair.suggest(command, &result).await {
                Ok(fix) => RepairOutcome::Suggested(fix),
                Err(e) => {
                    warn!("Repair suggestion failed: {}", e);
                    RepairOutcome::Failed(e.to_string())
                }
            })
        };

        Ok(Reply::Executed { result, repair })
    }
}
