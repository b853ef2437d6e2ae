//! Correction suggestions for failed shell commands.
//!
//! After a raw command exits non-zero, [`RepairEngine`] asks the model for a
//! corrected command. The suggestion is only displayed; it is never run.

use crate::executor::ExecutionResult;
use crate::model::{ModelAccess, ModelError};
use crate::sanitizer::first_line;
use std::sync::Arc;
use tracing::info;

/// Builds the prompt sent to the model after a failed command.
pub fn build_repair_prompt(command: &str, stderr: &str) -> String {
    format!(
        "Fix this shell error concisely:\nCommand: {}\nError: {}\nProvide ONLY the corrected command.",
        command,
        stderr.trim_end()
    )
}

pub struct RepairEngine {
    model: Arc<ModelAccess>,
}

impl RepairEngine {
    pub fn new(model: Arc<ModelAccess>) -> Self {
        Self { model }
    }

    /// Returns a corrected command for `command`, which produced `result`.
    pub async fn suggest(&self, command: &str, result: &ExecutionResult) -> Result<String, ModelError> {
        info!("Requesting repair for '{}' (exit code {})", command, result.exit_code);

        let response = self
            .model
            .generate(&build_repair_prompt(command, &result.stderr))
            .await?;

        let line = first_line(&response);
        Ok(if line.is_empty() { response.clone() } else { line.to_string() })
    }
}
