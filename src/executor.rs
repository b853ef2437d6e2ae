//! Command execution module for raw shell input and directory changes.
//!
//! Raw commands are handed to the system shell as a single string
//! (`sh -c <line>`); their output is captured rather than streamed so the
//! repair engine can inspect stderr after a failure.

use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;
use tracing::{error, info};

/// Shell interpreter used for raw commands.
pub const SHELL: &str = "sh";

/// Captured result of one shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        }
    }
}

#[derive(Debug, Error)]
#[error("cd: {path}: {source}")]
pub struct DirectoryChangeError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

// =============================================================================
// Traits for Dependency Injection
// =============================================================================

/// Trait for running shell commands.
///
/// This abstraction enables testing without spawning real processes.
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` through the shell and returns its output.
    fn run_shell(&self, command: &str) -> Result<Output>;

    /// Checks if a program exists in PATH.
    fn program_exists(&self, program: &str) -> bool;
}

/// Default process runner using std::process::Command.
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run_shell(&self, command: &str) -> Result<Output> {
        Ok(Command::new(SHELL).arg("-c").arg(command).output()?)
    }

    fn program_exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

// =============================================================================
// Executor Implementation
// =============================================================================

/// Runs raw shell commands and handles `cd`.
///
/// # Example
///
/// ```no_run
/// use hintsh::executor::Executor;
///
/// let executor = Executor::new();
/// let result = executor.run("ls -la")?;
/// println!("{}", result.stdout);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct Executor {
    runner: Box<dyn ProcessRunner>,
}

impl Executor {
    pub fn new() -> Self {
        Self::with_runner(Box::new(SystemProcessRunner))
    }

    /// Creates an executor with a custom process runner (for testing).
    pub fn with_runner(runner: Box<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Runs `command` through the shell, capturing stdout, stderr and the
    /// exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell is missing or the process cannot be
    /// spawned. A non-zero exit code is not an error.
    pub fn run(&self, command: &str) -> Result<ExecutionResult> {
        if !self.runner.program_exists(SHELL) {
            return Err(anyhow!("Shell interpreter '{}' not found in PATH", SHELL));
        }

        info!("Executing shell command: {}", command);
        let output = self.runner.run_shell(command)?;
        let result = ExecutionResult::from_output(&output);

        if !result.success() {
            error!("Command failed with exit code {}: {}", result.exit_code, command);
        }

        Ok(result)
    }

    /// Changes the process working directory.
    ///
    /// `~` and `~/...` are expanded against the home directory. On failure
    /// the working directory is left unchanged.
    pub fn change_directory(&self, target: &str) -> Result<PathBuf, DirectoryChangeError> {
        let path = expand_home(target, dirs::home_dir().as_deref());

        std::env::set_current_dir(&path).map_err(|source| DirectoryChangeError {
            path: target.to_string(),
            source,
        })?;

        info!("Changed directory to {}", path.display());
        Ok(std::env::current_dir().unwrap_or(path))
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Expands a leading `~` using `home`. Other paths are returned as given.
pub fn expand_home(target: &str, home: Option<&Path>) -> PathBuf {
    let target = if target.is_empty() { "~" } else { target };

    match (target, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (t, Some(home)) if t.starts_with("~/") => home.join(&t[2..]),
        (t, _) => PathBuf::from(t),
    }
}
