//! Shared provider traits for dependency injection.
//!
//! Resolvers stay deterministic by reading repository state through these
//! traits instead of spawning processes themselves; tests inject fixed
//! implementations.

use std::process::Command;

/// Name used when the current branch cannot be determined.
///
/// `git push origin HEAD` pushes whatever is checked out, so it is a valid
/// stand-in for the branch name.
pub const DETACHED_REF: &str = "HEAD";

/// Trait for looking up the checked-out git branch.
///
/// # Example
///
/// ```
/// use hintsh::providers::{BranchProvider, FixedBranchProvider};
///
/// let provider = FixedBranchProvider::new("main");
/// assert_eq!(provider.current_branch().as_deref(), Some("main"));
/// ```
pub trait BranchProvider: Send + Sync {
    /// Returns the current branch, or `None` outside a repository or on a
    /// detached head.
    fn current_branch(&self) -> Option<String>;
}

/// Asks git for the branch of the process working directory.
pub struct GitBranchProvider;

impl BranchProvider for GitBranchProvider {
    fn current_branch(&self) -> Option<String> {
        let output = Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if branch.is_empty() || branch == DETACHED_REF {
            None
        } else {
            Some(branch)
        }
    }
}

/// Always reports the same branch.
pub struct FixedBranchProvider {
    branch: Option<String>,
}

impl FixedBranchProvider {
    pub fn new(branch: &str) -> Self {
        Self {
            branch: Some(branch.to_string()),
        }
    }

    /// A provider that behaves like a detached head.
    pub fn detached() -> Self {
        Self { branch: None }
    }
}

impl BranchProvider for FixedBranchProvider {
    fn current_branch(&self) -> Option<String> {
        self.branch.clone()
    }
}
