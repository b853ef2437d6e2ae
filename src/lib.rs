//! hintsh - an interactive shell with natural-language assistance.
//!
//! Ordinary commands run through the system shell. On top of that the shell
//! understands a few helper forms:
//!
//! - **`?question`** asks the model anything
//! - **`!explain <cmd>`** explains a shell command in one line
//! - **`!git <request>`** suggests a git command
//! - **`!find <request>`** suggests a `find` command
//! - **Repair suggestions** appear when a command exits non-zero
//!
//! # Architecture
//!
//! - [`intent`] - Classifies each input line
//! - [`command_router`] - Routes intents to handlers
//! - [`model`] - Ordered fallback across model variants
//! - [`sanitizer`] - Validates model-produced commands
//! - [`git_patterns`] / [`find_patterns`] - Deterministic, network-free resolvers
//! - [`synthesizer`] - Model-backed command synthesis with fallbacks
//! - [`executor`] - Runs shell commands and `cd`
//! - [`repair`] - Corrections for failed commands
//! - [`panel`] - Terminal rendering
//! - [`shell`] - Interactive line editor loop
//! - [`config`] - Configuration management (API key, models)
//! - [`providers`] - Shared dependency injection traits
//! - [`http_client`] - HTTP client abstraction
//!
//! # Example
//!
//! ```ignore
//! use hintsh::command_router::CommandRouter;
//! use hintsh::model::{ModelAccess, ModelSpec, OfflineBackend};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model = Arc::new(ModelAccess::new(Box::new(OfflineBackend), ModelSpec::default()));
//!     let router = CommandRouter::new(model);
//!
//!     // Without a reachable model the pattern resolver answers.
//!     let reply = router.handle_line("!find python files").await?;
//!     println!("{:?}", reply);
//!     Ok(())
//! }
//! ```
//!
//! # Fallbacks
//!
//! Model failures never leave a helper without an answer: `!find` falls back
//! to the keyword table in [`find_patterns`], `!git` resolves well-known verbs
//! through [`git_patterns`] and otherwise reconstructs the request verbatim.

pub mod command_router;
pub mod config;
pub mod executor;
pub mod find_patterns;
pub mod git_patterns;
pub mod http_client;
pub mod intent;
pub mod model;
pub mod panel;
pub mod providers;
pub mod repair;
pub mod sanitizer;
pub mod shell;
pub mod synthesizer;
