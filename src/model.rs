//! Model access with ordered fallback across model variants.
//!
//! [`ModelAccess`] owns the ordered [`ModelSpec`] and a [`CompletionBackend`].
//! Each call tries every model once, most preferred first, and only fails
//! when all of them did. It is constructed once at startup and shared by the
//! synthesizers, the router and the repair engine.

use crate::http_client::{HttpClient, ReqwestHttpClient};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-flash"];

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no models configured")]
    NoModels,

    #[error("all {attempts} models failed. Last error: {last_error}")]
    Exhausted { attempts: usize, last_error: String },
}

/// Ordered model identifiers, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    models: Vec<String>,
}

impl ModelSpec {
    pub fn new(models: Vec<String>) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::new(DEFAULT_MODELS.iter().map(|m| m.to_string()).collect())
    }
}

/// Secret used to authenticate to the completion service.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// A single completion attempt against one named model.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String>;
}

pub struct ModelAccess {
    backend: Box<dyn CompletionBackend>,
    spec: ModelSpec,
}

impl ModelAccess {
    pub fn new(backend: Box<dyn CompletionBackend>, spec: ModelSpec) -> Self {
        Self { backend, spec }
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    /// Returns the trimmed completion of the first model that answers with
    /// non-empty text. An empty completion counts as a failed attempt.
    pub async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let mut last_error = None;

        for model in self.spec.models() {
            debug!("Requesting completion from {}", model);
            match self.backend.complete(model, prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!("Completion served by {}", model);
                    return Ok(text.trim().to_string());
                }
                Ok(_) => {
                    warn!("Model {} returned an empty completion", model);
                    last_error = Some(anyhow!("{} returned an empty completion", model));
                }
                Err(e) => {
                    warn!("Model {} failed: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(ModelError::Exhausted {
                attempts: self.spec.models().len(),
                last_error: e.to_string(),
            }),
            None => Err(ModelError::NoModels),
        }
    }
}

/// Backend for the Gemini `generateContent` endpoint.
pub struct GeminiBackend {
    http: Box<dyn HttpClient>,
    credential: Credential,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(credential: Credential) -> Self {
        Self::with_http_client(credential, Box::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(credential: Credential, http: Box<dyn HttpClient>) -> Self {
        Self {
            http,
            credential,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// The key travels in the `x-goog-api-key` header, never in the URL.
    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn extract_text(body: &str) -> Result<String> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| anyhow!("Malformed response from completion service: {}", e))?;

        value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("No text in completion response"))
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post_json(
                &self.endpoint(model),
                &[
                    ("content-type", "application/json"),
                    (API_KEY_HEADER, self.credential.expose()),
                ],
                &body,
            )
            .await?;

        if !response.is_success() {
            return Err(anyhow!(
                "{} returned HTTP {}: {}",
                model,
                response.status,
                Self::error_message(&response.body)
            ));
        }

        Self::extract_text(&response.body)
    }
}

/// Backend that refuses every request. Used in offline mode so that all
/// deterministic fallbacks take over.
pub struct OfflineBackend;

#[async_trait]
impl CompletionBackend for OfflineBackend {
    async fn complete(&self, model: &str, _prompt: &str) -> Result<String> {
        Err(anyhow!("offline mode: {} is not reachable", model))
    }
}
