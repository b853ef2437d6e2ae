use crate::model::{Credential, ModelSpec};
use anyhow::{Result, anyhow};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_DIR: &str = ".hintsh";
const CONFIG_FILE: &str = "config.toml";
const HISTORY_FILE: &str = "history.txt";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    /// Model identifiers in order of preference. Empty means the defaults.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub offline: bool,
}

impl Config {
    /// Load configuration from file and environment variables, or defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::load_persisted()?;

        // Environment variables override config file
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            if !api_key.trim().is_empty() {
                config.gemini_api_key = Some(api_key.trim().to_string());
            }
        }

        if std::env::var("HINTSH_OFFLINE").is_ok() {
            config.offline = true;
        }

        Ok(config)
    }

    /// Load only what is stored in the config file, without environment
    /// overrides. Use this before saving.
    pub fn load_persisted() -> Result<Self> {
        match Self::load_from_file(&Self::get_config_path()?)? {
            Some(config) => Ok(config),
            None => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
        info!("Loaded config from: {}", path.display());
        Ok(Some(config))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved config to: {}", path.display());
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join(CONFIG_FILE))
    }

    pub fn get_config_dir() -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(CONFIG_DIR))
    }

    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::get_config_dir()?.join(HISTORY_FILE))
    }

    /// Loads the config and, when no API key is available and the shell is
    /// not offline, asks for one on stdin and persists it.
    pub fn load_or_bootstrap() -> Result<Self> {
        let config = Self::load()?;
        if !config.needs_api_key() {
            return Ok(config);
        }

        let stdin = io::stdin();
        let api_key = Self::prompt_api_key_with_io(&mut stdin.lock(), &mut io::stdout())?;
        let mut persisted = Self::load_persisted()?;
        persisted.set_api_key(api_key)?;
        Self::load()
    }

    pub fn needs_api_key(&self) -> bool {
        !self.offline && self.gemini_api_key.is_none()
    }

    /// Reads an API key from `input`, prompting on `output`.
    pub fn prompt_api_key_with_io<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
        write!(output, "Enter Gemini API Key: ")?;
        output.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let api_key = line.trim();
        if api_key.is_empty() {
            return Err(anyhow!("No API key entered. Use --offline to run without one."));
        }
        Ok(api_key.to_string())
    }

    /// Set API key and save config
    pub fn set_api_key(&mut self, api_key: String) -> Result<()> {
        self.gemini_api_key = Some(api_key);
        self.save()?;
        info!("API key saved to config file");
        Ok(())
    }

    pub fn credential(&self) -> Option<Credential> {
        self.gemini_api_key.as_deref().map(Credential::new)
    }

    pub fn model_spec(&self) -> ModelSpec {
        if self.models.is_empty() {
            ModelSpec::default()
        } else {
            ModelSpec::new(self.models.clone())
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn show_config_info() -> Result<()> {
        let config_path = Self::get_config_path()?;
        println!("Configuration file: {}", config_path.display());

        match Self::load_from_file(&config_path)? {
            Some(config) => {
                println!("Status: Found");
                println!("API Key: {}", if config.gemini_api_key.is_some() { "Set" } else { "Not set" });
                println!("Models: {}", config.model_spec().models().join(", "));
                println!("Offline mode: {}", config.offline);
            }
            None => println!("Status: Not found (using defaults)"),
        }

        println!("\nTo set API key:");
        println!("  hintsh --set-api-key <your-key>");
        println!("\nOr set environment variable:");
        println!("  export GEMINI_API_KEY=<your-key>");

        Ok(())
    }
}
