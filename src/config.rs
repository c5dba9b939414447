//! Analyzer configuration.
//!
//! Everything enters through the constructor; nothing reads the
//! environment at analysis time. `from_env` layers an optional
//! `funcov.toml` under the environment overrides.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::diagnostics::AnalyzeError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const CONFIG_FILE: &str = "funcov.toml";

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl AnalyzerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Build from the environment. The credential is required up front;
    /// `FUNCOV_MODEL`, `FUNCOV_ENDPOINT` and `FUNCOV_TIMEOUT` override the
    /// file layer, which overrides the defaults.
    pub fn from_env() -> Result<Self, AnalyzeError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AnalyzeError::config("OPENAI_API_KEY is not set"))?;
        let mut config = Self::new(api_key);

        if let Some(file) = TomlConfig::load(Path::new(CONFIG_FILE))? {
            config.apply_file(file);
        }

        if let Ok(model) = env::var("FUNCOV_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(endpoint) = env::var("FUNCOV_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint;
            }
        }
        if let Ok(timeout) = env::var("FUNCOV_TIMEOUT") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                AnalyzeError::config(format!("invalid FUNCOV_TIMEOUT value '{}'", timeout.trim()))
            })?;
        }
        Ok(config)
    }

    fn apply_file(&mut self, file: TomlConfig) {
        let Some(suggest) = file.suggest else { return };
        if let Some(model) = suggest.model {
            self.model = model;
        }
        if let Some(endpoint) = suggest.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(timeout_secs) = suggest.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TomlConfig {
    pub suggest: Option<TomlSuggest>,
}

#[derive(Debug, Deserialize)]
pub struct TomlSuggest {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl TomlConfig {
    /// Read an optional config file. A missing file is fine; a malformed
    /// one is a config error.
    pub fn load(path: &Path) -> Result<Option<Self>, AnalyzeError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|e| {
            AnalyzeError::config(format!("{}: could not read file: {e}", path.display()))
        })?;
        let parsed: TomlConfig = toml::from_str(&content).map_err(|e| {
            AnalyzeError::config(format!("{}: invalid syntax: {e}", path.display()))
        })?;
        Ok(Some(parsed))
    }
}
