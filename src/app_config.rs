use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Provider settings for the upstream OpenAI-compatible API
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Pipeline behavior settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            provider: ProviderConfig::default(),
            pipeline: PipelineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration values that would otherwise fail at request time
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.provider.endpoint)
            .map_err(|e| anyhow!("Invalid provider endpoint '{}': {}", self.provider.endpoint, e))?;
        if self.pipeline.max_concurrent_translations == 0 {
            return Err(anyhow!("pipeline.max_concurrent_translations must be at least 1"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("provider.timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Resolve the API key, preferring the environment over the config file
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                let key = self.provider.api_key.trim();
                if key.is_empty() { None } else { Some(key.to_string()) }
            })
    }
}

/// Settings for the upstream OpenAI-compatible provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key; usually left empty here and supplied via OPENAI_API_KEY
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model used for text generation
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Model used for sentence translation
    #[serde(default = "default_translation_model")]
    pub translation_model: String,

    /// Request timeout in seconds for translation calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            generation_model: default_generation_model(),
            translation_model: default_translation_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Pipeline behavior settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Maximum number of in-flight translation requests per client request
    #[serde(default = "default_max_concurrent_translations")]
    pub max_concurrent_translations: usize,

    /// How translation events are ordered on the wire
    #[serde(default)]
    pub translation_ordering: TranslationOrdering,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_translations: default_max_concurrent_translations(),
            translation_ordering: TranslationOrdering::default(),
        }
    }
}

/// Ordering policy for translation events
///
/// `Completion` emits each translation as soon as its request finishes, which
/// minimizes latency but may deliver translations out of sentence order; the
/// client pairs them up via the sequence index carried in each event.
/// `Sequence` holds completed translations back until every lower-indexed
/// sentence has been emitted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationOrdering {
    #[default]
    Completion,
    Sequence,
}

impl std::fmt::Display for TranslationOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completion => write!(f, "completion"),
            Self::Sequence => write!(f, "sequence"),
        }
    }
}

impl std::str::FromStr for TranslationOrdering {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "completion" => Ok(Self::Completion),
            "sequence" => Ok(Self::Sequence),
            _ => Err(anyhow!("Invalid translation ordering: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_port() -> u16 {
    8000
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_generation_model() -> String {
    "gpt-4".to_string()
}

fn default_translation_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_translations() -> usize {
    4
}
