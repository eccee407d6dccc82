use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Completion service configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Enrichment pipeline configuration
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Input/output path configuration
    #[serde(default)]
    pub paths: PathConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Completion service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model name (e.g., "gpt-4o", "gpt-4o-mini")
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (optional, for Azure OpenAI or self-hosted)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// API key for the run: the OPENAI_API_KEY environment variable takes
    /// precedence, falling back to the value in the config file
    pub fn resolve_api_key(&self) -> String {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => self.api_key.clone(),
        }
    }
}

/// Enrichment pipeline configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrichmentConfig {
    /// Number of species processed concurrently and persisted as one unit
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum attempts per label request when the service throttles
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff in seconds; attempt N waits N times this value
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,

    /// Pause between batches in milliseconds, as a global throttle
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Maximum tokens to generate per label
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature parameter for text generation (0.0 for determinism)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            backoff_base_secs: default_backoff_base_secs(),
            batch_delay_ms: default_batch_delay_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Input/output path configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathConfig {
    /// Species list, one scientific name per line
    #[serde(default = "default_species_list")]
    pub species_list: String,

    /// English prompt template containing the [species] placeholder
    #[serde(default = "default_en_prompt")]
    pub en_prompt: String,

    /// Japanese prompt template containing the [species] placeholder
    #[serde(default = "default_ja_prompt")]
    pub ja_prompt: String,

    /// Output CSV path, also the resumable checkpoint
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            species_list: default_species_list(),
            en_prompt: default_en_prompt(),
            ja_prompt: default_ja_prompt(),
            output: default_output(),
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

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_batch_size() -> usize {
    10
}

fn default_max_retries() -> u32 {
    10
}

fn default_backoff_base_secs() -> u64 {
    10
}

fn default_batch_delay_ms() -> u64 {
    2000
}

fn default_max_tokens() -> u32 {
    200
}

fn default_temperature() -> f32 {
    0.0
}

fn default_species_list() -> String {
    "mammal_species_confirmed.txt".to_string()
}

fn default_en_prompt() -> String {
    "prompts/en-prompt.txt".to_string()
}

fn default_ja_prompt() -> String {
    "prompts/ja-prompt.txt".to_string()
}

fn default_output() -> String {
    "jp_en_common_name.csv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            enrichment: EnrichmentConfig::default(),
            paths: PathConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file if it exists, otherwise use defaults
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.enrichment.batch_size == 0 {
            return Err(anyhow!("batch_size must be at least 1"));
        }
        if self.enrichment.max_retries == 0 {
            return Err(anyhow!("max_retries must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.enrichment.temperature) {
            return Err(anyhow!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.enrichment.temperature
            ));
        }
        if self.provider.model.is_empty() {
            return Err(anyhow!("model must not be empty"));
        }
        Ok(())
    }
}
