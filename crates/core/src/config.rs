use crate::error::ConfigurationError;
use crate::models::ChunkingOptions;
use crate::orchestrator::DEFAULT_TOP_K;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub model_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub connection_string: String,
    pub db_name: String,
    pub collection_name: String,
    pub field_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Service configuration. `model` and `database` are required; `chunking`
/// and `retrieval` fall back to the working defaults (1000/200 and 15).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub chunking: ChunkingOptions,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Loads YAML configuration from `path`, resolving `${NAME}` placeholders
/// against process environment variables.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigurationError> {
    let raw = fs::read_to_string(path)?;
    parse_config(&raw)
}

pub fn parse_config(raw: &str) -> Result<AppConfig, ConfigurationError> {
    let mut document: Value = serde_yaml::from_str(raw)?;
    resolve_placeholders(&mut document);

    let config: AppConfig = serde_yaml::from_value(document)?;
    validate(&config)?;
    Ok(config)
}

/// Walks every string in the document. A value that is exactly `${NAME}` is
/// replaced by the environment variable's value; when the variable is unset
/// the literal placeholder passes through unchanged.
fn resolve_placeholders(value: &mut Value) {
    match value {
        Value::Mapping(mapping) => {
            for (_, entry) in mapping.iter_mut() {
                resolve_placeholders(entry);
            }
        }
        Value::Sequence(sequence) => {
            for entry in sequence {
                resolve_placeholders(entry);
            }
        }
        Value::String(text) => {
            if let Some(name) = text.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
                if let Ok(resolved) = std::env::var(name) {
                    *text = resolved;
                }
            }
        }
        _ => {}
    }
}

fn validate(config: &AppConfig) -> Result<(), ConfigurationError> {
    if config.chunking.max_chars == 0 {
        return Err(ConfigurationError::Invalid(
            "chunking.max_chars must be positive".to_string(),
        ));
    }
    if config.chunking.overlap_chars >= config.chunking.max_chars {
        return Err(ConfigurationError::Invalid(
            "chunking.overlap_chars must be smaller than chunking.max_chars".to_string(),
        ));
    }
    if config.retrieval.top_k == 0 {
        return Err(ConfigurationError::Invalid(
            "retrieval.top_k must be positive".to_string(),
        ));
    }
    if config.database.field_names.is_empty() {
        return Err(ConfigurationError::Invalid(
            "database.field_names must name at least one field".to_string(),
        ));
    }
    Ok(())
}
