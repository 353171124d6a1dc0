use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
const API_KEY_PLACEHOLDER: &str = "your-api-key-here";

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Which identifiers the model is asked to extract for info requests.
/// The intent parser accepts either shape regardless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Keywords,
    Codes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub catalog_files: Vec<String>,
    pub clients_file: String,
    #[serde(default)]
    pub purchases_seed_file: Option<String>,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub match_mode: MatchMode,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_database_path() -> String {
    "data.db".to_string()
}

/// Reads the config file, applies the `OPENAI_API_KEY` override and
/// rejects a missing or placeholder key.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let env_key = std::env::var(API_KEY_ENV).ok();
    parse_config(&content, env_key)
}

fn parse_config(content: &str, env_key: Option<String>) -> Result<AppConfig, ConfigError> {
    let mut config: AppConfig = serde_json::from_str(content)?;
    if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
        config.llm.api_key = key;
    }
    let key = config.llm.api_key.trim();
    if key.is_empty() || key == API_KEY_PLACEHOLDER {
        return Err(ConfigError::MissingApiKey);
    }
    Ok(config)
}
