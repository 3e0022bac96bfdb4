mod api;
mod defaults;
mod providers;

use crate::cli::Args;
use crate::error::{FinsightError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::{ApiConfig, ModelConfig, SessionConfig};
pub use defaults::{DEFAULT_API_ENDPOINT, DEFAULT_MODEL};
pub use providers::{EncyclopediaConfig, MarketConfig};

use defaults::{default_max_iterations, default_timeout};

/// Environment variable holding the model provider credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

pub struct Config {
    /// Held in memory only; never read from or written to a config file.
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub model: String,
    pub system_prompt: Option<String>,
    pub request_timeout: u64,
    pub verbose: bool,
    pub max_iterations: usize,
    pub market: MarketConfig,
    pub encyclopedia: EncyclopediaConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub encyclopedia: EncyclopediaConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()
            .map_err(|e| FinsightError::ConfigError(format!("{:#}", e)))?;
        Ok(Self::from_sources(args, file_config, |key| env::var(key).ok()))
    }

    /// Resolve every setting: CLI args > env vars > config file > default.
    pub fn from_sources<F>(args: &Args, file_config: FileConfig, env_var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env_var(API_KEY_ENV).filter(|k| !k.trim().is_empty());

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_var("FINSIGHT_API_ENDPOINT"))
            .or(file_config.api.endpoint)
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env_var("FINSIGHT_MODEL"))
            .or(file_config.model.default_model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = env_var("FINSIGHT_SYSTEM_PROMPT").or(file_config.model.system_prompt);

        let request_timeout = env_var("FINSIGHT_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.timeout)
            .unwrap_or_else(default_timeout);

        let verbose = args.verbose
            || env_var("FINSIGHT_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        let max_iterations = args
            .max_iterations
            .or_else(|| env_var("FINSIGHT_MAX_ITERATIONS").and_then(|s| s.parse::<usize>().ok()))
            .or(file_config.session.max_iterations)
            .unwrap_or_else(default_max_iterations)
            .max(1);

        Config {
            api_key,
            api_endpoint,
            model,
            system_prompt,
            request_timeout,
            verbose,
            max_iterations,
            market: file_config.market,
            encyclopedia: file_config.encyclopedia,
        }
    }

    /// The credential, or a configuration error telling the user how to supply it.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            FinsightError::ConfigError(format!(
                "{} is not set; export it or run from a terminal to be prompted",
                API_KEY_ENV
            ))
        })
    }

    pub fn get_current_date() -> String {
        chrono::Local::now().format("%A, %B %d, %Y").to_string()
    }
}

/// System message for one model request: today's date, then any extra prompt.
pub fn system_message(extra_prompt: Option<&str>) -> String {
    let date_prompt = format!("Today's date is {}.", Config::get_current_date());
    match extra_prompt {
        Some(prompt) => format!("{}\n\n{}", date_prompt, prompt),
        None => date_prompt,
    }
}

/// Accept a full chat-completions URL, a `/v1` base, or a bare host URL.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with("/chat/completions") {
        endpoint.to_string()
    } else if endpoint.ends_with("/v1") {
        format!("{}/chat/completions", endpoint)
    } else if endpoint.ends_with("/v1/") {
        format!("{}chat/completions", endpoint)
    } else {
        format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
    }
}

impl FileConfig {
    pub fn load() -> anyhow::Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    /// Parse one config file; `.yaml`/`.yml` as YAML, anything else as JSON.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".finsight.yaml"),
            PathBuf::from(".finsight.yml"),
            PathBuf::from(".finsight.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("finsight");
            paths.push(config_dir.join("finsight.yaml"));
            paths.push(config_dir.join("finsight.yml"));
            paths.push(config_dir.join("finsight.json"));
        }

        paths
    }
}
