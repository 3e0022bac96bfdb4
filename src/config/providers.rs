use serde::{Deserialize, Serialize};

use super::defaults::{
    default_max_chars, default_top_k, DEFAULT_ENCYCLOPEDIA_ENDPOINT, DEFAULT_MARKET_BASE_URL,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketConfig {
    #[serde(default = "default_market_base_url")]
    pub base_url: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: default_market_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncyclopediaConfig {
    #[serde(default = "default_encyclopedia_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_encyclopedia_endpoint(),
            top_k: default_top_k(),
            max_chars: default_max_chars(),
        }
    }
}

fn default_market_base_url() -> String {
    DEFAULT_MARKET_BASE_URL.to_string()
}

fn default_encyclopedia_endpoint() -> String {
    DEFAULT_ENCYCLOPEDIA_ENDPOINT.to_string()
}
