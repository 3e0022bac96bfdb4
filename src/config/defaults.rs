pub const DEFAULT_API_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gemma2-9b-it";
pub const DEFAULT_MARKET_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_ENCYCLOPEDIA_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

pub fn default_timeout() -> u64 {
    30
}

pub fn default_max_iterations() -> usize {
    crate::orchestrator::DEFAULT_MAX_ITERATIONS
}

pub fn default_top_k() -> usize {
    1
}

pub fn default_max_chars() -> usize {
    800
}
