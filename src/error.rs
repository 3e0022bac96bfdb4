use std::fmt;

#[derive(Debug)]
pub enum FinsightError {
    ApiError {
        status: u16,
        message: String,
    },
    ConfigError(String),
    /// A tool-call request the dispatcher could not run; shown to the model as is.
    ToolError(String),
    ProviderError(String),
    NetworkError(reqwest::Error),
    Timeout,
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl fmt::Display for FinsightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinsightError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            FinsightError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            FinsightError::ToolError(msg) => write!(f, "{}", msg),
            FinsightError::ProviderError(msg) => write!(f, "{}", msg),
            FinsightError::NetworkError(e) => write!(f, "Network error: {}", e),
            FinsightError::Timeout => write!(f, "Request timeout"),
            FinsightError::IoError(e) => write!(f, "IO error: {}", e),
            FinsightError::JsonError(e) => write!(f, "JSON error: {}", e),
            FinsightError::YamlError(e) => write!(f, "YAML error: {}", e),
            FinsightError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FinsightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FinsightError::NetworkError(e) => Some(e),
            FinsightError::IoError(e) => Some(e),
            FinsightError::JsonError(e) => Some(e),
            FinsightError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FinsightError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FinsightError::Timeout
        } else {
            FinsightError::NetworkError(err)
        }
    }
}

impl From<std::io::Error> for FinsightError {
    fn from(err: std::io::Error) -> Self {
        FinsightError::IoError(err)
    }
}

impl From<serde_json::Error> for FinsightError {
    fn from(err: serde_json::Error) -> Self {
        FinsightError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for FinsightError {
    fn from(err: serde_yaml::Error) -> Self {
        FinsightError::YamlError(err)
    }
}

impl From<anyhow::Error> for FinsightError {
    fn from(err: anyhow::Error) -> Self {
        FinsightError::Other(format!("{:#}", err))
    }
}

impl From<String> for FinsightError {
    fn from(msg: String) -> Self {
        FinsightError::Other(msg)
    }
}

impl From<&str> for FinsightError {
    fn from(msg: &str) -> Self {
        FinsightError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FinsightError>;
