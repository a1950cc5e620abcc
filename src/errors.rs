/// Error type shared across the crate.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    // === Provider errors ===
    #[error("model provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("model API authentication failed: {provider}")]
    Authentication { provider: String },

    #[error("model API rate limit exceeded: {provider}")]
    RateLimit { provider: String },

    // === Configuration errors ===
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("missing configuration: {field}")]
    MissingConfiguration { field: String },

    // === Tool errors ===
    #[error("tool not found: {tool_name}")]
    ToolNotFound { tool_name: String },

    #[error("invalid tool arguments: {tool_name}: {reason}")]
    ToolInvalidArguments { tool_name: String, reason: String },

    // === Output handling ===
    #[error("serialization error: {format}: {reason}")]
    Serialization { format: String, reason: String },

    #[error("validation error: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("output rejected after {attempts} attempt(s): {reason}")]
    OutputRejected { attempts: u32, reason: String },

    // === Transport / system ===
    #[error("network error: {operation}: {reason}")]
    Network { operation: String, reason: String },

    #[error("internal error: {component}: {reason}")]
    Internal { component: String, reason: String },
}

/// Convenience type alias
pub type AgentResult<T> = std::result::Result<T, AgentError>;

impl From<serde_json::Error> for AgentError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            format: "json".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network {
            operation: "http_request".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<std::io::Error> for AgentError {
    fn from(error: std::io::Error) -> Self {
        Self::Internal {
            component: "io".to_string(),
            reason: error.to_string(),
        }
    }
}
