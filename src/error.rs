use std::fmt;

#[derive(Debug)]
pub enum Agent2McpError {
    /// Non-success HTTP status from either endpoint.
    Transport { status: u16, message: String },
    /// The server broke the session/framing contract (missing session
    /// header, no decodable payload in an SSE body, unexpected shape).
    Protocol(String),
    /// A client method was called before its required state existed.
    Precondition(String),
    /// Tool arguments rejected by the tool's declared input schema.
    InvalidArguments(String),
    Network(reqwest::Error),
    Timeout,
    Io(std::io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Other(String),
}

impl fmt::Display for Agent2McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agent2McpError::Transport { status, message } => {
                write!(f, "Transport error (status {}): {}", status, message)
            }
            Agent2McpError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            Agent2McpError::Precondition(msg) => write!(f, "Precondition failed: {}", msg),
            Agent2McpError::InvalidArguments(msg) => {
                write!(f, "Invalid tool arguments: {}", msg)
            }
            Agent2McpError::Network(e) => write!(f, "Network error: {}", e),
            Agent2McpError::Timeout => write!(f, "Request timeout"),
            Agent2McpError::Io(e) => write!(f, "IO error: {}", e),
            Agent2McpError::Json(e) => write!(f, "JSON error: {}", e),
            Agent2McpError::Yaml(e) => write!(f, "YAML error: {}", e),
            Agent2McpError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Agent2McpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Agent2McpError::Network(e) => Some(e),
            Agent2McpError::Io(e) => Some(e),
            Agent2McpError::Json(e) => Some(e),
            Agent2McpError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Agent2McpError {
    fn from(err: reqwest::Error) -> Self {
        Agent2McpError::Network(err)
    }
}

impl From<std::io::Error> for Agent2McpError {
    fn from(err: std::io::Error) -> Self {
        Agent2McpError::Io(err)
    }
}

impl From<serde_json::Error> for Agent2McpError {
    fn from(err: serde_json::Error) -> Self {
        Agent2McpError::Json(err)
    }
}

impl From<serde_yaml::Error> for Agent2McpError {
    fn from(err: serde_yaml::Error) -> Self {
        Agent2McpError::Yaml(err)
    }
}

impl From<anyhow::Error> for Agent2McpError {
    fn from(err: anyhow::Error) -> Self {
        Agent2McpError::Other(err.to_string())
    }
}

impl From<String> for Agent2McpError {
    fn from(msg: String) -> Self {
        Agent2McpError::Other(msg)
    }
}

impl From<&str> for Agent2McpError {
    fn from(msg: &str) -> Self {
        Agent2McpError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Agent2McpError>;
