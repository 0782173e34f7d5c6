use std::fmt;

#[derive(Debug)]
pub enum RequestError {
    // also covers malformed URLs and header names
    Transport(reqwest::Error),
    UnexpectedShape(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Transport(e) => write!(f, "transport error: {e}"),
            RequestError::UnexpectedShape(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Transport(e) => Some(e),
            RequestError::UnexpectedShape(_) => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Transport(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownMethod(String),
    UnknownEncoding(String),
    UnsupportedEncoding { method: String, encoding: String },
    InvalidPageSize(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownMethod(m) => write!(f, "unknown method: {m}"),
            ConfigError::UnknownEncoding(e) => write!(f, "unknown body encoding: {e}"),
            ConfigError::UnsupportedEncoding { method, encoding } => {
                write!(f, "body encoding {encoding} is not available for {method}")
            }
            ConfigError::InvalidPageSize(s) => {
                write!(f, "invalid page size {s}, expected one of 5, 10, 25, 50")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
