use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreFetchError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    /// Non-success status. Carries the raw response so callers can inspect
    /// status, headers and body themselves.
    #[error("Request failed with status: {}", .0.status())]
    StatusError(Box<reqwest::Response>),

    #[error("Response body is not valid JSON: {0}")]
    DecodeError(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Storage quota exceeded writing '{key}': {size} bytes exceeds limit of {limit}")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl StoreFetchError {
    /// The failed response, when this error came from a non-success status.
    pub fn response(&self) -> Option<&reqwest::Response> {
        match self {
            StoreFetchError::StatusError(response) => Some(response),
            _ => None,
        }
    }

    /// Consumes the error and returns the failed response, if any.
    pub fn into_response(self) -> Option<reqwest::Response> {
        match self {
            StoreFetchError::StatusError(response) => Some(*response),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        self.response().map(|r| r.status())
    }
}

pub type Result<T> = std::result::Result<T, StoreFetchError>;
