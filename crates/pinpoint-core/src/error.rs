//! Error types for pinpoint.
//!
//! Errors are grouped by where they originate (configuration, the model API,
//! judgment validation) so the CLI can decide which ones are user mistakes
//! and which ones come from the remote service.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pinpoint operations.
#[derive(Error, Debug)]
pub enum PinpointError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Model API errors
    #[error("Model error: {0}")]
    Llm(#[from] LlmError),

    /// Strict judgment validation failed
    #[error("Judgment rejected: {0}")]
    Judgment(#[from] JudgmentError),

    /// General I/O errors (report writing)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No API key in the config or the environment
    #[error("set {var} in your environment.")]
    MissingApiKey { var: String },
}

/// Errors from talking to the generation service.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The image could not be read from disk
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport-level failure (DNS, connect, TLS, body read)
    #[error("Request failed: {message}")]
    Request { message: String },

    /// The service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body was not what the API documents
    #[error("Failed to parse response: {message}")]
    Decode { message: String },

    /// The per-request timeout elapsed
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// A required response header was absent
    #[error("Missing response header: {header}")]
    MissingHeader { header: String },
}

impl LlmError {
    /// HTTP status code, when the failure came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Single-call workflow failures, split by the step that failed.
#[derive(Error, Debug)]
pub enum SingleCallError {
    /// The image could not be uploaded
    #[error("Upload failed: {0}")]
    Upload(#[source] LlmError),

    /// The generation call failed
    #[error("Model call failed: {0}")]
    Generate(#[source] LlmError),
}

/// Strict judgment validation errors.
#[derive(Error, Debug)]
pub enum JudgmentError {
    /// The text is not JSON of the expected shape
    #[error("not valid judgment JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON parsed but breaks a schema rule
    #[error("{0}")]
    Schema(String),
}

/// Convenience type alias for pinpoint results.
pub type Result<T> = std::result::Result<T, PinpointError>;

/// Convenience type alias for model API results.
pub type LlmResult<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_message() {
        let err = ConfigError::MissingApiKey {
            var: "GEMINI_API_KEY".to_string(),
        };
        assert_eq!(err.to_string(), "set GEMINI_API_KEY in your environment.");
    }

    #[test]
    fn test_status_code_only_for_http() {
        let http = LlmError::Http {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(http.status_code(), Some(503));

        let req = LlmError::Request {
            message: "connection refused".to_string(),
        };
        assert_eq!(req.status_code(), None);
    }

    #[test]
    fn test_single_call_error_prefixes() {
        let err = SingleCallError::Upload(LlmError::Http {
            status: 400,
            body: "bad".to_string(),
        });
        assert!(err.to_string().starts_with("Upload failed:"));

        let err = SingleCallError::Generate(LlmError::Timeout { timeout_ms: 10 });
        assert!(err.to_string().starts_with("Model call failed:"));
    }
}
