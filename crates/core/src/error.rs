//! Unified error types for mcp-unfurl.
//!
//! Everything below the top-level resolver is recovered (fallback or
//! absence); these variants exist so the recovery sites can log what
//! happened and so input validation can reach the caller.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the title resolution service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid request payload (e.g., empty URL string).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// URL failed to parse or uses an unsupported scheme.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP response completed with a non-success status.
    #[error("RESPONSE_NOT_OK: status {status}")]
    ResponseNotOk { status: u16 },

    /// Fetch exceeded the overall operation timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response body exceeded the configured size limit.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Connection-level failure (DNS, TLS, reset).
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32602, msg.clone()),
            Error::ResponseNotOk { status } => (-32000, format!("response status {status}")),
            Error::FetchTimeout(msg) => (-32001, msg.clone()),
            Error::FetchTooLarge(msg) => (-32002, msg.clone()),
            Error::Network(msg) => (-32003, msg.clone()),
            Error::Database(e) => (-32004, e.to_string()),
            Error::MigrationFailed(msg) => (-32004, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ResponseNotOk { status: 404 };
        assert!(err.to_string().contains("RESPONSE_NOT_OK"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_invalid_input_maps_to_invalid_params() {
        let err = Error::InvalidInput("url must not be empty".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_network_error_code() {
        let err = Error::Network("connection reset".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32003);
    }
}
