//! Error types module
//!
//! All failures a tool invocation can produce are unified under [`ToolError`].
//! Validation failures (bad input shape, type, size) and transport failures
//! (remote fetch, storage) are separate variants so callers can tell them apart
//! without parsing message text. Nothing here is retried internally.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures of a remote collaborator
    Warn,
    /// Error level - for storage failures
    Error,
}

/// Metadata describing how an error is presented at the protocol edge
pub trait ErrorMetadata {
    /// JSON-RPC error code to return
    fn jsonrpc_code(&self) -> i32;

    /// Machine-readable error code (e.g., "UNSUPPORTED_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether the failure was caused by the caller's input
    fn is_validation(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {0}")]
    SizeLimit(String),

    #[error("Image data is empty")]
    EmptyPayload,

    #[error("Invalid image data: {0}")]
    Format(String),

    #[error("Could not determine content type: {0}")]
    MissingContentType(String),

    #[error("Failed to fetch image: {reason}")]
    Fetch { status: Option<u16>, reason: String },

    #[error("R2 upload failed: {0}")]
    StorageWrite(String),

    #[error("Failed to get file info: {0}")]
    StorageRead(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    MethodNotFound(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

const INVALID_PARAMS: i32 = -32602;
const METHOD_NOT_FOUND: i32 = -32601;
const INTERNAL_ERROR: i32 = -32603;

/// Static metadata for each variant: (jsonrpc_code, error_code, validation, log_level).
fn tool_error_static_metadata(err: &ToolError) -> (i32, &'static str, bool, LogLevel) {
    match err {
        ToolError::UnsupportedType(_) => {
            (INTERNAL_ERROR, "UNSUPPORTED_TYPE", true, LogLevel::Debug)
        }
        ToolError::SizeLimit(_) => (INTERNAL_ERROR, "SIZE_LIMIT", true, LogLevel::Debug),
        ToolError::EmptyPayload => (INTERNAL_ERROR, "EMPTY_PAYLOAD", true, LogLevel::Debug),
        ToolError::Format(_) => (INTERNAL_ERROR, "FORMAT", true, LogLevel::Debug),
        ToolError::MissingContentType(_) => (
            INTERNAL_ERROR,
            "MISSING_CONTENT_TYPE",
            true,
            LogLevel::Debug,
        ),
        ToolError::Fetch { .. } => (INTERNAL_ERROR, "FETCH_ERROR", false, LogLevel::Warn),
        ToolError::StorageWrite(_) => {
            (INTERNAL_ERROR, "STORAGE_WRITE_ERROR", false, LogLevel::Error)
        }
        ToolError::StorageRead(_) => {
            (INTERNAL_ERROR, "STORAGE_READ_ERROR", false, LogLevel::Error)
        }
        ToolError::NotFound(_) => (INTERNAL_ERROR, "NOT_FOUND", true, LogLevel::Debug),
        ToolError::InvalidArguments(_) => {
            (INVALID_PARAMS, "INVALID_ARGUMENTS", true, LogLevel::Debug)
        }
        ToolError::MethodNotFound(_) => {
            (METHOD_NOT_FOUND, "METHOD_NOT_FOUND", true, LogLevel::Debug)
        }
    }
}

impl ErrorMetadata for ToolError {
    fn jsonrpc_code(&self) -> i32 {
        tool_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        tool_error_static_metadata(self).1
    }

    fn is_validation(&self) -> bool {
        tool_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        tool_error_static_metadata(self).3
    }
}

impl ToolError {
    /// Build a fetch error from a non-successful HTTP status.
    pub fn http_status(status: u16, reason: &str) -> Self {
        ToolError::Fetch {
            status: Some(status),
            reason: format!("HTTP {}: {}", status, reason),
        }
    }

    /// Emit this error through `tracing` at its configured level.
    pub fn log(&self, operation: &str) {
        match self.log_level() {
            LogLevel::Debug => {
                tracing::debug!(error = %self, code = self.error_code(), operation, "Tool call rejected")
            }
            LogLevel::Warn => {
                tracing::warn!(error = %self, code = self.error_code(), operation, "Tool call failed")
            }
            LogLevel::Error => {
                tracing::error!(error = %self, code = self.error_code(), operation, "Tool call failed")
            }
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        ToolError::Fetch {
            status: err.status().map(|s| s.as_u16()),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_distinguishable() {
        let err = ToolError::SizeLimit("too big".to_string());
        assert!(err.is_validation());
        assert_eq!(err.error_code(), "SIZE_LIMIT");
        assert_eq!(err.log_level(), LogLevel::Debug);

        let err = ToolError::StorageWrite("connection reset".to_string());
        assert!(!err.is_validation());
        assert_eq!(err.error_code(), "STORAGE_WRITE_ERROR");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_jsonrpc_codes() {
        assert_eq!(
            ToolError::InvalidArguments("x".to_string()).jsonrpc_code(),
            -32602
        );
        assert_eq!(
            ToolError::MethodNotFound("x".to_string()).jsonrpc_code(),
            -32601
        );
        assert_eq!(ToolError::EmptyPayload.jsonrpc_code(), -32603);
    }

    #[test]
    fn test_http_status_message() {
        let err = ToolError::http_status(404, "Not Found");
        assert_eq!(err.to_string(), "Failed to fetch image: HTTP 404: Not Found");
        match err {
            ToolError::Fetch { status, .. } => assert_eq!(status, Some(404)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_storage_messages_carry_prefix() {
        let err = ToolError::StorageWrite("timeout".to_string());
        assert_eq!(err.to_string(), "R2 upload failed: timeout");
        let err = ToolError::StorageRead("denied".to_string());
        assert_eq!(err.to_string(), "Failed to get file info: denied");
    }
}
