//! Error types module
//!
//! All render-pipeline errors are unified under the `AppError` enum. Each
//! variant self-describes its HTTP presentation (status code, machine code)
//! and the level it should be logged at, so the HTTP layer can stay a thin
//! mapping.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like bad request paths
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or traversal-attempting request path. Presented to clients
    /// as a plain 404 with no detail.
    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Invalid crop geometry: {0}")]
    InvalidCropGeometry(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    ///
    /// Traversal/malformed paths are deliberately indistinguishable from a
    /// missing image: both are 404.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidPath(_) | AppError::NotFound(_) => 404,
            AppError::UnsupportedImageFormat(_)
            | AppError::InvalidCropGeometry(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => 500,
        }
    }

    /// Machine-readable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidPath(_) => "INVALID_PATH",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UnsupportedImageFormat(_) => "UNSUPPORTED_IMAGE_FORMAT",
            AppError::InvalidCropGeometry(_) => "INVALID_CROP_GEOMETRY",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message. Path details are never leaked for 404s.
    pub fn client_message(&self) -> &'static str {
        match self {
            AppError::InvalidPath(_) | AppError::NotFound(_) => "Not found",
            AppError::UnsupportedImageFormat(_) => "Image could not be processed",
            AppError::InvalidCropGeometry(_) => "Image could not be processed",
            AppError::Storage(_) | AppError::Internal(_) => "Internal server error",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidPath(_) | AppError::NotFound(_) => LogLevel::Debug,
            AppError::UnsupportedImageFormat(_) | AppError::InvalidCropGeometry(_) => {
                LogLevel::Warn
            }
            AppError::Storage(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidPath("x".into()).http_status_code(), 404);
        assert_eq!(AppError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(
            AppError::UnsupportedImageFormat("x".into()).http_status_code(),
            500
        );
        assert_eq!(
            AppError::InvalidCropGeometry("x".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_no_detail_leaked_for_404() {
        let err = AppError::InvalidPath("../../etc/passwd".into());
        assert_eq!(err.client_message(), "Not found");
        let err = AppError::NotFound("secret/key.png".into());
        assert_eq!(err.client_message(), "Not found");
    }
}
