//! # Error Handling
//!
//! This module defines custom error types and how they're converted to HTTP responses.
//! This is a great example of Rust's powerful error handling system.
//!
//! ## Key Rust Concepts for Error Handling:
//!
//! ### Result<T, E> Type
//! - **Purpose**: Forces you to handle both success and failure cases
//! - **No exceptions**: Rust doesn't have try/catch, it uses Result instead
//!
//! ### Enums for Error Types
//! - **Variants**: Each enum variant represents a different kind of failure
//! - **Data**: Each variant holds the human-readable detail string
//!
//! ### Traits for Error Conversion
//! - **From trait**: Automatically converts between error types
//! - **ResponseError trait**: Converts errors to HTTP responses
//! - **Display trait**: Defines how errors are formatted as strings
//!
//! ## Failure categories:
//! Every failure in the upload pipeline falls into one of four buckets, and each
//! bucket maps to exactly one HTTP status. Clients receive a JSON body of the
//! form `{"detail": "..."}` regardless of the bucket.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};  // Web framework error handling
use serde_json::json;                                            // For creating JSON error responses
use std::fmt;                                                    // For implementing Display trait

/// Custom error types for the upload pipeline.
///
/// ## Error Categories:
/// - **Validation**: The client sent something unusable (400 errors)
/// - **MediaExtraction**: ffmpeg failed to strip the audio track (500 errors)
/// - **Transcription**: the transcription service reported failure (500 errors)
/// - **Unexpected**: anything else that broke mid-pipeline (500 errors)
///
/// ## Usage Example:
/// ```rust
/// return Err(AppError::Validation("No filename provided.".to_string()));
/// ```
#[derive(Debug)]
pub enum AppError {
    /// Missing filename or an extension outside the supported sets
    Validation(String),

    /// The external media tool exited non-zero; holds its diagnostic output
    MediaExtraction(String),

    /// The transcription service reported an error status; holds its message
    Transcription(String),

    /// Any other failure during the pipeline (I/O, network transport, decoding)
    Unexpected(String),
}

/// Implementation of the Display trait for AppError.
///
/// ## Purpose:
/// This trait defines how errors are formatted as human-readable strings.
/// It's used when you print an error or convert it to a string.
impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::MediaExtraction(msg) => write!(f, "FFmpeg error: {}", msg),
            AppError::Transcription(msg) => write!(f, "Transcription failed: {}", msg),
            AppError::Unexpected(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

/// Implementation of the ResponseError trait for AppError.
///
/// ## Purpose:
/// This trait converts our custom errors into HTTP responses that clients can understand.
/// It automatically handles the conversion when an error is returned from a handler.
///
/// ## HTTP Status Code Mapping:
/// - Validation → 400 (Bad Request)
/// - MediaExtraction/Transcription/Unexpected → 500 (Internal Server Error)
///
/// ## JSON Response Format:
/// All errors return JSON with a single field:
/// ```json
/// {
///   "detail": "Unsupported file type: .txt. Supported: ..."
/// }
/// ```
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,  // 400
            AppError::MediaExtraction(_)
            | AppError::Transcription(_)
            | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,  // 500
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "detail": self.to_string()
        }))
    }
}

/// Automatic conversion from anyhow::Error to AppError.
///
/// ## Purpose:
/// The anyhow crate provides general-purpose error handling. This conversion
/// allows us to use anyhow errors throughout the codebase and automatically
/// convert them to our custom error type when needed.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Unexpected(err.to_string())
    }
}

/// I/O failures (writing an upload, reading a transcript) are server-side
/// problems, not something the client can fix.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Unexpected(err.to_string())
    }
}

/// Network transport failures against the transcription API.
///
/// ## Why Unexpected and not Transcription:
/// The Transcription variant is reserved for the service *reporting* an error
/// status on a job. A connection reset or timeout never carried a verdict, so
/// it lands in the generic bucket.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Unexpected(err.to_string())
    }
}

/// Type alias for Results that use our custom error type.
///
/// ## Usage Example:
/// ```rust
/// fn normalize() -> AppResult<PathBuf> { ... }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MediaExtraction("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Transcription("nope".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unexpected("???".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_prefixes() {
        // Validation details pass through untouched; the other buckets are prefixed
        // so callers can tell which stage failed from the message alone.
        assert_eq!(
            AppError::Validation("No filename provided.".into()).to_string(),
            "No filename provided."
        );
        assert_eq!(
            AppError::MediaExtraction("stream not found".into()).to_string(),
            "FFmpeg error: stream not found"
        );
        assert_eq!(
            AppError::Transcription("audio too short".into()).to_string(),
            "Transcription failed: audio too short"
        );
        assert!(AppError::Unexpected("x".into())
            .to_string()
            .starts_with("Unexpected error:"));
    }

    #[test]
    fn test_error_response_is_detail_json() {
        let response = AppError::Validation("bad upload".into()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .unwrap();
        assert!(content_type.to_str().unwrap().starts_with("application/json"));
    }
}
