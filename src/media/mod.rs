//! # Media Handling Module
//!
//! Turns an arbitrary upload into a file the transcription service can consume.
//!
//! ## Key Components:
//! - **Format classification**: Decide from the filename extension whether an
//!   upload is audio, video, or unsupported
//! - **Workspace**: A per-request temporary directory holding every file the
//!   request produces, removed when the request finishes
//! - **Extractor**: ffmpeg invocation that strips the audio track out of a
//!   video container
//!
//! ## Content-type policy:
//! The extension is trusted as the proxy for content type. Bytes are never
//! sniffed and uploads are not size-limited.

pub mod extractor;   // ffmpeg audio extraction
pub mod formats;     // Extension classification
pub mod workspace;   // Request-scoped temporary directories

pub use extractor::extract_audio;
pub use formats::{classify_upload, UploadKind};
pub use workspace::Workspace;
