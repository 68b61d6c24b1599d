//! Upload classification by filename extension.

use crate::error::{AppError, AppResult};
use std::ffi::OsStr;
use std::path::Path;

/// Audio container extensions accepted as-is.
pub const AUDIO_EXTENSIONS: [&str; 7] = ["mp3", "wav", "m4a", "flac", "ogg", "aac", "wma"];

/// Video container extensions that go through audio extraction first.
pub const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "mkv", "avi", "mov", "webm", "flv", "wmv"];

/// What kind of media an upload claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Ready for transcription without conversion
    Audio,
    /// Needs its audio track extracted before transcription
    Video,
}

/// Classify an upload by its filename extension, lower-cased.
///
/// A filename without an extension, or with an extension outside both sets,
/// is rejected before any file is written or any external process runs.
pub fn classify_upload(filename: &str) -> AppResult<UploadKind> {
    let extension = Path::new(filename)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase);

    let Some(extension) = extension else {
        return Err(AppError::Validation(format!(
            "Unsupported file type: '{}' has no extension. Supported: {}",
            filename,
            supported_extensions()
        )));
    };

    if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        Ok(UploadKind::Audio)
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        Ok(UploadKind::Video)
    } else {
        Err(AppError::Validation(format!(
            "Unsupported file type: .{}. Supported: {}",
            extension,
            supported_extensions()
        )))
    }
}

/// Human-readable list of every accepted extension, for error messages.
fn supported_extensions() -> String {
    AUDIO_EXTENSIONS
        .iter()
        .chain(VIDEO_EXTENSIONS.iter())
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}
