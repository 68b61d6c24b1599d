//! Audio extraction from video containers using ffmpeg.
//!
//! The video stream is discarded and the audio track is re-encoded to MP3 at a
//! fixed quality level. ffmpeg must be installed on the host; the binary name
//! and quality level come from [`MediaConfig`].

use crate::config::MediaConfig;
use crate::error::{AppError, AppResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Build the ffmpeg argument list for extracting the audio track.
///
/// `-vn` drops the video stream, `-acodec libmp3lame -q:a <n>` selects the MP3
/// encoder at a fixed quality, `-y` overwrites any existing output file.
fn extraction_args(input: &Path, output: &Path, quality: u8) -> Vec<OsString> {
    vec![
        OsString::from("-i"),
        input.as_os_str().to_owned(),
        OsString::from("-vn"),
        OsString::from("-acodec"),
        OsString::from("libmp3lame"),
        OsString::from("-q:a"),
        OsString::from(quality.to_string()),
        OsString::from("-y"),
        output.as_os_str().to_owned(),
    ]
}

/// Extract the audio track from a video file into an MP3 next to it.
///
/// The output path is the input path with its extension replaced by `.mp3`.
/// A non-zero ffmpeg exit becomes a `MediaExtraction` error carrying ffmpeg's
/// stderr; a failure to launch the binary at all is an `Unexpected` error.
pub async fn extract_audio(config: &MediaConfig, video_path: &Path) -> AppResult<PathBuf> {
    let audio_path = video_path.with_extension("mp3");

    debug!(
        input = %video_path.display(),
        output = %audio_path.display(),
        "Extracting audio track"
    );

    let output = Command::new(&config.ffmpeg_path)
        .args(extraction_args(video_path, &audio_path, config.audio_quality))
        .output()
        .await
        .map_err(|e| {
            AppError::Unexpected(format!(
                "failed to run '{}': {} (is ffmpeg installed?)",
                config.ffmpeg_path, e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(AppError::MediaExtraction(stderr));
    }

    Ok(audio_path)
}
