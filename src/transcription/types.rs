//! Wire format payloads for the AssemblyAI REST API.

use serde::{Deserialize, Serialize};

/// Response from `POST /v2/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    /// Private URL the transcript job reads the audio from
    pub upload_url: String,
}

/// Body for `POST /v2/transcript`.
#[derive(Debug, Serialize)]
pub struct TranscriptRequest {
    pub audio_url: String,
    /// Model names in preference order; the service uses the first available
    pub speech_models: Vec<String>,
    pub language_detection: bool,
}

/// Lifecycle status of a transcript job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TranscriptStatus {
    /// Whether the job has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, TranscriptStatus::Completed | TranscriptStatus::Error)
    }
}

/// A transcript job as returned by `POST /v2/transcript` and the polling GET.
///
/// `text` is only present once the job completes; `error` only when it fails.
/// Unknown fields from the service are ignored.
#[derive(Debug, Deserialize)]
pub struct TranscriptJob {
    pub id: String,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_queued_job() {
        let job: TranscriptJob =
            serde_json::from_str(r#"{"id": "abc123", "status": "queued"}"#).unwrap();
        assert_eq!(job.id, "abc123");
        assert_eq!(job.status, TranscriptStatus::Queued);
        assert!(job.text.is_none());
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn test_deserialize_completed_job() {
        let job: TranscriptJob = serde_json::from_str(
            r#"{"id": "abc123", "status": "completed", "text": "hello world", "confidence": 0.97}"#,
        )
        .unwrap();
        assert_eq!(job.status, TranscriptStatus::Completed);
        assert_eq!(job.text.as_deref(), Some("hello world"));
        assert!(job.status.is_terminal());
    }

    #[test]
    fn test_deserialize_failed_job() {
        let job: TranscriptJob = serde_json::from_str(
            r#"{"id": "abc123", "status": "error", "error": "audio duration is too short"}"#,
        )
        .unwrap();
        assert_eq!(job.status, TranscriptStatus::Error);
        assert_eq!(job.error.as_deref(), Some("audio duration is too short"));
    }

    #[test]
    fn test_serialize_transcript_request() {
        let request = TranscriptRequest {
            audio_url: "https://cdn.example/upload/1".to_string(),
            speech_models: vec!["universal-3-pro".to_string(), "universal-2".to_string()],
            language_detection: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["audio_url"], "https://cdn.example/upload/1");
        assert_eq!(value["speech_models"][0], "universal-3-pro");
        assert_eq!(value["language_detection"], true);
    }

    #[test]
    fn test_upload_response_roundtrip() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"upload_url": "https://cdn.example/u/9"}"#).unwrap();
        assert_eq!(parsed.upload_url, "https://cdn.example/u/9");
    }
}
