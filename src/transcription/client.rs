//! AssemblyAI transcription client.
//!
//! Uploads a local audio file, creates a transcript job configured with the
//! model preference order and automatic language detection, then polls until
//! the job reaches a terminal status. No retries: the first transport or
//! service failure aborts the whole operation.

use crate::config::TranscriptionConfig;
use crate::error::{AppError, AppResult};
use crate::transcription::types::{TranscriptJob, TranscriptRequest, TranscriptStatus, UploadResponse};
use anyhow::Context;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the AssemblyAI REST API.
///
/// Constructed once at startup with the credential from configuration and
/// shared across requests; the underlying `reqwest::Client` pools
/// connections. Holding the key here keeps credential state out of process
/// globals.
#[derive(Debug, Clone)]
pub struct Transcriber {
    http: reqwest::Client,
    config: TranscriptionConfig,
}

impl Transcriber {
    /// Build a client from transcription settings.
    ///
    /// The per-request timeout bounds each individual HTTP round trip, not the
    /// overall job: a long recording can legitimately poll for many minutes.
    pub fn new(config: TranscriptionConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, config })
    }

    /// Transcribe a local audio file and return the transcript text verbatim.
    ///
    /// Blocks (asynchronously) until the service reports a terminal status.
    /// Dropping the returned future abandons the job server-side without
    /// further requests.
    pub async fn transcribe_file(&self, audio_path: &Path) -> AppResult<String> {
        let bytes = tokio::fs::read(audio_path).await?;
        debug!(
            path = %audio_path.display(),
            size = bytes.len(),
            "Uploading audio for transcription"
        );

        let upload_url = self.upload(bytes).await?;
        let job = self.create_transcript(&upload_url).await?;
        info!(job_id = %job.id, "Transcript job created");

        self.await_transcript(&job.id).await
    }

    /// `POST /v2/upload` - send the raw audio bytes, get back a private URL.
    async fn upload(&self, bytes: Vec<u8>) -> AppResult<String> {
        let url = format!("{}/v2/upload", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("authorization", &self.config.api_key)
            .body(bytes)
            .send()
            .await?;

        let response = Self::check_api_status(response).await?;
        let parsed: UploadResponse = response.json().await?;
        Ok(parsed.upload_url)
    }

    /// `POST /v2/transcript` - create the job with model preferences and
    /// automatic language detection.
    async fn create_transcript(&self, audio_url: &str) -> AppResult<TranscriptJob> {
        let url = format!("{}/v2/transcript", self.config.base_url);
        let request = TranscriptRequest {
            audio_url: audio_url.to_string(),
            speech_models: self.config.speech_models.clone(),
            language_detection: self.config.language_detection,
        };

        let response = self
            .http
            .post(&url)
            .header("authorization", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let response = Self::check_api_status(response).await?;
        Ok(response.json().await?)
    }

    /// `GET /v2/transcript/{id}` until the job reaches a terminal status.
    async fn await_transcript(&self, job_id: &str) -> AppResult<String> {
        let url = format!("{}/v2/transcript/{}", self.config.base_url, job_id);
        let interval = Duration::from_secs(self.config.poll_interval_secs);

        loop {
            let response = self
                .http
                .get(&url)
                .header("authorization", &self.config.api_key)
                .send()
                .await?;

            let response = Self::check_api_status(response).await?;
            let job: TranscriptJob = response.json().await?;

            match job_outcome(job) {
                Some(outcome) => return outcome,
                None => tokio::time::sleep(interval).await,
            }
        }
    }

    /// Turn a non-2xx API response into a transcription error carrying the
    /// service's own message.
    async fn check_api_status(response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(AppError::Transcription(format!(
            "API error ({status}): {body}"
        )))
    }
}

/// Decide whether a polled job is finished.
///
/// `None` means keep polling. A completed job without a `text` field yields an
/// empty transcript rather than an error.
fn job_outcome(job: TranscriptJob) -> Option<AppResult<String>> {
    match job.status {
        TranscriptStatus::Completed => Some(Ok(job.text.unwrap_or_default())),
        TranscriptStatus::Error => Some(Err(AppError::Transcription(
            job.error
                .unwrap_or_else(|| "service reported an error without details".to_string()),
        ))),
        TranscriptStatus::Queued | TranscriptStatus::Processing => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn test_transcriber() -> Transcriber {
        let mut config = AppConfig::default().transcription;
        config.api_key = "test-key".to_string();
        Transcriber::new(config).unwrap()
    }

    fn job(status: TranscriptStatus, text: Option<&str>, error: Option<&str>) -> TranscriptJob {
        TranscriptJob {
            id: "job-1".to_string(),
            status,
            text: text.map(str::to_string),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_client_construction() {
        // Building the client performs no network I/O
        let _ = test_transcriber();
    }

    #[test]
    fn test_pending_statuses_keep_polling() {
        assert!(job_outcome(job(TranscriptStatus::Queued, None, None)).is_none());
        assert!(job_outcome(job(TranscriptStatus::Processing, None, None)).is_none());
    }

    #[test]
    fn test_completed_job_returns_text_verbatim() {
        let outcome = job_outcome(job(
            TranscriptStatus::Completed,
            Some("  exactly as returned  "),
            None,
        ));
        assert_eq!(outcome.unwrap().unwrap(), "  exactly as returned  ");
    }

    #[test]
    fn test_completed_job_without_text_is_empty_transcript() {
        let outcome = job_outcome(job(TranscriptStatus::Completed, None, None));
        assert_eq!(outcome.unwrap().unwrap(), "");
    }

    #[test]
    fn test_error_job_carries_service_message() {
        let outcome = job_outcome(job(
            TranscriptStatus::Error,
            None,
            Some("audio duration is too short"),
        ));
        let err = outcome.unwrap().unwrap_err();
        assert!(matches!(err, AppError::Transcription(_)));
        assert!(err.to_string().contains("audio duration is too short"));
    }
}
