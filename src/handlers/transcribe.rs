//! # Upload-to-Transcript Handler
//!
//! The single business endpoint of the service. One request moves through a
//! linear pipeline:
//!
//! `received -> validated -> (video: extracted ->) transcribed -> written -> responded`
//!
//! Any failure aborts the remaining stages and maps through [`AppError`] to an
//! HTTP error response. The workspace directory is owned by this handler and
//! is deleted when it goes out of scope, on every path.

use crate::error::{AppError, AppResult};
use crate::media::{self, UploadKind, Workspace};
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use futures_util::StreamExt as _;
use tracing::{info, warn};
use uuid::Uuid;

/// An upload pulled out of the multipart form.
struct Upload {
    filename: Option<String>,
    data: Vec<u8>,
}

/// `POST /transcribe` - accept an audio or video upload, return `transcript.txt`.
pub async fn transcribe(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let request_id = Uuid::new_v4();

    let upload = read_upload(&mut payload).await?;
    let filename = upload
        .filename
        .ok_or_else(|| AppError::Validation("No filename provided.".to_string()))?;

    // Classification happens before any file is written or process spawned,
    // so unsupported uploads cost nothing beyond reading the form.
    let kind = media::classify_upload(&filename)?;

    info!(
        %request_id,
        filename = %filename,
        kind = ?kind,
        size = upload.data.len(),
        "Upload accepted"
    );

    state.begin_transcription();
    let result = run_pipeline(&state, request_id, &filename, kind, &upload.data).await;
    state.end_transcription();

    if let Err(err) = &result {
        warn!(%request_id, error = %err, "Transcription pipeline failed");
    }

    result
}

/// Stage the upload, normalize it to audio, transcribe, and build the response.
async fn run_pipeline(
    state: &web::Data<AppState>,
    request_id: Uuid,
    filename: &str,
    kind: UploadKind,
    data: &[u8],
) -> Result<HttpResponse, AppError> {
    let config = state.get_config();

    let workspace = Workspace::create()?;
    let input_path = workspace.stage_upload(filename, data).await?;

    let audio_path = match kind {
        UploadKind::Video => media::extract_audio(&config.media, &input_path).await?,
        UploadKind::Audio => input_path,
    };

    let text = state.transcriber.transcribe_file(&audio_path).await?;
    workspace.write_transcript(&text).await?;

    info!(%request_id, chars = text.len(), "Transcript ready");

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename("transcript.txt".to_string())],
        })
        .body(text))
    // workspace drops here; the directory and every intermediate file go with it
}

/// Read the `file` field out of the multipart form.
///
/// Fields with other names are drained and ignored. A form without a `file`
/// field is a validation failure, as is any malformed multipart payload.
async fn read_upload(payload: &mut Multipart) -> AppResult<Upload> {
    while let Some(entry) = payload.next().await {
        let mut field = entry
            .map_err(|e| AppError::Validation(format!("Malformed multipart payload: {e}")))?;

        if field.name() != Some("file") {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| {
                    AppError::Validation(format!("Malformed multipart payload: {e}"))
                })?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::Validation(format!("Malformed multipart payload: {e}")))?;
            data.extend_from_slice(&chunk);
        }

        return Ok(Upload { filename, data });
    }

    Err(AppError::Validation(
        "Missing 'file' field in multipart form data.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    const BOUNDARY: &str = "----test-boundary-7MA4YWxkTrZu0gW";

    fn test_state() -> AppState {
        let mut config = AppConfig::default();
        config.transcription.api_key = "test-key".to_string();
        AppState::new(config).unwrap()
    }

    /// Build a multipart/form-data body with a single field.
    fn multipart_body(field_name: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
        let mut disposition = format!("Content-Disposition: form-data; name=\"{field_name}\"");
        if let Some(name) = filename {
            disposition.push_str(&format!("; filename=\"{name}\""));
        }

        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\nContent-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_upload(
        field_name: &str,
        filename: Option<&str>,
        content: &[u8],
    ) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/transcribe", web::post().to(transcribe)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/transcribe")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(field_name, filename, content))
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_unsupported_extension_is_rejected() {
        let (status, body) = post_upload("file", Some("notes.txt"), b"not audio").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("Unsupported file type: .txt"));
    }

    #[actix_web::test]
    async fn test_filename_without_extension_is_rejected() {
        let (status, body) = post_upload("file", Some("recording"), b"bytes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("Unsupported file type"));
    }

    #[actix_web::test]
    async fn test_missing_filename_is_rejected() {
        let (status, body) = post_upload("file", None, b"bytes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No filename provided.");
    }

    #[actix_web::test]
    async fn test_missing_file_field_is_rejected() {
        let (status, body) = post_upload("attachment", Some("voice.mp3"), b"bytes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("Missing 'file' field"));
    }

    #[actix_web::test]
    async fn test_video_upload_runs_extraction_before_transcription() {
        // The payload is not a real video, so ffmpeg (or its absence) fails the
        // extraction stage. Either way the pipeline must stop with a 500 before
        // any transcription request is attempted against the placeholder key.
        let (status, body) = post_upload("file", Some("meeting.mp4"), b"not a real video").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().is_some());
    }
}
