//! # Transcription Module
//!
//! Speech-to-text transcription via the AssemblyAI HTTP API. All recognition
//! work happens on the service side; this module only moves bytes and polls
//! for the result.
//!
//! ## Key Components:
//! - **Client**: Uploads audio, creates a transcript job, polls to completion
//! - **Wire types**: Request and response payloads for the three API calls
//!
//! ## API flow:
//! 1. `POST /v2/upload` with the raw audio bytes, returns a private URL
//! 2. `POST /v2/transcript` referencing that URL, returns a job id
//! 3. `GET /v2/transcript/{id}` until the job status is terminal
//!
//! The credential is injected when the client is constructed; nothing in this
//! module reads the process environment.

pub mod client;   // HTTP client and polling loop
pub mod types;    // Wire format payloads

pub use client::Transcriber;
pub use types::{TranscriptJob, TranscriptStatus};
