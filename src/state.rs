//! # Application State Management
//!
//! This module manages shared state that needs to be accessed by multiple HTTP request handlers
//! simultaneously.
//!
//! ## Key Rust Concepts (IMPORTANT for beginners):
//!
//! ### Arc (Atomically Reference Counted)
//! - **Purpose**: Allows multiple parts of the program to safely share ownership of data
//! - **Why needed**: Multiple HTTP requests run simultaneously and all need access to the same state
//!
//! ### RwLock (Reader-Writer Lock)
//! - **Purpose**: Allows multiple readers OR one writer at a time (but not both)
//! - **Why needed**: Every request reads config, while only metrics updates take the write lock
//!
//! ### Arc<RwLock<T>> Pattern
//! - **Arc**: Multiple ownership (many HTTP handlers can hold a reference)
//! - **RwLock**: Thread-safe read/write access
//! - **T**: The actual data type being protected
//!
//! The transcription client is constructed exactly once, here, from the loaded
//! configuration. Handlers reach it through this state rather than through any
//! process-global, so the credential has a single owner.

use crate::config::AppConfig;              // Our configuration types
use crate::transcription::Transcriber;     // The AssemblyAI client
use anyhow::Result;
use std::collections::HashMap;             // For storing per-endpoint metrics
use std::sync::{Arc, RwLock};              // Thread-safe shared ownership and locking
use std::time::Instant;                    // For tracking server uptime

/// The main application state that's shared across all HTTP request handlers.
///
/// ## Thread Safety Pattern:
/// Mutable data lives behind Arc<RwLock<T>>:
/// - Multiple HTTP requests can read the same data simultaneously
/// - Only one request can modify data at a time
/// - No data races or memory corruption possible
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration loaded at startup
    pub config: Arc<RwLock<AppConfig>>,

    /// Performance metrics (constantly being updated by requests)
    pub metrics: Arc<RwLock<ServiceMetrics>>,

    /// Shared transcription client, built once from the startup configuration
    pub transcriber: Arc<Transcriber>,

    /// When the server started (never changes, so no Arc<RwLock> needed)
    pub start_time: Instant,
}

/// Performance metrics collected across all HTTP requests.
///
/// ## Why these metrics matter:
/// - **request_count**: Total requests processed (for load monitoring)
/// - **error_count**: Total errors (for reliability monitoring)
/// - **active_transcriptions**: Uploads currently in flight (for capacity planning)
/// - **endpoint_metrics**: Per-endpoint statistics (for performance optimization)
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    /// Total number of HTTP requests processed since server start
    pub request_count: u64,

    /// Total number of errors encountered since server start
    pub error_count: u64,

    /// Number of uploads currently somewhere in the transcription pipeline
    pub active_transcriptions: u32,

    /// Detailed metrics for each API endpoint (URL path)
    /// Key: endpoint name (e.g., "POST /transcribe")
    pub endpoint_metrics: HashMap<String, EndpointMetric>,
}

/// Detailed performance metrics for a specific API endpoint.
#[derive(Debug, Default, Clone)]
pub struct EndpointMetric {
    /// Number of requests to this specific endpoint
    pub request_count: u64,

    /// Total time spent processing all requests to this endpoint (milliseconds)
    pub total_duration_ms: u64,

    /// Number of errors that occurred for this endpoint
    pub error_count: u64,
}

impl AppState {
    /// Create the shared state from a loaded configuration.
    ///
    /// ## What this does:
    /// 1. Builds the transcription client with the configured credential
    /// 2. Wraps the config in Arc<RwLock<>> for thread-safe sharing
    /// 3. Creates empty metrics and records the start time
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(config: AppConfig) -> Result<Self> {
        let transcriber = Transcriber::new(config.transcription.clone())?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            metrics: Arc::new(RwLock::new(ServiceMetrics::default())),
            transcriber: Arc::new(transcriber),
            start_time: Instant::now(),
        })
    }

    /// Get a copy of the current configuration.
    ///
    /// ## Why clone:
    /// Cloning releases the read lock immediately, so other threads aren't
    /// blocked while the caller works with the snapshot.
    pub fn get_config(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    /// Increment the total request counter (called by middleware for every request).
    pub fn increment_request_count(&self) {
        let mut metrics = self.metrics.write().unwrap();
        metrics.request_count += 1;
    }

    /// Increment the total error counter (called when any request fails).
    pub fn increment_error_count(&self) {
        let mut metrics = self.metrics.write().unwrap();
        metrics.error_count += 1;
    }

    /// Record detailed metrics for a specific endpoint.
    ///
    /// The first time an endpoint is seen, a zeroed entry is created;
    /// subsequent requests accumulate into it.
    pub fn record_endpoint_request(&self, endpoint: &str, duration_ms: u64, is_error: bool) {
        let mut metrics = self.metrics.write().unwrap();

        let endpoint_metric = metrics.endpoint_metrics.entry(endpoint.to_string()).or_default();
        endpoint_metric.request_count += 1;
        endpoint_metric.total_duration_ms += duration_ms;

        if is_error {
            endpoint_metric.error_count += 1;
        }
    }

    /// Mark an upload as entering the transcription pipeline.
    pub fn begin_transcription(&self) {
        let mut metrics = self.metrics.write().unwrap();
        metrics.active_transcriptions += 1;
    }

    /// Mark an upload as having left the pipeline (however it ended).
    ///
    /// ## Safety check:
    /// Guarded against underflow so a stray call can never panic the counter.
    pub fn end_transcription(&self) {
        let mut metrics = self.metrics.write().unwrap();
        if metrics.active_transcriptions > 0 {
            metrics.active_transcriptions -= 1;
        }
    }

    /// Get a snapshot of current metrics (used for the /metrics endpoint).
    ///
    /// ## Why a snapshot:
    /// Cloning under the read lock gives consistent data without holding the
    /// lock while the HTTP response is serialized.
    pub fn get_metrics_snapshot(&self) -> ServiceMetrics {
        let metrics = self.metrics.read().unwrap();
        ServiceMetrics {
            request_count: metrics.request_count,
            error_count: metrics.error_count,
            active_transcriptions: metrics.active_transcriptions,
            endpoint_metrics: metrics.endpoint_metrics.clone(),
        }
    }

    /// Get server uptime in seconds.
    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl EndpointMetric {
    /// Average response time for this endpoint in milliseconds.
    pub fn average_duration_ms(&self) -> f64 {
        if self.request_count > 0 {
            self.total_duration_ms as f64 / self.request_count as f64
        } else {
            0.0  // No requests yet, so no average to calculate
        }
    }

    /// Error rate for this endpoint as a fraction (0.0 to 1.0).
    pub fn error_rate(&self) -> f64 {
        if self.request_count > 0 {
            self.error_count as f64 / self.request_count as f64
        } else {
            0.0  // No requests yet, so no errors possible
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        let mut config = AppConfig::default();
        config.transcription.api_key = "test-key".to_string();
        AppState::new(config).unwrap()
    }

    #[test]
    fn test_request_counters() {
        let state = test_state();
        state.increment_request_count();
        state.increment_request_count();
        state.increment_error_count();

        let snapshot = state.get_metrics_snapshot();
        assert_eq!(snapshot.request_count, 2);
        assert_eq!(snapshot.error_count, 1);
    }

    #[test]
    fn test_active_transcription_counter_never_underflows() {
        let state = test_state();
        state.end_transcription();
        assert_eq!(state.get_metrics_snapshot().active_transcriptions, 0);

        state.begin_transcription();
        state.begin_transcription();
        state.end_transcription();
        assert_eq!(state.get_metrics_snapshot().active_transcriptions, 1);
    }

    #[test]
    fn test_endpoint_metrics_accumulate() {
        let state = test_state();
        state.record_endpoint_request("POST /transcribe", 100, false);
        state.record_endpoint_request("POST /transcribe", 300, true);

        let snapshot = state.get_metrics_snapshot();
        let metric = &snapshot.endpoint_metrics["POST /transcribe"];
        assert_eq!(metric.request_count, 2);
        assert_eq!(metric.error_count, 1);
        assert_eq!(metric.average_duration_ms(), 200.0);
        assert_eq!(metric.error_rate(), 0.5);
    }
}
