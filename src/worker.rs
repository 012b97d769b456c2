//! Message-passing analysis worker.
//!
//! A request carries raw file bytes plus partial parameters; the worker
//! parses, resolves parameters against its fixed defaults, runs the
//! analysis and posts back exactly one response. Requests are handled one
//! at a time in arrival order, so responses come back in submission order.
//! There is no cancellation: a newer request waits behind the current one,
//! and callers are expected to debounce rapid parameter edits.

use serde::{Deserialize, Serialize};
use crate::analysis::{analyze_track_bytes, AnalysisResult};
use crate::params::{AnalyseParams, PartialAnalyseParams};

#[cfg(feature = "worker")]
use log::{debug, warn};
#[cfg(feature = "worker")]
use tokio::sync::mpsc;
#[cfg(feature = "worker")]
use tokio::task::JoinHandle;
#[cfg(feature = "worker")]
use crate::error::{Result, TrackError};

/// One analysis request: raw track file bytes plus parameter overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    pub file_buffer: Vec<u8>,
    #[serde(default)]
    pub params: PartialAnalyseParams,
}

impl WorkerRequest {
    pub fn new(file_buffer: Vec<u8>, params: PartialAnalyseParams) -> Self {
        Self { file_buffer, params }
    }
}

/// Outcome of one request.
///
/// Serializes as `{"ok": true, "result": ...}` or `{"ok": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkerResponse {
    pub fn success(result: AnalysisResult) -> Self {
        Self { ok: true, result: Some(result), error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { ok: false, result: None, error: Some(error.into()) }
    }

    /// Convert into a plain `Result`, with the error message on failure.
    pub fn into_result(self) -> std::result::Result<AnalysisResult, String> {
        match (self.ok, self.result, self.error) {
            (true, Some(result), _) => Ok(result),
            (_, _, Some(error)) => Err(error),
            _ => Err("malformed worker response".to_string()),
        }
    }
}

/// Handle a single request synchronously.
///
/// All ingestion errors are caught here and rendered into the response's
/// error string; a result is either complete or absent.
pub fn process_request(request: &WorkerRequest, defaults: &AnalyseParams) -> WorkerResponse {
    let params = request.params.resolve(defaults);
    match analyze_track_bytes(&request.file_buffer, &params) {
        Ok(result) => WorkerResponse::success(result),
        Err(e) => WorkerResponse::failure(e.to_string()),
    }
}

// ============================================================================
// Worker task
// ============================================================================

/// A single background worker processing requests strictly in order.
///
/// Must be spawned from within a tokio runtime. Analysis is CPU-bound and
/// runs on the blocking pool, one request at a time.
#[cfg(feature = "worker")]
pub struct TrackWorker {
    requests: mpsc::UnboundedSender<WorkerRequest>,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
    task: JoinHandle<()>,
}

#[cfg(feature = "worker")]
impl TrackWorker {
    /// Start a worker whose missing-parameter defaults are fixed to `defaults`.
    pub fn spawn(defaults: AnalyseParams) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut handled: u64 = 0;
            while let Some(request) = request_rx.recv().await {
                handled += 1;
                debug!(
                    "[TrackWorker] Request #{} ({} bytes)",
                    handled,
                    request.file_buffer.len()
                );

                let response = tokio::task::spawn_blocking(move || process_request(&request, &defaults))
                    .await
                    .unwrap_or_else(|e| {
                        warn!("[TrackWorker] Analysis task failed: {}", e);
                        WorkerResponse::failure(format!("analysis task failed: {e}"))
                    });

                if response_tx.send(response).is_err() {
                    debug!("[TrackWorker] Receiver dropped, stopping");
                    break;
                }
            }
        });

        Self { requests: request_tx, responses: response_rx, task }
    }

    /// Queue a request behind any in flight.
    pub fn post(&self, request: WorkerRequest) -> Result<()> {
        self.requests.send(request).map_err(|_| TrackError::WorkerStopped)
    }

    /// Next response, in submission order. `None` once the worker has stopped
    /// and every response has been delivered.
    pub async fn recv(&mut self) -> Option<WorkerResponse> {
        self.responses.recv().await
    }

    /// Stop accepting requests, finish queued ones and return their responses.
    pub async fn shutdown(self) -> Vec<WorkerResponse> {
        let Self { requests, mut responses, task } = self;
        drop(requests);

        let mut remaining = Vec::new();
        while let Some(response) = responses.recv().await {
            remaining.push(response);
        }
        if let Err(e) = task.await {
            warn!("[TrackWorker] Worker task ended abnormally: {}", e);
        }
        remaining
    }
}
