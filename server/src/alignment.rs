//! Transcript-alignment collaborator.
//!
//! After a recording and transcript are attached, the audio is aligned to
//! the interview questions by an external service. The call runs in a
//! background task: its outcome lands back in the session via
//! `store_alignment` or `mark_processing_failed`, never in the upload
//! request's response.

use crate::state::AppState;
use async_trait::async_trait;
use dearly_booking::types::{Identity, SessionId};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Alignment request sent to the service.
#[derive(Debug, Serialize)]
pub struct AlignmentRequest {
    /// Storage path of the uploaded audio.
    pub audio_path: String,
    /// Storage path of the uploaded transcript.
    pub transcript_path: String,
}

/// Alignment result returned by the service.
#[derive(Debug, Deserialize)]
pub struct AlignmentResponse {
    /// Word/segment timing data as raw JSON.
    pub alignment: serde_json::Value,
}

/// The alignment collaborator seam. Production uses [`HttpAligner`];
/// tests substitute a canned implementation.
#[async_trait]
pub trait Aligner: Send + Sync {
    /// Align a transcript to its audio.
    ///
    /// # Errors
    ///
    /// Returns an error string describing the failure; callers record it
    /// on the session rather than propagating it to any HTTP response.
    async fn align(&self, request: AlignmentRequest) -> Result<String, String>;
}

/// HTTP client for the alignment service.
#[derive(Clone)]
pub struct HttpAligner {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpAligner {
    /// Create a client against the configured service.
    #[must_use]
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl Aligner for HttpAligner {
    async fn align(&self, request: AlignmentRequest) -> Result<String, String> {
        let response = self
            .client
            .post(format!("{}/align", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("alignment request failed: {e}"))?;

        match response.status() {
            StatusCode::OK => {
                let parsed = response
                    .json::<AlignmentResponse>()
                    .await
                    .map_err(|e| format!("alignment response parse failed: {e}"))?;
                Ok(parsed.alignment.to_string())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(format!("alignment service returned {status}: {body}"))
            }
        }
    }
}

/// Run alignment for a freshly attached recording and record the outcome.
///
/// Spawned after `attach_recording` succeeds; the upload response never
/// waits on it.
pub fn spawn_alignment(
    state: AppState,
    actor: Identity,
    session_id: SessionId,
    audio_path: String,
    transcript_path: String,
) {
    tokio::spawn(async move {
        let request = AlignmentRequest {
            audio_path,
            transcript_path,
        };
        match state.aligner.align(request).await {
            Ok(alignment_json) => {
                if let Err(err) = state
                    .engine
                    .store_alignment(actor, session_id, alignment_json)
                    .await
                {
                    warn!(session_id = %session_id, error = %err, "failed to store alignment");
                } else {
                    info!(session_id = %session_id, "alignment complete");
                }
            }
            Err(reason) => {
                if let Err(err) = state
                    .engine
                    .mark_processing_failed(actor, session_id, &reason)
                    .await
                {
                    warn!(session_id = %session_id, error = %err, "failed to record processing failure");
                }
            }
        }
    });
}

impl std::fmt::Debug for HttpAligner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAligner")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
