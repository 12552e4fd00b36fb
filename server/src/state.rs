//! Shared application state for handlers.

use crate::alignment::Aligner;
use dearly_booking::BookingEngine;
use dearly_booking::types::Identity;
use std::collections::HashMap;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The booking engine (all domain operations go through it).
    pub engine: BookingEngine,
    /// Static bearer-token table mapping tokens to identities.
    pub tokens: Arc<HashMap<String, Identity>>,
    /// Transcript-alignment collaborator.
    pub aligner: Arc<dyn Aligner>,
}

impl AppState {
    /// Assemble the state.
    #[must_use]
    pub fn new(
        engine: BookingEngine,
        tokens: HashMap<String, Identity>,
        aligner: Arc<dyn Aligner>,
    ) -> Self {
        Self {
            engine,
            tokens: Arc::new(tokens),
            aligner,
        }
    }
}
