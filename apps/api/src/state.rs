use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::pitches::repository::PitchRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable storage. Default: PgPitchRepository.
    pub repo: Arc<dyn PitchRepository>,
    /// Pluggable text generation. Default: LlmClient.
    pub generator: Arc<dyn TextGenerator>,
}
