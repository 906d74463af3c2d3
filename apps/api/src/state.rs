use std::sync::Arc;

use crate::config::Config;
use crate::embedding::Embedder;
use crate::llm_client::ChatModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Chat model built from the pre-set credential, if one was configured.
    /// A per-request `api_key` takes precedence.
    pub chat: Option<Arc<dyn ChatModel>>,
    /// Embedding backend. `None` means the embedding term always scores 0.
    pub embedder: Option<Arc<dyn Embedder>>,
}
