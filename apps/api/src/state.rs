use std::sync::Arc;

use crate::config::Config;
use crate::extraction::Extractors;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
    /// Extension → parser table. Swappable per format for tests.
    pub extractors: Arc<Extractors>,
}

impl AppState {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let llm = LlmClient::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.model.clone(),
        )?;
        let extractors = Arc::new(Extractors::from_config(&config));
        Ok(Self {
            llm,
            config,
            extractors,
        })
    }
}
