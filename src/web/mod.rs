/*!
 * HTTP surface: axum server, request handlers and the embedded demo page.
 */

use std::sync::Arc;

use crate::app_config::Config;
use crate::providers::{GenerationProvider, TranslationProvider};

pub mod handlers;
pub mod page;
pub mod server;

/// Shared state handed to every request handler.
///
/// Providers are trait objects so tests can serve the same router against
/// mocks. Nothing here is mutable: each request builds its own orchestrator.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Text-generation capability
    pub generation: Arc<dyn GenerationProvider>,
    /// Translation capability
    pub translation: Arc<dyn TranslationProvider>,
}

impl AppState {
    /// Bundle configuration and providers into shared state
    pub fn new(
        config: Config,
        generation: Arc<dyn GenerationProvider>,
        translation: Arc<dyn TranslationProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            generation,
            translation,
        }
    }
}
