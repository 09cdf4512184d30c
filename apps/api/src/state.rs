use std::sync::Arc;

use crate::config::Config;
use crate::gemini::GenerativeModel;

/// Shared application state injected into all route handlers via Axum
/// extractors. The capability client sits behind a trait object so tests can
/// swap in a scripted model.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn GenerativeModel>,
    pub config: Config,
}
