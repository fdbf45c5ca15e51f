use crate::config::Config;
use crate::history::SessionStore;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
    /// In-memory per-session report history. Append-only; cleared only by an
    /// explicit request or process restart. The report pipeline never
    /// touches this — handlers own all mutation.
    pub sessions: SessionStore,
}
