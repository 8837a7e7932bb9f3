use crate::quiz::QuizOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the session store and the generation backend.
    pub orchestrator: QuizOrchestrator,
}
