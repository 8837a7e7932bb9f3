// Quiz: session lifecycle from welcome screen to the presented results.

pub mod deck;
pub mod handlers;
pub mod orchestrator;
pub mod session;
pub mod store;

pub use orchestrator::QuizOrchestrator;
pub use session::SessionError;
