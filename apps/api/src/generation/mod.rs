// Generation: turns domain requests into calls against a GenerationBackend and
// normalizes output into the data contract.
// Fallback policy: questions and facts never fail outward, images degrade per slot,
// analysis failures are returned to the caller.

use thiserror::Error;

use crate::generation::validation::ValidationError;
use crate::llm_client::LlmError;

pub mod analysis;
pub mod facts;
pub mod images;
pub mod prompts;
pub mod questions;
pub mod validation;

#[cfg(test)]
pub mod testing;

pub use analysis::request_analysis;
pub use facts::request_loading_facts;
pub use images::generate_all_images;
pub use questions::request_questions;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("output is not valid JSON for the expected shape: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("output failed validation: {0}")]
    Invalid(#[from] ValidationError),
}
