//! Question batch generation. Never fails outward: any remote or validation
//! failure yields the deterministic placeholder batch so the quiz is always
//! presentable.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::generation::prompts::{fill_placeholders, QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};
use crate::generation::validation::validate_questions;
use crate::generation::GenerationError;
use crate::llm_client::cleaning::parse_json_response;
use crate::llm_client::{GenerationBackend, TextRequest, QUESTION_MODEL};
use crate::models::{Dimension, Question, UserContext, QUESTION_COUNT};

/// Placeholder statement used by the fallback batch.
pub const FALLBACK_QUESTION_TEXT: &str = "I often worry that my partner doesn't really love me.";

/// Requests a validated batch of 42 questions, falling back on any failure.
pub async fn request_questions(
    backend: &dyn GenerationBackend,
    context: &UserContext,
) -> Vec<Question> {
    match try_request_questions(backend, context).await {
        Ok(questions) => {
            info!("Generated {} questions", questions.len());
            questions
        }
        Err(e) => {
            warn!("Question generation failed, using fallback batch: {e}");
            fallback_questions()
        }
    }
}

async fn try_request_questions(
    backend: &dyn GenerationBackend,
    context: &UserContext,
) -> Result<Vec<Question>, GenerationError> {
    let prompt = build_questions_prompt(context);
    let raw = backend
        .generate_text(TextRequest {
            model: QUESTION_MODEL,
            system: QUESTIONS_SYSTEM,
            prompt: &prompt,
            schema: Some(questions_schema()),
        })
        .await?;

    let questions: Vec<Question> = parse_json_response(&raw)?;
    Ok(validate_questions(questions)?)
}

/// The deterministic batch: ids 1..=42, one fixed statement, all Anxiety.
pub fn fallback_questions() -> Vec<Question> {
    (1..=QUESTION_COUNT as u32)
        .map(|id| Question {
            id,
            text: FALLBACK_QUESTION_TEXT.to_string(),
            dimension: Dimension::Anxiety,
        })
        .collect()
}

fn build_questions_prompt(context: &UserContext) -> String {
    let count = QUESTION_COUNT.to_string();
    let dimensions = Dimension::prompt_list();
    let profile = context.prompt_block();
    fill_placeholders(
        QUESTIONS_PROMPT_TEMPLATE,
        &[
            ("count", count.as_str()),
            ("dimensions", dimensions.as_str()),
            ("profile", profile.as_str()),
        ],
    )
}

/// Response schema constraining the model to the `Question` shape.
fn questions_schema() -> Value {
    let dimensions: Vec<&str> = Dimension::ALL.iter().map(Dimension::as_str).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "INTEGER" },
                "text": { "type": "STRING" },
                "dimension": { "type": "STRING", "enum": dimensions }
            },
            "required": ["id", "text", "dimension"]
        }
    })
}
