//! Scripted `GenerationBackend` for tests: canned text responses in order,
//! per-prompt image outcomes, and optional gates to hold text or image responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::llm_client::{GenerationBackend, InlineImage, LlmError, TextRequest};
use crate::models::{Answer, Dimension, Question, RelationshipStatus, UserContext};

#[derive(Debug, Clone)]
pub struct RecordedTextCall {
    pub model: String,
    pub prompt: String,
    pub has_schema: bool,
}

#[derive(Debug, Clone)]
pub enum ImageOutcome {
    Image,
    Absent,
    Fail,
}

#[derive(Default)]
pub struct ScriptedBackend {
    texts: Mutex<VecDeque<Result<String, LlmError>>>,
    /// (prompt substring, outcome); first match wins, unmatched prompts are absent.
    images: Mutex<Vec<(String, ImageOutcome)>>,
    text_calls: Mutex<Vec<RecordedTextCall>>,
    image_calls: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
    image_gate: Option<Arc<Notify>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, response: Result<String, LlmError>) -> Self {
        self.texts.lock().unwrap().push_back(response);
        self
    }

    pub fn with_image(self, prompt_fragment: &str, outcome: ImageOutcome) -> Self {
        self.images
            .lock()
            .unwrap()
            .push((prompt_fragment.to_string(), outcome));
        self
    }

    /// Every text response waits for one `notify_one` on the gate.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Every image request waits on the gate after it is recorded.
    pub fn with_image_gate(mut self, gate: Arc<Notify>) -> Self {
        self.image_gate = Some(gate);
        self
    }

    pub fn text_calls(&self) -> Vec<RecordedTextCall> {
        self.text_calls.lock().unwrap().clone()
    }

    pub fn image_calls(&self) -> Vec<String> {
        self.image_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate_text(&self, request: TextRequest<'_>) -> Result<String, LlmError> {
        self.text_calls.lock().unwrap().push(RecordedTextCall {
            model: request.model.to_string(),
            prompt: request.prompt.to_string(),
            has_schema: request.schema.is_some(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.texts.lock().unwrap().pop_front();
        next.unwrap_or(Err(LlmError::EmptyContent))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<InlineImage>, LlmError> {
        self.image_calls.lock().unwrap().push(prompt.to_string());

        if let Some(gate) = &self.image_gate {
            gate.notified().await;
        }

        let outcome = self
            .images
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or(ImageOutcome::Absent);

        match outcome {
            ImageOutcome::Image => Ok(Some(InlineImage {
                mime_type: "image/png".to_string(),
                data: "aW1hZ2U=".to_string(),
            })),
            ImageOutcome::Absent => Ok(None),
            ImageOutcome::Fail => Err(LlmError::Api {
                status: 500,
                message: "image model unavailable".to_string(),
            }),
        }
    }
}

pub fn profile() -> UserContext {
    UserContext {
        name: "Sam".to_string(),
        age: 31,
        gender: "Non-binary".to_string(),
        relationship_status: RelationshipStatus::Single,
        relationship_history_count: 2,
        intent: "To understand my patterns".to_string(),
        insecurity: Some("Not being enough".to_string()),
        self_love_trait: Some("My humor".to_string()),
    }
}

/// 42 questions cycling through all eight dimensions.
pub fn balanced_questions() -> Vec<Question> {
    (1..=42u32)
        .map(|id| Question {
            id,
            text: format!("Statement {id}"),
            dimension: Dimension::ALL[(id as usize - 1) % 8],
        })
        .collect()
}

pub fn balanced_questions_json() -> String {
    serde_json::to_string(&balanced_questions()).unwrap()
}

pub fn answers_for(count: usize) -> Vec<Answer> {
    balanced_questions()
        .iter()
        .take(count)
        .map(|q| Answer::for_question(q, 3))
        .collect()
}
