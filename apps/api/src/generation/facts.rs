use serde_json::json;
use tracing::warn;

use crate::generation::prompts::FACTS_PROMPT;
use crate::generation::GenerationError;
use crate::llm_client::cleaning::parse_json_response;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{GenerationBackend, TextRequest, QUESTION_MODEL};

/// Shown while the loading screens wait, whenever the remote list is unavailable.
pub const BUILTIN_FACTS: &[&str] = &[
    "Attachment theory began with John Bowlby's work on children separated from their parents.",
    "Mary Ainsworth's 'Strange Situation' study first described secure and insecure attachment.",
    "Roughly half of adults describe themselves as securely attached.",
    "Attachment styles can shift over time through safe, consistent relationships.",
    "Anxious and avoidant partners often find each other, then trigger each other.",
    "Earned security is a real thing: reflection and therapy can rewire old patterns.",
];

/// Best-effort flavor text. Never fails outward.
pub async fn request_loading_facts(backend: &dyn GenerationBackend) -> Vec<String> {
    match try_request_loading_facts(backend).await {
        Ok(facts) if !facts.is_empty() => facts,
        Ok(_) => {
            warn!("Loading facts came back empty, using built-in list");
            builtin_facts()
        }
        Err(e) => {
            warn!("Loading facts failed, using built-in list: {e}");
            builtin_facts()
        }
    }
}

async fn try_request_loading_facts(
    backend: &dyn GenerationBackend,
) -> Result<Vec<String>, GenerationError> {
    let raw = backend
        .generate_text(TextRequest {
            model: QUESTION_MODEL,
            system: JSON_ONLY_SYSTEM,
            prompt: FACTS_PROMPT,
            schema: Some(json!({ "type": "ARRAY", "items": { "type": "STRING" } })),
        })
        .await?;

    let facts: Vec<String> = parse_json_response(&raw)?;
    Ok(facts
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect())
}

pub fn builtin_facts() -> Vec<String> {
    BUILTIN_FACTS.iter().map(|f| f.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::ScriptedBackend;
    use crate::llm_client::LlmError;

    #[tokio::test]
    async fn test_remote_facts_are_trimmed() {
        let backend = ScriptedBackend::new()
            .with_text(Ok(r#"```json ["  Fact one. ", "", "Fact two."] ```"#.to_string()));
        let facts = request_loading_facts(&backend).await;
        assert_eq!(facts, vec!["Fact one.".to_string(), "Fact two.".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_uses_builtin_list() {
        let backend = ScriptedBackend::new().with_text(Err(LlmError::EmptyContent));
        assert_eq!(request_loading_facts(&backend).await, builtin_facts());
    }

    #[tokio::test]
    async fn test_wrong_shape_uses_builtin_list() {
        let backend = ScriptedBackend::new().with_text(Ok(r#"{"facts": 3}"#.to_string()));
        assert_eq!(request_loading_facts(&backend).await, builtin_facts());
    }

    #[tokio::test]
    async fn test_empty_list_uses_builtin_list() {
        let backend = ScriptedBackend::new().with_text(Ok("[]".to_string()));
        assert_eq!(request_loading_facts(&backend).await, builtin_facts());
    }
}
