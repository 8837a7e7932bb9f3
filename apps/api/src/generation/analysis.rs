//! Full text analysis. Unlike question generation there is no safe fallback
//! for a psychological analysis, so every failure is returned to the caller.

use serde_json::json;
use tracing::info;

use crate::generation::prompts::{
    fill_placeholders, ANALYSIS_PROMPT_TEMPLATE, PARTNERED_ADVICE_INSTRUCTION,
    PARTNERED_ADVICE_SCHEMA, SINGLE_ADVICE_INSTRUCTION, SINGLE_ADVICE_SCHEMA,
};
use crate::generation::validation::validate_analysis;
use crate::generation::GenerationError;
use crate::llm_client::cleaning::parse_json_response;
use crate::llm_client::prompts::{CARE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{GenerationBackend, TextRequest, ANALYSIS_MODEL};
use crate::models::{AnalysisResult, Answer, Dimension, UserContext, QUESTION_COUNT};

/// Requests and validates the analysis. The returned result carries no images.
pub async fn request_analysis(
    backend: &dyn GenerationBackend,
    answers: &[Answer],
    context: &UserContext,
) -> Result<AnalysisResult, GenerationError> {
    let prompt = build_analysis_prompt(answers, context)?;

    let raw = backend
        .generate_text(TextRequest {
            model: ANALYSIS_MODEL,
            system: JSON_ONLY_SYSTEM,
            prompt: &prompt,
            schema: None,
        })
        .await?;

    let analysis: AnalysisResult = parse_json_response(&raw)?;
    validate_analysis(&analysis, context.relationship_status)?;

    info!(
        "Analysis complete: {} ({})",
        analysis.attachment_style_name, analysis.two_letter_code
    );

    Ok(analysis)
}

fn build_analysis_prompt(
    answers: &[Answer],
    context: &UserContext,
) -> Result<String, GenerationError> {
    let answers_json = serde_json::to_string(
        &answers
            .iter()
            .map(|a| {
                json!({
                    "dimension": a.dimension,
                    "question": a.question_text,
                    "score": a.value,
                })
            })
            .collect::<Vec<_>>(),
    )?;

    let status = context.relationship_status;
    let (advice_instruction, advice_schema) = if status.is_single() {
        (SINGLE_ADVICE_INSTRUCTION, SINGLE_ADVICE_SCHEMA.to_string())
    } else {
        (
            PARTNERED_ADVICE_INSTRUCTION,
            PARTNERED_ADVICE_SCHEMA.replace("{status}", status.as_str()),
        )
    };

    let count = QUESTION_COUNT.to_string();
    let dimensions = Dimension::prompt_list();
    let profile = context.prompt_block();
    Ok(fill_placeholders(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("count", count.as_str()),
            ("dimensions", dimensions.as_str()),
            ("advice_instruction", advice_instruction),
            ("advice_schema", advice_schema.as_str()),
            ("care_instruction", CARE_INSTRUCTION),
            ("answers_json", answers_json.as_str()),
            ("profile", profile.as_str()),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::{answers_for, profile, ScriptedBackend};
    use crate::generation::validation::ValidationError;
    use crate::llm_client::LlmError;
    use crate::models::analysis::fixtures::analysis_json;
    use crate::models::RelationshipStatus;

    #[tokio::test]
    async fn test_analysis_parses_wrapped_output() {
        let backend = ScriptedBackend::new().with_text(Ok(format!(
            "Here is the analysis:\n```json\n{}\n```",
            analysis_json("Single")
        )));
        let result = request_analysis(&backend, &answers_for(3), &profile())
            .await
            .unwrap();
        assert_eq!(result.two_letter_code, "Ap");
        assert_eq!(result.images.populated(), 0);
    }

    #[tokio::test]
    async fn test_analysis_failure_is_surfaced() {
        let backend = ScriptedBackend::new().with_text(Err(LlmError::EmptyContent));
        let result = request_analysis(&backend, &answers_for(3), &profile()).await;
        assert!(matches!(result, Err(GenerationError::Llm(LlmError::EmptyContent))));
    }

    #[tokio::test]
    async fn test_unparseable_analysis_is_rejected() {
        let backend = ScriptedBackend::new().with_text(Ok("I'd rather not.".to_string()));
        let result = request_analysis(&backend, &answers_for(3), &profile()).await;
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[tokio::test]
    async fn test_advice_for_wrong_status_is_rejected() {
        let backend = ScriptedBackend::new().with_text(Ok(analysis_json("Married")));
        let result = request_analysis(&backend, &answers_for(3), &profile()).await;
        assert!(matches!(
            result,
            Err(GenerationError::Invalid(
                ValidationError::AdviceStatusMismatch { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_prompt_uses_status_conditioned_advice() {
        let mut context = profile();
        context.relationship_status = RelationshipStatus::Complicated;
        let backend = ScriptedBackend::new().with_text(Ok(analysis_json("Complicated")));
        request_analysis(&backend, &answers_for(2), &context)
            .await
            .unwrap();

        let calls = backend.text_calls();
        assert_eq!(calls[0].model, ANALYSIS_MODEL);
        assert!(calls[0].prompt.contains(r#""status": "Complicated""#));
        assert!(calls[0].prompt.contains("dominantFlagScore"));
        assert!(!calls[0].prompt.contains("{profile}"));
        assert!(!calls[0].has_schema);
    }

    #[test]
    fn test_prompt_embeds_answers() {
        let prompt = build_analysis_prompt(&answers_for(2), &profile()).unwrap();
        assert!(prompt.contains(r#""question":"Statement 1""#));
        assert!(prompt.contains(r#""score":3"#));
        assert!(prompt.contains("datingStrategy"));
    }

    #[test]
    fn test_placeholder_text_in_answers_stays_literal() {
        let mut answers = answers_for(1);
        answers[0].question_text = "Do you hide your {profile}?".to_string();
        let prompt = build_analysis_prompt(&answers, &profile()).unwrap();
        assert!(prompt.contains("Do you hide your {profile}?"));
        assert_eq!(prompt.matches("Name: Sam").count(), 1);
    }
}
