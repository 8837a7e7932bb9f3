//! Post-parse validation of remote output. Remote shapes are never trusted:
//! anything outside the contract is rejected with a typed reason instead of
//! being coerced.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::warn;

use crate::models::{
    AnalysisResult, Dimension, Question, RelationshipAdvice, RelationshipStatus, QUESTION_COUNT,
};

/// Slides requested from the analysis call.
pub const EXPECTED_SLIDES: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("expected {expected} questions, got {actual}")]
    WrongQuestionCount { expected: usize, actual: usize },

    #[error("question id {0} is outside 1..=42")]
    QuestionIdOutOfRange(u32),

    #[error("question id {0} appears more than once")]
    DuplicateQuestionId(u32),

    #[error("question {0} has empty text")]
    EmptyQuestionText(u32),

    #[error("no question covers dimension {0}")]
    UncoveredDimension(Dimension),

    #[error("score for {0} is missing")]
    MissingScore(Dimension),

    #[error("score for {dimension} is {value}, expected 0..=100")]
    ScoreOutOfRange { dimension: Dimension, value: f64 },

    #[error("two-letter code '{0}' is not two letters")]
    InvalidTwoLetterCode(String),

    #[error("analysis contains no slides")]
    NoSlides,

    #[error("advice is for {actual} but the profile says {expected}")]
    AdviceStatusMismatch {
        expected: RelationshipStatus,
        actual: RelationshipStatus,
    },

    #[error("dominant flag score {0} is outside 0..=100")]
    FlagScoreOutOfRange(f64),

    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),
}

/// Validates a remote question batch and returns it ordered by id.
///
/// Every dimension must appear at least once. Even coverage is requested from
/// the model but only logged when violated.
pub fn validate_questions(mut questions: Vec<Question>) -> Result<Vec<Question>, ValidationError> {
    if questions.len() != QUESTION_COUNT {
        return Err(ValidationError::WrongQuestionCount {
            expected: QUESTION_COUNT,
            actual: questions.len(),
        });
    }

    let mut seen = HashSet::with_capacity(QUESTION_COUNT);
    for question in &questions {
        if question.id == 0 || question.id as usize > QUESTION_COUNT {
            return Err(ValidationError::QuestionIdOutOfRange(question.id));
        }
        if !seen.insert(question.id) {
            return Err(ValidationError::DuplicateQuestionId(question.id));
        }
        if question.text.trim().is_empty() {
            return Err(ValidationError::EmptyQuestionText(question.id));
        }
    }

    let coverage = dimension_coverage(&questions);
    for dimension in Dimension::ALL {
        if !coverage.contains_key(&dimension) {
            return Err(ValidationError::UncoveredDimension(dimension));
        }
    }

    let max = coverage.values().copied().max().unwrap_or(0);
    let min = coverage.values().copied().min().unwrap_or(0);
    if max - min > 1 {
        warn!(
            "Question batch is unevenly spread across dimensions (min {}, max {})",
            min, max
        );
    }

    questions.sort_by_key(|q| q.id);
    Ok(questions)
}

/// Number of questions per dimension.
pub fn dimension_coverage(questions: &[Question]) -> BTreeMap<Dimension, usize> {
    let mut coverage = BTreeMap::new();
    for question in questions {
        *coverage.entry(question.dimension).or_insert(0) += 1;
    }
    coverage
}

/// Validates a parsed analysis against the contract and the session profile.
pub fn validate_analysis(
    analysis: &AnalysisResult,
    status: RelationshipStatus,
) -> Result<(), ValidationError> {
    let code = analysis.two_letter_code.trim();
    if code.chars().count() != 2 || !code.chars().all(char::is_alphabetic) {
        return Err(ValidationError::InvalidTwoLetterCode(
            analysis.two_letter_code.clone(),
        ));
    }

    if analysis.attachment_style_name.trim().is_empty() {
        return Err(ValidationError::EmptyField("attachmentStyleName"));
    }
    if analysis.summary.trim().is_empty() {
        return Err(ValidationError::EmptyField("summary"));
    }

    for dimension in Dimension::ALL {
        let value = *analysis
            .scores
            .get(&dimension)
            .ok_or(ValidationError::MissingScore(dimension))?;
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::ScoreOutOfRange { dimension, value });
        }
    }

    if analysis.slides.is_empty() {
        return Err(ValidationError::NoSlides);
    }
    if analysis.slides.len() != EXPECTED_SLIDES {
        warn!(
            "Analysis returned {} slides (expected {})",
            analysis.slides.len(),
            EXPECTED_SLIDES
        );
    }

    if analysis.advice.status() != status {
        return Err(ValidationError::AdviceStatusMismatch {
            expected: status,
            actual: analysis.advice.status(),
        });
    }

    match &analysis.advice {
        RelationshipAdvice::Single(single) => {
            if single.dating_strategy.trim().is_empty() {
                return Err(ValidationError::EmptyField("datingStrategy"));
            }
            if single.meeting_place.trim().is_empty() {
                return Err(ValidationError::EmptyField("meetingPlace"));
            }
        }
        RelationshipAdvice::Relationship(partnered)
        | RelationshipAdvice::Complicated(partnered)
        | RelationshipAdvice::Married(partnered) => {
            let score = partnered.dominant_flag_score;
            if !score.is_finite() || !(0.0..=100.0).contains(&score) {
                return Err(ValidationError::FlagScoreOutOfRange(score));
            }
        }
    }

    if analysis.tarot.card_name.trim().is_empty() {
        return Err(ValidationError::EmptyField("tarot.cardName"));
    }
    if analysis.song.title.trim().is_empty() {
        return Err(ValidationError::EmptyField("song.title"));
    }
    if analysis.celebrity_match.name.trim().is_empty() {
        return Err(ValidationError::EmptyField("celebrityMatch.name"));
    }

    Ok(())
}
