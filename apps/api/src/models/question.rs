use std::fmt;

use serde::{Deserialize, Serialize};

/// Every quiz batch holds exactly this many questions.
pub const QUESTION_COUNT: usize = 42;

/// The eight attachment axes every question and score is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Anxiety,
    Avoidance,
    Security,
    Independence,
    #[serde(rename = "Emotional Intimacy")]
    EmotionalIntimacy,
    Trust,
    #[serde(rename = "Self-Reliance")]
    SelfReliance,
    Ambivalence,
}

impl Dimension {
    pub const ALL: [Dimension; 8] = [
        Dimension::Anxiety,
        Dimension::Avoidance,
        Dimension::Security,
        Dimension::Independence,
        Dimension::EmotionalIntimacy,
        Dimension::Trust,
        Dimension::SelfReliance,
        Dimension::Ambivalence,
    ];

    /// Display name, identical to the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Anxiety => "Anxiety",
            Dimension::Avoidance => "Avoidance",
            Dimension::Security => "Security",
            Dimension::Independence => "Independence",
            Dimension::EmotionalIntimacy => "Emotional Intimacy",
            Dimension::Trust => "Trust",
            Dimension::SelfReliance => "Self-Reliance",
            Dimension::Ambivalence => "Ambivalence",
        }
    }

    /// Comma-separated list used inside prompts.
    pub fn prompt_list() -> String {
        Self::ALL
            .iter()
            .map(Dimension::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single Likert-scale statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub dimension: Dimension,
}

/// One recorded response. Question text and dimension are copied from the
/// question so analysis never has to rejoin against the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: u32,
    pub question_text: String,
    pub dimension: Dimension,
    /// 1 (strongly disagree) to 5 (strongly agree)
    pub value: u8,
}

impl Answer {
    pub fn for_question(question: &Question, value: u8) -> Self {
        Self {
            question_id: question.id,
            question_text: question.text.clone(),
            dimension: question.dimension,
            value,
        }
    }
}
