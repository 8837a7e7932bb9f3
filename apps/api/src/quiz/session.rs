//! The session state machine.
//!
//! `Welcome → CollectingProfile → GeneratingQuestions → InQuiz → Analyzing → Presenting`,
//! with `restart` returning to `Welcome` from anywhere.
//!
//! This type never awaits. Every remote phase is started by a method that
//! hands out a `Ticket` and finished by a method that takes it back; a ticket
//! from before the last restart is rejected as `Stale`, so a late response can
//! never land in a newer session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AnalysisResult, Answer, GeneratedImages, Question, RelationshipStatus, UserContext,
    QUESTION_COUNT,
};
use crate::quiz::deck::{build_deck, DeckSlide};

/// Number of ordered profile steps.
pub const PROFILE_STEPS: u8 = 5;
/// Upper bound of the relationship history slider.
pub const MAX_HISTORY_COUNT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Welcome,
    CollectingProfile,
    GeneratingQuestions,
    InQuiz,
    Analyzing,
    Presenting,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("cannot {action} while the session is {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },

    #[error("expected profile step {expected}, got step {actual}")]
    WrongProfileStep { expected: u8, actual: u8 },

    #[error("{0} is required")]
    MissingProfileField(&'static str),

    #[error("relationship history count {0} is outside 0..=20")]
    HistoryOutOfRange(u32),

    #[error("answer value {0} is outside 1..=5")]
    AnswerOutOfRange(u8),

    #[error("expected an answer for question {expected}, got question {actual}")]
    UnexpectedQuestion { expected: u32, actual: u32 },

    #[error("answers do not line up with the question batch")]
    SequenceMismatch,

    #[error("question batch must hold 42 questions, got {0}")]
    WrongBatchSize(usize),

    #[error("result from epoch {ticket} arrived after a restart (now epoch {current})")]
    Stale { ticket: u64, current: u64 },
}

/// One pre-quiz form step. Steps must be submitted in order.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ProfileStep {
    Basics {
        name: String,
        age: u32,
        gender: String,
    },
    #[serde(rename_all = "camelCase")]
    Status {
        relationship_status: RelationshipStatus,
    },
    #[serde(rename_all = "camelCase")]
    Mirror {
        insecurity: String,
        self_love_trait: String,
    },
    #[serde(rename_all = "camelCase")]
    History {
        #[serde(default)]
        relationship_history_count: u32,
    },
    Intent {
        #[serde(default)]
        intent: String,
    },
}

impl ProfileStep {
    pub fn index(&self) -> u8 {
        match self {
            ProfileStep::Basics { .. } => 0,
            ProfileStep::Status { .. } => 1,
            ProfileStep::Mirror { .. } => 2,
            ProfileStep::History { .. } => 3,
            ProfileStep::Intent { .. } => 4,
        }
    }
}

/// Partially collected profile.
#[derive(Debug, Clone, Default)]
struct ProfileDraft {
    step: u8,
    name: Option<String>,
    age: Option<u32>,
    gender: Option<String>,
    relationship_status: Option<RelationshipStatus>,
    insecurity: Option<String>,
    self_love_trait: Option<String>,
    relationship_history_count: u32,
    intent: String,
}

impl ProfileDraft {
    /// Applies one step. Returns the completed context after the last step.
    fn apply(&mut self, step: ProfileStep) -> Result<Option<UserContext>, SessionError> {
        if step.index() != self.step {
            return Err(SessionError::WrongProfileStep {
                expected: self.step,
                actual: step.index(),
            });
        }

        match step {
            ProfileStep::Basics { name, age, gender } => {
                let name = required(name, "name")?;
                let gender = required(gender, "gender")?;
                if age == 0 {
                    return Err(SessionError::MissingProfileField("age"));
                }
                self.name = Some(name);
                self.age = Some(age);
                self.gender = Some(gender);
            }
            ProfileStep::Status {
                relationship_status,
            } => self.relationship_status = Some(relationship_status),
            ProfileStep::Mirror {
                insecurity,
                self_love_trait,
            } => {
                self.insecurity = Some(required(insecurity, "insecurity")?);
                self.self_love_trait = Some(required(self_love_trait, "selfLoveTrait")?);
            }
            ProfileStep::History {
                relationship_history_count,
            } => {
                if relationship_history_count > MAX_HISTORY_COUNT {
                    return Err(SessionError::HistoryOutOfRange(relationship_history_count));
                }
                self.relationship_history_count = relationship_history_count;
            }
            ProfileStep::Intent { intent } => self.intent = intent.trim().to_string(),
        }

        self.step += 1;
        if self.step < PROFILE_STEPS {
            return Ok(None);
        }

        Ok(Some(UserContext {
            name: self.name.clone().ok_or(SessionError::MissingProfileField("name"))?,
            age: self.age.ok_or(SessionError::MissingProfileField("age"))?,
            gender: self
                .gender
                .clone()
                .ok_or(SessionError::MissingProfileField("gender"))?,
            relationship_status: self
                .relationship_status
                .ok_or(SessionError::MissingProfileField("relationshipStatus"))?,
            relationship_history_count: self.relationship_history_count,
            intent: self.intent.clone(),
            insecurity: self.insecurity.clone(),
            self_love_trait: self.self_love_trait.clone(),
        }))
    }
}

fn required(value: String, field: &'static str) -> Result<String, SessionError> {
    let value = value.trim();
    if value.is_empty() {
        Err(SessionError::MissingProfileField(field))
    } else {
        Ok(value.to_string())
    }
}

/// Proof that a remote phase was started in a given epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
}

/// Everything the analysis phase needs, captured when the last answer lands.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub ticket: Ticket,
    pub answers: Vec<Answer>,
    pub context: UserContext,
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub state: SessionState,
    pub epoch: u64,
    /// Next profile step to submit while collecting the profile.
    pub profile_step: Option<u8>,
    pub current_question: Option<Question>,
    pub answered: usize,
    pub total_questions: usize,
    /// Only present once the session is presenting.
    pub result: Option<AnalysisResult>,
    pub deck: Vec<DeckSlide>,
    pub current_slide: Option<usize>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    state: SessionState,
    epoch: u64,
    draft: ProfileDraft,
    context: Option<UserContext>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    result: Option<AnalysisResult>,
    current_slide: usize,
    updated_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            state: SessionState::Welcome,
            epoch: 0,
            draft: ProfileDraft::default(),
            context: None,
            questions: Vec::new(),
            answers: Vec::new(),
            result: None,
            current_slide: 0,
            updated_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[cfg(test)]
    pub fn context(&self) -> Option<&UserContext> {
        self.context.as_ref()
    }

    #[cfg(test)]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[cfg(test)]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// The finished result; hidden until the session is presenting.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self.state {
            SessionState::Presenting => self.result.as_ref(),
            _ => None,
        }
    }

    pub fn is_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> bool {
        now - self.updated_at > max_idle
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    fn check_ticket(&self, ticket: Ticket) -> Result<(), SessionError> {
        if ticket.epoch == self.epoch {
            Ok(())
        } else {
            Err(SessionError::Stale {
                ticket: ticket.epoch,
                current: self.epoch,
            })
        }
    }

    fn ticket(&self) -> Ticket {
        Ticket { epoch: self.epoch }
    }

    /// `Welcome → CollectingProfile`.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Welcome, "start")?;
        self.state = SessionState::CollectingProfile;
        self.touch();
        Ok(())
    }

    /// Applies one profile step. After the last step the session moves to
    /// `GeneratingQuestions` and returns the ticket and completed context.
    pub fn submit_profile_step(
        &mut self,
        step: ProfileStep,
    ) -> Result<Option<(Ticket, UserContext)>, SessionError> {
        self.expect_state(SessionState::CollectingProfile, "submit a profile step")?;
        let completed = self.draft.apply(step)?;
        self.touch();

        Ok(completed.map(|context| {
            self.context = Some(context.clone());
            self.state = SessionState::GeneratingQuestions;
            (self.ticket(), context)
        }))
    }

    /// `GeneratingQuestions → InQuiz`.
    pub fn apply_questions(
        &mut self,
        ticket: Ticket,
        questions: Vec<Question>,
    ) -> Result<(), SessionError> {
        self.check_ticket(ticket)?;
        self.expect_state(SessionState::GeneratingQuestions, "accept questions")?;
        if questions.len() != QUESTION_COUNT {
            return Err(SessionError::WrongBatchSize(questions.len()));
        }

        self.questions = questions;
        self.answers.clear();
        self.state = SessionState::InQuiz;
        self.touch();
        Ok(())
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::InQuiz => self.questions.get(self.answers.len()),
            _ => None,
        }
    }

    /// Records the answer to the current question. The answer that completes
    /// the batch moves the session to `Analyzing` and returns the job to run.
    pub fn record_answer(
        &mut self,
        question_id: u32,
        value: u8,
    ) -> Result<Option<AnalysisJob>, SessionError> {
        self.expect_state(SessionState::InQuiz, "record an answer")?;
        if !(1..=5).contains(&value) {
            return Err(SessionError::AnswerOutOfRange(value));
        }

        let question = self
            .questions
            .get(self.answers.len())
            .ok_or(SessionError::SequenceMismatch)?;
        if question.id != question_id {
            return Err(SessionError::UnexpectedQuestion {
                expected: question.id,
                actual: question_id,
            });
        }

        self.answers.push(Answer::for_question(question, value));
        self.touch();

        if self.answers.len() < self.questions.len() {
            return Ok(None);
        }

        let aligned = self
            .answers
            .iter()
            .zip(&self.questions)
            .all(|(a, q)| a.question_id == q.id);
        if !aligned {
            return Err(SessionError::SequenceMismatch);
        }

        let context = self.context.clone().ok_or(SessionError::InvalidTransition {
            action: "analyze without a profile",
            state: self.state,
        })?;

        self.state = SessionState::Analyzing;
        Ok(Some(AnalysisJob {
            ticket: self.ticket(),
            answers: self.answers.clone(),
            context,
        }))
    }

    /// First write: the text analysis. The result stays hidden until images settle.
    pub fn attach_analysis(
        &mut self,
        ticket: Ticket,
        analysis: AnalysisResult,
    ) -> Result<(), SessionError> {
        self.check_ticket(ticket)?;
        self.expect_state(SessionState::Analyzing, "attach an analysis")?;
        self.result = Some(analysis);
        self.touch();
        Ok(())
    }

    /// Second write: whichever images arrived. Moves to `Presenting`.
    pub fn attach_images(
        &mut self,
        ticket: Ticket,
        images: GeneratedImages,
    ) -> Result<(), SessionError> {
        self.check_ticket(ticket)?;
        self.expect_state(SessionState::Analyzing, "attach images")?;
        let result = self.result.as_mut().ok_or(SessionError::InvalidTransition {
            action: "attach images before the analysis",
            state: self.state,
        })?;

        result.images = images;
        self.state = SessionState::Presenting;
        self.current_slide = 0;
        self.touch();
        Ok(())
    }

    /// Text analysis failed: nothing partial is ever shown, the session resets.
    pub fn fail_analysis(&mut self, ticket: Ticket) -> Result<(), SessionError> {
        self.check_ticket(ticket)?;
        self.expect_state(SessionState::Analyzing, "fail an analysis")?;
        self.restart();
        Ok(())
    }

    /// Any state → `Welcome`. Discards the profile, questions, answers and
    /// result, and invalidates every outstanding ticket.
    pub fn restart(&mut self) {
        self.state = SessionState::Welcome;
        self.epoch += 1;
        self.draft = ProfileDraft::default();
        self.context = None;
        self.questions.clear();
        self.answers.clear();
        self.result = None;
        self.current_slide = 0;
        self.touch();
    }

    pub fn deck(&self) -> Vec<DeckSlide> {
        self.result().map(build_deck).unwrap_or_default()
    }

    pub fn next_slide(&mut self) -> Result<usize, SessionError> {
        self.expect_state(SessionState::Presenting, "navigate slides")?;
        let last = self.deck().len().saturating_sub(1);
        self.current_slide = (self.current_slide + 1).min(last);
        self.touch();
        Ok(self.current_slide)
    }

    pub fn prev_slide(&mut self) -> Result<usize, SessionError> {
        self.expect_state(SessionState::Presenting, "navigate slides")?;
        self.current_slide = self.current_slide.saturating_sub(1);
        self.touch();
        Ok(self.current_slide)
    }

    pub fn view(&self) -> SessionView {
        let presenting = self.state == SessionState::Presenting;
        SessionView {
            session_id: self.id,
            state: self.state,
            epoch: self.epoch,
            profile_step: (self.state == SessionState::CollectingProfile)
                .then_some(self.draft.step),
            current_question: self.current_question().cloned(),
            answered: self.answers.len(),
            total_questions: self.questions.len(),
            result: self.result().cloned(),
            deck: self.deck(),
            current_slide: presenting.then_some(self.current_slide),
            updated_at: self.updated_at,
        }
    }
}
