//! Drives sessions through the remote phases.
//!
//! Each remote phase runs in its own spawned task that owns the session handle
//! and the ticket it was started with. The request handler only awaits that
//! task, so a client that disconnects mid-phase does not strand the session:
//! the task still applies its result and the client can pick it up with
//! `GET /sessions/:id`. A session lock is never held across a remote call, and
//! a restart in between turns the late result into a logged no-op.

use std::sync::Arc;

use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::{
    generate_all_images, request_analysis, request_loading_facts, request_questions,
};
use crate::llm_client::GenerationBackend;
use crate::models::{GeneratedImages, UserContext};
use crate::quiz::session::{AnalysisJob, ProfileStep, SessionError, SessionView, Ticket};
use crate::quiz::store::{SessionStore, SharedSession};
use crate::report::{generate_html_report, report_file_name};

#[derive(Clone)]
pub struct QuizOrchestrator {
    store: SessionStore,
    backend: Arc<dyn GenerationBackend>,
}

/// A rendered report ready for download.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    pub html: String,
}

impl QuizOrchestrator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            store: SessionStore::new(),
            backend,
        }
    }

    async fn session(&self, id: Uuid) -> Result<SharedSession, AppError> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn create_session(&self) -> SessionView {
        let session = self.store.create().await;
        let view = session.lock().await.view();
        info!(session_id = %view.session_id, "Session created");
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        let session = self.session(id).await?;
        let view = session.lock().await.view();
        Ok(view)
    }

    pub async fn start(&self, id: Uuid) -> Result<SessionView, AppError> {
        let session = self.session(id).await?;
        let mut guard = session.lock().await;
        guard.start()?;
        Ok(guard.view())
    }

    /// Applies one profile step; the last one runs question generation.
    pub async fn submit_profile(
        &self,
        id: Uuid,
        step: ProfileStep,
    ) -> Result<SessionView, AppError> {
        let session = self.session(id).await?;
        let completed = {
            let mut guard = session.lock().await;
            guard.submit_profile_step(step)?
        };

        if let Some((ticket, context)) = completed {
            info!(session_id = %id, "Profile complete, generating questions");
            let phase = tokio::spawn(question_phase(
                Arc::clone(&self.backend),
                Arc::clone(&session),
                id,
                ticket,
                context,
            ));
            join_phase(phase).await?;
        }

        let view = session.lock().await.view();
        Ok(view)
    }

    /// Records one answer; the last one runs analysis and then images.
    pub async fn answer(
        &self,
        id: Uuid,
        question_id: u32,
        value: u8,
    ) -> Result<SessionView, AppError> {
        let session = self.session(id).await?;
        let job = {
            let mut guard = session.lock().await;
            guard.record_answer(question_id, value)?
        };

        if let Some(job) = job {
            info!(session_id = %id, answers = job.answers.len(), "Quiz complete, analyzing");
            let phase = tokio::spawn(analysis_phase(
                Arc::clone(&self.backend),
                Arc::clone(&session),
                id,
                job,
            ));
            join_phase(phase).await?;
        }

        let view = session.lock().await.view();
        Ok(view)
    }

    pub async fn restart(&self, id: Uuid) -> Result<SessionView, AppError> {
        let session = self.session(id).await?;
        let mut guard = session.lock().await;
        guard.restart();
        info!(session_id = %id, epoch = guard.epoch(), "Session restarted");
        Ok(guard.view())
    }

    pub async fn next_slide(&self, id: Uuid) -> Result<SessionView, AppError> {
        let session = self.session(id).await?;
        let mut guard = session.lock().await;
        guard.next_slide()?;
        Ok(guard.view())
    }

    pub async fn prev_slide(&self, id: Uuid) -> Result<SessionView, AppError> {
        let session = self.session(id).await?;
        let mut guard = session.lock().await;
        guard.prev_slide()?;
        Ok(guard.view())
    }

    pub async fn report(&self, id: Uuid) -> Result<ReportFile, AppError> {
        let session = self.session(id).await?;
        let guard = session.lock().await;
        let result = guard
            .result()
            .ok_or_else(|| AppError::Conflict("No results to download yet".to_string()))?;
        Ok(ReportFile {
            file_name: report_file_name(result),
            html: generate_html_report(result),
        })
    }

    pub async fn loading_facts(&self) -> Vec<String> {
        request_loading_facts(self.backend.as_ref()).await
    }

    pub async fn purge_idle(&self, max_idle: Duration) -> usize {
        self.store.purge_idle(max_idle).await
    }
}

async fn join_phase(phase: JoinHandle<Result<(), AppError>>) -> Result<(), AppError> {
    phase
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("session phase task failed: {e}")))?
}

/// `GeneratingQuestions → InQuiz`. Never fails on remote errors.
async fn question_phase(
    backend: Arc<dyn GenerationBackend>,
    session: SharedSession,
    id: Uuid,
    ticket: Ticket,
    context: UserContext,
) -> Result<(), AppError> {
    let questions = request_questions(backend.as_ref(), &context).await;

    let mut guard = session.lock().await;
    match guard.apply_questions(ticket, questions) {
        Ok(()) => {
            info!(session_id = %id, "Quiz ready");
            Ok(())
        }
        Err(SessionError::Stale { ticket, current }) => {
            info!(session_id = %id, ticket, current, "Discarding question batch from before restart");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// `Analyzing → Presenting`: text analysis, then the four images.
/// A failed analysis resets the session and comes back as `AnalysisFailed`.
async fn analysis_phase(
    backend: Arc<dyn GenerationBackend>,
    session: SharedSession,
    id: Uuid,
    job: AnalysisJob,
) -> Result<(), AppError> {
    let analysis = match request_analysis(backend.as_ref(), &job.answers, &job.context).await {
        Ok(analysis) => analysis,
        Err(e) => {
            error!(session_id = %id, "Analysis failed: {e}");
            let mut guard = session.lock().await;
            return match guard.fail_analysis(job.ticket) {
                Ok(()) => Err(AppError::AnalysisFailed(e.to_string())),
                Err(SessionError::Stale { .. }) => Ok(()),
                Err(e) => Err(e.into()),
            };
        }
    };

    {
        let mut guard = session.lock().await;
        match guard.attach_analysis(job.ticket, analysis.clone()) {
            Ok(()) => {}
            Err(SessionError::Stale { ticket, current }) => {
                info!(session_id = %id, ticket, current, "Discarding analysis from before restart");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let image_backend = Arc::clone(&backend);
    let images = match tokio::spawn(async move {
        generate_all_images(image_backend.as_ref(), &analysis).await
    })
    .await
    {
        Ok(images) => images,
        Err(e) => {
            warn!(session_id = %id, "Image phase aborted, presenting without artwork: {e}");
            GeneratedImages::default()
        }
    };

    let mut guard = session.lock().await;
    match guard.attach_images(job.ticket, images) {
        Ok(()) => {
            info!(session_id = %id, "Results ready");
            Ok(())
        }
        Err(SessionError::Stale { ticket, current }) => {
            info!(session_id = %id, ticket, current, "Discarding images from before restart");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
