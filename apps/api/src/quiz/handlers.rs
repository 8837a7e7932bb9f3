use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::quiz::session::{ProfileStep, SessionView};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: u32,
    pub value: u8,
}

#[derive(Serialize)]
pub struct LoadingFactsResponse {
    pub facts: Vec<String>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    (
        StatusCode::CREATED,
        Json(state.orchestrator.create_session().await),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.orchestrator.view(id).await?))
}

/// POST /api/v1/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.orchestrator.start(id).await?))
}

/// POST /api/v1/sessions/:id/profile
/// The final step blocks until the question batch is ready.
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(step): Json<ProfileStep>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.orchestrator.submit_profile(id, step).await?))
}

/// POST /api/v1/sessions/:id/answers
/// The final answer blocks through analysis and artwork.
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .orchestrator
        .answer(id, req.question_id, req.value)
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/restart
pub async fn handle_restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.orchestrator.restart(id).await?))
}

/// POST /api/v1/sessions/:id/slides/next
pub async fn handle_next_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.orchestrator.next_slide(id).await?))
}

/// POST /api/v1/sessions/:id/slides/prev
pub async fn handle_prev_slide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.orchestrator.prev_slide(id).await?))
}

/// GET /api/v1/sessions/:id/report
pub async fn handle_download_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.orchestrator.report(id).await?;
    let disposition = format!("attachment; filename=\"{}\"", report.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.html,
    ))
}

/// GET /api/v1/loading-facts
pub async fn handle_loading_facts(State(state): State<AppState>) -> Json<LoadingFactsResponse> {
    Json(LoadingFactsResponse {
        facts: state.orchestrator.loading_facts().await,
    })
}
