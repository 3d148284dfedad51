use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    handlers::{ApiError, AppJson},
    models::{answer::SelectAnswerRequest, answer::SubmitAnswerResponse, session::SessionView},
    services::{
        answer_service::AnswerService, session_service::SessionService, AppState,
    },
};

pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = SessionService::new(state).create_session().await;
    (StatusCode::CREATED, Json(view))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let view = SessionService::new(state).view(&session_id).await?;
    Ok(Json(view))
}

pub async fn connect_wallet(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    tracing::info!("Connecting wallet for session: {}", session_id);

    let view = SessionService::new(state)
        .connect_wallet(&session_id)
        .await?;
    Ok(Json(view))
}

pub async fn next_question(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let view = SessionService::new(state).next_question(&session_id).await?;
    Ok(Json(view))
}

pub async fn select_answer(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    AppJson(req): AppJson<SelectAnswerRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let view = SessionService::new(state)
        .select_answer(&session_id, req.option)
        .await?;
    Ok(Json(view))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    tracing::info!("Submitting answer for session: {}", session_id);

    let response = AnswerService::new(state).submit_answer(&session_id).await?;
    Ok(Json(response))
}

pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let view = SessionService::new(state).reset(&session_id).await?;
    Ok(Json(view))
}
