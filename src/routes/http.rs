//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs the session id and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, problems: state.bank.len(), assistant: state.hints.name() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let view = logic::create_session(&state).await;
  (StatusCode::CREATED, Json(view))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
  Ok(Json(logic::session_view(&state, id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_end_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
  logic::end_session(&state, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state))]
pub async fn http_start_challenge(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
  let view = logic::start_challenge(&state, id).await?;
  info!(target: "challenge", session = %id, problem = ?view.problem.as_ref().map(|p| p.id.as_str()), "HTTP challenge served");
  Ok(Json(view))
}

#[instrument(level = "debug", skip(state))]
pub async fn http_tick(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TickOut>, AppError> {
  let (tick, phase) = logic::tick(&state, id).await?;
  Ok(Json(TickOut::new(tick, phase)))
}

#[instrument(level = "info", skip(state, body), fields(code_len = body.code.len()))]
pub async fn http_submit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SubmitIn>,
) -> Result<Json<SubmitOut>, AppError> {
  let (outcome, phase) = logic::submit_solution(&state, id, &body.code).await?;
  info!(target: "challenge", session = %id, ?outcome, "HTTP submission judged");
  Ok(Json(SubmitOut::new(outcome, phase)))
}

#[instrument(level = "info", skip(state, body), fields(message_len = body.message.len()))]
pub async fn http_hint(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<HintIn>,
) -> Result<Json<HintOut>, AppError> {
  let (result, phase) = logic::request_hint(&state, id, &body.message).await?;
  info!(target: "challenge", session = %id, "HTTP hint served");
  Ok(Json(HintOut::new(result, phase)))
}
