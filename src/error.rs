//! Error taxonomy shared by the controller and both surfaces.
//!
//! Time expiry and a mismatched submission are normal outcomes, not errors;
//! they live in `session` as result enums.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
  /// The hint collaborator failed or did not answer in time.
  #[error("hint assistant unavailable: {0}")]
  CollaboratorUnavailable(String),

  /// A session refers to a problem the bank does not hold. Programming defect.
  #[error("invalid problem reference: {0}")]
  InvalidProblemReference(String),

  #[error("unknown session: {0}")]
  UnknownSession(Uuid),

  #[error("invalid problem bank: {0}")]
  InvalidBank(String),
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = match &self {
      AppError::UnknownSession(_) => StatusCode::NOT_FOUND,
      AppError::CollaboratorUnavailable(_) => StatusCode::BAD_GATEWAY,
      AppError::InvalidProblemReference(_) | AppError::InvalidBank(_) => {
        tracing::error!(target: "debug_challenge", error = %self, "Internal error surfaced to client");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_codes_follow_error_kind() {
    let id = Uuid::new_v4();
    assert_eq!(AppError::UnknownSession(id).into_response().status(), StatusCode::NOT_FOUND);
    assert_eq!(
      AppError::InvalidProblemReference("x".into()).into_response().status(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
      AppError::CollaboratorUnavailable("down".into()).into_response().status(),
      StatusCode::BAD_GATEWAY
    );
  }
}
