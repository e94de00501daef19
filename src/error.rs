//! Error types for the catalog API

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};

use crate::entity::server_type::UnknownType;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("Build not found")]
  BuildNotFound,

  #[error("Version not found")]
  VersionNotFound,

  #[error("Invalid type")]
  InvalidType(#[from] UnknownType),

  #[error("Invalid build identifier")]
  InvalidBuild,

  #[error("Invalid request: {}", .0.join(", "))]
  Invalid(Vec<String>),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl Error {
  pub fn invalid(message: impl Into<String>) -> Self {
    Self::Invalid(vec![message.into()])
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Error::Database(_) | Error::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      Error::BuildNotFound | Error::VersionNotFound => StatusCode::NOT_FOUND,
      Error::InvalidType(_) | Error::InvalidBuild | Error::Invalid(_) => {
        StatusCode::BAD_REQUEST
      }
    }
  }

  fn messages(&self) -> Vec<String> {
    match self {
      Error::Database(_) => vec!["Database error".into()],
      Error::Internal(_) => vec!["Internal error".into()],
      Error::Invalid(errors) => errors.clone(),
      other => vec![other.to_string()],
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("{self}");
    }

    let body = json::json!({
      "success": false,
      "errors": self.messages(),
    });

    (status, axum::Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn storage_details_stay_internal() {
    let err = Error::Database(sea_orm::DbErr::Custom("disk on fire".into()));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.messages(), vec!["Database error".to_string()]);
  }

  #[test]
  fn client_errors_are_bad_requests() {
    let err: Error = "bukkit".parse::<crate::entity::ServerType>().unwrap_err().into();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.messages(), vec!["Invalid type".to_string()]);
    assert_eq!(Error::BuildNotFound.status(), StatusCode::NOT_FOUND);
  }
}
