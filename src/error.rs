use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Postgres error code for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("access denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A duplicate username/email INSERT or UPDATE loses the race at the store,
/// not in application code; the constraint that fired names the field.
/// Everything else from the database is a 500.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match unique_violation_field(&e) {
            Some(field) => AppError::Conflict(format!("{field} already taken")),
            None => AppError::Internal(e.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn unique_violation_field(e: &sqlx::Error) -> Option<&'static str> {
    let db = match e {
        sqlx::Error::Database(db) => db,
        _ => return None,
    };
    if db.code().as_deref() != Some(UNIQUE_VIOLATION) {
        return None;
    }
    Some(conflict_field(db.constraint()))
}

fn conflict_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_username_key") => "username",
        Some("users_email_key") => "email",
        _ => "record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            AppError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("no token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("screening").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Conflict("username already taken".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn non_conflict_database_errors_become_internal() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn constraint_names_map_to_fields() {
        assert_eq!(conflict_field(Some("users_username_key")), "username");
        assert_eq!(conflict_field(Some("users_email_key")), "email");
        assert_eq!(conflict_field(Some("something_else")), "record");
        assert_eq!(conflict_field(None), "record");
    }

    #[test]
    fn messages_read_as_sentences() {
        assert_eq!(
            AppError::NotFound("screening").to_string(),
            "screening not found"
        );
        assert_eq!(
            AppError::Conflict("email already taken".into()).to_string(),
            "email already taken"
        );
    }
}
