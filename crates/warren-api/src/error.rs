//! Error types for the API layer.
//!
//! [`ApiError`] wraps the service error and converts it into an Axum
//! HTTP response. Only hard failures arrive here; policy denials travel
//! as `success = false` payloads and never become an error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use warren_game::GameError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A game service operation failed.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl ApiError {
    /// The HTTP status code this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Game(err) => match err {
                GameError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
                GameError::NotFound { .. } => StatusCode::NOT_FOUND,
                GameError::InsufficientEnergy { .. } => StatusCode::CONFLICT,
                GameError::Arithmetic { .. } | GameError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Do not leak storage details to clients.
            tracing::error!(error = %self, "Internal error");
            String::from("internal error")
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use warren_db::DbError;

    use super::*;

    #[test]
    fn invalid_argument_is_bad_request() {
        let err = ApiError::from(GameError::InvalidArgument {
            reason: String::from("nope"),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_is_404() {
        let err = ApiError::from(GameError::NotFound {
            what: String::from("cycle 9"),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn insufficient_energy_is_conflict() {
        let err = ApiError::from(GameError::InsufficientEnergy {
            available: 0,
            requested: 1,
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn storage_is_internal() {
        let err = ApiError::from(GameError::Storage(DbError::Config(String::from("boom"))));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
