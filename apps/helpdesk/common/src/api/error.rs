use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors a handler can answer with. Only the static message reaches the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("{message}: {source}")]
    Internal {
        message: &'static str,
        source: DbErr,
    },
}

impl ApiError {
    /// Adapter for `map_err` that tags a store failure with its public message.
    pub fn internal(message: &'static str) -> impl FnOnce(DbErr) -> ApiError {
        move |source| ApiError::Internal { message, source }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(message) | ApiError::NotFound(message) => *message,
            ApiError::Internal { message, .. } => *message,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal { message, source } = self {
            error!("{}: {:?}", message, source);
        }

        HttpResponse::build(self.status_code()).json(json!({ "error": self.message() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x").status_code(), StatusCode::NOT_FOUND);

        let err = ApiError::internal("Failed to fetch users")(DbErr::Custom("boom".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to fetch users");
    }

    #[test]
    fn test_internal_cause_stays_out_of_message() {
        let err = ApiError::internal("Failed to create user")(DbErr::Custom(
            "duplicate key value violates unique constraint".into(),
        ));

        assert!(!err.message().contains("duplicate"));
        assert!(err.to_string().contains("duplicate"));
    }
}
