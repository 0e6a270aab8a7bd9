use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

fn template_status(err: &TemplateError) -> (StatusCode, &'static str) {
    match err {
        TemplateError::NotFound(_) => (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"),
        TemplateError::AlreadyExists(_) => (StatusCode::CONFLICT, "TEMPLATE_EXISTS"),
        TemplateError::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
        TemplateError::InvalidTemplate(_) => (StatusCode::BAD_REQUEST, "INVALID_TEMPLATE"),
        TemplateError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        TemplateError::MissingField(_) => (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_FIELD"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Template(e) => {
                let (status, code) = template_status(e);
                (status, code, e.to_string())
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
        };

        tracing::warn!(
            code = %code,
            status = %status.as_u16(),
            message = %message,
            "API request rejected"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
