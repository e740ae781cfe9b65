//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::form::FormError;
use crate::services::mail::MailError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("form error")]
    Form(#[from] FormError),

    #[error("mail delivery failed")]
    Mail(#[from] MailError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) | AppError::Form(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Mail(_) => StatusCode::BAD_GATEWAY,
        };

        // Log details, keep the response vague
        let body = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            AppError::Form(e) => {
                tracing::error!(error = %e, "form error");
                "internal server error".to_string()
            }
            AppError::Mail(e) => {
                tracing::error!(error = %e, "mail delivery failed");
                self.to_string()
            }
        };

        (status, body).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
