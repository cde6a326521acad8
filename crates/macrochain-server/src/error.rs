//! HTTP Error Mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use macrochain_core::{model::now_timestamp, AnalysisError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Request validation failed: {0}")]
    Validation(#[from] JsonRejection),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Analysis(err) if err.is_validation() => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Invalid request",
                    message: err.to_string(),
                    details: None,
                    timestamp: now_timestamp(),
                },
            ),
            Self::Analysis(err) => {
                tracing::error!(error = %err, "Analysis request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error",
                        message: err.user_message(),
                        details: None,
                        timestamp: now_timestamp(),
                    },
                )
            }
            Self::Validation(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "Validation error",
                        message: "Request validation failed. Please check your input parameters.".to_string(),
                        details: Some(rejection.body_text()),
                        timestamp: now_timestamp(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
