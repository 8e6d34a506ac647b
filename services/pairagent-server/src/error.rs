//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Agent not found: {0}")]
    AgentNotFound(String),
}

impl ApiError {
    pub fn error_code(&self) -> i32 {
        match self {
            Self::AgentNotFound(_) => -4001,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AgentNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub msg: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.error_code(),
            msg: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<pairagent_types::PairAgentError> for ApiError {
    fn from(err: pairagent_types::PairAgentError) -> Self {
        use pairagent_types::PairAgentError;
        match err {
            PairAgentError::UnknownAgent { agent_id } => Self::AgentNotFound(agent_id),
        }
    }
}
