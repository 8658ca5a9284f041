//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),
    #[error("invalid {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn person_not_found() -> Self {
        AppError::NotFound("no persons found for id")
    }

    pub fn address_not_found() -> Self {
        AppError::NotFound("no address found for id")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Errors go out as plain text; database failures carry the driver message verbatim.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
