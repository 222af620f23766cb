use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid port: {value}")]
    InvalidPort { name: &'static str, value: String },
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

/// Input rejected before it can reach the settlement engine.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("amount must be a finite, non-negative number (got {0})")]
    InvalidAmount(f64),
    #[error("exchange rate must be a finite, positive number (got {0})")]
    InvalidExchangeRate(f64),
    #[error("an exchange rate is required for currency {0}")]
    MissingExchangeRate(String),
    #[error("payer id must not be empty")]
    MissingPayer,
    #[error("display name must not be empty")]
    MissingDisplayName,
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("group {0} not found")]
    GroupNotFound(String),
    #[error("group {0} already exists")]
    GroupExists(String),
    #[error("expense {0} not found")]
    ExpenseNotFound(String),
    #[error("member {0} already in group")]
    MemberExists(String),
    #[error("group {0} is already settled")]
    GroupSettled(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::GroupNotFound(_) | StoreError::ExpenseNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
