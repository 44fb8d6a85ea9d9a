use std::error::Error as StdError;

use blogdesk_api_types::FieldErrors;
use thiserror::Error;

use crate::{api::ApiError, config::LoadError, domain::error::DomainError, infra::error::InfraError};

/// Flattened error chain for reporting at the process boundary.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn summary(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Api(ApiError),
    #[error("validation failed: {}", describe_fields(.0))]
    Validation(FieldErrors),
    #[error("invalid input: {0}")]
    Input(String),
}

impl AppError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }
}

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Validation { errors, .. } => Self::Validation(errors),
            other => Self::Api(other),
        }
    }
}

fn describe_fields(errors: &FieldErrors) -> String {
    if errors.is_empty() {
        return "server rejected the post".to_string();
    }
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {}", message.first_text().unwrap_or("invalid")))
        .collect::<Vec<_>>()
        .join("; ")
}
