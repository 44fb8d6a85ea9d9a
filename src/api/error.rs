use std::fmt;

use blogdesk_api_types::{FieldErrors, FieldMessage};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a posts API call.
///
/// Cloneable so a cached failure can be handed to every reader of the query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {}", DataPreview(.data))]
    Transport { status: u16, data: Value },
    /// No usable response: the request never completed or the body could not be decoded.
    #[error("{message}")]
    Message { message: String },
    /// A 422 response whose payload is a JSON object.
    #[error("validation failed: {} field(s) rejected", .errors.len())]
    Validation { data: Value, errors: FieldErrors },
}

impl ApiError {
    pub fn transport(status: u16, data: Value) -> Self {
        Self::Transport { status, data }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// Field messages are read entry by entry; one odd entry never hides the rest.
    pub fn validation(data: Value) -> Self {
        let errors = data
            .get("error")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(name, value)| {
                        serde_json::from_value::<FieldMessage>(value.clone())
                            .ok()
                            .map(|message| (name.clone(), message))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self::Validation { data, errors }
    }

    /// Classify a non-success response.
    ///
    /// 422 with a non-null, non-array object payload is a validation error;
    /// everything else keeps its status and raw payload.
    pub fn from_status(status: StatusCode, data: Value) -> Self {
        if status == StatusCode::UNPROCESSABLE_ENTITY && data.is_object() {
            Self::validation(data)
        } else {
            Self::transport(status.as_u16(), data)
        }
    }

    pub fn is_entity_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// HTTP status when the server produced a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::Validation { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY.as_u16()),
            Self::Message { .. } => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::message(err.to_string())
    }
}

struct DataPreview<'a>(&'a Value);

impl fmt::Display for DataPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("<empty body>"),
            Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn entity_error_requires_422_and_object() {
        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"error": {"title": "Title is required"}}),
        );
        assert!(err.is_entity_error());
        let errors = err.field_errors().expect("field errors");
        assert_eq!(errors["title"].first_text(), Some("Title is required"));
    }

    #[test]
    fn mixed_field_payload_keeps_every_message() {
        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"error": {"title": "Title is required", "publishDate": ["must be a date"], "code": 42}}),
        );
        let errors = err.field_errors().expect("field errors");
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["title"].first_text(), Some("Title is required"));
        assert_eq!(errors["publishDate"].first_text(), Some("must be a date"));
        assert_eq!(errors["code"].first_text(), None);
    }

    #[test]
    fn server_error_is_not_entity_error() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": {"title": "nope"}}),
        );
        assert!(!err.is_entity_error());
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn null_payload_is_not_entity_error() {
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, Value::Null);
        assert!(!err.is_entity_error());
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn array_payload_is_not_entity_error() {
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, json!([{"title": "x"}]));
        assert!(!err.is_entity_error());
    }

    #[test]
    fn object_without_error_key_still_classifies_with_no_fields() {
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, json!({"message": "bad"}));
        assert!(err.is_entity_error());
        assert!(err.field_errors().expect("fields").is_empty());
    }

    #[test]
    fn message_error_has_no_status() {
        let err = ApiError::message("connection refused");
        assert_eq!(err.status(), None);
        assert!(!err.is_entity_error());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn transport_display_includes_body() {
        let err = ApiError::transport(404, json!("not found"));
        assert_eq!(err.to_string(), "request failed with status 404: not found");
        let err = ApiError::transport(502, Value::Null);
        assert_eq!(err.to_string(), "request failed with status 502: <empty body>");
    }
}
