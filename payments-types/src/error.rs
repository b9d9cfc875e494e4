//! Error types for the payment domain.

use serde_json::{Map, Value};

use crate::domain::PaymentStatus;

/// Structured diagnostic data attached to a domain error.
pub type ErrorPayload = Map<String, Value>;

/// Domain-level errors (business rule violations).
///
/// Two kinds only:
/// - `Validation`: malformed or inconsistent input. The caller can fix the input and retry.
/// - `InvalidTransition`: the aggregate's current status does not allow the operation.
///   This is an ordering bug or a stale read, not a data problem.
///
/// Construction and mutation either fully succeed or fail before any state is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        payload: ErrorPayload,
    },

    #[error("Invalid transition: {message}")]
    InvalidTransition {
        message: String,
        action: &'static str,
        current_status: PaymentStatus,
        expected_status: Option<PaymentStatus>,
    },
}

impl DomainError {
    /// Creates a validation error with an empty payload.
    ///
    /// Attach the offending values with [`DomainError::with`].
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
            payload: ErrorPayload::new(),
        }
    }

    /// Creates an invalid-transition error for `action` attempted in `current_status`.
    pub fn invalid_transition(
        action: &'static str,
        current_status: PaymentStatus,
        expected_status: Option<PaymentStatus>,
    ) -> Self {
        let message = match expected_status {
            Some(expected) => format!(
                "Cannot {} payment in status \"{}\" (expected \"{}\")",
                action, current_status, expected
            ),
            None => format!("Cannot {} payment in status \"{}\"", action, current_status),
        };
        DomainError::InvalidTransition {
            message,
            action,
            current_status,
            expected_status,
        }
    }

    /// Adds a field to the payload of a validation error.
    ///
    /// Invalid-transition payloads are derived from their typed fields, so this is a no-op there.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let DomainError::Validation { payload, .. } = &mut self {
            payload.insert(key.to_string(), value.into());
        }
        self
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation { message, .. } => message,
            DomainError::InvalidTransition { message, .. } => message,
        }
    }

    /// Diagnostic payload of the offending fields/values.
    pub fn payload(&self) -> ErrorPayload {
        match self {
            DomainError::Validation { payload, .. } => payload.clone(),
            DomainError::InvalidTransition {
                current_status,
                expected_status,
                ..
            } => {
                let mut payload = ErrorPayload::new();
                payload.insert(
                    "currentStatus".into(),
                    Value::String(current_status.code().into()),
                );
                if let Some(expected) = expected_status {
                    payload.insert(
                        "expectedStatus".into(),
                        Value::String(expected.code().into()),
                    );
                }
                payload
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation { .. })
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Entity not found")]
    NotFound,
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Serialization(err.to_string())
    }
}

/// Application-level errors returned by the payment service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => AppError::Domain(e),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Serialization(e) => AppError::Internal(e),
        }
    }
}
