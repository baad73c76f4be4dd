use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("slot from {start_at} to {end_at} is already taken for employee {employee_id}")]
    SlotUnavailable {
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        employee_id: i64,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{} {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_field() {
        let error = BookingError::Validation(vec![
            FieldError::new("start_at", "must not be null"),
            FieldError::new("end_at", "must not be null"),
        ]);

        let message = error.to_string();
        assert!(message.contains("start_at must not be null"));
        assert!(message.contains("end_at must not be null"));
    }
}
