use thiserror::Error;

use crate::kernel::StoreError;

/// Errors raised by patient activities
#[derive(Error, Debug)]
pub enum PatientError {
    /// The request itself is wrong (missing field, bad value)
    #[error("{0}")]
    InvalidInput(String),

    #[error("Patient not found with id {0}")]
    NotFound(i64),

    #[error("A patient with this {field} already exists")]
    Duplicate { field: String },

    #[error("Storage error: {0}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for PatientError {
    fn from(err: anyhow::Error) -> Self {
        match StoreError::find(&err) {
            Some(StoreError::Duplicate { constraint }) => PatientError::Duplicate {
                field: field_for_constraint(constraint).to_string(),
            },
            None => PatientError::Storage(err),
        }
    }
}

/// Map a unique constraint name onto the field a client can fix
fn field_for_constraint(constraint: &str) -> &'static str {
    if constraint.contains("email") {
        "email"
    } else if constraint.contains("phone") {
        "phone"
    } else {
        "id"
    }
}
