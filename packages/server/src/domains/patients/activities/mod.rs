//! Patient domain activities - business logic functions
//!
//! Activities validate input, call the patient store, and return models.
//! HTTP routes convert the models into `PatientData`.

mod create_patient;
mod deactivate_patient;
mod queries;
mod update_patient;

pub use create_patient::create_patient;
pub use deactivate_patient::deactivate_patient;
pub use queries::{
    get_patient, list_patients, patient_status, search_patients, PatientStatus, SearchCriteria,
};
pub use update_patient::update_patient;

use crate::domains::patients::errors::PatientError;

/// Trimmed value of a required text field, or an invalid-input error naming it
pub(crate) fn require_field(value: Option<&str>, field: &str) -> Result<String, PatientError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(PatientError::InvalidInput(format!("{} is required", field))),
    }
}
