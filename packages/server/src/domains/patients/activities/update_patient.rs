//! Update patient action - full replacement of the mutable fields

use tracing::info;

use super::require_field;
use crate::domains::patients::data::PatientInput;
use crate::domains::patients::errors::PatientError;
use crate::domains::patients::models::{Patient, PatientChanges};
use crate::kernel::BasePatientStore;

/// Replace name, email, phone and dob of an existing patient.
///
/// `active` keeps its stored value when the input leaves it out.
/// `created_at` never changes.
pub async fn update_patient(
    id: i64,
    input: PatientInput,
    store: &dyn BasePatientStore,
) -> Result<Patient, PatientError> {
    let existing = store
        .find_by_id(id)
        .await?
        .ok_or(PatientError::NotFound(id))?;

    let changes = PatientChanges {
        name: require_field(input.name.as_deref(), "name")?,
        email: require_field(input.email.as_deref(), "email")?,
        phone: require_field(input.phone.as_deref(), "phone")?,
        dob: input.dob,
        active: input.active.unwrap_or(existing.active),
    };

    let updated = store
        .update(id, changes)
        .await?
        .ok_or(PatientError::NotFound(id))?;

    info!(patient_id = id, "Patient updated");
    Ok(updated)
}
