//! Create patient action - validates and stores a new patient

use tracing::info;

use super::require_field;
use crate::domains::patients::data::PatientInput;
use crate::domains::patients::errors::PatientError;
use crate::domains::patients::models::{NewPatient, Patient};
use crate::kernel::BasePatientStore;

/// Create a patient from API input.
///
/// Name, email and phone are required. The store assigns the id and rejects
/// duplicate email or phone.
pub async fn create_patient(
    input: PatientInput,
    store: &dyn BasePatientStore,
) -> Result<Patient, PatientError> {
    let name = require_field(input.name.as_deref(), "name")?;
    let email = require_field(input.email.as_deref(), "email")?;
    let phone = require_field(input.phone.as_deref(), "phone")?;

    let mut patient = NewPatient::new(name, email, phone, input.dob);
    if let Some(active) = input.active {
        patient.active = active;
    }

    let created = store.save(patient).await?;
    info!(patient_id = created.patient_id, "Patient created");

    Ok(created)
}
