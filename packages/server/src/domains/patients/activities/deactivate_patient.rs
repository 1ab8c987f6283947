//! Deactivate patient action - soft delete

use tracing::{debug, info};

use crate::domains::patients::errors::PatientError;
use crate::kernel::BasePatientStore;

/// Mark a patient inactive. Unknown ids are a no-op.
///
/// Returns whether a patient was found.
pub async fn deactivate_patient(id: i64, store: &dyn BasePatientStore) -> Result<bool, PatientError> {
    let found = store.deactivate(id).await?;

    if found {
        info!(patient_id = id, "Patient deactivated");
    } else {
        debug!(patient_id = id, "Deactivate requested for unknown patient");
    }

    Ok(found)
}
