use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::patients::models::Patient as PatientModel;

/// Patient API data type
///
/// Public JSON representation of a patient (for HTTP responses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    /// Unique identifier
    pub patient_id: i64,

    pub name: String,

    pub email: String,

    pub phone: String,

    /// Date of birth, `YYYY-MM-DD`
    pub dob: Option<NaiveDate>,

    /// When the patient was registered
    pub created_at: DateTime<Utc>,

    /// False once the patient has been deleted
    pub active: bool,
}

impl From<PatientModel> for PatientData {
    fn from(patient: PatientModel) -> Self {
        Self {
            patient_id: patient.patient_id,
            name: patient.name,
            email: patient.email,
            phone: patient.phone,
            dob: patient.dob,
            created_at: patient.created_at,
            active: patient.active,
        }
    }
}

/// Request body for create and update.
///
/// Every field is optional at the wire level so that missing fields surface
/// as a 400 from validation rather than a deserialization rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<NaiveDate>,
    pub active: Option<bool>,
}
