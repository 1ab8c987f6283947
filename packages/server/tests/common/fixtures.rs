//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use registry_core::domains::patients::models::NewPatient;
use registry_core::domains::patients::Patient;
use serde_json::{json, Value};
use sqlx::PgPool;

/// Insert a patient straight through the model
pub async fn create_test_patient(
    pool: &PgPool,
    name: &str,
    email: &str,
    phone: &str,
) -> Result<Patient> {
    NewPatient::new(
        name.to_string(),
        email.to_string(),
        phone.to_string(),
        NaiveDate::from_ymd_opt(1990, 1, 15),
    )
    .insert(pool)
    .await
}

/// Insert a patient with a fixed registration time
pub async fn create_test_patient_at(
    pool: &PgPool,
    name: &str,
    email: &str,
    phone: &str,
    created_at: DateTime<Utc>,
) -> Result<Patient> {
    let mut patient = NewPatient::new(name.to_string(), email.to_string(), phone.to_string(), None);
    patient.created_at = created_at;
    patient.insert(pool).await
}

/// JSON body for create/update
pub fn patient_json(name: &str, email: &str, phone: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": phone,
        "dob": "1990-01-15",
    })
}

/// `count` id-less seed lines with distinct emails and phones
pub fn seed_lines_without_ids(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| {
            format!(
                "Seed Patient {},seed{}@example.com,+1-555-{:07},1980-01-01,2024-01-01T00:00:00Z",
                i, i, i
            )
        })
        .collect()
}
