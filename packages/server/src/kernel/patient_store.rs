// Postgres implementation of the patient store

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{Page, PageRequest};
use crate::domains::patients::models::{NewPatient, Patient, PatientChanges};
use crate::kernel::traits::{BasePatientStore, StoreError};

/// Patient store backed by the `patients` table
#[derive(Clone)]
pub struct PgPatientStore {
    pool: PgPool,
}

impl PgPatientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BasePatientStore for PgPatientStore {
    async fn save(&self, patient: NewPatient) -> Result<Patient> {
        patient.insert(&self.pool).await.map_err(map_unique_violation)
    }

    async fn save_batch(&self, patients: Vec<NewPatient>) -> Result<()> {
        let inserted = NewPatient::insert_batch(&patients, &self.pool)
            .await
            .map_err(map_unique_violation)?;
        tracing::debug!(inserted, "Patient batch committed");
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>> {
        Patient::find_by_id(id, &self.pool).await
    }

    async fn find_all(&self, request: PageRequest) -> Result<Page<Patient>> {
        Patient::find_paginated(request, &self.pool).await
    }

    async fn search_by_name(&self, name: &str, request: PageRequest) -> Result<Page<Patient>> {
        Patient::search_by_name(name, request, &self.pool).await
    }

    async fn search_by_phone(&self, phone: &str, request: PageRequest) -> Result<Page<Patient>> {
        Patient::search_by_phone(phone, request, &self.pool).await
    }

    async fn update(&self, id: i64, changes: PatientChanges) -> Result<Option<Patient>> {
        Patient::update(id, &changes, &self.pool)
            .await
            .map_err(map_unique_violation)
    }

    async fn deactivate(&self, id: i64) -> Result<bool> {
        Patient::deactivate(id, &self.pool).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Patient::exists_by_email(email, &self.pool).await
    }

    async fn exists_by_phone(&self, phone: &str) -> Result<bool> {
        Patient::exists_by_phone(phone, &self.pool).await
    }

    async fn find_max_id(&self) -> Result<Option<i64>> {
        Patient::find_max_id(&self.pool).await
    }

    async fn set_next_generated_id(&self, next: i64) -> Result<()> {
        Patient::set_next_id(next, &self.pool).await
    }
}

/// Turn a Postgres unique violation into `StoreError::Duplicate`
fn map_unique_violation(err: anyhow::Error) -> anyhow::Error {
    if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return StoreError::Duplicate { constraint }.into();
        }
    }
    err
}
