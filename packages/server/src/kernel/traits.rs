// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (validation, seed import) lives in domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BasePatientStore)

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::common::{Page, PageRequest};
use crate::domains::patients::models::{NewPatient, Patient, PatientChanges};

// =============================================================================
// Store Errors
// =============================================================================

/// Errors a store reports in a form callers can branch on.
///
/// Anything else surfaces as an opaque `anyhow::Error`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A write would duplicate a unique field (email or phone)
    #[error("duplicate value violates unique constraint {constraint}")]
    Duplicate { constraint: String },
}

impl StoreError {
    /// Find a `StoreError` inside an opaque error, if there is one
    pub fn find(err: &anyhow::Error) -> Option<&StoreError> {
        err.downcast_ref::<StoreError>()
    }
}

// =============================================================================
// Patient Store Trait (Infrastructure - patient persistence)
// =============================================================================

/// Storage port for patient records.
///
/// Implementations own uniqueness of `email` and `phone`: a write that would
/// duplicate either must fail rather than overwrite.
#[async_trait]
pub trait BasePatientStore: Send + Sync {
    /// Insert one patient; the store assigns the id unless one is supplied
    async fn save(&self, patient: NewPatient) -> Result<Patient>;

    /// Insert many patients atomically (all or nothing per call)
    async fn save_batch(&self, patients: Vec<NewPatient>) -> Result<()>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>>;

    /// All patients, newest `created_at` first
    async fn find_all(&self, request: PageRequest) -> Result<Page<Patient>>;

    /// Case-insensitive substring match on name
    async fn search_by_name(&self, name: &str, request: PageRequest) -> Result<Page<Patient>>;

    /// Substring match on phone
    async fn search_by_phone(&self, phone: &str, request: PageRequest) -> Result<Page<Patient>>;

    /// Replace mutable fields; `None` when the id is unknown
    async fn update(&self, id: i64, changes: PatientChanges) -> Result<Option<Patient>>;

    /// Mark inactive; `false` when the id is unknown
    async fn deactivate(&self, id: i64) -> Result<bool>;

    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    async fn exists_by_phone(&self, phone: &str) -> Result<bool>;

    /// Highest stored id across active and inactive patients
    async fn find_max_id(&self) -> Result<Option<i64>>;

    /// Reset the id watermark so the next generated id is `next`
    async fn set_next_generated_id(&self, next: i64) -> Result<()>;
}
