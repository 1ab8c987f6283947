// TestDependencies - mock implementations for testing
//
// Provides an in-memory patient store that records every write so tests can
// assert on batching and watermark behaviour without a database.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{BasePatientStore, StoreError};
use crate::common::{Page, PageRequest};
use crate::domains::patients::models::{NewPatient, Patient, PatientChanges};

// =============================================================================
// Mock Patient Store
// =============================================================================

#[derive(Default)]
struct MockState {
    patients: BTreeMap<i64, Patient>,
    /// Next id handed out for rows without an explicit id (like a sequence,
    /// explicit inserts do not advance it)
    next_id: i64,
    batch_calls: Vec<usize>,
    single_saves: usize,
    watermark_calls: Vec<i64>,
    exists_calls: usize,
    fail_batch_call: Option<usize>,
    fail_watermark: bool,
    fail_find_max: bool,
}

/// In-memory `BasePatientStore` with call recording and failure injection
#[derive(Clone)]
pub struct MockPatientStore {
    state: Arc<Mutex<MockState>>,
}

impl MockPatientStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                next_id: 1,
                ..MockState::default()
            })),
        }
    }

    /// Pre-populate with an existing patient (bypasses call recording)
    pub fn with_patient(self, patient: Patient) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id = state.next_id.max(patient.patient_id.saturating_add(1));
            state.patients.insert(patient.patient_id, patient);
        }
        self
    }

    /// Make the nth `save_batch` call (1-based) fail without writing
    pub fn fail_on_batch(self, call: usize) -> Self {
        self.state.lock().unwrap().fail_batch_call = Some(call);
        self
    }

    /// Make `set_next_generated_id` fail
    pub fn fail_watermark(self) -> Self {
        self.state.lock().unwrap().fail_watermark = true;
        self
    }

    /// Make `find_max_id` fail
    pub fn fail_find_max(self) -> Self {
        self.state.lock().unwrap().fail_find_max = true;
        self
    }

    /// Sizes of every successful or attempted `save_batch` call, in order
    pub fn batch_calls(&self) -> Vec<usize> {
        self.state.lock().unwrap().batch_calls.clone()
    }

    pub fn single_saves(&self) -> usize {
        self.state.lock().unwrap().single_saves
    }

    /// Values passed to `set_next_generated_id`, in order
    pub fn watermark_calls(&self) -> Vec<i64> {
        self.state.lock().unwrap().watermark_calls.clone()
    }

    pub fn exists_calls(&self) -> usize {
        self.state.lock().unwrap().exists_calls
    }

    /// The id the next sequence-assigned insert would get
    pub fn next_id(&self) -> i64 {
        self.state.lock().unwrap().next_id
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn patients(&self) -> Vec<Patient> {
        self.state.lock().unwrap().patients.values().cloned().collect()
    }

    pub fn get(&self, id: i64) -> Option<Patient> {
        self.state.lock().unwrap().patients.get(&id).cloned()
    }
}

impl Default for MockPatientStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    fn check_unique(&self, email: &str, phone: &str, skip_id: Option<i64>) -> Result<()> {
        for existing in self.patients.values() {
            if Some(existing.patient_id) == skip_id {
                continue;
            }
            if existing.email == email {
                return Err(StoreError::Duplicate {
                    constraint: "patients_email_key".to_string(),
                }
                .into());
            }
            if existing.phone == phone {
                return Err(StoreError::Duplicate {
                    constraint: "patients_phone_key".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn insert(&mut self, patient: NewPatient) -> Result<Patient> {
        self.check_unique(&patient.email, &patient.phone, None)?;

        let patient_id = match patient.patient_id {
            Some(id) => {
                if self.patients.contains_key(&id) {
                    return Err(StoreError::Duplicate {
                        constraint: "patients_pkey".to_string(),
                    }
                    .into());
                }
                id
            }
            None => {
                let id = self.next_id;
                if self.patients.contains_key(&id) {
                    return Err(StoreError::Duplicate {
                        constraint: "patients_pkey".to_string(),
                    }
                    .into());
                }
                self.next_id += 1;
                id
            }
        };

        let stored = Patient {
            patient_id,
            name: patient.name,
            email: patient.email,
            phone: patient.phone,
            dob: patient.dob,
            created_at: patient.created_at,
            active: patient.active,
        };
        self.patients.insert(patient_id, stored.clone());
        Ok(stored)
    }

    fn page(&self, mut rows: Vec<Patient>, request: PageRequest) -> Page<Patient> {
        let total = rows.len() as i64;
        let content = rows
            .drain(..)
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Page::new(content, request, total)
    }
}

#[async_trait]
impl BasePatientStore for MockPatientStore {
    async fn save(&self, patient: NewPatient) -> Result<Patient> {
        let mut state = self.state.lock().unwrap();
        state.single_saves += 1;
        state.insert(patient)
    }

    async fn save_batch(&self, patients: Vec<NewPatient>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.batch_calls.push(patients.len());

        if state.fail_batch_call == Some(state.batch_calls.len()) {
            anyhow::bail!("injected batch failure");
        }

        // All or nothing: apply to a copy, swap in on success
        let snapshot_patients = state.patients.clone();
        let snapshot_next_id = state.next_id;
        for patient in patients {
            if let Err(e) = state.insert(patient) {
                state.patients = snapshot_patients;
                state.next_id = snapshot_next_id;
                return Err(e);
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>> {
        Ok(self.state.lock().unwrap().patients.get(&id).cloned())
    }

    async fn find_all(&self, request: PageRequest) -> Result<Page<Patient>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<Patient> = state.patients.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.patient_id.cmp(&a.patient_id))
        });
        Ok(state.page(rows, request))
    }

    async fn search_by_name(&self, name: &str, request: PageRequest) -> Result<Page<Patient>> {
        let state = self.state.lock().unwrap();
        let needle = name.to_lowercase();
        let rows = state
            .patients
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(state.page(rows, request))
    }

    async fn search_by_phone(&self, phone: &str, request: PageRequest) -> Result<Page<Patient>> {
        let state = self.state.lock().unwrap();
        let rows = state
            .patients
            .values()
            .filter(|p| p.phone.contains(phone))
            .cloned()
            .collect();
        Ok(state.page(rows, request))
    }

    async fn update(&self, id: i64, changes: PatientChanges) -> Result<Option<Patient>> {
        let mut state = self.state.lock().unwrap();
        if !state.patients.contains_key(&id) {
            return Ok(None);
        }
        state.check_unique(&changes.email, &changes.phone, Some(id))?;

        let Some(existing) = state.patients.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = changes.name;
        existing.email = changes.email;
        existing.phone = changes.phone;
        existing.dob = changes.dob;
        existing.active = changes.active;
        Ok(Some(existing.clone()))
    }

    async fn deactivate(&self, id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.patients.get_mut(&id) {
            Some(existing) => {
                existing.active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.exists_calls += 1;
        Ok(state.patients.values().any(|p| p.email == email))
    }

    async fn exists_by_phone(&self, phone: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.exists_calls += 1;
        Ok(state.patients.values().any(|p| p.phone == phone))
    }

    async fn find_max_id(&self) -> Result<Option<i64>> {
        let state = self.state.lock().unwrap();
        if state.fail_find_max {
            anyhow::bail!("injected find_max_id failure");
        }
        Ok(state.patients.keys().next_back().copied())
    }

    async fn set_next_generated_id(&self, next: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.watermark_calls.push(next);
        if state.fail_watermark {
            anyhow::bail!("injected watermark failure");
        }
        state.next_id = next;
        Ok(())
    }
}
