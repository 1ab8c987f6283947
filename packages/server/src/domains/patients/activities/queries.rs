//! Read-side patient queries

use serde::{Deserialize, Serialize};

use crate::common::{Page, PageRequest};
use crate::domains::patients::errors::PatientError;
use crate::domains::patients::models::Patient;
use crate::kernel::BasePatientStore;

/// Search filters. `name` takes precedence over `phone`; with neither the
/// search degrades to a plain listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchCriteria {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Existence probe result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatientStatus {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

pub async fn get_patient(id: i64, store: &dyn BasePatientStore) -> Result<Patient, PatientError> {
    store
        .find_by_id(id)
        .await?
        .ok_or(PatientError::NotFound(id))
}

/// All patients, newest first
pub async fn list_patients(
    request: PageRequest,
    store: &dyn BasePatientStore,
) -> Result<Page<Patient>, PatientError> {
    Ok(store.find_all(request).await?)
}

pub async fn search_patients(
    criteria: &SearchCriteria,
    request: PageRequest,
    store: &dyn BasePatientStore,
) -> Result<Page<Patient>, PatientError> {
    if let Some(name) = criteria.name.as_deref() {
        return Ok(store.search_by_name(name, request).await?);
    }
    if let Some(phone) = criteria.phone.as_deref() {
        return Ok(store.search_by_phone(phone, request).await?);
    }
    list_patients(request, store).await
}

/// Whether a patient exists and, if so, whether it is active
pub async fn patient_status(
    id: i64,
    store: &dyn BasePatientStore,
) -> Result<PatientStatus, PatientError> {
    let status = match store.find_by_id(id).await? {
        Some(patient) => PatientStatus {
            exists: true,
            active: Some(patient.active),
        },
        None => PatientStatus {
            exists: false,
            active: None,
        },
    };
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockPatientStore;
    use chrono::{Duration, Utc};

    fn store_with_three() -> MockPatientStore {
        let now = Utc::now();
        let patient = |id: i64, name: &str, phone: &str, age_minutes: i64| Patient {
            patient_id: id,
            name: name.to_string(),
            email: format!("p{}@example.com", id),
            phone: phone.to_string(),
            dob: None,
            created_at: now - Duration::minutes(age_minutes),
            active: id != 2,
        };

        MockPatientStore::new()
            .with_patient(patient(1, "Ann Lee", "+1-555-0100", 30))
            .with_patient(patient(2, "Bob Annan", "+44-20-7946", 20))
            .with_patient(patient(3, "Cy Young", "+1-555-0199", 10))
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = store_with_three();
        let page = list_patients(PageRequest::new(0, 2), &store).await.unwrap();

        let ids: Vec<i64> = page.content.iter().map(|p| p.patient_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_name_search_is_case_insensitive_and_wins_over_phone() {
        let store = store_with_three();
        let criteria = SearchCriteria {
            name: Some("ANN".to_string()),
            phone: Some("0199".to_string()),
        };

        let page = search_patients(&criteria, PageRequest::default(), &store)
            .await
            .unwrap();
        let ids: Vec<i64> = page.content.iter().map(|p| p.patient_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_phone_search() {
        let store = store_with_three();
        let criteria = SearchCriteria {
            name: None,
            phone: Some("555".to_string()),
        };

        let page = search_patients(&criteria, PageRequest::default(), &store)
            .await
            .unwrap();
        assert_eq!(page.total_elements, 2);
    }

    #[tokio::test]
    async fn test_empty_criteria_lists_everything() {
        let store = store_with_three();
        let page = search_patients(&SearchCriteria::default(), PageRequest::default(), &store)
            .await
            .unwrap();
        assert_eq!(page.total_elements, 3);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let store = store_with_three();
        assert!(matches!(
            get_patient(42, &store).await,
            Err(PatientError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_status_reports_inactive() {
        let store = store_with_three();

        let status = patient_status(2, &store).await.unwrap();
        assert_eq!(
            status,
            PatientStatus {
                exists: true,
                active: Some(false)
            }
        );

        let missing = patient_status(9, &store).await.unwrap();
        assert_eq!(serde_json::to_value(missing).unwrap(), serde_json::json!({"exists": false}));
    }
}
