//! `/v1/patients` handlers.
//!
//! Handlers only translate between HTTP and the patient activities; all
//! validation and storage rules live in `domains::patients::activities`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::common::{Page, PaginationArgs};
use crate::domains::patients::activities::{self, PatientStatus, SearchCriteria};
use crate::domains::patients::{PatientData, PatientInput};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Query string of `GET /v1/patients/search`
///
/// Kept flat (no `#[serde(flatten)]`) so numeric page/size parse from the
/// query string.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

pub async fn create_patient_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<PatientInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = body?;
    let patient = activities::create_patient(input, state.store.as_ref()).await?;

    let location = format!("/v1/patients/{}", patient.patient_id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(PatientData::from(patient)),
    ))
}

pub async fn get_patient_handler(
    Extension(state): Extension<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PatientData>, ApiError> {
    let Path(id) = id?;
    let patient = activities::get_patient(id, state.store.as_ref()).await?;
    Ok(Json(patient.into()))
}

pub async fn list_patients_handler(
    Extension(state): Extension<AppState>,
    args: Result<Query<PaginationArgs>, QueryRejection>,
) -> Result<Json<Page<PatientData>>, ApiError> {
    let Query(args) = args?;
    let request = args.validate()?;
    let page = activities::list_patients(request, state.store.as_ref()).await?;
    Ok(Json(page.map(PatientData::from)))
}

pub async fn update_patient_handler(
    Extension(state): Extension<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<PatientInput>, JsonRejection>,
) -> Result<Json<PatientData>, ApiError> {
    let Path(id) = id?;
    let Json(input) = body?;
    let patient = activities::update_patient(id, input, state.store.as_ref()).await?;
    Ok(Json(patient.into()))
}

/// Soft delete. Answers 204 whether or not the patient exists.
pub async fn delete_patient_handler(
    Extension(state): Extension<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let deactivated = activities::deactivate_patient(id, state.store.as_ref()).await?;
    if !deactivated {
        tracing::debug!(patient_id = id, "Delete requested for unknown patient");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_patients_handler(
    Extension(state): Extension<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Page<PatientData>>, ApiError> {
    let Query(params) = params?;
    let request = PaginationArgs {
        page: params.page,
        size: params.size,
    }
    .validate()?;
    let criteria = SearchCriteria {
        name: params.name,
        phone: params.phone,
    };

    let page = activities::search_patients(&criteria, request, state.store.as_ref()).await?;
    Ok(Json(page.map(PatientData::from)))
}

pub async fn patient_exists_handler(
    Extension(state): Extension<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PatientStatus>, ApiError> {
    let Path(id) = id?;
    let status = activities::patient_status(id, state.store.as_ref()).await?;
    Ok(Json(status))
}
