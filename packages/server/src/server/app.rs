//! Application setup and router configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{CONTENT_TYPE, LOCATION},
        HeaderName, Method,
    },
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::{BasePatientStore, PgPatientStore};
use crate::server::middleware::{extract_correlation_id, log_payloads, CORRELATION_ID_HEADER};
use crate::server::routes::{
    create_patient_handler, delete_patient_handler, get_patient_handler, health_handler,
    list_patients_handler, patient_exists_handler, search_patients_handler,
    update_patient_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BasePatientStore>,
    /// Present when the store is Postgres-backed; used by the health check
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(store: Arc<dyn BasePatientStore>) -> Self {
        Self {
            store,
            db_pool: None,
        }
    }

    /// State backed by `PgPatientStore` on the given pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            store: Arc::new(PgPatientStore::new(pool.clone())),
            db_pool: Some(pool),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState, payload_logging_enabled: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(CORRELATION_ID_HEADER)])
        .expose_headers([LOCATION, HeaderName::from_static(CORRELATION_ID_HEADER)]);

    let mut router = Router::new()
        .route(
            "/v1/patients",
            get(list_patients_handler).post(create_patient_handler),
        )
        .route("/v1/patients/search", get(search_patients_handler))
        .route(
            "/v1/patients/:id",
            get(get_patient_handler)
                .put(update_patient_handler)
                .delete(delete_patient_handler),
        )
        .route("/v1/patients/:id/exists", get(patient_exists_handler))
        .route("/health", get(health_handler));

    // Middleware layers (applied in reverse order - last added runs first)
    if payload_logging_enabled {
        router = router.layer(middleware::from_fn(log_payloads));
    }

    router
        .layer(middleware::from_fn(extract_correlation_id)) // Must wrap payload logging
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
