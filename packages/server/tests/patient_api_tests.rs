//! Integration tests for the `/v1/patients` HTTP API on Postgres.

mod common;

use crate::common::{create_test_patient, create_test_patient_at, patient_json, TestHarness};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use test_context::test_context;

// =============================================================================
// Create
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn create_returns_201_with_location(ctx: &TestHarness) {
    let response = ctx
        .api()
        .post(
            "/v1/patients",
            patient_json("Ann Lee", "ann@example.com", "+1-555-234-9981"),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["patientId"].as_i64().unwrap();
    assert_eq!(
        response.header("location"),
        Some(format!("/v1/patients/{}", id).as_str())
    );
    assert_eq!(response.body["name"], "Ann Lee");
    assert_eq!(response.body["dob"], "1990-01-15");
    assert_eq!(response.body["active"], true);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_without_phone_is_bad_request(ctx: &TestHarness) {
    let response = ctx
        .api()
        .post(
            "/v1/patients",
            json!({ "name": "Ann Lee", "email": "ann@example.com" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "BAD_REQUEST");
    assert_eq!(response.body["message"], "phone is required");
    assert!(response.body["correlationId"].is_string());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_with_malformed_json_is_bad_request(ctx: &TestHarness) {
    let response = ctx.api().post_raw("/v1/patients", "{\"name\": ").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "BAD_REQUEST");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_email_is_conflict(ctx: &TestHarness) {
    create_test_patient(&ctx.db_pool, "Ann", "ann@example.com", "555-0100")
        .await
        .unwrap();

    let response = ctx
        .api()
        .post("/v1/patients", patient_json("Other Ann", "ann@example.com", "555-0199"))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], "CONFLICT");
    assert_eq!(
        response.body["message"],
        "A patient with this email already exists"
    );
}

// =============================================================================
// Read
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn get_missing_patient_is_not_found(ctx: &TestHarness) {
    let response = ctx.api().get("/v1/patients/9999").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], "NOT_FOUND");
    assert_eq!(response.body["message"], "Patient not found with id 9999");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn get_with_non_numeric_id_is_bad_request(ctx: &TestHarness) {
    let response = ctx.api().get("/v1/patients/abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_is_newest_first_and_paginated(ctx: &TestHarness) {
    let now = Utc::now();
    for (i, age) in [30, 10, 20].iter().enumerate() {
        create_test_patient_at(
            &ctx.db_pool,
            &format!("P{}", i),
            &format!("p{}@example.com", i),
            &format!("555-010{}", i),
            now - Duration::minutes(*age),
        )
        .await
        .unwrap();
    }

    let response = ctx.api().get("/v1/patients?page=0&size=2").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalElements"], 3);
    assert_eq!(response.body["totalPages"], 2);
    let names: Vec<&str> = response.body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["P1", "P2"]);

    let second = ctx.api().get("/v1/patients?page=1&size=2").await;
    assert_eq!(second.body["content"][0]["name"], "P0");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_with_zero_size_is_bad_request(ctx: &TestHarness) {
    let response = ctx.api().get("/v1/patients?size=0").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Update and delete
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn update_replaces_fields_and_keeps_created_at(ctx: &TestHarness) {
    let patient = create_test_patient(&ctx.db_pool, "Ann", "ann@example.com", "555-0100")
        .await
        .unwrap();

    let response = ctx
        .api()
        .put(
            &format!("/v1/patients/{}", patient.patient_id),
            json!({
                "name": "Ann Lee-Park",
                "email": "ann.park@example.com",
                "phone": "555-0100",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Ann Lee-Park");
    assert_eq!(response.body["email"], "ann.park@example.com");
    assert!(response.body["dob"].is_null());
    assert_eq!(response.body["active"], true);

    let created_at: chrono::DateTime<Utc> =
        serde_json::from_value(response.body["createdAt"].clone()).unwrap();
    assert_eq!(created_at, patient.created_at);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_missing_patient_is_not_found(ctx: &TestHarness) {
    let response = ctx
        .api()
        .put(
            "/v1/patients/4242",
            patient_json("Ghost", "ghost@example.com", "555-0000"),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_to_taken_phone_is_conflict(ctx: &TestHarness) {
    create_test_patient(&ctx.db_pool, "Ann", "ann@example.com", "555-0100")
        .await
        .unwrap();
    let bob = create_test_patient(&ctx.db_pool, "Bob", "bob@example.com", "555-0101")
        .await
        .unwrap();

    let response = ctx
        .api()
        .put(
            &format!("/v1/patients/{}", bob.patient_id),
            patient_json("Bob", "bob@example.com", "555-0100"),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "A patient with this phone already exists"
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_soft_deletes(ctx: &TestHarness) {
    let patient = create_test_patient(&ctx.db_pool, "Ann", "ann@example.com", "555-0100")
        .await
        .unwrap();
    let uri = format!("/v1/patients/{}", patient.patient_id);

    let response = ctx.api().delete(&uri).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    // Still readable, just inactive
    let fetched = ctx.api().get(&uri).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["active"], false);

    let status = ctx.api().get(&format!("{}/exists", uri)).await;
    assert_eq!(status.body, json!({ "exists": true, "active": false }));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn delete_missing_patient_is_no_content(ctx: &TestHarness) {
    let response = ctx.api().delete("/v1/patients/777").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Search and exists
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn search_by_name_is_case_insensitive(ctx: &TestHarness) {
    create_test_patient(&ctx.db_pool, "Maria Garcia", "maria@example.com", "555-0100")
        .await
        .unwrap();
    create_test_patient(&ctx.db_pool, "Bob Stone", "bob@example.com", "555-0101")
        .await
        .unwrap();

    let response = ctx.api().get("/v1/patients/search?name=GARC").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalElements"], 1);
    assert_eq!(response.body["content"][0]["name"], "Maria Garcia");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_name_wins_over_phone(ctx: &TestHarness) {
    create_test_patient(&ctx.db_pool, "Maria", "maria@example.com", "555-0100")
        .await
        .unwrap();
    create_test_patient(&ctx.db_pool, "Bob", "bob@example.com", "555-0199")
        .await
        .unwrap();

    let response = ctx
        .api()
        .get("/v1/patients/search?name=bob&phone=0100")
        .await;

    assert_eq!(response.body["totalElements"], 1);
    assert_eq!(response.body["content"][0]["name"], "Bob");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_by_phone_substring(ctx: &TestHarness) {
    create_test_patient(&ctx.db_pool, "Maria", "maria@example.com", "+1-555-234-9981")
        .await
        .unwrap();

    let response = ctx.api().get("/v1/patients/search?phone=234-99").await;
    assert_eq!(response.body["totalElements"], 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_without_criteria_lists_everything(ctx: &TestHarness) {
    create_test_patient(&ctx.db_pool, "Maria", "maria@example.com", "555-0100")
        .await
        .unwrap();
    create_test_patient(&ctx.db_pool, "Bob", "bob@example.com", "555-0101")
        .await
        .unwrap();

    let response = ctx.api().get("/v1/patients/search?size=1").await;

    assert_eq!(response.body["totalElements"], 2);
    assert_eq!(response.body["content"].as_array().unwrap().len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn exists_for_unknown_id(ctx: &TestHarness) {
    let response = ctx.api().get("/v1/patients/31337/exists").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "exists": false }));
}

// =============================================================================
// Cross-cutting
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn correlation_id_is_echoed(ctx: &TestHarness) {
    let response = ctx
        .api()
        .with_correlation_id("req-123")
        .get("/v1/patients")
        .await;

    assert_eq!(response.header("x-correlation-id"), Some("req-123"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_database(ctx: &TestHarness) {
    let response = ctx.api().get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["database"]["status"], "ok");
    assert!(response.body["connection_pool"]["max_connections"].is_u64());
}
