use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgExecutor, PgPool};

use crate::common::{Page, PageRequest};

/// Patient model - SQL persistence layer
///
/// Rows are never deleted; `active = false` marks a soft-deleted patient.
/// `email` and `phone` are unique across active and inactive rows.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Patient {
    pub patient_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

/// A patient that has not been stored yet.
///
/// `patient_id` is only set when the id comes from seed data; otherwise the
/// table's sequence assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub patient_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

/// Fields a full update replaces. `created_at` is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientChanges {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: Option<NaiveDate>,
    pub active: bool,
}

impl NewPatient {
    /// Build an active patient created now.
    pub fn new(name: String, email: String, phone: String, dob: Option<NaiveDate>) -> Self {
        Self {
            patient_id: None,
            name,
            email,
            phone,
            dob,
            created_at: Utc::now(),
            active: true,
        }
    }

    /// Insert the patient, using the explicit id when present
    pub async fn insert<'e, E>(&self, executor: E) -> Result<Patient>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Patient>(
            "INSERT INTO patients (patient_id, name, email, phone, dob, created_at, active)
             VALUES (
                COALESCE($1, nextval(pg_get_serial_sequence('patients', 'patient_id'))),
                $2, $3, $4, $5, $6, $7
             )
             RETURNING *",
        )
        .bind(self.patient_id)
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.phone)
        .bind(self.dob)
        .bind(self.created_at)
        .bind(self.active)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Insert every row in one transaction; all or nothing
    pub async fn insert_batch(rows: &[NewPatient], pool: &PgPool) -> Result<usize> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for row in rows {
            row.insert(&mut *tx).await?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

impl Patient {
    /// Find patient by ID
    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM patients WHERE patient_id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find all patients, newest first
    pub async fn find_paginated(request: PageRequest, pool: &PgPool) -> Result<Page<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            "SELECT * FROM patients
             ORDER BY created_at DESC, patient_id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(pool)
            .await?;

        Ok(Page::new(rows, request, total))
    }

    /// Case-insensitive substring search on name
    pub async fn search_by_name(
        name: &str,
        request: PageRequest,
        pool: &PgPool,
    ) -> Result<Page<Self>> {
        let pattern = contains_pattern(name);

        let rows = sqlx::query_as::<_, Self>(
            "SELECT * FROM patients
             WHERE name ILIKE $1
             ORDER BY patient_id
             LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE name ILIKE $1")
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        Ok(Page::new(rows, request, total))
    }

    /// Substring search on phone
    pub async fn search_by_phone(
        phone: &str,
        request: PageRequest,
        pool: &PgPool,
    ) -> Result<Page<Self>> {
        let pattern = contains_pattern(phone);

        let rows = sqlx::query_as::<_, Self>(
            "SELECT * FROM patients
             WHERE phone LIKE $1
             ORDER BY patient_id
             LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE phone LIKE $1")
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        Ok(Page::new(rows, request, total))
    }

    /// Replace the mutable fields; `None` when the patient does not exist
    pub async fn update(id: i64, changes: &PatientChanges, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE patients
             SET name = $2, email = $3, phone = $4, dob = $5, active = $6
             WHERE patient_id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(changes.dob)
        .bind(changes.active)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Soft delete. Returns false when no row matched.
    pub async fn deactivate(id: i64, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("UPDATE patients SET active = false WHERE patient_id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn exists_by_email(email: &str, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM patients WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn exists_by_phone(phone: &str, pool: &PgPool) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM patients WHERE phone = $1)")
            .bind(phone)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Highest stored id, active or not
    pub async fn find_max_id(pool: &PgPool) -> Result<Option<i64>> {
        sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(patient_id) FROM patients")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Make the id sequence hand out `next` on its next call
    pub async fn set_next_id(next: i64, pool: &PgPool) -> Result<()> {
        sqlx::query("SELECT setval(pg_get_serial_sequence('patients', 'patient_id'), $1, false)")
            .bind(next)
            .execute(pool)
            .await?;

        Ok(())
    }
}

/// `%term%` with LIKE wildcards in the term escaped
fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
