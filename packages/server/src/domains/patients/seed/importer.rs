//! Seed importer - reads seed lines into the patient store
//!
//! Runs once before the server accepts requests. Storage calls are awaited
//! one at a time; nothing else touches the store while it runs.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::parser::{is_header, parse_line};
use super::source::SeedFile;
use crate::domains::patients::models::NewPatient;
use crate::kernel::BasePatientStore;

/// Pending rows are flushed to the store once this many have accumulated
pub const BATCH_SIZE: usize = 500;

/// Outcome of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Data rows read (header and empty lines excluded)
    pub total: usize,
    pub added: usize,
    /// Duplicates and malformed rows
    pub skipped: usize,
}

/// Import seed lines into the store.
///
/// Malformed rows and rows whose email or phone already exists are skipped.
/// A failed batch write aborts the run and is returned as an error; rows of
/// earlier batches stay committed.
pub async fn import_seed<I, S>(lines: I, store: &dyn BasePatientStore) -> Result<SeedSummary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = SeedSummary::default();
    let mut pending: Vec<NewPatient> = Vec::with_capacity(BATCH_SIZE);
    let mut max_id_seen: Option<i64> = None;

    // Values queued in this run; the store cannot see them until the flush
    let mut queued_emails: HashSet<String> = HashSet::new();
    let mut queued_phones: HashSet<String> = HashSet::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();

        if index == 0 && is_header(line) {
            debug!("Skipping seed header line");
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        summary.total += 1;

        let row = match parse_line(line) {
            Ok(row) => row,
            Err(e) => {
                warn!(line_number = index + 1, error = %e, "Skipping malformed seed line: {}", line);
                summary.skipped += 1;
                continue;
            }
        };

        let email_taken = !row.email.is_empty()
            && (queued_emails.contains(&row.email) || store.exists_by_email(&row.email).await?);
        let phone_taken = !row.phone.is_empty()
            && (queued_phones.contains(&row.phone) || store.exists_by_phone(&row.phone).await?);

        if email_taken || phone_taken {
            summary.skipped += 1;
            continue;
        }

        if let Some(id) = row.id {
            max_id_seen = Some(max_id_seen.map_or(id, |max| max.max(id)));
        }

        queued_emails.insert(row.email.clone());
        queued_phones.insert(row.phone.clone());

        let mut patient = NewPatient::new(row.name, row.email, row.phone, row.dob);
        patient.patient_id = row.id;
        pending.push(patient);

        if pending.len() >= BATCH_SIZE {
            summary.added += flush(&mut pending, store).await?;
            queued_emails.clear();
            queued_phones.clear();
        }
    }

    if !pending.is_empty() {
        summary.added += flush(&mut pending, store).await?;
    }

    repair_watermark(max_id_seen, store).await;

    info!(
        total = summary.total,
        added = summary.added,
        skipped = summary.skipped,
        "Seed load finished. Total rows read: {}, added: {}, skipped (duplicates/malformed): {}",
        summary.total,
        summary.added,
        summary.skipped
    );

    Ok(summary)
}

/// Write the pending rows as one atomic batch
async fn flush(pending: &mut Vec<NewPatient>, store: &dyn BasePatientStore) -> Result<usize> {
    let batch: Vec<NewPatient> = std::mem::take(pending);
    let size = batch.len();

    store
        .save_batch(batch)
        .await
        .with_context(|| format!("Failed to save seed batch of {} patients", size))?;

    debug!(size, "Seed batch saved");
    Ok(size)
}

/// Point the id sequence past every stored id. Failures are only logged.
async fn repair_watermark(max_id_seen: Option<i64>, store: &dyn BasePatientStore) {
    let max_id = match max_id_seen {
        Some(max) => Some(max),
        None => match store.find_max_id().await {
            Ok(max) => max,
            Err(e) => {
                warn!(error = %e, "Failed to read max patient id, id watermark left unchanged");
                None
            }
        },
    };

    let Some(max_id) = max_id else {
        return;
    };

    let Some(next) = max_id.checked_add(1) else {
        warn!(max_id, "Max patient id is at the id limit, id watermark left unchanged");
        return;
    };
    match store.set_next_generated_id(next).await {
        Ok(()) => info!("Set patients id watermark to {}", next),
        Err(e) => warn!(error = %e, "Failed to set patients id watermark to {}", next),
    }
}

/// Locate the seed file and import it. Never fails: every problem is logged.
///
/// Returns the summary when an import ran to completion.
pub async fn seed_on_startup(
    seed_root: Option<&Path>,
    store: &dyn BasePatientStore,
) -> Option<SeedSummary> {
    let file = match SeedFile::locate(seed_root) {
        Ok(Some(file)) => file,
        Ok(None) => {
            info!("Seed file not found: seed/hms_patients.csv or seed/patients.csv - skipping seed load");
            return None;
        }
        Err(e) => {
            error!(error = ?e, "Failed to load seed data - continuing startup");
            return None;
        }
    };

    info!(file = %file.name, origin = %file.origin, "Loading seed data");

    match import_seed(file.lines(), store).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            error!(error = ?e, "Failed to load seed data - continuing startup");
            None
        }
    }
}
