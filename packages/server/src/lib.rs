// Patient Registry - API Core
//
// This crate provides the HTTP registry for patient records: CRUD, soft-delete,
// pagination and search over a Postgres table, a PII-masking payload logger,
// and a one-shot CSV seed importer that runs before the server starts.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
