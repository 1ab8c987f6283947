//! Patient domain - registry of patient records
//!
//! Architecture:
//!   HTTP route → activity → `BasePatientStore`
//!   startup → seed importer → `BasePatientStore`

pub mod activities;
pub mod data;
pub mod errors;
pub mod models;
pub mod seed;

// Re-export commonly used types
pub use data::{PatientData, PatientInput};
pub use errors::PatientError;
pub use models::patient::Patient;
