pub mod patient;

pub use patient::{PatientData, PatientInput};
