//! Kernel module - server infrastructure and dependencies.

pub mod patient_store;
pub mod test_dependencies;
pub mod traits;

pub use patient_store::PgPatientStore;
pub use test_dependencies::MockPatientStore;
pub use traits::*;
