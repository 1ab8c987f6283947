// Business domains
pub mod patients;
