// Common types and utilities shared across the application

pub mod pagination;
pub mod pii;

pub use pagination::{Page, PageRequest, PaginationArgs, PaginationError};
