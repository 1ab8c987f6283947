//! Seed import - one-shot bulk load of patients from a CSV file at startup
//!
//! Lines are split naively on `,` (quoted fields are not supported). Two
//! layouts are accepted and told apart only by whether the first column
//! parses as an integer:
//!
//! - `id,name,email,phone,dob,created_at`
//! - `name,email,phone,dob,created_at`
//!
//! Rows whose email or phone is already stored are skipped, so importing the
//! same file twice adds nothing the second time.

pub mod importer;
pub mod parser;
pub mod report;
pub mod source;

pub use importer::{import_seed, seed_on_startup, SeedSummary, BATCH_SIZE};
pub use parser::{is_header, parse_line, SeedLayout, SeedLineError, SeedRow};
pub use report::{inspect_seed, RejectedLine, SeedReport};
pub use source::{SeedFile, SeedOrigin, SEED_RESOURCE_NAMES};
