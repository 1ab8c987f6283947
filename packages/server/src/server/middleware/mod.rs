// HTTP middleware
pub mod correlation;
pub mod payload_logging;

pub use correlation::*;
pub use payload_logging::*;
