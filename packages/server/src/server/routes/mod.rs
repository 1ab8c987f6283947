// HTTP routes
pub mod health;
pub mod patients;

pub use health::*;
pub use patients::*;
