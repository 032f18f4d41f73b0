//! Domain models for the CareFlow dashboard.

mod patient;
mod roster;

pub use patient::*;
pub use roster::*;
