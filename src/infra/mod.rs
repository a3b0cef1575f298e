//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod index;
pub mod telemetry;
