//! varexplorer-common — Shared types, errors, and the HTTP client used across all varexplorer crates.

pub mod error;
pub mod values;
pub mod sandbox;

// Re-export commonly used types
pub use error::{Result, VarExplorerError};
pub use values::{Field, RawValue};
