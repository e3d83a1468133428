//! varexplorer-merge — Canonical variant record, merge engine, and exports.
//!
//! Synchronous and stateless: callers hand in already-adapted source records
//! and get back an immutable `CanonicalRecord`.

pub mod error;
pub mod canonical;
pub mod merge;
pub mod export;

pub use canonical::{CanonicalRecord, EqtlAssociation, EqtlSection, FunctionalAnnotation, Summary, TopEqtl};
pub use error::{ExportError, MergeError};
pub use export::{flatten, from_json, to_csv, to_json, to_json_compact, FlattenedRow};
pub use merge::{merge_variant_data, merge_variant_data_at};
