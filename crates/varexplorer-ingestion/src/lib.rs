//! varexplorer-ingestion — Source clients and payload adapters.
//! - FAVOR functional annotation (rsID lookup)
//! - GTEx v2 single-tissue eQTL associations (two-step lookup)
//! - Structural adapters from raw payloads to `FavorRecord` / `GtexRecord`

pub mod keys;
pub mod adapters;
pub mod sources;

pub use adapters::{adapt_favor, adapt_gtex, FavorRecord, GtexAssociation, GtexRecord};
