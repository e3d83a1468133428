//! Annotation source clients.
//!
//! Clients return the parsed payload untouched. Failures are plain errors;
//! `resolve_payload` turns them into an absent source before the payload
//! reaches the adapters.

pub mod favor;
pub mod gtex;

pub use favor::FavorClient;
pub use gtex::{GtexClient, GtexSettings};

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

/// A functional-annotation service keyed by rsID.
#[async_trait]
pub trait FunctionalAnnotationSource: Send + Sync {
    /// Fetch the raw annotation payload. `Ok(None)` means the variant is unknown.
    async fn fetch_annotation(&self, rsid: &str) -> anyhow::Result<Option<Value>>;
}

/// An expression-QTL service keyed by rsID.
#[async_trait]
pub trait ExpressionSource: Send + Sync {
    /// Fetch the raw association payload. `Ok(None)` means the variant is unknown.
    async fn fetch_associations(&self, rsid: &str) -> anyhow::Result<Option<Value>>;
}

/// Collapse a fetch result into an optional payload, logging failures.
pub fn resolve_payload(source: &str, result: anyhow::Result<Option<Value>>) -> Option<Value> {
    match result {
        Ok(Some(payload)) => Some(payload),
        Ok(None) => {
            warn!(source, "No record returned, treating source as absent");
            None
        }
        Err(e) => {
            warn!(source, error = %e, "Fetch failed, treating source as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_payload_passes_through() {
        let payload = resolve_payload("favor", Ok(Some(json!([{"rsid": "rs1"}]))));
        assert_eq!(payload, Some(json!([{"rsid": "rs1"}])));
    }

    #[test]
    fn test_resolve_payload_error_is_absent() {
        let payload = resolve_payload("gtex", Err(anyhow::anyhow!("connection refused")));
        assert!(payload.is_none());
        assert!(resolve_payload("gtex", Ok(None)).is_none());
    }
}
