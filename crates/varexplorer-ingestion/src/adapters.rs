//! Structural adapters from raw source payloads to source records.
//!
//! Adapters only pick fields by fixed key. They never coerce types (a score
//! delivered as text stays text) and never fail: a missing key becomes an
//! absent field, and an unusable payload becomes an absent record.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;
use varexplorer_common::{Field, RawValue};

use crate::keys::{favor, gtex};

// ── FAVOR ─────────────────────────────────────────────────────────────────────

/// Fields extracted from one FAVOR annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavorRecord {
    fields: BTreeMap<&'static str, RawValue>,
}

impl FavorRecord {
    /// Value for a FAVOR key, if the payload carried a non-null value.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Owned copy of a field, for building output records.
    pub fn field(&self, key: &str) -> Field {
        self.get(key).cloned()
    }

    /// True when any of `keys` carries a value.
    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.fields.contains_key(*k))
    }

    /// Number of extracted keys with a value.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Adapt a FAVOR payload.
///
/// Accepts the usual one-element list, or a bare mapping. Returns `None` for
/// an absent payload, an empty list, a non-mapping first element, or an
/// error-shaped mapping (`{"error": ...}`).
pub fn adapt_favor(payload: Option<&Value>) -> Option<FavorRecord> {
    let object = match payload? {
        Value::Array(items) => items.first()?.as_object()?,
        Value::Object(map) => map,
        other => {
            debug!(kind = json_kind(other), "FAVOR payload is neither a list nor a mapping");
            return None;
        }
    };

    if is_error_shaped(object) {
        debug!("FAVOR payload is error-shaped, treating as absent");
        return None;
    }

    let fields = favor::ALL
        .iter()
        .filter_map(|&key| {
            let value = RawValue::from_json(object.get(key)?)?;
            Some((key, value))
        })
        .collect();

    Some(FavorRecord { fields })
}

// ── GTEx ──────────────────────────────────────────────────────────────────────

/// One single-tissue eQTL association as delivered by GTEx.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GtexAssociation {
    pub snp_id: Field,
    pub gene_symbol: Field,
    pub tissue: Field,
    pub nes: Field,
    pub p_value: Field,
    pub gencode_id: Field,
}

/// An expression-association record. `associations` keeps input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GtexRecord {
    pub rsid: Field,
    pub variant_id: Field,
    pub associations: Vec<GtexAssociation>,
    pub paging: Field,
}

/// Adapt a GTEx payload.
///
/// Absent unless the payload is a mapping containing an `eqtl_results` list.
/// An empty list is a present record with zero associations. List entries
/// that are not mappings are skipped.
pub fn adapt_gtex(payload: Option<&Value>) -> Option<GtexRecord> {
    let object = payload?.as_object()?;

    let Some(results) = object.get(gtex::EQTL_RESULTS) else {
        if is_error_shaped(object) {
            debug!("GTEx payload is error-shaped, treating as absent");
        }
        return None;
    };

    let Some(entries) = results.as_array() else {
        debug!(kind = json_kind(results), "GTEx eqtl_results is not a list, treating as absent");
        return None;
    };

    let associations: Vec<GtexAssociation> = entries
        .iter()
        .filter_map(|entry| match entry.as_object() {
            Some(map) => Some(adapt_association(map)),
            None => {
                debug!(kind = json_kind(entry), "Skipping non-mapping eQTL entry");
                None
            }
        })
        .collect();

    debug!(count = associations.len(), "Adapted GTEx associations");

    Some(GtexRecord {
        rsid: pick(object, gtex::RSID),
        variant_id: pick(object, gtex::VARIANT_ID),
        associations,
        paging: pick(object, gtex::PAGING),
    })
}

fn adapt_association(map: &Map<String, Value>) -> GtexAssociation {
    GtexAssociation {
        snp_id: pick(map, gtex::SNP_ID),
        gene_symbol: pick(map, gtex::GENE_SYMBOL),
        tissue: pick(map, gtex::TISSUE),
        nes: pick(map, gtex::NES),
        p_value: pick(map, gtex::P_VALUE),
        gencode_id: pick(map, gtex::GENCODE_ID),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn pick(map: &Map<String, Value>, key: &str) -> Field {
    map.get(key).and_then(RawValue::from_json)
}

fn is_error_shaped(map: &Map<String, Value>) -> bool {
    map.contains_key("error")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
