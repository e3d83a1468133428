//! The canonical merged record and its nested sections.
//!
//! Every optional group is an `Option` at its own level, so an absent group
//! serializes as `null` and parses back as absent.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use varexplorer_common::{Field, RawValue};

/// Merged view of one variant across all sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Caller-supplied identifier, never derived from source payloads
    pub variant_id: String,
    pub timestamp: DateTime<Utc>,
    pub favor_annotation: Option<FunctionalAnnotation>,
    pub gtex_eqtls: Option<EqtlSection>,
    pub summary: Summary,
}

// ── Functional section ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionalAnnotation {
    pub basic_info: Option<BasicInfo>,
    pub pathogenicity_scores: Option<PathogenicityScores>,
    pub population_frequencies: Option<PopulationFrequencies>,
    pub clinical: Option<Clinical>,
    pub conservation: Option<Conservation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub rsid: Field,
    pub chromosome: Field,
    pub position: Field,
    pub variant_vcf: Field,
    pub gene: Field,
    pub exonic_category: Field,
    pub protein_variant: Field,
    pub hgvsc: Field,
    pub hgvsp: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathogenicityScores {
    pub cadd: Option<CaddScores>,
    pub alphamissense: Option<AlphaMissenseScores>,
    pub sift: Option<SiftScores>,
    pub polyphen: Option<PolyphenScores>,
    pub mutation_taster: Option<MutationTasterScores>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaddScores {
    pub phred: Field,
    pub raw: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlphaMissenseScores {
    pub pathogenicity: Field,
    pub class: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiftScores {
    pub score: Field,
    pub category: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyphenScores {
    pub hdiv_score: Field,
    pub hvar_score: Field,
    pub category: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationTasterScores {
    pub score: Field,
    pub prediction: Field,
}

/// gnomAD allele frequencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationFrequencies {
    pub total: Field,
    pub afr: Field,
    pub amr: Field,
    pub eas: Field,
    pub nfe: Field,
    pub fin: Field,
    pub sas: Field,
    pub asj: Field,
    pub ami: Field,
    pub oth: Field,
}

/// ClinVar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clinical {
    pub significance: Field,
    pub disease_name: Field,
    pub review_status: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conservation {
    pub gerp_rs: Field,
    pub gerp_s: Field,
    pub gerp_n: Field,
    pub priphylop: Field,
    pub mamphylop: Field,
    pub verphylop: Field,
}

// ── Expression section ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EqtlSection {
    pub total_associations: usize,
    pub associations: Vec<EqtlAssociation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EqtlAssociation {
    pub gene: Option<String>,
    pub tissue: Option<String>,
    pub effect_size: Option<f64>,
    pub p_value: Option<f64>,
    pub gencode_id: Option<String>,
}

// ── Summary ───────────────────────────────────────────────────────────────────

const GENE: &str = "gene";
const GLOBAL_AF: &str = "global_af";
const CLINVAR: &str = "clinvar";
const TOP_EQTL_GENE: &str = "top_eqtl_gene";
const TOP_EQTL_TISSUE: &str = "top_eqtl_tissue";
const TOP_EQTL_PVALUE: &str = "top_eqtl_pvalue";

/// Cross-source summary.
///
/// Serialized as a flat mapping in which a key is missing when its part is
/// absent: `gene`, `global_af`, `clinvar` only with a functional section,
/// `top_eqtl_*` only with a top association.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SummaryMap", into = "SummaryMap")]
pub struct Summary {
    pub functional: Option<FunctionalSummary>,
    pub top_eqtl: Option<TopEqtl>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionalSummary {
    pub gene: Field,
    pub global_af: Field,
    pub clinvar: Field,
}

/// The most significant association.
#[derive(Debug, Clone, PartialEq)]
pub struct TopEqtl {
    pub gene: Option<String>,
    pub tissue: Option<String>,
    pub p_value: f64,
}

impl Summary {
    /// Keys present in the serialized mapping, in serialization order.
    pub fn keys(&self) -> Vec<String> {
        SummaryMap::from(self.clone()).0.into_keys().collect()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct SummaryMap(BTreeMap<String, Field>);

impl From<Summary> for SummaryMap {
    fn from(summary: Summary) -> Self {
        let mut map = BTreeMap::new();
        if let Some(f) = summary.functional {
            map.insert(GENE.to_string(), f.gene);
            map.insert(GLOBAL_AF.to_string(), f.global_af);
            map.insert(CLINVAR.to_string(), f.clinvar);
        }
        if let Some(top) = summary.top_eqtl {
            map.insert(TOP_EQTL_GENE.to_string(), top.gene.map(RawValue::Text));
            map.insert(TOP_EQTL_TISSUE.to_string(), top.tissue.map(RawValue::Text));
            map.insert(TOP_EQTL_PVALUE.to_string(), RawValue::from_f64(top.p_value));
        }
        SummaryMap(map)
    }
}

impl TryFrom<SummaryMap> for Summary {
    type Error = String;

    fn try_from(SummaryMap(mut map): SummaryMap) -> Result<Self, Self::Error> {
        let functional = if map.contains_key(GENE) {
            Some(FunctionalSummary {
                gene: map.remove(GENE).flatten(),
                global_af: map.remove(GLOBAL_AF).flatten(),
                clinvar: map.remove(CLINVAR).flatten(),
            })
        } else {
            None
        };

        let top_eqtl = if map.contains_key(TOP_EQTL_GENE) {
            let p_value = map
                .remove(TOP_EQTL_PVALUE)
                .flatten()
                .and_then(|v| v.as_number())
                .ok_or_else(|| format!("{} must be a number", TOP_EQTL_PVALUE))?;
            Some(TopEqtl {
                gene: text_of(map.remove(TOP_EQTL_GENE).flatten()),
                tissue: text_of(map.remove(TOP_EQTL_TISSUE).flatten()),
                p_value,
            })
        } else {
            None
        };

        Ok(Summary { functional, top_eqtl })
    }
}

fn text_of(value: Field) -> Option<String> {
    value.map(|v| match v {
        RawValue::Text(s) => s,
        other => other.to_display_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_summary_is_empty_mapping() {
        let value = serde_json::to_value(Summary::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_functional_summary_keeps_null_keys() {
        let summary = Summary {
            functional: Some(FunctionalSummary { gene: Some(RawValue::text("APOE")), ..Default::default() }),
            top_eqtl: None,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value, json!({ "gene": "APOE", "global_af": null, "clinvar": null }));
        assert_eq!(summary.keys(), vec!["clinvar", "gene", "global_af"]);

        let back: Summary = serde_json::from_value(value).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_top_eqtl_round_trip() {
        let summary = Summary {
            functional: None,
            top_eqtl: Some(TopEqtl {
                gene: Some("APOC1".to_string()),
                tissue: None,
                p_value: 2.3e-5,
            }),
        };
        let text = serde_json::to_string(&summary).unwrap();
        let back: Summary = serde_json::from_str(&text).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_top_eqtl_pvalue_must_be_numeric() {
        let bad = json!({ "top_eqtl_gene": "APOC1", "top_eqtl_tissue": "Liver", "top_eqtl_pvalue": "low" });
        assert!(serde_json::from_value::<Summary>(bad).is_err());
    }
}
