//! Export formatters: nested JSON and flattened CSV.
//!
//! The JSON form is lossless and parses back into an equal `CanonicalRecord`.
//! The CSV form is one row per eQTL association with every functional and
//! summary column repeated; structured values become their JSON text.

use serde::Serialize;
use tracing::debug;
use varexplorer_common::{Field, RawValue};

use crate::canonical::*;
use crate::error::ExportError;

// ── Nested ────────────────────────────────────────────────────────────────────

/// Pretty-printed nested JSON.
pub fn to_json(record: &CanonicalRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Single-line nested JSON.
pub fn to_json_compact(record: &CanonicalRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string(record)?)
}

pub fn from_json(text: &str) -> Result<CanonicalRecord, ExportError> {
    Ok(serde_json::from_str(text)?)
}

// ── Flattened ─────────────────────────────────────────────────────────────────

/// One CSV row. Field order is the column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlattenedRow {
    pub variant_id: String,
    pub timestamp: String,

    // basic_info
    pub rsid: Field,
    pub chromosome: Field,
    pub position: Field,
    pub variant_vcf: Field,
    pub gene: Field,
    pub exonic_category: Field,
    pub protein_variant: Field,
    pub hgvsc: Field,
    pub hgvsp: Field,

    // pathogenicity_scores
    pub cadd_phred: Field,
    pub cadd_raw: Field,
    pub alphamissense_pathogenicity: Field,
    pub alphamissense_class: Field,
    pub sift_score: Field,
    pub sift_category: Field,
    pub polyphen_hdiv_score: Field,
    pub polyphen_hvar_score: Field,
    pub polyphen_category: Field,
    pub mutation_taster_score: Field,
    pub mutation_taster_prediction: Field,

    // population_frequencies
    pub af_total: Field,
    pub af_afr: Field,
    pub af_amr: Field,
    pub af_eas: Field,
    pub af_nfe: Field,
    pub af_fin: Field,
    pub af_sas: Field,
    pub af_asj: Field,
    pub af_ami: Field,
    pub af_oth: Field,

    // clinical
    pub clinvar_significance: Field,
    pub clinvar_disease_name: Field,
    pub clinvar_review_status: Field,

    // conservation
    pub gerp_rs: Field,
    pub gerp_s: Field,
    pub gerp_n: Field,
    pub priphylop: Field,
    pub mamphylop: Field,
    pub verphylop: Field,

    // summary
    pub summary_gene: Field,
    pub summary_global_af: Field,
    pub summary_clinvar: Field,
    pub top_eqtl_gene: Option<String>,
    pub top_eqtl_tissue: Option<String>,
    pub top_eqtl_pvalue: Option<f64>,

    // association
    pub eqtl_gene: Option<String>,
    pub eqtl_tissue: Option<String>,
    pub eqtl_effect_size: Option<f64>,
    pub eqtl_p_value: Option<f64>,
}

/// Flatten a record into `max(1, associations)` rows.
///
/// Absent groups and sub-groups contribute nulls.
pub fn flatten(record: &CanonicalRecord) -> Vec<FlattenedRow> {
    let base = base_row(record);

    let associations = record
        .gtex_eqtls
        .as_ref()
        .map(|s| s.associations.as_slice())
        .unwrap_or_default();

    if associations.is_empty() {
        return vec![base];
    }

    associations
        .iter()
        .map(|assoc| FlattenedRow {
            eqtl_gene: assoc.gene.clone(),
            eqtl_tissue: assoc.tissue.clone(),
            eqtl_effect_size: assoc.effect_size,
            eqtl_p_value: assoc.p_value,
            ..base.clone()
        })
        .collect()
}

fn base_row(record: &CanonicalRecord) -> FlattenedRow {
    let mut row = FlattenedRow {
        variant_id: record.variant_id.clone(),
        timestamp: record.timestamp.to_rfc3339(),
        ..Default::default()
    };

    if let Some(annotation) = &record.favor_annotation {
        fill_functional(&mut row, annotation);
    }

    if let Some(f) = &record.summary.functional {
        row.summary_gene = scalar(&f.gene);
        row.summary_global_af = scalar(&f.global_af);
        row.summary_clinvar = scalar(&f.clinvar);
    }
    if let Some(top) = &record.summary.top_eqtl {
        row.top_eqtl_gene = top.gene.clone();
        row.top_eqtl_tissue = top.tissue.clone();
        row.top_eqtl_pvalue = Some(top.p_value);
    }

    row
}

fn fill_functional(row: &mut FlattenedRow, annotation: &FunctionalAnnotation) {
    if let Some(b) = &annotation.basic_info {
        row.rsid = scalar(&b.rsid);
        row.chromosome = scalar(&b.chromosome);
        row.position = scalar(&b.position);
        row.variant_vcf = scalar(&b.variant_vcf);
        row.gene = scalar(&b.gene);
        row.exonic_category = scalar(&b.exonic_category);
        row.protein_variant = scalar(&b.protein_variant);
        row.hgvsc = scalar(&b.hgvsc);
        row.hgvsp = scalar(&b.hgvsp);
    }

    if let Some(scores) = &annotation.pathogenicity_scores {
        if let Some(c) = &scores.cadd {
            row.cadd_phred = scalar(&c.phred);
            row.cadd_raw = scalar(&c.raw);
        }
        if let Some(am) = &scores.alphamissense {
            row.alphamissense_pathogenicity = scalar(&am.pathogenicity);
            row.alphamissense_class = scalar(&am.class);
        }
        if let Some(s) = &scores.sift {
            row.sift_score = scalar(&s.score);
            row.sift_category = scalar(&s.category);
        }
        if let Some(p) = &scores.polyphen {
            row.polyphen_hdiv_score = scalar(&p.hdiv_score);
            row.polyphen_hvar_score = scalar(&p.hvar_score);
            row.polyphen_category = scalar(&p.category);
        }
        if let Some(mt) = &scores.mutation_taster {
            row.mutation_taster_score = scalar(&mt.score);
            row.mutation_taster_prediction = scalar(&mt.prediction);
        }
    }

    if let Some(af) = &annotation.population_frequencies {
        row.af_total = scalar(&af.total);
        row.af_afr = scalar(&af.afr);
        row.af_amr = scalar(&af.amr);
        row.af_eas = scalar(&af.eas);
        row.af_nfe = scalar(&af.nfe);
        row.af_fin = scalar(&af.fin);
        row.af_sas = scalar(&af.sas);
        row.af_asj = scalar(&af.asj);
        row.af_ami = scalar(&af.ami);
        row.af_oth = scalar(&af.oth);
    }

    if let Some(c) = &annotation.clinical {
        row.clinvar_significance = scalar(&c.significance);
        row.clinvar_disease_name = scalar(&c.disease_name);
        row.clinvar_review_status = scalar(&c.review_status);
    }

    if let Some(c) = &annotation.conservation {
        row.gerp_rs = scalar(&c.gerp_rs);
        row.gerp_s = scalar(&c.gerp_s);
        row.gerp_n = scalar(&c.gerp_n);
        row.priphylop = scalar(&c.priphylop);
        row.mamphylop = scalar(&c.mamphylop);
        row.verphylop = scalar(&c.verphylop);
    }
}

fn scalar(field: &Field) -> Field {
    field.clone().map(RawValue::into_scalar)
}

/// Flattened rows as CSV text with a header line.
pub fn to_csv(record: &CanonicalRecord) -> Result<String, ExportError> {
    rows_to_csv(&flatten(record))
}

pub fn rows_to_csv(rows: &[FlattenedRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    debug!(rows = rows.len(), bytes = bytes.len(), "CSV export");
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use varexplorer_ingestion::adapt_favor;

    use crate::merge::merge_variant_data;

    #[test]
    fn test_structured_values_become_text_in_rows() {
        let favor = adapt_favor(Some(&json!([{ "clndn": ["Alzheimer_disease", "APOE4"] }]))).unwrap();
        let record = merge_variant_data(Some(&favor), None, "rs429358").unwrap();

        let rows = flatten(&record);
        assert_eq!(
            rows[0].clinvar_disease_name,
            Some(RawValue::text(r#"["Alzheimer_disease","APOE4"]"#))
        );

        // The nested form keeps the list
        let nested: serde_json::Value = serde_json::from_str(&to_json(&record).unwrap()).unwrap();
        assert_eq!(
            nested["favor_annotation"]["clinical"]["disease_name"],
            json!(["Alzheimer_disease", "APOE4"])
        );
    }

    #[test]
    fn test_no_sources_single_row() {
        let record = merge_variant_data(None, None, "rs1").unwrap();
        let rows = flatten(&record);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].variant_id, "rs1");
        assert!(rows[0].gene.is_none());
        assert!(rows[0].eqtl_gene.is_none());
    }

    #[test]
    fn test_absent_subgroup_yields_nulls() {
        let favor = adapt_favor(Some(&json!([{ "sift_score": 0.03 }]))).unwrap();
        let record = merge_variant_data(Some(&favor), None, "rs1").unwrap();
        let row = &flatten(&record)[0];
        assert_eq!(row.sift_score, RawValue::from_f64(0.03));
        assert!(row.cadd_phred.is_none());
        assert!(row.polyphen_category.is_none());
    }

    #[test]
    fn test_compact_json_is_single_line() {
        let record = merge_variant_data(None, None, "rs1").unwrap();
        let text = to_json_compact(&record).unwrap();
        assert!(!text.contains('\n'));
        assert_eq!(from_json(&text).unwrap(), record);
    }
}
