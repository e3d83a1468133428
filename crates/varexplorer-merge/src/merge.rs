//! Merge engine: adapted source records + caller identifier → `CanonicalRecord`.

use chrono::{DateTime, Utc};
use tracing::debug;
use varexplorer_common::RawValue;
use varexplorer_ingestion::keys::favor;
use varexplorer_ingestion::{FavorRecord, GtexAssociation, GtexRecord};

use crate::canonical::*;
use crate::error::MergeError;

/// Merge both sources under `variant_id`, stamped with the current time.
///
/// Either source may be absent. The only failure is a blank identifier.
pub fn merge_variant_data(
    functional: Option<&FavorRecord>,
    expression: Option<&GtexRecord>,
    variant_id: &str,
) -> Result<CanonicalRecord, MergeError> {
    merge_variant_data_at(functional, expression, variant_id, Utc::now())
}

/// As [`merge_variant_data`], with an explicit creation time.
pub fn merge_variant_data_at(
    functional: Option<&FavorRecord>,
    expression: Option<&GtexRecord>,
    variant_id: &str,
    timestamp: DateTime<Utc>,
) -> Result<CanonicalRecord, MergeError> {
    if variant_id.trim().is_empty() {
        return Err(MergeError::MissingIdentifier);
    }

    let favor_annotation = functional.map(build_functional);
    let gtex_eqtls = expression.map(build_eqtls);

    let summary = Summary {
        functional: functional.map(|record| FunctionalSummary {
            gene: record.field(favor::GENE),
            global_af: record.field(favor::AF_TOTAL),
            clinvar: record.field(favor::CLNSIG),
        }),
        top_eqtl: gtex_eqtls.as_ref().and_then(top_association),
    };

    debug!(
        variant_id,
        functional = favor_annotation.is_some(),
        associations = gtex_eqtls.as_ref().map(|s| s.total_associations),
        "Merged variant record"
    );

    Ok(CanonicalRecord {
        variant_id: variant_id.to_string(),
        timestamp,
        favor_annotation,
        gtex_eqtls,
        summary,
    })
}

// ── Functional grouping ───────────────────────────────────────────────────────

fn build_functional(record: &FavorRecord) -> FunctionalAnnotation {
    let f = |key: &str| record.field(key);

    let basic_info = record
        .has_any(&[
            favor::RSID, favor::CHROMOSOME, favor::POSITION, favor::VARIANT_VCF,
            favor::GENE, favor::EXONIC_CATEGORY, favor::PROTEIN_VARIANT, favor::HGVSC, favor::HGVSP,
        ])
        .then(|| BasicInfo {
            rsid: f(favor::RSID),
            chromosome: f(favor::CHROMOSOME),
            position: f(favor::POSITION),
            variant_vcf: f(favor::VARIANT_VCF),
            gene: f(favor::GENE),
            exonic_category: f(favor::EXONIC_CATEGORY),
            protein_variant: f(favor::PROTEIN_VARIANT),
            hgvsc: f(favor::HGVSC),
            hgvsp: f(favor::HGVSP),
        });

    let cadd = record.has_any(&[favor::CADD_PHRED, favor::CADD_RAW]).then(|| CaddScores {
        phred: f(favor::CADD_PHRED),
        raw: f(favor::CADD_RAW),
    });
    let alphamissense = record
        .has_any(&[favor::AM_PATHOGENICITY, favor::AM_CLASS])
        .then(|| AlphaMissenseScores {
            pathogenicity: f(favor::AM_PATHOGENICITY),
            class: f(favor::AM_CLASS),
        });
    let sift = record.has_any(&[favor::SIFT_SCORE, favor::SIFT_CATEGORY]).then(|| SiftScores {
        score: f(favor::SIFT_SCORE),
        category: f(favor::SIFT_CATEGORY),
    });
    let polyphen = record
        .has_any(&[favor::POLYPHEN_HDIV, favor::POLYPHEN_HVAR, favor::POLYPHEN_CATEGORY])
        .then(|| PolyphenScores {
            hdiv_score: f(favor::POLYPHEN_HDIV),
            hvar_score: f(favor::POLYPHEN_HVAR),
            category: f(favor::POLYPHEN_CATEGORY),
        });
    let mutation_taster = record
        .has_any(&[favor::MUTATION_TASTER_SCORE, favor::MUTATION_TASTER_PRED])
        .then(|| MutationTasterScores {
            score: f(favor::MUTATION_TASTER_SCORE),
            prediction: f(favor::MUTATION_TASTER_PRED),
        });

    let any_score = cadd.is_some()
        || alphamissense.is_some()
        || sift.is_some()
        || polyphen.is_some()
        || mutation_taster.is_some();
    let pathogenicity_scores = any_score.then_some(PathogenicityScores {
        cadd,
        alphamissense,
        sift,
        polyphen,
        mutation_taster,
    });

    let population_frequencies = record
        .has_any(&[
            favor::AF_TOTAL, favor::AF_AFR, favor::AF_AMR, favor::AF_EAS, favor::AF_NFE,
            favor::AF_FIN, favor::AF_SAS, favor::AF_ASJ, favor::AF_AMI, favor::AF_OTH,
        ])
        .then(|| PopulationFrequencies {
            total: f(favor::AF_TOTAL),
            afr: f(favor::AF_AFR),
            amr: f(favor::AF_AMR),
            eas: f(favor::AF_EAS),
            nfe: f(favor::AF_NFE),
            fin: f(favor::AF_FIN),
            sas: f(favor::AF_SAS),
            asj: f(favor::AF_ASJ),
            ami: f(favor::AF_AMI),
            oth: f(favor::AF_OTH),
        });

    let clinical = record
        .has_any(&[favor::CLNSIG, favor::CLNDN, favor::CLNREVSTAT])
        .then(|| Clinical {
            significance: f(favor::CLNSIG),
            disease_name: f(favor::CLNDN),
            review_status: f(favor::CLNREVSTAT),
        });

    let conservation = record
        .has_any(&[
            favor::GERP_RS, favor::GERP_S, favor::GERP_N,
            favor::PRIPHYLOP, favor::MAMPHYLOP, favor::VERPHYLOP,
        ])
        .then(|| Conservation {
            gerp_rs: f(favor::GERP_RS),
            gerp_s: f(favor::GERP_S),
            gerp_n: f(favor::GERP_N),
            priphylop: f(favor::PRIPHYLOP),
            mamphylop: f(favor::MAMPHYLOP),
            verphylop: f(favor::VERPHYLOP),
        });

    FunctionalAnnotation {
        basic_info,
        pathogenicity_scores,
        population_frequencies,
        clinical,
        conservation,
    }
}

// ── Expression projection ─────────────────────────────────────────────────────

fn build_eqtls(record: &GtexRecord) -> EqtlSection {
    let associations: Vec<EqtlAssociation> = record.associations.iter().map(project).collect();
    EqtlSection {
        total_associations: associations.len(),
        associations,
    }
}

fn project(assoc: &GtexAssociation) -> EqtlAssociation {
    EqtlAssociation {
        gene: as_string(assoc.gene_symbol.as_ref()),
        tissue: as_string(assoc.tissue.as_ref()),
        effect_size: assoc.nes.as_ref().and_then(RawValue::coerce_f64),
        p_value: assoc.p_value.as_ref().and_then(RawValue::coerce_f64),
        gencode_id: as_string(assoc.gencode_id.as_ref()),
    }
}

fn as_string(value: Option<&RawValue>) -> Option<String> {
    value.map(RawValue::to_display_string)
}

/// Association with the smallest numeric p-value; the first one wins ties.
fn top_association(section: &EqtlSection) -> Option<TopEqtl> {
    let mut best: Option<(&EqtlAssociation, f64)> = None;
    for assoc in &section.associations {
        let Some(p) = assoc.p_value else { continue };
        match best {
            Some((_, best_p)) if p >= best_p => {}
            _ => best = Some((assoc, p)),
        }
    }

    best.map(|(assoc, p_value)| TopEqtl {
        gene: assoc.gene.clone(),
        tissue: assoc.tissue.clone(),
        p_value,
    })
}
