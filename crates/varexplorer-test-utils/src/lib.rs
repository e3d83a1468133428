//! Source payload fixtures shaped like real FAVOR and GTEx v2 responses.
//!
//! Values are modelled on rs429358 (APOE ε4) and trimmed to the keys the
//! adapters read, plus a few unrelated keys to make sure they are ignored.

#![recursion_limit = "256"]

use serde_json::{json, Value};

pub const APOE_RSID: &str = "rs429358";

/// The single FAVOR record for rs429358, as an object.
pub fn favor_object() -> Value {
    json!({
        "variant_vcf": "19-44908684-T-C",
        "rsid": "rs429358",
        "chromosome": "19",
        "position": 44908684,
        "genecode_comprehensive_info": "APOE",
        "genecode_comprehensive_exonic_category": "nonsynonymous SNV",
        "protein_variant": "APOE:p.C130R",
        "hgvsc": "ENST00000252486.9:c.388T>C",
        "hgvsp": "ENSP00000252486.4:p.Cys130Arg",
        "cadd_phred": 17.74,
        "cadd_rawscore": 1.9368,
        "am_pathogenicity": "0.0946",
        "am_class": "likely_benign",
        "sift_score": 0.61,
        "sift_cat": "tolerated",
        "polyphen2_hdiv_score": 0.0,
        "polyphen2_hvar_score": 0.0,
        "polyphen_cat": "benign",
        "mutation_taster_score": 0.9999,
        "mutation_taster_pred": "polymorphism",
        "af_total": 0.1541,
        "af_afr": 0.2618,
        "af_amr": 0.1058,
        "af_eas": 0.0886,
        "af_nfe": 0.1489,
        "af_fin": 0.1733,
        "af_sas": 0.0924,
        "af_asj": 0.1147,
        "af_ami": 0.1568,
        "af_oth": 0.1412,
        "clnsig": "risk_factor",
        "clndn": "Alzheimer_disease|APOE4(+)_carrier",
        "clnrevstat": "criteria_provided,_single_submitter",
        "gerp_rs": 3.56,
        "gerp_s": 3.56,
        "gerp_n": 4.45,
        "priphylop": 0.561,
        "mamphylop": 1.024,
        "verphylop": 1.287,
        "encodeh3k4me3_sum": 12.4,
        "encodeh3k27ac_sum": 38.9,
        "encodeh3k27me3_sum": 4.1,
        "remap_overlap_tf": 17,
        "remap_overlap_cl": 23,
        "cage_promoter": null,
        "unrelated_track": "ignored"
    })
}

/// FAVOR responses arrive as a one-element list per queried rsID.
pub fn favor_payload() -> Value {
    Value::Array(vec![favor_object()])
}

/// One GTEx single-tissue eQTL association.
pub fn eqtl(gene: &str, tissue: &str, nes: f64, p_value: f64) -> Value {
    json!({
        "snpId": APOE_RSID,
        "variantId": "chr19_44908684_T_C_b38",
        "geneSymbol": gene,
        "gencodeId": format!("ENSG-{}", gene),
        "tissueSiteDetailId": tissue,
        "nes": nes,
        "pValue": p_value,
        "datasetId": "gtex_v8"
    })
}

/// Two associations; the second one is the more significant.
pub fn apoe_eqtls() -> Vec<Value> {
    vec![
        eqtl("TOMM40", "Brain_Cerebellum", -0.412, 4.75e-5),
        eqtl("APOC1", "Whole_Blood", 0.287, 2.3e-5),
    ]
}

/// GTEx payload as assembled by the two-step fetch.
pub fn gtex_payload(associations: Vec<Value>) -> Value {
    let count = associations.len();
    json!({
        "rsid": APOE_RSID,
        "variantId": "chr19_44908684_T_C_b38",
        "eqtl_results": associations,
        "paging": {
            "numberOfPages": 1,
            "page": 0,
            "maxItemsPerPage": 250,
            "totalNumberOfItems": count
        }
    })
}

/// What the fetch layer produces when GTEx lookup fails.
pub fn gtex_error_payload() -> Value {
    json!({ "error": "rsID rs000 not found in GTEx v8" })
}
