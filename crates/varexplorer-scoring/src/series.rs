//! Visualization-ready series derived from adapted source records.
//!
//! These are plain data for a chart layer to draw; nothing here renders.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;
use varexplorer_ingestion::keys::favor;
use varexplorer_ingestion::{FavorRecord, GtexRecord};

use crate::classifier::Prediction;
use crate::normalise::{frequency_percent, to_percent};

// ── Population frequencies ────────────────────────────────────────────────────

const POPULATIONS: [(&str, &str); 9] = [
    ("African", favor::AF_AFR),
    ("Latino/Admixed American", favor::AF_AMR),
    ("East Asian", favor::AF_EAS),
    ("European (non-Finnish)", favor::AF_NFE),
    ("Finnish", favor::AF_FIN),
    ("South Asian", favor::AF_SAS),
    ("Ashkenazi Jewish", favor::AF_ASJ),
    ("Amish", favor::AF_AMI),
    ("Other", favor::AF_OTH),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationFrequency {
    pub population: &'static str,
    pub field: &'static str,
    pub frequency: Option<f64>,
    pub percent: Option<f64>,
}

/// Allele frequency per gnomAD population, always nine entries in fixed order.
pub fn population_frequency_series(record: &FavorRecord) -> Vec<PopulationFrequency> {
    POPULATIONS
        .iter()
        .map(|&(population, field)| {
            let frequency = record.get(field).and_then(|v| v.coerce_f64());
            PopulationFrequency {
                population,
                field,
                frequency,
                percent: frequency.map(frequency_percent),
            }
        })
        .collect()
}

// ── Functional impact ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactBar {
    pub predictor: String,
    pub score: f64,
    pub label: String,
    pub color: &'static str,
    /// Normalised score on a 0–100 scale
    pub percent: f64,
}

pub fn functional_impact_series(predictions: &[Prediction]) -> Vec<ImpactBar> {
    predictions
        .iter()
        .map(|p| ImpactBar {
            predictor: p.predictor.clone(),
            score: p.score,
            label: p.label.clone(),
            color: p.color,
            percent: to_percent(p.normalised),
        })
        .collect()
}

// ── eQTL heatmap ──────────────────────────────────────────────────────────────

/// Genes × tissues matrix. Row `i` is `genes[i]`, column `j` is `tissues[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EqtlHeatmap {
    pub genes: Vec<String>,
    pub tissues: Vec<String>,
    pub nes: Vec<Vec<Option<f64>>>,
    pub p_values: Vec<Vec<Option<f64>>>,
    /// Cell text, empty where the cell has no effect size
    pub annotations: Vec<Vec<String>>,
}

#[derive(Default)]
struct Cell {
    nes: Option<f64>,
    p_value: Option<f64>,
}

/// Build the heatmap from an expression record.
///
/// Returns `None` when the record is absent or yields no cell. Associations
/// without a gene or tissue are skipped. Each cell keeps the first numeric
/// value seen for NES and p-value independently.
pub fn eqtl_heatmap(record: Option<&GtexRecord>) -> Option<EqtlHeatmap> {
    let record = record?;
    let mut cells: BTreeMap<(String, String), Cell> = BTreeMap::new();

    for assoc in &record.associations {
        let (Some(gene), Some(tissue)) = (&assoc.gene_symbol, &assoc.tissue) else {
            continue;
        };
        let gene = gene.to_display_string();
        let tissue = tissue.to_display_string().replace('_', " ");

        let cell = cells.entry((gene, tissue)).or_default();
        if cell.nes.is_none() {
            cell.nes = assoc.nes.as_ref().and_then(|v| v.coerce_f64());
        }
        if cell.p_value.is_none() {
            cell.p_value = assoc.p_value.as_ref().and_then(|v| v.coerce_f64());
        }
    }

    if cells.is_empty() {
        debug!("No eQTL cells to plot");
        return None;
    }

    let genes: Vec<String> = cells.keys().map(|(g, _)| g.clone()).collect::<BTreeSet<_>>().into_iter().collect();
    let tissues: Vec<String> = cells.keys().map(|(_, t)| t.clone()).collect::<BTreeSet<_>>().into_iter().collect();

    let mut nes = Vec::with_capacity(genes.len());
    let mut p_values = Vec::with_capacity(genes.len());
    let mut annotations = Vec::with_capacity(genes.len());

    for gene in &genes {
        let mut nes_row = Vec::with_capacity(tissues.len());
        let mut p_row = Vec::with_capacity(tissues.len());
        let mut text_row = Vec::with_capacity(tissues.len());

        for tissue in &tissues {
            let cell = cells.get(&(gene.clone(), tissue.clone()));
            let cell_nes = cell.and_then(|c| c.nes);
            let cell_p = cell.and_then(|c| c.p_value);
            nes_row.push(cell_nes);
            p_row.push(cell_p);
            text_row.push(cell_annotation(cell_nes, cell_p));
        }

        nes.push(nes_row);
        p_values.push(p_row);
        annotations.push(text_row);
    }

    Some(EqtlHeatmap { genes, tissues, nes, p_values, annotations })
}

fn cell_annotation(nes: Option<f64>, p_value: Option<f64>) -> String {
    match (nes, p_value) {
        (Some(nes), Some(p)) => format!("{:.3}<br>p={}", nes, scientific(p)),
        (Some(nes), None) => format!("{:.3}", nes),
        (None, _) => String::new(),
    }
}

/// Two-decimal scientific notation with a signed, two-digit exponent (`2.30e-05`).
pub fn scientific(value: f64) -> String {
    let formatted = format!("{:.2e}", value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    match exponent.parse::<i32>() {
        Ok(exp) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        Err(_) => formatted,
    }
}

// ── Annotation landscape ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandscapeTrack {
    pub label: &'static str,
    pub field: &'static str,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandscapeLayer {
    pub name: &'static str,
    pub tracks: Vec<LandscapeTrack>,
}

const LANDSCAPE: [(&str, &[(&str, &str)]); 3] = [
    (
        "Conservation",
        &[
            ("GERP", favor::GERP_S),
            ("PhyloP (Mammal)", favor::MAMPHYLOP),
            ("PhyloP (Vertebrate)", favor::VERPHYLOP),
        ],
    ),
    (
        "Epigenetics",
        &[
            ("H3K4me3 (Promoter)", favor::H3K4ME3),
            ("H3K27ac (Enhancer)", favor::H3K27AC),
            ("H3K27me3 (Repression)", favor::H3K27ME3),
        ],
    ),
    (
        "Regulatory",
        &[
            ("TF Binding Sites", favor::REMAP_TF),
            ("Cell Lines (ChIP)", favor::REMAP_CL),
        ],
    ),
];

/// Conservation, epigenetic and regulatory layers. Missing tracks carry `None`.
pub fn annotation_landscape(record: &FavorRecord) -> Vec<LandscapeLayer> {
    LANDSCAPE
        .iter()
        .map(|&(name, tracks)| LandscapeLayer {
            name,
            tracks: tracks
                .iter()
                .map(|&(label, field)| LandscapeTrack {
                    label,
                    field,
                    value: record.get(field).and_then(|v| v.coerce_f64()),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathogenicityClassifier;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use varexplorer_ingestion::{adapt_favor, adapt_gtex};
    use varexplorer_test_utils as fixtures;

    fn apoe() -> FavorRecord {
        adapt_favor(Some(&fixtures::favor_payload())).unwrap()
    }

    #[test]
    fn test_population_series_order_and_percent() {
        let series = population_frequency_series(&apoe());
        assert_eq!(series.len(), 9);
        assert_eq!(series[0].population, "African");
        assert_eq!(series[8].population, "Other");
        assert!((series[0].percent.unwrap() - 26.18).abs() < 1e-9);
    }

    #[test]
    fn test_population_series_missing_frequency() {
        let record = adapt_favor(Some(&json!([{ "af_afr": 0.2 }]))).unwrap();
        let series = population_frequency_series(&record);
        assert_eq!(series[0].frequency, Some(0.2));
        assert!(series[1..].iter().all(|p| p.frequency.is_none() && p.percent.is_none()));
    }

    #[test]
    fn test_functional_impact_percent() {
        let predictions = PathogenicityClassifier::default().classify(&apoe()).unwrap();
        let bars = functional_impact_series(&predictions);
        assert_eq!(bars.len(), predictions.len());
        let cadd = &bars[0];
        assert_eq!(cadd.predictor, "CADD Phred");
        assert!((cadd.percent - 35.48).abs() < 1e-9);
    }

    #[test]
    fn test_heatmap_axes_sorted_and_tissue_renamed() {
        let payload = fixtures::gtex_payload(fixtures::apoe_eqtls());
        let record = adapt_gtex(Some(&payload)).unwrap();
        let heatmap = eqtl_heatmap(Some(&record)).unwrap();

        assert_eq!(heatmap.genes, vec!["APOC1", "TOMM40"]);
        assert_eq!(heatmap.tissues, vec!["Brain Cerebellum", "Whole Blood"]);
        assert_eq!(heatmap.nes[0], vec![None, Some(0.287)]);
        assert_eq!(heatmap.annotations[0][1], "0.287<br>p=2.30e-05");
        assert_eq!(heatmap.annotations[1][0], "-0.412<br>p=4.75e-05");
        assert_eq!(heatmap.annotations[0][0], "");
    }

    #[test]
    fn test_heatmap_first_value_per_cell() {
        let payload = fixtures::gtex_payload(vec![
            fixtures::eqtl("APOE", "Liver", 0.5, 0.01),
            fixtures::eqtl("APOE", "Liver", 0.9, 0.001),
        ]);
        let record = adapt_gtex(Some(&payload)).unwrap();
        let heatmap = eqtl_heatmap(Some(&record)).unwrap();
        assert_eq!(heatmap.nes, vec![vec![Some(0.5)]]);
        assert_eq!(heatmap.p_values, vec![vec![Some(0.01)]]);
    }

    #[test]
    fn test_heatmap_no_data() {
        assert!(eqtl_heatmap(None).is_none());
        let empty = adapt_gtex(Some(&fixtures::gtex_payload(vec![]))).unwrap();
        assert!(eqtl_heatmap(Some(&empty)).is_none());
    }

    #[test]
    fn test_scientific_formatting() {
        assert_eq!(scientific(2.3e-5), "2.30e-05");
        assert_eq!(scientific(4.75e-12), "4.75e-12");
        assert_eq!(scientific(0.5), "5.00e-01");
        assert_eq!(scientific(1234.0), "1.23e+03");
    }

    #[test]
    fn test_landscape_layers() {
        let layers = annotation_landscape(&apoe());
        let names: Vec<&str> = layers.iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Conservation", "Epigenetics", "Regulatory"]);
        assert_eq!(layers[0].tracks[0].value, Some(3.56));
        assert_eq!(layers[2].tracks[1].value, Some(23.0));
    }
}
