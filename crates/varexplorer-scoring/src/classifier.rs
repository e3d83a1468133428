//! Pathogenicity classification of predictor scores.
//!
//! For each configured predictor:
//!   1. Read the raw value from the FAVOR record by key
//!   2. Coerce it to a number (text such as "0.9985" is accepted)
//!   3. Pick a qualitative label from the threshold table
//!   4. Attach a severity color and a [0, 1] display score
//!
//! A predictor whose value is missing or not numeric is left out of the
//! output. When no predictor yields a value, classification reports no data.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use varexplorer_common::RawValue;
use varexplorer_ingestion::FavorRecord;

use crate::normalise::minmax_normalise;
use crate::predictors::{default_predictors, PredictorSpec, ScoreDirection, Threshold};

// ── Palette ───────────────────────────────────────────────────────────────────

pub const BENIGN_COLOR: &str = "#2ecc71";
pub const UNCERTAIN_COLOR: &str = "#f39c12";
pub const DAMAGING_COLOR: &str = "#e74c3c";
pub const NEUTRAL_COLOR: &str = "#95a5a6";

/// Severity color for a label, by exact match.
pub fn severity_color(label: &str) -> &'static str {
    match label {
        "Benign" | "Likely Benign" | "Tolerated" | "Polymorphism" | "Not Conserved" => BENIGN_COLOR,
        "Uncertain" | "Possibly Damaging" | "Ambiguous" | "Conserved" => UNCERTAIN_COLOR,
        "Pathogenic"
        | "Likely Pathogenic"
        | "Probably Damaging"
        | "Damaging"
        | "Disease Causing"
        | "Highly Conserved" => DAMAGING_COLOR,
        _ => NEUTRAL_COLOR,
    }
}

// ── Coercion ──────────────────────────────────────────────────────────────────

/// Why a raw predictor value could not be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionFailure {
    #[error("field is absent")]
    Missing,

    #[error("value {0} is not numeric")]
    NotNumeric(String),
}

/// Resolve a raw score to a finite number.
pub fn coerce_score(raw: Option<&RawValue>) -> Result<f64, CoercionFailure> {
    let raw = raw.ok_or(CoercionFailure::Missing)?;
    raw.coerce_f64()
        .ok_or_else(|| CoercionFailure::NotNumeric(raw.to_display_string()))
}

// ── Threshold dispatch ───────────────────────────────────────────────────────

/// Pick the label for `value` from ascending `thresholds`.
///
/// Higher-is-worse: the highest threshold not exceeding the value wins; a
/// value below every threshold gets the first label.
/// Lower-is-worse: the first threshold the value does not exceed wins; a
/// value above every threshold gets the last label.
pub fn select_label(value: f64, thresholds: &[Threshold], direction: ScoreDirection) -> Option<&str> {
    let mut selected = match direction {
        ScoreDirection::HigherIsWorse => thresholds.first()?,
        ScoreDirection::LowerIsWorse => thresholds.last()?,
    };

    for threshold in thresholds {
        match direction {
            ScoreDirection::HigherIsWorse => {
                if value >= threshold.value {
                    selected = threshold;
                } else {
                    break;
                }
            }
            ScoreDirection::LowerIsWorse => {
                if value <= threshold.value {
                    selected = threshold;
                    break;
                }
            }
        }
    }

    Some(selected.label.as_str())
}

// ── Classifier ────────────────────────────────────────────────────────────────

/// One classified predictor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predictor: String,
    pub score: f64,
    pub label: String,
    pub color: &'static str,
    /// Display bounds, [min, max]
    pub range: [f64; 2],
    /// Score min-max normalised into [0, 1] over `range`
    pub normalised: f64,
}

pub struct PathogenicityClassifier {
    predictors: Vec<PredictorSpec>,
}

impl PathogenicityClassifier {
    pub fn new(predictors: Vec<PredictorSpec>) -> Self {
        Self { predictors }
    }

    pub fn predictors(&self) -> &[PredictorSpec] {
        &self.predictors
    }

    /// Classify every predictor present in `record`.
    /// Returns `None` when no predictor produced a usable value.
    pub fn classify(&self, record: &FavorRecord) -> Option<Vec<Prediction>> {
        let predictions: Vec<Prediction> = self
            .predictors
            .iter()
            .filter_map(|spec| self.classify_one(spec, record))
            .collect();

        if predictions.is_empty() {
            debug!("No predictor produced a usable score");
            return None;
        }
        Some(predictions)
    }

    fn classify_one(&self, spec: &PredictorSpec, record: &FavorRecord) -> Option<Prediction> {
        let score = match coerce_score(record.get(&spec.field)) {
            Ok(score) => score,
            Err(reason) => {
                debug!(predictor = %spec.name, field = %spec.field, %reason, "Skipping predictor");
                return None;
            }
        };

        let label = select_label(score, &spec.thresholds, spec.direction)?;
        let [min, max] = spec.range;

        Some(Prediction {
            predictor: spec.name.clone(),
            score,
            label: label.to_string(),
            color: severity_color(label),
            range: spec.range,
            normalised: minmax_normalise(score, min, max),
        })
    }
}

impl Default for PathogenicityClassifier {
    fn default() -> Self {
        Self::new(default_predictors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use varexplorer_ingestion::adapt_favor;
    use varexplorer_test_utils as fixtures;

    fn thresholds(pairs: &[(f64, &str)]) -> Vec<Threshold> {
        pairs
            .iter()
            .map(|&(value, label)| Threshold { value, label: label.to_string() })
            .collect()
    }

    fn record(value: serde_json::Value) -> FavorRecord {
        adapt_favor(Some(&json!([value]))).unwrap()
    }

    #[test]
    fn test_higher_is_worse_polyphen() {
        let t = thresholds(&[(0.0, "Benign"), (0.45, "Possibly Damaging"), (0.85, "Probably Damaging")]);
        assert_eq!(select_label(0.92, &t, ScoreDirection::HigherIsWorse), Some("Probably Damaging"));
        assert_eq!(select_label(0.45, &t, ScoreDirection::HigherIsWorse), Some("Possibly Damaging"));
        assert_eq!(select_label(0.1, &t, ScoreDirection::HigherIsWorse), Some("Benign"));
    }

    #[test]
    fn test_lower_is_worse_sift() {
        let t = thresholds(&[(0.0, "Damaging"), (0.05, "Possibly Damaging"), (0.5, "Tolerated")]);
        assert_eq!(select_label(0.03, &t, ScoreDirection::LowerIsWorse), Some("Possibly Damaging"));
        assert_eq!(select_label(0.0, &t, ScoreDirection::LowerIsWorse), Some("Damaging"));
        assert_eq!(select_label(0.3, &t, ScoreDirection::LowerIsWorse), Some("Tolerated"));
    }

    #[test]
    fn test_lower_is_worse_above_all_thresholds_is_most_benign() {
        let t = thresholds(&[(0.0, "Damaging"), (0.05, "Possibly Damaging"), (0.5, "Tolerated")]);
        assert_eq!(select_label(0.9, &t, ScoreDirection::LowerIsWorse), Some("Tolerated"));
    }

    #[test]
    fn test_higher_is_worse_below_all_thresholds_is_first_label() {
        let t = thresholds(&[(-12.0, "Not Conserved"), (2.0, "Conserved")]);
        assert_eq!(select_label(-15.0, &t, ScoreDirection::HigherIsWorse), Some("Not Conserved"));
    }

    #[test]
    fn test_default_tables_fall_back_to_benign_label() {
        let table = default_predictors();
        let sift = table.iter().find(|p| p.name == "SIFT").unwrap();
        assert_eq!(select_label(1.5, &sift.thresholds, sift.direction), Some("Tolerated"));
        let cadd = table.iter().find(|p| p.name == "CADD Phred").unwrap();
        assert_eq!(select_label(-1.0, &cadd.thresholds, cadd.direction), Some("Benign"));
    }

    #[test]
    fn test_empty_thresholds() {
        assert_eq!(select_label(1.0, &[], ScoreDirection::HigherIsWorse), None);
    }

    #[test]
    fn test_coerce_score_branches() {
        assert_eq!(coerce_score(None), Err(CoercionFailure::Missing));
        assert_eq!(
            coerce_score(Some(&RawValue::text("N/A"))),
            Err(CoercionFailure::NotNumeric("N/A".to_string()))
        );
        assert_eq!(coerce_score(Some(&RawValue::text("0.9985"))), Ok(0.9985));
    }

    #[test]
    fn test_quoted_alphamissense_classifies() {
        let r = record(json!({ "am_pathogenicity": "0.9985" }));
        let predictions = PathogenicityClassifier::default().classify(&r).unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].predictor, "AlphaMissense");
        assert_eq!(predictions[0].label, "Likely Pathogenic");
        assert_eq!(predictions[0].color, DAMAGING_COLOR);
    }

    #[test]
    fn test_non_numeric_predictor_excluded() {
        let r = record(json!({ "cadd_phred": "N/A", "polyphen2_hdiv_score": 0.92 }));
        let predictions = PathogenicityClassifier::default().classify(&r).unwrap();
        let names: Vec<&str> = predictions.iter().map(|p| p.predictor.as_str()).collect();
        assert_eq!(names, vec!["PolyPhen2 (HDIV)"]);
        assert_eq!(predictions[0].label, "Probably Damaging");
    }

    #[test]
    fn test_no_data() {
        let r = record(json!({ "rsid": "rs1", "cadd_phred": "." }));
        assert!(PathogenicityClassifier::default().classify(&r).is_none());
    }

    #[test]
    fn test_full_fixture() {
        let r = adapt_favor(Some(&fixtures::favor_payload())).unwrap();
        let predictions = PathogenicityClassifier::default().classify(&r).unwrap();
        assert_eq!(predictions.len(), 7);

        let cadd = &predictions[0];
        assert_eq!(cadd.predictor, "CADD Phred");
        assert_eq!(cadd.label, "Uncertain");
        assert!((cadd.normalised - 17.74 / 50.0).abs() < 1e-9);

        let sift = predictions.iter().find(|p| p.predictor == "SIFT").unwrap();
        assert_eq!(sift.label, "Tolerated");
        assert_eq!(sift.color, BENIGN_COLOR);
    }

    #[test]
    fn test_palette_covers_default_labels() {
        for spec in default_predictors() {
            for t in &spec.thresholds {
                assert_ne!(severity_color(&t.label), NEUTRAL_COLOR, "{} has no color", t.label);
            }
        }
    }

    #[test]
    fn test_unknown_label_is_neutral() {
        assert_eq!(severity_color("probably_damaging"), NEUTRAL_COLOR);
    }
}
