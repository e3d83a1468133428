//! Predictor threshold tables for pathogenicity classification.
//!
//! Labels here and the palette in `classifier::severity_color` must stay in
//! step: a label the palette does not know renders in the neutral color.

use serde::{Deserialize, Serialize};
use varexplorer_ingestion::keys::favor;

/// Which end of a predictor's scale indicates greater severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDirection {
    HigherIsWorse,
    LowerIsWorse,
}

/// Lower bound of a qualitative band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    pub label: String,
}

/// One predictor's classification config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorSpec {
    /// Display name, e.g. "PolyPhen2 (HDIV)"
    pub name: String,
    /// FAVOR key the raw score is read from
    pub field: String,
    /// Thresholds, ascending by value
    pub thresholds: Vec<Threshold>,
    pub direction: ScoreDirection,
    /// Display range used for normalisation, [min, max]
    pub range: [f64; 2],
}

impl PredictorSpec {
    pub fn new(
        name: &str,
        field: &str,
        thresholds: &[(f64, &str)],
        direction: ScoreDirection,
        range: [f64; 2],
    ) -> Self {
        let mut thresholds: Vec<Threshold> = thresholds
            .iter()
            .map(|&(value, label)| Threshold { value, label: label.to_string() })
            .collect();
        thresholds.sort_by(|a, b| a.value.total_cmp(&b.value));
        Self {
            name: name.to_string(),
            field: field.to_string(),
            thresholds,
            direction,
            range,
        }
    }

    /// Check the table is usable: non-empty, strictly ascending, finite, with a non-empty range.
    pub fn validate(&self) -> Result<(), String> {
        if self.thresholds.is_empty() {
            return Err(format!("{}: no thresholds", self.name));
        }
        if self.thresholds.iter().any(|t| !t.value.is_finite()) {
            return Err(format!("{}: non-finite threshold", self.name));
        }
        if self.thresholds.windows(2).any(|w| w[0].value >= w[1].value) {
            return Err(format!("{}: thresholds must be strictly ascending", self.name));
        }
        let [min, max] = self.range;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(format!("{}: range min must be below max", self.name));
        }
        Ok(())
    }
}

/// Default predictor table.
///
/// Interpretation bands:
/// | Predictor     | Benign  | Uncertain  | Pathogenic |
/// |---------------|---------|------------|------------|
/// | CADD (phred)  | < 15    | 15–20      | ≥ 20       |
/// | SIFT          | > 0.5   | 0.05–0.5   | ≤ 0        |
/// | PolyPhen2     | < 0.45  | 0.45–0.85  | ≥ 0.85     |
/// | AlphaMissense | < 0.34  | 0.34–0.564 | ≥ 0.564    |
/// | GERP++        | < 2     | 2–4        | ≥ 4        |
pub fn default_predictors() -> Vec<PredictorSpec> {
    use ScoreDirection::*;

    let polyphen = [(0.0, "Benign"), (0.45, "Possibly Damaging"), (0.85, "Probably Damaging")];

    vec![
        PredictorSpec::new(
            "CADD Phred",
            favor::CADD_PHRED,
            &[(0.0, "Benign"), (15.0, "Uncertain"), (20.0, "Pathogenic")],
            HigherIsWorse,
            [0.0, 50.0],
        ),
        PredictorSpec::new(
            "SIFT",
            favor::SIFT_SCORE,
            &[(0.0, "Damaging"), (0.05, "Possibly Damaging"), (0.5, "Tolerated")],
            LowerIsWorse,
            [0.0, 1.0],
        ),
        PredictorSpec::new("PolyPhen2 (HDIV)", favor::POLYPHEN_HDIV, &polyphen, HigherIsWorse, [0.0, 1.0]),
        PredictorSpec::new("PolyPhen2 (HVAR)", favor::POLYPHEN_HVAR, &polyphen, HigherIsWorse, [0.0, 1.0]),
        PredictorSpec::new(
            "AlphaMissense",
            favor::AM_PATHOGENICITY,
            &[(0.0, "Likely Benign"), (0.34, "Ambiguous"), (0.564, "Likely Pathogenic")],
            HigherIsWorse,
            [0.0, 1.0],
        ),
        PredictorSpec::new(
            "GERP++",
            favor::GERP_RS,
            &[(-12.0, "Not Conserved"), (2.0, "Conserved"), (4.0, "Highly Conserved")],
            HigherIsWorse,
            [-12.0, 6.0],
        ),
        PredictorSpec::new(
            "MutationTaster",
            favor::MUTATION_TASTER_SCORE,
            &[(0.0, "Polymorphism"), (0.5, "Disease Causing")],
            HigherIsWorse,
            [0.0, 1.0],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_predictors_valid() {
        for spec in default_predictors() {
            assert!(spec.validate().is_ok(), "{:?}", spec.validate());
        }
    }

    #[test]
    fn test_only_sift_is_lower_is_worse() {
        let lower: Vec<String> = default_predictors()
            .into_iter()
            .filter(|p| p.direction == ScoreDirection::LowerIsWorse)
            .map(|p| p.name)
            .collect();
        assert_eq!(lower, vec!["SIFT".to_string()]);
    }

    #[test]
    fn test_new_sorts_thresholds() {
        let spec = PredictorSpec::new(
            "x",
            "x",
            &[(0.5, "high"), (0.0, "low")],
            ScoreDirection::HigherIsWorse,
            [0.0, 1.0],
        );
        assert_eq!(spec.thresholds[0].label, "low");
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let mut spec = PredictorSpec::new("x", "x", &[], ScoreDirection::HigherIsWorse, [0.0, 1.0]);
        assert!(spec.validate().is_err());

        spec = PredictorSpec::new("x", "x", &[(0.0, "a"), (0.0, "b")], ScoreDirection::HigherIsWorse, [0.0, 1.0]);
        assert!(spec.validate().is_err());

        spec = PredictorSpec::new("x", "x", &[(0.0, "a")], ScoreDirection::HigherIsWorse, [1.0, 1.0]);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_table_deserializes_from_toml() {
        let text = r#"
            name = "REVEL"
            field = "revel"
            direction = "higher_is_worse"
            range = [0.0, 1.0]
            thresholds = [
                { value = 0.0, label = "Benign" },
                { value = 0.5, label = "Pathogenic" },
            ]
        "#;
        let spec: PredictorSpec = toml::from_str(text).unwrap();
        assert_eq!(spec.direction, ScoreDirection::HigherIsWorse);
        assert_eq!(spec.thresholds.len(), 2);
        assert!(spec.validate().is_ok());
    }
}
