//! varexplorer-scoring — Pathogenicity classification and visualization series.
//!
//! Consumes adapted source records directly; independent of the merge engine.

pub mod predictors;
pub mod normalise;
pub mod classifier;
pub mod series;

pub use classifier::{PathogenicityClassifier, Prediction};
pub use predictors::{default_predictors, PredictorSpec, ScoreDirection, Threshold};
