//! Configuration loading for varexplorer.
//! Reads varexplorer.toml from the current directory, or the path in the
//! VAREXPLORER_CONFIG env var. `.yaml`/`.yml` and `.json` files are also accepted.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::warn;
use varexplorer_ingestion::sources::favor::FAVOR_API_URL;
use varexplorer_ingestion::sources::gtex::GTEX_API_URL;
use varexplorer_scoring::PredictorSpec;

pub const CONFIG_ENV: &str = "VAREXPLORER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "varexplorer.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_favor_base_url")]
    pub favor_base_url: String,
    #[serde(default = "default_gtex_base_url")]
    pub gtex_base_url: String,
    #[serde(default = "default_gtex_dataset_id")]
    pub gtex_dataset_id: String,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_true")]
    pub enable_favor: bool,
    #[serde(default = "default_true")]
    pub enable_gtex: bool,
}

fn default_favor_base_url()  -> String { FAVOR_API_URL.to_string() }
fn default_gtex_base_url()   -> String { GTEX_API_URL.to_string() }
fn default_gtex_dataset_id() -> String { "gtex_v8".to_string() }
fn default_items_per_page()  -> u32    { 250 }
fn default_timeout_secs()    -> u64    { 10 }
fn default_true()            -> bool   { true }

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            favor_base_url: default_favor_base_url(),
            gtex_base_url: default_gtex_base_url(),
            gtex_dataset_id: default_gtex_dataset_id(),
            items_per_page: default_items_per_page(),
            timeout_secs: default_timeout_secs(),
            enable_favor: true,
            enable_gtex: true,
        }
    }
}

/// Output file kinds. Each lands in the output directory as `{rsid}.{ext}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Nested canonical record
    Json,
    /// One row per eQTL association
    Csv,
    /// Chart-ready series
    Series,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Series => "series.json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_formats() -> Vec<ExportFormat> { vec![ExportFormat::Json, ExportFormat::Csv] }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            formats: default_formats(),
            pretty_json: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Replaces the built-in predictor table when set.
    pub predictors: Option<Vec<PredictorSpec>>,
}

impl ExplorerConfig {
    /// Load configuration.
    /// Uses `explicit` if given, then VAREXPLORER_CONFIG, then varexplorer.toml.
    /// A missing default file falls back to built-in defaults; a missing
    /// explicit or env-named file is an error.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let config = match named {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::from_path(&path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_path(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                warn!(
                    "No {} found, using defaults. Copy varexplorer.example.toml to customise.",
                    DEFAULT_CONFIG_FILE
                );
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse by file extension: YAML, JSON, otherwise TOML.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            Some("json") => Self::from_json(path),
            _ => Self::from_toml(path),
        }
    }

    pub fn from_toml(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_yaml(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn from_json(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sources.items_per_page == 0 {
            anyhow::bail!("sources.items_per_page must be positive");
        }
        if self.sources.timeout_secs == 0 {
            anyhow::bail!("sources.timeout_secs must be positive");
        }
        if let Some(predictors) = &self.scoring.predictors {
            if predictors.is_empty() {
                anyhow::bail!("scoring.predictors is set but empty");
            }
            for spec in predictors {
                spec.validate().map_err(|e| anyhow::anyhow!("scoring.predictors: {}", e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
