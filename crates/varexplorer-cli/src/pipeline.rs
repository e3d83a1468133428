//! Fetch → adapt → merge → export for one rsID.
//!
//! Both sources are fetched concurrently. A failing source degrades to an
//! absent one; only a blank identifier or an I/O error while writing fails
//! the run.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use varexplorer_common::sandbox::SandboxClient;
use varexplorer_ingestion::sources::{
    resolve_payload, ExpressionSource, FavorClient, FunctionalAnnotationSource, GtexClient, GtexSettings,
};
use varexplorer_ingestion::{adapt_favor, adapt_gtex};
use varexplorer_merge::{merge_variant_data, to_csv, to_json, to_json_compact, CanonicalRecord};
use varexplorer_scoring::series::{
    annotation_landscape, eqtl_heatmap, functional_impact_series, population_frequency_series, EqtlHeatmap,
    ImpactBar, LandscapeLayer, PopulationFrequency,
};
use varexplorer_scoring::{default_predictors, PathogenicityClassifier};

use crate::config::{ExplorerConfig, ExportFormat, OutputConfig};

/// Raw payloads as resolved by the fetch layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payloads {
    pub favor: Option<Value>,
    pub gtex: Option<Value>,
}

/// Chart-ready series for one variant. `None` marks "no data".
#[derive(Debug, Clone, Serialize)]
pub struct VisualizationSeries {
    pub variant_id: String,
    pub functional_impact: Option<Vec<ImpactBar>>,
    pub population_frequencies: Option<Vec<PopulationFrequency>>,
    pub eqtl_heatmap: Option<EqtlHeatmap>,
    pub annotation_landscape: Option<Vec<LandscapeLayer>>,
}

pub struct VariantReport {
    pub record: CanonicalRecord,
    pub series: VisualizationSeries,
}

pub struct Pipeline {
    favor: Option<FavorClient>,
    gtex: Option<GtexClient>,
    classifier: PathogenicityClassifier,
    output: OutputConfig,
}

impl Pipeline {
    pub fn from_config(config: &ExplorerConfig) -> anyhow::Result<Self> {
        let sources = &config.sources;
        let timeout = Duration::from_secs(sources.timeout_secs);

        let favor = if sources.enable_favor {
            let client = SandboxClient::with_timeout(timeout)?;
            Some(FavorClient::with_base_url(&sources.favor_base_url, client)?)
        } else {
            None
        };

        let gtex = if sources.enable_gtex {
            let settings = GtexSettings {
                base_url: sources.gtex_base_url.clone(),
                dataset_id: sources.gtex_dataset_id.clone(),
                items_per_page: sources.items_per_page,
            };
            Some(GtexClient::with_settings(settings, SandboxClient::with_timeout(timeout)?)?)
        } else {
            None
        };

        let predictors = config.scoring.predictors.clone().unwrap_or_else(default_predictors);

        Ok(Self {
            favor,
            gtex,
            classifier: PathogenicityClassifier::new(predictors),
            output: config.output.clone(),
        })
    }

    #[instrument(skip(self))]
    pub async fn run(&self, rsid: &str) -> anyhow::Result<VariantReport> {
        check_rsid(rsid);
        let payloads = fetch_payloads(
            self.favor.as_ref().map(|c| c as &dyn FunctionalAnnotationSource),
            self.gtex.as_ref().map(|c| c as &dyn ExpressionSource),
            rsid,
        )
        .await;
        build_report(rsid, &payloads, &self.classifier)
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Fetch both sources concurrently. Disabled or failing sources come back as `None`.
pub async fn fetch_payloads(
    favor: Option<&dyn FunctionalAnnotationSource>,
    gtex: Option<&dyn ExpressionSource>,
    rsid: &str,
) -> Payloads {
    let favor_fut = async {
        match favor {
            Some(source) => resolve_payload("favor", source.fetch_annotation(rsid).await),
            None => None,
        }
    };
    let gtex_fut = async {
        match gtex {
            Some(source) => resolve_payload("gtex", source.fetch_associations(rsid).await),
            None => None,
        }
    };

    let (favor, gtex) = tokio::join!(favor_fut, gtex_fut);
    debug!(favor = favor.is_some(), gtex = gtex.is_some(), "Payloads resolved");
    Payloads { favor, gtex }
}

/// Adapt, merge, and classify resolved payloads.
pub fn build_report(
    rsid: &str,
    payloads: &Payloads,
    classifier: &PathogenicityClassifier,
) -> anyhow::Result<VariantReport> {
    let favor = adapt_favor(payloads.favor.as_ref());
    let gtex = adapt_gtex(payloads.gtex.as_ref());

    if payloads.gtex.is_some() && gtex.is_none() {
        warn!(rsid, "GTEx payload had no eqtl_results, treating as absent");
    }

    let record = merge_variant_data(favor.as_ref(), gtex.as_ref(), rsid)?;

    let predictions = favor.as_ref().and_then(|r| classifier.classify(r));
    let series = VisualizationSeries {
        variant_id: rsid.to_string(),
        functional_impact: predictions.as_deref().map(functional_impact_series),
        population_frequencies: favor.as_ref().map(population_frequency_series),
        eqtl_heatmap: eqtl_heatmap(gtex.as_ref()),
        annotation_landscape: favor.as_ref().map(annotation_landscape),
    };

    info!(
        rsid,
        functional = record.favor_annotation.is_some(),
        associations = record.gtex_eqtls.as_ref().map_or(0, |s| s.total_associations),
        predictors = predictions.as_ref().map_or(0, |p| p.len()),
        "Variant merged"
    );

    Ok(VariantReport { record, series })
}

/// Render one output format.
pub fn render(report: &VariantReport, format: ExportFormat, pretty_json: bool) -> anyhow::Result<String> {
    let text = match format {
        ExportFormat::Json if pretty_json => to_json(&report.record)?,
        ExportFormat::Json => to_json_compact(&report.record)?,
        ExportFormat::Csv => to_csv(&report.record)?,
        ExportFormat::Series => serde_json::to_string_pretty(&report.series)?,
    };
    Ok(text)
}

/// Write every configured format to `{directory}/{rsid}.{ext}`.
pub fn write_outputs(report: &VariantReport, output: &OutputConfig) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&output.directory)?;

    let mut written = Vec::with_capacity(output.formats.len());
    for &format in &output.formats {
        let path = output_path(&output.directory, &report.record.variant_id, format);
        let text = render(report, format, output.pretty_json)?;
        std::fs::write(&path, text)?;
        info!(path = %path.display(), "Wrote export");
        written.push(path);
    }
    Ok(written)
}

/// `{directory}/{stem}.{ext}`; the stem always names a file directly inside `directory`.
pub fn output_path(directory: &Path, rsid: &str, format: ExportFormat) -> PathBuf {
    directory.join(format!("{}.{}", file_stem(rsid), format.extension()))
}

/// Identifier with every character outside `[A-Za-z0-9._-]` replaced by `_`.
fn file_stem(rsid: &str) -> String {
    rsid.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

fn rsid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^rs\d+$").expect("static regex"))
}

/// Identifiers that do not look like rsIDs are still queried, with a warning.
pub fn check_rsid(rsid: &str) -> bool {
    let ok = rsid_pattern().is_match(rsid);
    if !ok {
        warn!(rsid, "Identifier does not look like an rsID (rs<digits>)");
    }
    ok
}
