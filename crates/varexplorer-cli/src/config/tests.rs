use super::*;
use pretty_assertions::assert_eq;
use std::io::Write;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config: ExplorerConfig = toml::from_str("").unwrap();
    assert_eq!(config.sources.gtex_dataset_id, "gtex_v8");
    assert_eq!(config.sources.items_per_page, 250);
    assert_eq!(config.sources.timeout_secs, 10);
    assert!(config.sources.enable_favor && config.sources.enable_gtex);
    assert_eq!(config.output.formats, vec![ExportFormat::Json, ExportFormat::Csv]);
    assert!(config.scoring.predictors.is_none());
}

#[test]
fn test_partial_sections_fill_defaults() {
    let config: ExplorerConfig = toml::from_str(
        r#"
        [sources]
        enable_gtex = false
        items_per_page = 50

        [output]
        directory = "results"
        formats = ["csv", "series"]
        "#,
    )
    .unwrap();
    assert!(!config.sources.enable_gtex);
    assert_eq!(config.sources.items_per_page, 50);
    assert_eq!(config.sources.favor_base_url, FAVOR_API_URL);
    assert_eq!(config.output.directory, PathBuf::from("results"));
    assert_eq!(config.output.formats, vec![ExportFormat::Csv, ExportFormat::Series]);
    assert!(config.output.pretty_json);
}

#[test]
fn test_load_explicit_yaml_and_json() {
    let dir = tempfile::tempdir().unwrap();

    let yaml = write_file(&dir, "cfg.yaml", "sources:\n  gtex_dataset_id: gtex_v10\n");
    let config = ExplorerConfig::load(Some(&yaml)).unwrap();
    assert_eq!(config.sources.gtex_dataset_id, "gtex_v10");

    let json = write_file(&dir, "cfg.json", r#"{ "output": { "pretty_json": false } }"#);
    let config = ExplorerConfig::load(Some(&json)).unwrap();
    assert!(!config.output.pretty_json);
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(ExplorerConfig::load(Some(&missing)).is_err());
}

#[test]
fn test_custom_predictor_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "varexplorer.toml",
        r#"
        [[scoring.predictors]]
        name = "CADD Phred"
        field = "cadd_phred"
        direction = "higher_is_worse"
        range = [0.0, 60.0]
        thresholds = [
            { value = 0.0, label = "Benign" },
            { value = 25.0, label = "Pathogenic" },
        ]
        "#,
    );
    let config = ExplorerConfig::load(Some(&path)).unwrap();
    let predictors = config.scoring.predictors.unwrap();
    assert_eq!(predictors.len(), 1);
    assert_eq!(predictors[0].range, [0.0, 60.0]);
}

#[test]
fn test_invalid_values_rejected() {
    let mut config = ExplorerConfig::default();
    config.sources.items_per_page = 0;
    assert!(config.validate().is_err());

    let mut config = ExplorerConfig::default();
    config.scoring.predictors = Some(vec![]);
    assert!(config.validate().is_err());
}

#[test]
fn test_export_extensions() {
    assert_eq!(ExportFormat::Json.extension(), "json");
    assert_eq!(ExportFormat::Series.extension(), "series.json");
}
