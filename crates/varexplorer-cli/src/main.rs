//! varexplorer — merge FAVOR and GTEx annotations for one variant.
//! Entry point for the command-line binary.

mod config;
mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{ExplorerConfig, ExportFormat};
use pipeline::Pipeline;

/// Command-line arguments for varexplorer
#[derive(Parser, Debug)]
#[command(name = "varexplorer")]
#[command(about = "Merge FAVOR and GTEx annotations for a variant into JSON and CSV exports")]
#[command(version)]
struct Args {
    /// rsID to look up, e.g. rs429358
    rsid: String,

    /// Config file (TOML, YAML or JSON); defaults to $VAREXPLORER_CONFIG or ./varexplorer.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory, overrides output.directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format; repeat for several. Overrides output.formats
    #[arg(short = 'f', long = "format", value_enum)]
    formats: Vec<ExportFormat>,

    /// Skip the FAVOR functional annotation source
    #[arg(long)]
    no_favor: bool,

    /// Skip the GTEx eQTL source
    #[arg(long)]
    no_gtex: bool,

    /// Print the exports to stdout instead of writing files
    #[arg(long)]
    print: bool,
}

impl Args {
    fn apply(&self, config: &mut ExplorerConfig) {
        if let Some(dir) = &self.output {
            config.output.directory = dir.clone();
        }
        if !self.formats.is_empty() {
            config.output.formats = self.formats.clone();
        }
        if self.no_favor {
            config.sources.enable_favor = false;
        }
        if self.no_gtex {
            config.sources.enable_gtex = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --print output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("varexplorer=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ExplorerConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    info!(
        rsid = %args.rsid,
        favor = config.sources.enable_favor,
        gtex = config.sources.enable_gtex,
        "varexplorer {}",
        env!("CARGO_PKG_VERSION")
    );

    let pipeline = Pipeline::from_config(&config)?;
    let report = pipeline.run(&args.rsid).await?;

    if args.print {
        let output = pipeline.output();
        for &format in &output.formats {
            println!("{}", pipeline::render(&report, format, output.pretty_json)?);
        }
    } else {
        let written = pipeline::write_outputs(&report, pipeline.output())?;
        info!(files = written.len(), "Done");
    }

    Ok(())
}
