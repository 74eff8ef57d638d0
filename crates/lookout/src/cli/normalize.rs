//! The `lookout normalize` command: print canonical detections as JSON.

use clap::Args;
use lookout_core::Config;
use std::path::PathBuf;

/// Arguments for the `normalize` command.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// JSON file with raw detector output for one image
    pub input: PathBuf,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the normalize command.
pub async fn execute(args: NormalizeArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let normalizer = lookout_core::Normalizer::new(config.class_table());

    let raw = super::read_raw_detections(&args.input)?;
    let (detections, report) = normalizer.normalize_with_report(&raw);
    tracing::info!(
        "Normalized {} detection(s), dropped {}",
        report.kept,
        report.dropped
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&detections)?
    } else {
        serde_json::to_string(&detections)?
    };
    println!("{json}");
    Ok(())
}
