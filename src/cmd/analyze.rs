use super::OutputFormat;
use crate::reports;
use clap::Args;
use perfscore::api::{self, MeasurementBundle, ReportDocument};
use perfscore::config::Config;
use perfscore::error::PsResult;
use perfscore::scorer::Engine;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Measurement bundle (JSON) written by the extraction layer.
    #[arg(short, long)]
    pub bundle: PathBuf,

    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

pub fn run(args: AnalyzeArgs, engine: &Engine) -> PsResult<()> {
    info!("📂 Loading bundle: {}", args.bundle.display());
    let bundle = MeasurementBundle::load_from_file(&args.bundle)?;
    let task_id = bundle.task_id.clone();

    let report = api::analyze_bundle(engine, bundle)?;

    match args.format {
        OutputFormat::Json => {
            let mut doc = ReportDocument::from(&report);
            doc.task_id = task_id;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Table => {
            if let Some(id) = task_id {
                println!("\n🔎 === PERFORMANCE REPORT: {} === 🔎", id);
            } else {
                println!("\n🔎 === PERFORMANCE REPORT === 🔎");
            }
            reports::print_final_report(&report);
        }
    }
    Ok(())
}
