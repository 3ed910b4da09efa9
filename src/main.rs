use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use lookback::{config::LookbackConfig, logging::setup_tracing, pipeline::Pipeline};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Prepare sliding-window forecasting datasets from a time-indexed table")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory for log files.
    #[arg(long)]
    log_dir: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (_writer, _guard) = setup_tracing(args.log_dir.as_deref())?;

    let config = LookbackConfig::read_config(args.config.as_ref())?;
    let pipeline = Pipeline::load(&config)?;

    info!(
        "Prepared {} rows x {} series (window {}, horizon {})",
        pipeline.rows(),
        pipeline.series(),
        pipeline.window(),
        pipeline.horizon()
    );
    info!(
        "Train X {:?} Y {:?}",
        pipeline.train().x().shape(),
        pipeline.train().y().shape()
    );
    info!(
        "Valid X {:?} Y {:?}",
        pipeline.valid().x().shape(),
        pipeline.valid().y().shape()
    );
    info!(
        "Test  X {:?} Y {:?}",
        pipeline.test().x().shape(),
        pipeline.test().y().shape()
    );
    info!("Scale vector: {}", pipeline.scale());

    Ok(())
}
