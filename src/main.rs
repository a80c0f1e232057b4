#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_sdk_cloudtrail as cloudtrail;
use aws_types::region::Region;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use trailtag::app::lookup::LookupDriver;
use trailtag::app::query::JaqEvaluator;
use trailtag::app::time_window::TimeWindow;
use trailtag::app::{archive, EventPipeline, ParseConfig};

#[derive(Parser, Debug)]
#[command(name = "trailtag")]
#[command(about = "Parse CloudTrail events and output taggable resource records")]
struct Cli {
    /// CloudTrail log file of raw CloudTrail events. When unset, trailtag
    /// reads directly from the CloudTrail LookupEvents API.
    #[arg(short = 'f', long)]
    input_file: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long, env = "TRAILTAG_CONFIG")]
    config: Option<PathBuf>,
}

fn init_logging() {
    // Diagnostics go to stderr; stdout carries nothing but record lines.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trailtag=info,aws_config=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ParseConfig::load_from_file(path)?,
        None => ParseConfig::default(),
    };

    let evaluator = JaqEvaluator::new();
    let pipeline = EventPipeline::new(&config, &evaluator);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(input_file) = &cli.input_file {
        archive::parse_from_file(input_file, &pipeline, &mut out)?;
        out.flush()?;
        return Ok(());
    }

    // No resolvable window means live lookup is a no-op, not a failure.
    let Some(window) = TimeWindow::resolve(&config, &mut out)? else {
        return Ok(());
    };

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let aws_config = loader.load().await;
    let client = cloudtrail::Client::new(&aws_config);

    LookupDriver::new(client, &config, &pipeline)
        .run(&window, &mut out)
        .await?;
    out.flush()?;

    Ok(())
}
