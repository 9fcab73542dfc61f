use anyhow::{Context, Result};
use clap::Parser;
use laptimes::config::Config;
use laptimes::report::{self, ReportKind};
use laptimes::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "laptimes")]
#[command(about = "Chart lap-time trial results from a CSV file", long_about = None)]
struct Args {
    /// CSV file with Rank, Vehicle, Driver, Time and "PS / KG" columns
    input: Option<PathBuf>,

    /// Directory the charts are written to
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Report to produce (repeatable); all four when omitted
    #[arg(short, long = "report", value_enum)]
    reports: Vec<ReportKind>,

    /// Image format of the charts
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Number of vehicles in the lap-time chart
    #[arg(long)]
    top: Option<usize>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(out_dir) = self.out_dir {
            config.out_dir = out_dir;
        }
        if !self.reports.is_empty() {
            config.reports = self.reports;
        }
        if let Some(format) = self.format {
            config.render.format = format;
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;

    std::fs::create_dir_all(&config.out_dir).with_context(|| {
        format!("Failed to create output directory '{}'", config.out_dir.display())
    })?;

    let outcomes = report::run_all(&config);
    let failed: Vec<String> = outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .map(|o| o.kind.to_string())
        .collect();

    if !failed.is_empty() {
        eprintln!("Error: {} of {} reports failed: {}", failed.len(), outcomes.len(), failed.join(", "));
        std::process::exit(1);
    }

    Ok(())
}
