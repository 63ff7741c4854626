use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::{
    eyre::{bail, WrapErr as _},
    Result,
};
use tracing::{info, level_filters::LevelFilter};

use locator_experiment_eval::{
    report::{evaluate, REPORT_FILE},
    samples, SYSLOG_IDENTIFIER,
};
use locator_telemetry::TelemetryConfig;

/// Compare Wi-Fi only and hybrid positioning errors from an experiment CSV.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// CSV with lat_true, lon_true, lat_est, lon_est, method columns
    csv_path: PathBuf,

    /// Also write the report to this directory
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let telemetry = TelemetryConfig::new()
        .with_journald(SYSLOG_IDENTIFIER)
        .with_default_level(LevelFilter::WARN)
        .init();

    let result = run(&Cli::parse());

    telemetry.flush_blocking();
    result
}

fn run(cli: &Cli) -> Result<()> {
    let samples = samples::load(&cli.csv_path)?;
    if samples.is_empty() {
        bail!("no valid rows in {}", cli.csv_path.display());
    }

    let report = evaluate(&samples).to_string();
    println!("{report}");

    if let Some(dir) = &cli.output_dir {
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(REPORT_FILE);
        fs::write(&path, &report)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "report saved");
        println!("\nreport saved to {}", path.display());
    }

    Ok(())
}
