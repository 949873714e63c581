//! Run a tariff x discount x subscriber sensitivity grid
//!
//! Outputs one CSV row per combination for spreadsheet comparison

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use solar_gpu_breakeven::{
    report, FinancialModel, ModelConfig, ReferenceData, ScenarioRunner, SimulationInput,
};

#[derive(Parser)]
#[command(name = "sensitivity", about = "Break-even sensitivity grid over tariff, discount and subscribers")]
struct Args {
    /// JSON simulation input used as the base case
    input: PathBuf,

    /// Reference data directory (built-in tables if omitted)
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// JSON file with model constants (hours_per_month, server_power_multiplier)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Discounts to sweep (%)
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.0, 10.0, 25.0, 50.0, 75.0])]
    discounts: Vec<f64>,

    /// Subscriber counts to sweep
    #[arg(long, value_delimiter = ',', default_values_t = vec![1, 2, 4, 8])]
    subscribers: Vec<u32>,

    #[arg(long, default_value = "sensitivity_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let start = Instant::now();

    let runner = build_runner(&args)?;

    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Unable to read {}", args.input.display()))?;
    let base = SimulationInput::from_json_str(&json)?;

    println!("Running sensitivity grid...");
    let points = runner.sensitivity_grid(&base, &args.discounts, &args.subscribers)?;
    println!("{} scenarios complete in {:?}", points.len(), start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    report::write_csv(BufWriter::new(file), &points)?;
    println!("Output written to {}", args.output.display());

    let reachable = points.iter().filter(|p| p.result.break_even.is_reached()).count();
    let fastest = points
        .iter()
        .filter_map(|p| p.result.break_even.months().map(|m| (m, p)))
        .min_by(|a, b| a.0.total_cmp(&b.0));

    println!("\nSensitivity Summary:");
    println!("  Break-even reachable in {} of {} scenarios", reachable, points.len());
    if let Some((months, point)) = fastest {
        println!(
            "  Fastest: {:.1} months ({} tariff, {}% discount, {} subscribers)",
            months, point.input.tariff, point.input.discount_pct, point.input.subscribers
        );
    }

    Ok(())
}

fn build_runner(args: &Args) -> Result<ScenarioRunner> {
    let reference = match &args.reference_dir {
        Some(dir) => ReferenceData::from_csv_path(dir)
            .with_context(|| format!("Unable to load reference data from {}", dir.display()))?,
        None => ReferenceData::default_reference(),
    };

    let config = match &args.config {
        Some(path) => ModelConfig::from_json_path(path)
            .with_context(|| format!("Unable to load model config from {}", path.display()))?,
        None => ModelConfig::default(),
    };

    Ok(ScenarioRunner::with_model(FinancialModel::new(reference, config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_uses_config_file() {
        let args = Args::try_parse_from([
            "sensitivity",
            "demos/a100_aws.json",
            "--config",
            concat!(env!("CARGO_MANIFEST_DIR"), "/demos/model_config.json"),
        ])
        .unwrap();
        let runner = build_runner(&args).unwrap();
        assert_eq!(runner.model().config().hours_per_month, 744.0);
        assert_eq!(runner.model().config().server_power_multiplier, 2.5);
    }

    #[test]
    fn test_runner_defaults() {
        let args = Args::try_parse_from(["sensitivity", "demos/a100_aws.json", "--discounts", "10,20"]).unwrap();
        assert_eq!(args.discounts, vec![10.0, 20.0]);
        assert_eq!(args.subscribers, vec![1, 2, 4, 8]);

        let runner = build_runner(&args).unwrap();
        assert_eq!(runner.model().config(), &ModelConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args::try_parse_from(["sensitivity", "in.json", "--config", "/nonexistent/model_config.json"]).unwrap();
        assert!(build_runner(&args).is_err());
    }
}
