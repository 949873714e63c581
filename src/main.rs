//! Solar GPU Break-Even CLI
//!
//! Command-line interface for running break-even simulations

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use solar_gpu_breakeven::{
    report,
    simulation::{DEFAULT_DISCOUNT_PCT, DEFAULT_SOLAR_INSTALLATION_COST},
    FinancialModel, GpuSelection, ModelConfig, ReferenceData, SimulationInput, SimulationResult,
    TariffTier,
};

#[derive(Parser)]
#[command(name = "solar_gpu_breakeven", version, about = "Break-even simulator for solar-backed GPU servers")]
struct Cli {
    /// Directory holding gpu_catalog.csv, tariff_tiers.csv and competitor_offers.csv (built-in tables if omitted)
    #[arg(long, global = true)]
    reference_dir: Option<PathBuf>,

    /// JSON file with model constants (hours_per_month, server_power_multiplier)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate from command-line flags
    Simulate(SimulateArgs),
    /// Simulate from a JSON input file
    Run {
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the reference tables
    Catalog,
}

#[derive(Args)]
struct SimulateArgs {
    /// GPU selection, repeatable; price defaults to the catalog reference price
    #[arg(long = "gpu", required = true, value_name = "MODEL:QTY[:PRICE]")]
    gpus: Vec<String>,

    #[arg(long, default_value = "green")]
    tariff: TariffTier,

    /// Local currency per USD
    #[arg(long, default_value_t = 5.5)]
    exchange_rate: f64,

    #[arg(long)]
    competitor: String,

    /// Discount on the competitor price (%)
    #[arg(long, default_value_t = DEFAULT_DISCOUNT_PCT)]
    discount: f64,

    #[arg(long, default_value_t = 1)]
    subscribers: u32,

    #[arg(long, default_value_t = DEFAULT_SOLAR_INSTALLATION_COST)]
    solar_cost: f64,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Print the result as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Currency symbol for text output
    #[arg(long, default_value = "R$")]
    currency: String,
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    generated_at: DateTime<Utc>,
    input: &'a SimulationInput,
    result: &'a SimulationResult,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let model = build_model(&cli)?;

    match cli.command {
        Command::Simulate(args) => {
            let gpus = args
                .gpus
                .iter()
                .map(|spec| parse_gpu_spec(spec, &model))
                .collect::<Result<Vec<_>>>()?;

            let input = SimulationInput {
                gpus,
                tariff: args.tariff,
                exchange_rate: args.exchange_rate,
                competitor: args.competitor,
                discount_pct: args.discount,
                subscribers: args.subscribers,
                solar_installation_cost: args.solar_cost,
            };
            simulate_and_print(&model, &input, &args.output)
        }
        Command::Run { input, output } => {
            let json = fs::read_to_string(&input)
                .with_context(|| format!("Unable to read input file {}", input.display()))?;
            let input = SimulationInput::from_json_str(&json)
                .with_context(|| format!("Invalid simulation input in {}", input.display()))?;
            simulate_and_print(&model, &input, &output)
        }
        Command::Catalog => {
            print_catalog(model.reference());
            Ok(())
        }
    }
}

fn build_model(cli: &Cli) -> Result<FinancialModel> {
    let reference = match &cli.reference_dir {
        Some(dir) => ReferenceData::from_csv_path(dir)
            .with_context(|| format!("Unable to load reference data from {}", dir.display()))?,
        None => ReferenceData::default_reference(),
    };

    let config = match &cli.config {
        Some(path) => ModelConfig::from_json_path(path)
            .with_context(|| format!("Unable to load model config from {}", path.display()))?,
        None => ModelConfig::default(),
    };

    Ok(FinancialModel::new(reference, config)?)
}

/// Parse "MODEL:QTY[:PRICE]"
fn parse_gpu_spec(spec: &str, model: &FinancialModel) -> Result<GpuSelection> {
    let mut parts = spec.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    let quantity = match parts.next() {
        Some(qty) => qty
            .trim()
            .parse::<u32>()
            .with_context(|| format!("Invalid quantity in GPU selection '{}'", spec))?,
        None => bail!("GPU selection '{}' must look like MODEL:QTY[:PRICE]", spec),
    };

    match parts.next() {
        Some(price) => {
            let unit_price = price
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid unit price in GPU selection '{}'", spec))?;
            Ok(GpuSelection::new(name, quantity, unit_price))
        }
        None => Ok(GpuSelection::at_reference_price(&model.reference().gpus, name, quantity)?),
    }
}

fn simulate_and_print(model: &FinancialModel, input: &SimulationInput, output: &OutputArgs) -> Result<()> {
    let result = model.simulate(input)?;

    if output.json {
        let report = SimulationReport {
            generated_at: Utc::now(),
            input,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_text(input, &result, &output.currency));
    }
    Ok(())
}

fn print_catalog(reference: &ReferenceData) {
    println!("GPU models:");
    println!("  {:<20} {:>8} {:>16}", "Model", "TDP (W)", "Reference price");
    for entry in reference.gpus.iter() {
        println!(
            "  {:<20} {:>8} {:>16}",
            entry.model,
            entry.tdp_watts,
            report::format_amount(entry.reference_price, 2)
        );
    }

    println!("\nTariff tiers:");
    for (tier, rate) in reference.tariffs.iter() {
        println!(
            "  {:<8} ({:<6}) {:.5}/kWh (+{:.5})",
            tier.to_string(),
            tier.key(),
            rate,
            reference.tariffs.surcharge(tier)
        );
    }

    println!("\nCompetitor offers:");
    for offer in reference.competitors.iter() {
        println!("  {:<26} USD {:.2}/h", offer.name, offer.hourly_price_usd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpu_spec_at_reference_price() {
        let model = FinancialModel::with_defaults();
        let selection = parse_gpu_spec("NVIDIA H100:3", &model).unwrap();
        assert_eq!(selection, GpuSelection::new("NVIDIA H100", 3, 200_000.0));
    }

    #[test]
    fn test_gpu_spec_with_price() {
        let model = FinancialModel::with_defaults();
        let selection = parse_gpu_spec(" NVIDIA A100 : 2 : 115000 ", &model).unwrap();
        assert_eq!(selection, GpuSelection::new("NVIDIA A100", 2, 115_000.0));
    }

    #[test]
    fn test_gpu_spec_errors() {
        let model = FinancialModel::with_defaults();
        assert!(parse_gpu_spec("NVIDIA A100", &model).is_err());
        assert!(parse_gpu_spec("NVIDIA A100:two", &model).is_err());
        assert!(parse_gpu_spec("NVIDIA A100:2:cheap", &model).is_err());
        assert!(parse_gpu_spec("NVIDIA B200:1", &model).is_err());
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "solar_gpu_breakeven",
            "simulate",
            "--gpu",
            "NVIDIA A100:2",
            "--competitor",
            "AWS (p4d.24xlarge)",
            "--tariff",
            "red1",
            "--config",
            "demos/model_config.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("demos/model_config.json")));
        match cli.command {
            Command::Simulate(args) => {
                assert_eq!(args.tariff, TariffTier::Red1);
                assert_eq!(args.discount, DEFAULT_DISCOUNT_PCT);
            }
            _ => panic!("expected simulate"),
        }
    }
}
