//! Rendering of simulation results as text and CSV

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::scenario::SensitivityPoint;
use crate::simulation::{BreakEven, SimulationInput, SimulationResult};

/// Format a number with thousands separators and a fixed number of decimals
pub fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// One-line verdict on the break-even point
pub fn break_even_message(break_even: &BreakEven) -> String {
    match break_even {
        BreakEven::Reached { months, hours } => format!(
            "Estimated profit from {:.1} months or {} hours.",
            months,
            format_amount(*hours, 0)
        ),
        BreakEven::Unreachable => "Revenue insufficient to reach break-even.".to_string(),
    }
}

/// Human-readable simulation report; `currency` prefixes every amount
pub fn render_text(input: &SimulationInput, result: &SimulationResult, currency: &str) -> String {
    let money = |value: f64| format!("{} {}", currency, format_amount(value, 2));

    let lines = [
        format!("Total GPU TDP: {} W", result.gpu_power_watts),
        format!("Estimated server power: {:.0} W", result.server_power_watts),
        format!("Monthly energy consumption: {} kWh", format_amount(result.monthly_energy_kwh, 2)),
        format!(
            "Monthly energy cost ({} tariff): {}",
            result.tariff_tier,
            money(result.monthly_energy_cost)
        ),
        format!(
            "Monthly cost charged by {}: {}",
            result.competitor,
            money(result.competitor_monthly_cost)
        ),
        format!(
            "Estimated monthly revenue ({} subscribers, {}% discount): {}",
            input.subscribers,
            input.discount_pct,
            money(result.monthly_revenue)
        ),
        format!("Solar installation cost: {}", money(result.solar_installation_cost)),
        format!("Total GPU acquisition cost: {}", money(result.gpu_acquisition_cost)),
        format!("Total investment: {}", money(result.total_investment)),
        break_even_message(&result.break_even),
    ];

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Flat CSV row for one simulation
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Tariff")]
    tariff: &'a str,
    #[serde(rename = "DiscountPct")]
    discount_pct: f64,
    #[serde(rename = "Subscribers")]
    subscribers: u32,
    #[serde(rename = "Competitor")]
    competitor: &'a str,
    #[serde(rename = "GpuPowerW")]
    gpu_power_watts: u64,
    #[serde(rename = "ServerPowerW")]
    server_power_watts: f64,
    #[serde(rename = "EnergyKwh")]
    monthly_energy_kwh: f64,
    #[serde(rename = "EnergyCost")]
    monthly_energy_cost: f64,
    #[serde(rename = "CompetitorCost")]
    competitor_monthly_cost: f64,
    #[serde(rename = "Revenue")]
    monthly_revenue: f64,
    #[serde(rename = "Margin")]
    monthly_margin: f64,
    #[serde(rename = "Investment")]
    total_investment: f64,
    /// Empty when break-even is unreachable
    #[serde(rename = "BreakEvenMonths")]
    break_even_months: Option<f64>,
    #[serde(rename = "BreakEvenHours")]
    break_even_hours: Option<f64>,
}

impl<'a> CsvRow<'a> {
    fn new(input: &'a SimulationInput, result: &'a SimulationResult) -> Self {
        Self {
            tariff: result.tariff_tier.key(),
            discount_pct: input.discount_pct,
            subscribers: input.subscribers,
            competitor: &result.competitor,
            gpu_power_watts: result.gpu_power_watts,
            server_power_watts: result.server_power_watts,
            monthly_energy_kwh: result.monthly_energy_kwh,
            monthly_energy_cost: result.monthly_energy_cost,
            competitor_monthly_cost: result.competitor_monthly_cost,
            monthly_revenue: result.monthly_revenue,
            monthly_margin: result.monthly_margin,
            total_investment: result.total_investment,
            break_even_months: result.break_even.months(),
            break_even_hours: result.break_even.hours(),
        }
    }
}

/// Write one CSV row per sensitivity point, with a header
pub fn write_csv<W: Write>(writer: W, points: &[SensitivityPoint]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in points {
        csv_writer.serialize(CsvRow::new(&point.input, &point.result))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::TariffTier;
    use crate::scenario::ScenarioRunner;
    use crate::simulation::GpuSelection;

    fn a100_input() -> SimulationInput {
        SimulationInput::new(
            vec![GpuSelection::new("NVIDIA A100", 2, 120_000.0)],
            TariffTier::Green,
            5.5,
            "AWS (p4d.24xlarge)",
        )
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0, 2), "0.00");
        assert_eq!(format_amount(999.994, 2), "999.99");
        assert_eq!(format_amount(1190.4768, 2), "1,190.48");
        assert_eq!(format_amount(271_050.0, 2), "271,050.00");
        assert_eq!(format_amount(1_234_567.0, 0), "1,234,567");
        assert_eq!(format_amount(-86_961.6, 1), "-86,961.6");
        assert_eq!(format_amount(-0.001, 2), "0.00");
    }

    #[test]
    fn test_break_even_message() {
        let reached = BreakEven::Reached { months: 4.23498, hours: 3049.19 };
        assert_eq!(
            break_even_message(&reached),
            "Estimated profit from 4.2 months or 3,049 hours."
        );
        assert_eq!(
            break_even_message(&BreakEven::Unreachable),
            "Revenue insufficient to reach break-even."
        );
    }

    #[test]
    fn test_render_text() {
        let input = a100_input();
        let result = ScenarioRunner::new().run(&input).unwrap();
        let text = render_text(&input, &result, "R$");

        assert!(text.contains("Total GPU TDP: 800 W"));
        assert!(text.contains("Estimated server power: 2000 W"));
        assert!(text.contains("Monthly energy consumption: 1,440.00 kWh"));
        assert!(text.contains("Monthly energy cost (Green tariff): R$ 1,190.48"));
        assert!(text.contains("Total investment: R$ 271,050.00"));
        assert!(text.contains("(1 subscribers, 25% discount)"));
        assert!(text.ends_with("hours.\n"));
    }

    #[test]
    fn test_write_csv() {
        let points = ScenarioRunner::new()
            .sensitivity_grid(&a100_input(), &[25.0, 100.0], &[1])
            .unwrap();

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &points).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 1 + 4 * 2);
        assert!(lines[0].starts_with("Tariff,DiscountPct,Subscribers,Competitor,"));
        assert!(lines[0].ends_with("BreakEvenMonths,BreakEvenHours"));
        assert!(lines[1].starts_with("green,25.0,1,"));
        // 100% discount leaves no revenue: break-even columns are empty
        assert!(lines[2].starts_with("green,100.0,1,"));
        assert!(lines[2].ends_with(",,"));
    }
}
