//! Pure calculation stages of the financial model
//!
//! Each stage is an independent function of its arguments; `FinancialModel`
//! chains them in order.

use super::input::GpuSelection;
use super::result::BreakEven;
use crate::error::Result;
use crate::reference::GpuCatalog;

/// 24 hours x 30 days
pub const HOURS_PER_MONTH: f64 = 720.0;

/// GPUs are taken as ~40% of total server draw, so server = GPU / 0.4
pub const SERVER_POWER_MULTIPLIER: f64 = 2.5;

/// Monthly energy consumption and its cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyCost {
    pub kwh: f64,
    pub cost: f64,
}

/// Sum of catalog TDP x quantity over all selections (W)
///
/// Fails with `UnknownModel` rather than skipping a selection.
pub fn total_gpu_power(selections: &[GpuSelection], catalog: &GpuCatalog) -> Result<u64> {
    let mut total = 0u64;
    for selection in selections {
        let entry = catalog.lookup(&selection.model)?;
        total += entry.tdp_watts as u64 * selection.quantity as u64;
    }
    Ok(total)
}

/// Sum of quantity x user-entered unit price
pub fn gpu_acquisition_cost(selections: &[GpuSelection]) -> f64 {
    selections
        .iter()
        .map(|s| s.quantity as f64 * s.unit_price)
        .sum()
}

pub fn server_power_estimate(gpu_power_watts: f64) -> f64 {
    server_power_estimate_with_multiplier(gpu_power_watts, SERVER_POWER_MULTIPLIER)
}

pub fn server_power_estimate_with_multiplier(gpu_power_watts: f64, multiplier: f64) -> f64 {
    gpu_power_watts * multiplier
}

/// Energy used by the server running 24/7 for a 30-day month, and what it costs
pub fn monthly_energy_cost(server_power_watts: f64, tariff_rate: f64) -> EnergyCost {
    monthly_energy_cost_over(server_power_watts, tariff_rate, HOURS_PER_MONTH)
}

/// Energy used by the server running continuously for `hours_per_month`, and what it costs
pub fn monthly_energy_cost_over(server_power_watts: f64, tariff_rate: f64, hours_per_month: f64) -> EnergyCost {
    let kwh = server_power_watts * hours_per_month / 1000.0;
    EnergyCost {
        kwh,
        cost: kwh * tariff_rate,
    }
}

/// Competitor price for a full month of 24/7 usage, in local currency
pub fn competitor_monthly_cost(hourly_price_usd: f64, exchange_rate: f64) -> f64 {
    competitor_cost_over(hourly_price_usd, exchange_rate, HOURS_PER_MONTH)
}

pub fn competitor_cost_over(hourly_price_usd: f64, exchange_rate: f64, hours: f64) -> f64 {
    let hourly_price_local = hourly_price_usd * exchange_rate;
    hourly_price_local * hours
}

/// Revenue from reselling capacity to `subscribers` at the competitor price minus a flat discount
///
/// `discount_pct` must already be within [0, 100]; see `SimulationInput::validate`.
pub fn monthly_revenue(competitor_monthly_cost: f64, discount_pct: f64, subscribers: u32) -> f64 {
    competitor_monthly_cost * (1.0 - discount_pct / 100.0) * subscribers as f64
}

pub fn break_even(monthly_energy_cost: f64, monthly_revenue: f64, total_investment: f64) -> BreakEven {
    break_even_over(monthly_energy_cost, monthly_revenue, total_investment, HOURS_PER_MONTH)
}

/// Months (and hours) until the monthly margin pays back the investment
///
/// Revenue equal to cost is unreachable: the comparison is strict.
pub fn break_even_over(
    monthly_energy_cost: f64,
    monthly_revenue: f64,
    total_investment: f64,
    hours_per_month: f64,
) -> BreakEven {
    if monthly_revenue > monthly_energy_cost {
        let months = total_investment / (monthly_revenue - monthly_energy_cost);
        BreakEven::Reached {
            months,
            hours: months * hours_per_month,
        }
    } else {
        BreakEven::Unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_single_selection_power_and_cost() {
        let catalog = GpuCatalog::default_catalog();
        let selections = vec![GpuSelection::new("NVIDIA A100", 2, 120_000.0)];

        let gpu_power = total_gpu_power(&selections, &catalog).unwrap();
        assert_eq!(gpu_power, 800);
        assert_eq!(gpu_acquisition_cost(&selections), 240_000.0);
        assert_eq!(server_power_estimate(gpu_power as f64), 2000.0);
    }

    #[test]
    fn test_power_additivity() {
        let catalog = GpuCatalog::default_catalog();
        let selections = vec![
            GpuSelection::new("NVIDIA T4", 3, 15_000.0),
            GpuSelection::new("NVIDIA H100", 1, 210_000.0),
            GpuSelection::new("NVIDIA RTX 4090", 2, 12_500.0),
        ];

        let combined = total_gpu_power(&selections, &catalog).unwrap();
        let individual: u64 = selections
            .iter()
            .map(|s| total_gpu_power(std::slice::from_ref(s), &catalog).unwrap())
            .sum();
        assert_eq!(combined, individual);
        assert_eq!(combined, 3 * 70 + 700 + 2 * 450);
        assert_eq!(gpu_acquisition_cost(&selections), 45_000.0 + 210_000.0 + 25_000.0);
    }

    #[test]
    fn test_unknown_model_is_not_skipped() {
        let catalog = GpuCatalog::default_catalog();
        let selections = vec![
            GpuSelection::new("NVIDIA A100", 1, 120_000.0),
            GpuSelection::new("NVIDIA B200", 1, 300_000.0),
        ];
        match total_gpu_power(&selections, &catalog) {
            Err(Error::UnknownModel { model }) => assert_eq!(model, "NVIDIA B200"),
            other => panic!("Expected UnknownModel, got {:?}", other),
        }
    }

    #[test]
    fn test_server_power_scaling() {
        assert_eq!(server_power_estimate(0.0), 0.0);
        for watts in [70.0, 400.0, 1234.5] {
            assert_eq!(server_power_estimate(watts), 2.5 * watts);
        }
        assert_eq!(server_power_estimate_with_multiplier(800.0, 2.0), 1600.0);
    }

    #[test]
    fn test_monthly_energy_cost() {
        let energy = monthly_energy_cost(2000.0, 0.82672);
        assert_abs_diff_eq!(energy.kwh, 1440.0, epsilon = 1e-9);
        assert_abs_diff_eq!(energy.cost, 1190.4768, epsilon = 1e-9);
        assert_eq!(energy, monthly_energy_cost_over(2000.0, 0.82672, HOURS_PER_MONTH));

        // 31-day month
        let energy = monthly_energy_cost_over(1000.0, 1.0, 744.0);
        assert_abs_diff_eq!(energy.kwh, 744.0, epsilon = 1e-9);
        assert_abs_diff_eq!(energy.cost, 744.0, epsilon = 1e-9);
    }

    #[test]
    fn test_energy_cost_linearity() {
        let base = monthly_energy_cost(1500.0, 0.87135).cost;
        let double_power = monthly_energy_cost(3000.0, 0.87135).cost;
        let double_rate = monthly_energy_cost(1500.0, 2.0 * 0.87135).cost;

        assert_relative_eq!(double_power, 2.0 * base, max_relative = 1e-12);
        assert_relative_eq!(double_rate, 2.0 * base, max_relative = 1e-12);
    }

    #[test]
    fn test_competitor_monthly_cost() {
        // 21.96 USD/h x 5.5 x 720 h
        let cost = competitor_monthly_cost(21.96, 5.5);
        assert_abs_diff_eq!(cost, 86_961.6, epsilon = 1e-6);
        assert_abs_diff_eq!(competitor_cost_over(21.96, 5.5, 744.0), 21.96 * 5.5 * 744.0, epsilon = 1e-6);
    }

    #[test]
    fn test_monthly_revenue() {
        let revenue = monthly_revenue(86_924.16, 25.0, 1);
        assert_abs_diff_eq!(revenue, 65_193.12, epsilon = 1e-6);

        assert_abs_diff_eq!(monthly_revenue(86_924.16, 25.0, 3), 3.0 * 65_193.12, epsilon = 1e-6);
        assert_eq!(monthly_revenue(86_924.16, 100.0, 5), 0.0);
        assert_eq!(monthly_revenue(1000.0, 0.0, 2), 2000.0);
    }

    #[test]
    fn test_break_even_reached() {
        let result = break_even(1190.4768, 65_193.12, 31_050.0 + 240_000.0);
        let months = result.months().unwrap();
        let hours = result.hours().unwrap();

        assert_abs_diff_eq!(months, 271_050.0 / (65_193.12 - 1190.4768), epsilon = 1e-12);
        assert_abs_diff_eq!(months, 4.235, epsilon = 1e-3);
        assert_abs_diff_eq!(hours, 3049.2, epsilon = 1.0);
        assert_abs_diff_eq!(hours, months * 720.0, epsilon = 1e-9);
    }

    #[test]
    fn test_break_even_boundary_is_unreachable() {
        assert_eq!(break_even(1000.0, 1000.0, 271_050.0), BreakEven::Unreachable);
        assert_eq!(break_even(1000.0, 1000.0, 0.0), BreakEven::Unreachable);
        assert_eq!(break_even(1000.0, 999.99, 10.0), BreakEven::Unreachable);
    }

    #[test]
    fn test_break_even_monotonic_in_revenue() {
        let mut previous = f64::INFINITY;
        for revenue in [1500.0, 2000.0, 5000.0, 20_000.0, 65_193.12] {
            let months = break_even(1190.4768, revenue, 271_050.0).months().unwrap();
            assert!(months < previous, "{} months at revenue {} not below {}", months, revenue, previous);
            previous = months;
        }
    }
}
