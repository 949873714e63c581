//! Financial model: inputs, calculation stages, orchestration and results

mod input;
pub mod model;
mod engine;
mod result;

pub use input::{GpuSelection, SimulationInput, DEFAULT_DISCOUNT_PCT, DEFAULT_SOLAR_INSTALLATION_COST};
pub use model::{EnergyCost, HOURS_PER_MONTH, SERVER_POWER_MULTIPLIER};
pub use engine::{FinancialModel, ModelConfig};
pub use result::{BreakEven, SimulationResult};
