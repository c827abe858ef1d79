//! Scenario setup: validate run parameters and populate the world with the
//! pickup point, its distributions and its bookkeeping resources.

mod build;
mod params;

pub use build::{build_scenario, variate_source};
pub use params::{PickupPointParams, SimulationHorizon, ZoneBalancingConfig};
