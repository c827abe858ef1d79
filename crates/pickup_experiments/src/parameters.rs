//! Parameter variation framework for exploring pickup point configurations.
//!
//! A [ParameterSpace] is a grid over staff counts, terminal counts, arrival rates and
//! zone balancing on/off. Every grid point is expanded into `replications` runs that
//! share seeds with the other grid points.

use pickup_core::scenario::{PickupPointParams, ZoneBalancingConfig};

mod combinations;
#[cfg(test)]
mod tests;

use combinations::ParameterCombination;

/// A single run: scenario parameters plus experiment metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub params: PickupPointParams,
    /// Scenario (grid point) name; replications of one scenario share it.
    pub scenario: String,
    pub replication: usize,
    pub seed: u64,
}

impl ParameterSet {
    pub fn new(params: PickupPointParams, scenario: String, replication: usize, seed: u64) -> Self {
        Self {
            params,
            scenario,
            replication,
            seed,
        }
    }

    /// The scenario params with this run's seed applied.
    pub fn scenario_params(&self) -> PickupPointParams {
        self.params.clone().with_seed(self.seed)
    }
}

#[derive(Debug, Clone)]
pub struct ParameterSpace {
    /// Defaults for every dimension left empty.
    base: PickupPointParams,
    staff_counts: Vec<u32>,
    self_service_counts: Vec<u32>,
    arrival_rates: Vec<f64>,
    zone_balancing: Vec<bool>,
    replications: usize,
    base_seed: u64,
}

impl Default for ParameterSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self {
            base: PickupPointParams::default(),
            staff_counts: vec![],
            self_service_counts: vec![],
            arrival_rates: vec![],
            zone_balancing: vec![],
            replications: 1,
            base_seed: 42,
        }
    }

    pub fn grid() -> Self {
        Self::new()
    }

    pub fn staff_count(mut self, counts: Vec<u32>) -> Self {
        self.staff_counts = counts;
        self
    }

    pub fn self_service_count(mut self, counts: Vec<u32>) -> Self {
        self.self_service_counts = counts;
        self
    }

    pub fn arrival_rate(mut self, rates: Vec<f64>) -> Self {
        self.arrival_rates = rates;
        self
    }

    pub fn zone_balancing(mut self, enabled: Vec<bool>) -> Self {
        self.zone_balancing = enabled;
        self
    }

    pub fn replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    pub fn base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_base(mut self, base: PickupPointParams) -> Self {
        self.base = base;
        self
    }

    /// Grid search: every combination of the specified values, each replicated.
    /// Combinations that fail validation (e.g. no capacity at all) are skipped.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let mut sets = Vec::new();
        for combo in ParameterCombination::expand(self) {
            let params = combo.apply(&self.base);
            if params.validate().is_err() {
                tracing::warn!(scenario = %combo.name(), "skipping invalid combination");
                continue;
            }
            for replication in 0..self.replications {
                sets.push(ParameterSet::new(
                    params.clone(),
                    combo.name(),
                    replication,
                    self.base_seed.wrapping_add(replication as u64),
                ));
            }
        }
        sets
    }

    fn zone_config(&self) -> ZoneBalancingConfig {
        self.base.zone_balancing.clone().unwrap_or_default()
    }
}
