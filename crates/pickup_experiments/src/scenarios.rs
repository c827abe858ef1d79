//! The operating policies compared by the study.

use pickup_core::scenario::{PickupPointParams, ZoneBalancingConfig};

use crate::parameters::ParameterSet;

pub const BASELINE: &str = "baseline";
pub const SELF_SERVICE: &str = "self_service";
pub const ZONE_BALANCING: &str = "zone_balancing";

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub params: PickupPointParams,
}

impl Scenario {
    pub fn new(name: impl Into<String>, params: PickupPointParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Apply `f` to the scenario parameters (e.g. a CLI override of the arrival rate).
    pub fn map_params(mut self, f: impl FnOnce(PickupPointParams) -> PickupPointParams) -> Self {
        self.params = f(self.params);
        self
    }
}

/// Baseline (3 staff, no terminals), added terminals (3 + 2), and terminals plus zone
/// balancing over three equally efficient zones. The baseline comes first; the
/// statistical comparison treats the first scenario as the reference.
pub fn standard_scenarios() -> Vec<Scenario> {
    let base = PickupPointParams::default().with_staff(3);
    vec![
        Scenario::new(BASELINE, base.clone().with_self_service(0)),
        Scenario::new(SELF_SERVICE, base.clone().with_self_service(2)),
        Scenario::new(
            ZONE_BALANCING,
            base.with_self_service(2)
                .with_zone_balancing(ZoneBalancingConfig::default()),
        ),
    ]
}

/// Expand every scenario into `replications` runs with seeds `base_seed + replication`.
///
/// Replication `r` of every scenario shares the same seed, so scenarios are compared
/// under common random numbers.
pub fn replicate(scenarios: &[Scenario], replications: usize, base_seed: u64) -> Vec<ParameterSet> {
    scenarios
        .iter()
        .flat_map(|scenario| {
            (0..replications).map(move |replication| {
                ParameterSet::new(
                    scenario.params.clone(),
                    scenario.name.clone(),
                    replication,
                    base_seed.wrapping_add(replication as u64),
                )
            })
        })
        .collect()
}
