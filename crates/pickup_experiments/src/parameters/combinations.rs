use pickup_core::scenario::PickupPointParams;

use super::ParameterSpace;

/// One grid point.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ParameterCombination {
    pub(super) staff_count: u32,
    pub(super) self_service_count: u32,
    pub(super) arrival_rate: f64,
    pub(super) zone_balancing: Option<pickup_core::scenario::ZoneBalancingConfig>,
}

/// Empty dimension falls back to the base value.
fn values_or<T: Clone>(values: &[T], fallback: T) -> Vec<T> {
    if values.is_empty() {
        vec![fallback]
    } else {
        values.to_vec()
    }
}

impl ParameterCombination {
    /// Cartesian product in the order staff, terminals, rate, zones.
    pub(super) fn expand(space: &ParameterSpace) -> Vec<Self> {
        let staff = values_or(&space.staff_counts, space.base.staff_count);
        let terminals = values_or(&space.self_service_counts, space.base.self_service_count);
        let rates = values_or(&space.arrival_rates, space.base.arrival_rate);
        let zones = values_or(&space.zone_balancing, space.base.zone_balancing.is_some());

        let mut combos = Vec::with_capacity(staff.len() * terminals.len() * rates.len() * zones.len());
        for &staff_count in &staff {
            for &self_service_count in &terminals {
                for &arrival_rate in &rates {
                    for &enabled in &zones {
                        combos.push(Self {
                            staff_count,
                            self_service_count,
                            arrival_rate,
                            zone_balancing: enabled.then(|| space.zone_config()),
                        });
                    }
                }
            }
        }
        combos
    }

    pub(super) fn apply(&self, base: &PickupPointParams) -> PickupPointParams {
        let mut params = base
            .clone()
            .with_staff(self.staff_count)
            .with_self_service(self.self_service_count)
            .with_arrival_rate(self.arrival_rate);
        params.zone_balancing = self.zone_balancing.clone();
        params
    }

    pub(super) fn name(&self) -> String {
        format!(
            "staff{}_terminals{}_rate{}{}",
            self.staff_count,
            self.self_service_count,
            self.arrival_rate,
            if self.zone_balancing.is_some() { "_zones" } else { "" }
        )
    }
}
