use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::SimTime;
use crate::ecs::Channel;
use crate::error::{ensure_non_negative, ensure_probability, ConfigError};

/// Default run length: a two-hour peak period, in minutes.
const DEFAULT_HORIZON_MINUTES: f64 = 120.0;

/// Default number of zones used by the load balancer.
const DEFAULT_ZONE_COUNT: usize = 3;

/// Simulation end time in minutes. The runner stops processing events once the next
/// event would be at or after this time.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationHorizon(pub SimTime);

/// Zone load balancing for staff-assisted customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneBalancingConfig {
    /// One entry per zone; multiplier applied to the service duration.
    pub zone_efficiencies: Vec<f64>,
}

impl Default for ZoneBalancingConfig {
    fn default() -> Self {
        Self {
            zone_efficiencies: vec![1.0; DEFAULT_ZONE_COUNT],
        }
    }
}

impl ZoneBalancingConfig {
    pub fn uniform(zone_count: usize, efficiency: f64) -> Self {
        Self {
            zone_efficiencies: vec![efficiency; zone_count],
        }
    }
}

/// Parameters for one simulation run. Immutable once handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupPointParams {
    pub staff_count: u32,
    pub self_service_count: u32,
    /// Mean arrivals per minute.
    pub arrival_rate: f64,
    pub service_time_mean: f64,
    pub service_time_std: f64,
    /// Floor applied to every service time draw.
    pub min_service_time: f64,
    pub incident_probability: f64,
    pub incident_delay_min: f64,
    pub incident_delay_max: f64,
    /// Probability that a new customer prefers a self-service terminal.
    pub self_service_probability: f64,
    pub balk_base_probability: f64,
    pub balk_increment: f64,
    pub balk_ceiling: f64,
    /// `None` disables the zone load balancer.
    pub zone_balancing: Option<ZoneBalancingConfig>,
    /// Random seed for reproducibility (optional; if None, uses OS entropy).
    pub seed: Option<u64>,
    pub horizon_minutes: f64,
}

impl Default for PickupPointParams {
    fn default() -> Self {
        Self {
            staff_count: 3,
            self_service_count: 2,
            arrival_rate: 1.0,
            service_time_mean: 2.0,
            service_time_std: 0.5,
            min_service_time: 0.1,
            incident_probability: 0.1,
            incident_delay_min: 1.0,
            incident_delay_max: 5.0,
            self_service_probability: 0.5,
            balk_base_probability: 0.05,
            balk_increment: 0.02,
            balk_ceiling: 0.5,
            zone_balancing: None,
            seed: None,
            horizon_minutes: DEFAULT_HORIZON_MINUTES,
        }
    }
}

impl PickupPointParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_staff(mut self, count: u32) -> Self {
        self.staff_count = count;
        self
    }

    pub fn with_self_service(mut self, count: u32) -> Self {
        self.self_service_count = count;
        self
    }

    pub fn with_arrival_rate(mut self, rate_per_minute: f64) -> Self {
        self.arrival_rate = rate_per_minute;
        self
    }

    pub fn with_service_time(mut self, mean: f64, std: f64) -> Self {
        self.service_time_mean = mean;
        self.service_time_std = std;
        self
    }

    pub fn with_incidents(mut self, probability: f64, min_delay: f64, max_delay: f64) -> Self {
        self.incident_probability = probability;
        self.incident_delay_min = min_delay;
        self.incident_delay_max = max_delay;
        self
    }

    pub fn with_self_service_probability(mut self, probability: f64) -> Self {
        self.self_service_probability = probability;
        self
    }

    pub fn with_balking(mut self, base: f64, increment: f64, ceiling: f64) -> Self {
        self.balk_base_probability = base;
        self.balk_increment = increment;
        self.balk_ceiling = ceiling;
        self
    }

    /// Turn balking off entirely.
    pub fn without_balking(self) -> Self {
        self.with_balking(0.0, 0.0, 0.0)
    }

    pub fn with_zone_balancing(mut self, config: ZoneBalancingConfig) -> Self {
        self.zone_balancing = Some(config);
        self
    }

    pub fn with_horizon_minutes(mut self, minutes: f64) -> Self {
        self.horizon_minutes = minutes;
        self
    }

    pub fn capacity(&self, channel: Channel) -> u32 {
        match channel {
            Channel::Staff => self.staff_count,
            Channel::SelfService => self.self_service_count,
        }
    }

    /// Probability that a new customer prefers `channel`.
    pub fn preference_probability(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Staff => 1.0 - self.self_service_probability,
            Channel::SelfService => self.self_service_probability,
        }
    }

    /// Validate the configuration. Runs before any engine state is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("arrival_rate", self.arrival_rate)?;
        ensure_non_negative("service_time_mean", self.service_time_mean)?;
        ensure_non_negative("service_time_std", self.service_time_std)?;
        ensure_non_negative("horizon_minutes", self.horizon_minutes)?;
        ensure_non_negative("incident_delay_min", self.incident_delay_min)?;
        ensure_non_negative("incident_delay_max", self.incident_delay_max)?;
        ensure_non_negative("balk_increment", self.balk_increment)?;
        ensure_probability("incident_probability", self.incident_probability)?;
        ensure_probability("self_service_probability", self.self_service_probability)?;
        ensure_probability("balk_base_probability", self.balk_base_probability)?;
        ensure_probability("balk_ceiling", self.balk_ceiling)?;

        if !(self.min_service_time.is_finite() && self.min_service_time > 0.0) {
            return Err(ConfigError::NonPositiveMinimumServiceTime(
                self.min_service_time,
            ));
        }
        if self.incident_delay_min > self.incident_delay_max {
            return Err(ConfigError::InvalidDelayRange {
                min: self.incident_delay_min,
                max: self.incident_delay_max,
            });
        }

        if self.staff_count == 0 && self.self_service_count == 0 {
            return Err(ConfigError::NoCapacity);
        }
        for channel in Channel::ALL {
            if self.capacity(channel) > 0 {
                continue;
            }
            let share = self.preference_probability(channel);
            if share >= 1.0 {
                return Err(ConfigError::StarvedChannel(channel));
            }
            if share > 0.0 {
                warn!(
                    channel = channel.label(),
                    share,
                    "channel has no capacity; customers preferring it will queue until the horizon"
                );
            }
        }

        if let Some(zones) = &self.zone_balancing {
            if zones.zone_efficiencies.is_empty() {
                return Err(ConfigError::NoZones);
            }
            for (index, &value) in zones.zone_efficiencies.iter().enumerate() {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigError::InvalidZoneEfficiency { index, value });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PickupPointParams::default().validate().is_ok());
    }

    #[test]
    fn baseline_without_terminals_is_valid() {
        let params = PickupPointParams::default().with_self_service(0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_no_capacity() {
        let params = PickupPointParams::default().with_staff(0).with_self_service(0);
        assert_eq!(params.validate(), Err(ConfigError::NoCapacity));
    }

    #[test]
    fn rejects_channel_everyone_prefers_but_nobody_serves() {
        let params = PickupPointParams::default()
            .with_self_service(0)
            .with_self_service_probability(1.0);
        assert_eq!(
            params.validate(),
            Err(ConfigError::StarvedChannel(Channel::SelfService))
        );

        let params = PickupPointParams::default()
            .with_staff(0)
            .with_self_service_probability(0.0);
        assert_eq!(
            params.validate(),
            Err(ConfigError::StarvedChannel(Channel::Staff))
        );
    }

    #[test]
    fn rejects_negative_rate_and_mean() {
        let params = PickupPointParams::default().with_arrival_rate(-1.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NegativeOrNonFinite {
                name: "arrival_rate",
                ..
            })
        ));
        let params = PickupPointParams::default().with_service_time(-2.0, 0.5);
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_arrival_rate_is_allowed() {
        let params = PickupPointParams::default().with_arrival_rate(0.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_bad_probabilities_and_ranges() {
        assert!(PickupPointParams::default()
            .with_balking(0.05, 0.02, 1.5)
            .validate()
            .is_err());
        assert!(matches!(
            PickupPointParams::default()
                .with_incidents(0.1, 5.0, 1.0)
                .validate(),
            Err(ConfigError::InvalidDelayRange { .. })
        ));
    }

    #[test]
    fn rejects_bad_zones() {
        let empty = PickupPointParams::default().with_zone_balancing(ZoneBalancingConfig {
            zone_efficiencies: vec![],
        });
        assert_eq!(empty.validate(), Err(ConfigError::NoZones));

        let zero = PickupPointParams::default()
            .with_zone_balancing(ZoneBalancingConfig::uniform(3, 0.0));
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::InvalidZoneEfficiency { index: 0, .. })
        ));
    }
}
