//! Configuration errors. A run that passed validation cannot fail.

use thiserror::Error;

use crate::ecs::Channel;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no service capacity: staff and self-service counts are both zero")]
    NoCapacity,

    #[error("{} channel has zero capacity but every customer prefers it", .0.label())]
    StarvedChannel(Channel),

    #[error("{name} must be a finite number >= 0, got {value}")]
    NegativeOrNonFinite { name: &'static str, value: f64 },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("incident delay range is invalid: min {min} > max {max}")]
    InvalidDelayRange { min: f64, max: f64 },

    #[error("minimum service time must be > 0, got {0}")]
    NonPositiveMinimumServiceTime(f64),

    #[error("zone balancing needs at least one zone")]
    NoZones,

    #[error("zone {index} efficiency must be a finite number > 0, got {value}")]
    InvalidZoneEfficiency { index: usize, value: f64 },
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeOrNonFinite { name, value })
    }
}

pub(crate) fn ensure_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}
