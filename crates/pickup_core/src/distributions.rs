//! Random variate source: interarrival gaps, service durations, incident delays
//! and the channel preference draw.
//!
//! Every draw of a run comes from one seeded [SimRng], so a fixed seed and a fixed
//! configuration reproduce the same run. Draw order per arrival is: service duration,
//! channel preference, balking, incident (only if service starts), next interarrival gap.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::ecs::Channel;
use crate::error::{ensure_non_negative, ConfigError};

/// The run's single pseudo-random stream.
#[derive(Debug, Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    /// Seeded stream; `None` draws the seed from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

/// Exponential distribution: Poisson arrival process with rate `rate_per_minute`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialInterArrival {
    pub rate_per_minute: f64,
}

impl ExponentialInterArrival {
    pub fn new(rate_per_minute: f64) -> Self {
        Self {
            rate_per_minute: rate_per_minute.max(0.0),
        }
    }

    /// Sample the next gap in minutes by inverse-CDF: -ln(1 - U) / lambda, U uniform in [0, 1).
    pub fn sample_minutes<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.rate_per_minute <= 0.0 {
            return f64::INFINITY;
        }
        let u: f64 = rng.gen();
        -(1.0 - u).ln() / self.rate_per_minute
    }
}

/// Normal service time floored at a strictly positive minimum.
#[derive(Debug, Clone, Copy)]
pub struct ServiceTimeDistribution {
    normal: Normal<f64>,
    pub min_minutes: f64,
}

impl ServiceTimeDistribution {
    pub fn new(mean: f64, std_dev: f64, min_minutes: f64) -> Result<Self, ConfigError> {
        ensure_non_negative("service_time_mean", mean)?;
        ensure_non_negative("service_time_std", std_dev)?;
        if !(min_minutes.is_finite() && min_minutes > 0.0) {
            return Err(ConfigError::NonPositiveMinimumServiceTime(min_minutes));
        }
        // Finite mean and non-negative std always form a valid normal.
        let normal = Normal::new(mean, std_dev).map_err(|_| ConfigError::NegativeOrNonFinite {
            name: "service_time_mean",
            value: mean,
        })?;
        Ok(Self {
            normal,
            min_minutes,
        })
    }

    pub fn sample_minutes<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng).max(self.min_minutes)
    }
}

/// Service interruption: with `probability`, add a uniform delay in `[min_minutes, max_minutes]`.
#[derive(Debug, Clone, Copy)]
pub struct IncidentDelay {
    pub probability: f64,
    pub min_minutes: f64,
    pub max_minutes: f64,
}

impl IncidentDelay {
    pub fn sample_minutes<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if !rng.gen_bool(self.probability) {
            return 0.0;
        }
        rng.gen_range(self.min_minutes..=self.max_minutes)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChannelPreference {
    pub self_service_probability: f64,
}

impl ChannelPreference {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Channel {
        if rng.gen_bool(self.self_service_probability) {
            Channel::SelfService
        } else {
            Channel::Staff
        }
    }
}

/// All distributions of a run, built once from validated parameters.
#[derive(Debug, Clone, Resource)]
pub struct VariateSource {
    pub inter_arrival: ExponentialInterArrival,
    pub service_time: ServiceTimeDistribution,
    pub incident: IncidentDelay,
    pub preference: ChannelPreference,
}
