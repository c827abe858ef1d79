#![allow(dead_code)]

use bevy_ecs::prelude::World;
use pickup_core::scenario::{PickupPointParams, ZoneBalancingConfig};
use pickup_core::test_helpers::create_test_world;

/// Helper that builds reproducible worlds from a small set of knobs.
#[derive(Clone, Debug)]
pub struct TestWorldBuilder {
    params: PickupPointParams,
}

impl Default for TestWorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self {
            params: PickupPointParams::default().with_seed(42),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params = self.params.with_seed(seed);
        self
    }

    pub fn with_channels(mut self, staff: u32, self_service: u32) -> Self {
        self.params = self.params.with_staff(staff).with_self_service(self_service);
        self
    }

    pub fn with_arrival_rate(mut self, rate: f64) -> Self {
        self.params = self.params.with_arrival_rate(rate);
        self
    }

    pub fn with_zones(mut self) -> Self {
        self.params = self
            .params
            .with_zone_balancing(ZoneBalancingConfig::default());
        self
    }

    pub fn without_balking(mut self) -> Self {
        self.params = self.params.without_balking();
        self
    }

    pub fn with_horizon(mut self, minutes: f64) -> Self {
        self.params = self.params.with_horizon_minutes(minutes);
        self
    }

    pub fn params(&self) -> PickupPointParams {
        self.params.clone()
    }

    /// Build the world with the first arrival already scheduled.
    pub fn build(self) -> World {
        create_test_world(&self.params)
    }
}
