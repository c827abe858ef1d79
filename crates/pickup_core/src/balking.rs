//! Balking: a customer may refuse to join the line on arrival, with a probability
//! that grows with the length of the line for the channel they prefer.

use bevy_ecs::prelude::Resource;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct BalkingPolicy {
    pub base_probability: f64,
    /// Added per customer already waiting in the matching line.
    pub increment: f64,
    pub ceiling: f64,
}

impl Default for BalkingPolicy {
    fn default() -> Self {
        Self {
            base_probability: 0.05,
            increment: 0.02,
            ceiling: 0.5,
        }
    }
}

impl BalkingPolicy {
    pub fn probability(&self, queue_len: usize) -> f64 {
        (self.base_probability + queue_len as f64 * self.increment).min(self.ceiling)
    }

    /// One Bernoulli draw against [Self::probability]. Evaluated once per customer, at arrival.
    pub fn decide<R: Rng + ?Sized>(&self, rng: &mut R, queue_len: usize) -> bool {
        rng.gen_bool(self.probability(queue_len))
    }
}
