#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use pickup_core::runner::{run_next_event, run_until_empty, simulation_schedule};
use pickup_core::test_helpers::check_invariants;

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule)
    }

    /// Drive the simulation to the horizon.
    pub fn run_full(&mut self, world: &mut World) -> usize {
        run_until_empty(world, &mut self.schedule, usize::MAX)
    }

    /// Drive the simulation one event at a time, checking the engine invariants and then
    /// `check` after every step.
    pub fn run_checked<F>(&mut self, world: &mut World, mut check: F) -> usize
    where
        F: FnMut(&mut World, usize),
    {
        let mut steps = 0;
        while self.run_one(world) {
            steps += 1;
            if let Err(message) = check_invariants(world) {
                panic!("invariant violated after step {steps}: {message}");
            }
            check(world, steps);
        }
        steps
    }
}
