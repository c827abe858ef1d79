//! One simulation run: builds the world from parameters, seeds the first arrival, drives
//! the event loop to the horizon and exposes the per-customer results.

use bevy_ecs::prelude::{Schedule, World};
use tracing::info;

use crate::clock::{SimTime, SimulationClock};
use crate::error::ConfigError;
use crate::profiling::EventMetrics;
use crate::runner::{initialize_simulation, run_next_event, simulation_schedule};
use crate::scenario::{build_scenario, PickupPointParams, SimulationHorizon};
use crate::telemetry::{collect_customer_records, summarize_run, CustomerRecord, RunSummary};

pub struct Simulation {
    world: World,
    schedule: Schedule,
    params: PickupPointParams,
}

impl Simulation {
    /// Validate `params` and build a ready-to-run world with the first arrival scheduled.
    pub fn new(params: PickupPointParams) -> Result<Self, ConfigError> {
        let mut world = World::new();
        build_scenario(&mut world, &params)?;
        initialize_simulation(&mut world);
        Ok(Self {
            world,
            schedule: simulation_schedule(),
            params,
        })
    }

    pub fn params(&self) -> &PickupPointParams {
        &self.params
    }

    pub fn now(&self) -> SimTime {
        self.world.resource::<SimulationClock>().now()
    }

    pub fn horizon(&self) -> SimTime {
        self.world.resource::<SimulationHorizon>().0
    }

    /// Process a single event. Returns `false` once nothing is left before the horizon.
    pub fn step(&mut self) -> bool {
        run_next_event(&mut self.world, &mut self.schedule)
    }

    /// Run to the horizon. Returns the number of events processed by this call.
    pub fn run(&mut self) -> usize {
        let steps = self.run_until(self.horizon());
        let summary = self.summary();
        info!(
            steps,
            customers = summary.total_customers,
            served = summary.customers_served,
            balked = summary.balked_customers,
            avg_wait = summary.avg_waiting_time,
            "run finished"
        );
        self.world.resource::<EventMetrics>().log_summary();
        steps
    }

    /// Process every event strictly before `until` (and before the horizon).
    pub fn run_until(&mut self, until: SimTime) -> usize {
        let mut steps = 0;
        loop {
            let next = self.world.resource::<SimulationClock>().next_event_time();
            match next {
                Some(ts) if ts < until => {}
                _ => break,
            }
            if !self.step() {
                break;
            }
            steps += 1;
        }
        steps
    }

    /// Every customer created so far, in arrival order.
    pub fn customers(&mut self) -> Vec<CustomerRecord> {
        collect_customer_records(&mut self.world)
    }

    /// Waiting times of non-balked customers whose service started, in arrival order.
    pub fn waiting_times(&mut self) -> Vec<f64> {
        crate::telemetry::waiting_times(&self.customers())
    }

    pub fn summary(&mut self) -> RunSummary {
        summarize_run(&mut self.world)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
