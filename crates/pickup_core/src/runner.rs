//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{apply_deferred, ExecutorKind, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::distributions::{SimRng, VariateSource};
use crate::ecs::Channel;
use crate::pickup_point::PickupPoint;
use crate::profiling::EventMetrics;
use crate::scenario::SimulationHorizon;
use crate::systems::{arrival::arrival_system, balk::balk_system, departure::departure_system};
use crate::telemetry::QueueStats;

fn is_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::Arrival)
        .unwrap_or(false)
}

fn is_departure(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Departure(_)))
        .unwrap_or(false)
}

fn is_balk(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Balk(_)))
        .unwrap_or(false)
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `true` if an event was processed, `false` if the clock was empty or if the next event
/// is at or past [SimulationHorizon] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let stop_at = world.get_resource::<SimulationHorizon>().map(|h| h.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end), Some(ts)) = (stop_at, next_ts) {
        if ts >= end {
            return false;
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };

    // Line lengths held constant since the previous event; integrate them up to now.
    let lengths = world
        .get_resource::<PickupPoint>()
        .map(|p| (p.queue_len(Channel::Staff), p.queue_len(Channel::SelfService)));
    if let (Some((staff, self_service)), Some(mut stats)) =
        (lengths, world.get_resource_mut::<QueueStats>())
    {
        stats.advance(event.timestamp, staff, self_service);
    }

    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }

    schedule.run(world);
    true
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    if !run_next_event(world, schedule) {
        return false;
    }
    let event = world.resource::<CurrentEvent>().0;
    hook(world, &event);
    true
}

/// Runs simulation steps until the event queue is empty (or the horizon is reached) or
/// `max_steps` is reached. Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Builds the simulation schedule: one system per event kind, each gated on the current
/// event, followed by [apply_deferred] so customers spawned during the step exist before
/// the next one.
///
/// The schedule runs on a single thread; the transitions share the random stream and the
/// order of draws is part of a run's reproducibility.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);

    schedule.add_systems(
        (
            arrival_system.run_if(is_arrival),
            departure_system.run_if(is_departure),
            balk_system.run_if(is_balk),
            apply_deferred,
        )
            .chain(),
    );

    schedule
}

/// Seeds the first arrival at `0 + Exp(rate)`. Call this after building the scenario and
/// before running events. Nothing is scheduled when that first gap already reaches the
/// horizon (including a zero arrival rate).
pub fn initialize_simulation(world: &mut World) {
    let horizon = world.resource::<SimulationHorizon>().0;
    let inter_arrival = world.resource::<VariateSource>().inter_arrival;
    let gap = inter_arrival.sample_minutes(&mut world.resource_mut::<SimRng>().0);

    let mut clock = world.resource_mut::<SimulationClock>();
    let first = clock.now() + gap;
    if first < horizon {
        clock.schedule_at(first, EventKind::Arrival);
    }
}
