//! Test helpers for common test setup and invariant checks.
//!
//! Shared by unit tests, integration tests and the experiments crate.

use bevy_ecs::prelude::{Entity, World};

use crate::clock::SimulationClock;
use crate::ecs::{Channel, Customer, CustomerState};
use crate::pickup_point::PickupPoint;
use crate::runner::initialize_simulation;
use crate::scenario::{build_scenario, PickupPointParams};
use crate::zones::ZoneBoard;

/// Parameters used across tests: default policy with a fixed seed.
pub fn test_params(seed: u64) -> PickupPointParams {
    PickupPointParams::default().with_seed(seed)
}

/// Create a world built from `params` with the first arrival scheduled.
///
/// # Panics
///
/// Panics if `params` is invalid.
pub fn create_test_world(params: &PickupPointParams) -> World {
    let mut world = World::new();
    build_scenario(&mut world, params).expect("test params should be valid");
    initialize_simulation(&mut world);
    world
}

/// Check the engine invariants that must hold between any two events:
///
/// - per channel, `available + in service == capacity`, and the in-service count matches
///   the customers in [CustomerState::InService];
/// - every line member is a [CustomerState::Queued] customer of that channel, and every
///   queued customer is in exactly one line;
/// - every pending event is at or after the current time;
/// - with zone balancing on, the total zone load equals the number of staff-assisted
///   customers in service;
/// - per-customer timestamps are ordered.
pub fn check_invariants(world: &mut World) -> Result<(), String> {
    let customers: Vec<(Entity, Customer)> = world
        .query::<(Entity, &Customer)>()
        .iter(world)
        .map(|(entity, customer)| (entity, customer.clone()))
        .collect();
    let point = world.resource::<PickupPoint>();

    for channel in Channel::ALL {
        // Slots in use are derived from `capacity - available`, so the conservation check
        // is against the customers actually in service.
        let in_service = point.in_service(channel);
        let serving = customers
            .iter()
            .filter(|(_, c)| c.channel == channel && c.state == CustomerState::InService)
            .count() as u32;
        if serving != in_service {
            return Err(format!(
                "{}: {serving} customers in service but {in_service} slots taken",
                channel.label()
            ));
        }

        for entity in point.line(channel) {
            let Some((_, customer)) = customers.iter().find(|(e, _)| e == entity) else {
                return Err(format!("{}: line holds unknown entity {entity:?}", channel.label()));
            };
            if customer.state != CustomerState::Queued || customer.channel != channel {
                return Err(format!(
                    "{}: line member {} is {:?} on {}",
                    channel.label(),
                    customer.id,
                    customer.state,
                    customer.channel.label()
                ));
            }
        }
        let queued = customers
            .iter()
            .filter(|(_, c)| c.channel == channel && c.state == CustomerState::Queued)
            .count();
        if queued != point.queue_len(channel) {
            return Err(format!(
                "{}: {queued} queued customers but line length {}",
                channel.label(),
                point.queue_len(channel)
            ));
        }
    }

    let clock = world.resource::<SimulationClock>();
    if let Some(next) = clock.next_event_time() {
        if next < clock.now() {
            return Err(format!("pending event at {next} before now {}", clock.now()));
        }
    }

    if let Some(zones) = world.get_resource::<ZoneBoard>() {
        let staff_serving = customers
            .iter()
            .filter(|(_, c)| c.channel == Channel::Staff && c.state == CustomerState::InService)
            .count() as u32;
        if zones.total_load() != staff_serving {
            return Err(format!(
                "zone load {:?} does not match {staff_serving} staff customers in service",
                zones.loads()
            ));
        }
    }

    for (_, customer) in &customers {
        if let Some(start) = customer.service_start {
            if start < customer.arrival_time {
                return Err(format!("customer {} starts before arriving", customer.id));
            }
            if let Some(end) = customer.departure_time {
                if end < start {
                    return Err(format!("customer {} departs before starting", customer.id));
                }
            }
        }
        if customer.balked && (customer.service_start.is_some() || customer.zone.is_some()) {
            return Err(format!("balked customer {} was served", customer.id));
        }
    }

    Ok(())
}
