use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::distributions::{SimRng, VariateSource};
use crate::ecs::{Channel, Customer, CustomerState};
use crate::pickup_point::PickupPoint;
use crate::systems::service::begin_service;
use crate::telemetry::SimTelemetry;
use crate::zones::ZoneBoard;

/// Completes the departing customer's service, frees its slot (and one unit of zone
/// load for staff-assisted service) and starts the head of the same channel's line.
#[allow(clippy::too_many_arguments)]
pub fn departure_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<SimRng>,
    variates: Res<VariateSource>,
    mut point: ResMut<PickupPoint>,
    mut zones: Option<ResMut<ZoneBoard>>,
    mut telemetry: ResMut<SimTelemetry>,
    mut customers: Query<&mut Customer>,
) {
    let EventKind::Departure(entity) = event.0.kind else {
        return;
    };
    let now = clock.now();

    let channel = {
        let mut customer = customers
            .get_mut(entity)
            .expect("departure event for an unknown customer");
        customer.departure_time = Some(now);
        customer.state = CustomerState::Served;
        debug!(t = now, customer = customer.id, channel = customer.channel.label(), "customer departed");
        customer.channel
    };
    telemetry.customers_served += 1;

    point.release(channel);
    if channel == Channel::Staff {
        if let Some(zones) = zones.as_deref_mut() {
            zones.release_any();
        }
    }

    let Some(next) = point.dequeue(channel) else {
        return;
    };
    let seized = point.try_seize(channel);
    debug_assert!(seized, "slot released above must be free for the head of the line");

    let mut customer = customers
        .get_mut(next)
        .expect("queued entity must be a customer");
    let departure = begin_service(
        &mut customer,
        now,
        zones.as_deref_mut(),
        &variates,
        &mut rng.0,
    );
    telemetry.services_started += 1;
    clock.schedule_at(departure, EventKind::Departure(next));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Entity, Schedule, World};

    use crate::scenario::{build_scenario, PickupPointParams, ZoneBalancingConfig};

    fn params() -> PickupPointParams {
        PickupPointParams::default()
            .with_staff(1)
            .with_self_service(1)
            .with_incidents(0.0, 1.0, 5.0)
            .with_seed(11)
    }

    fn in_service(world: &mut World, id: u64, channel: Channel, start: f64) -> Entity {
        assert!(world.resource_mut::<PickupPoint>().try_seize(channel));
        let mut customer = Customer::new(id, start, 2.0, channel);
        customer.state = CustomerState::InService;
        customer.service_start = Some(start);
        if channel == Channel::Staff {
            if let Some(mut zones) = world.get_resource_mut::<ZoneBoard>() {
                customer.zone = zones.assign().map(|(zone, _)| zone);
            }
        }
        world.spawn(customer).id()
    }

    fn queued(world: &mut World, id: u64, channel: Channel, arrival: f64) -> Entity {
        let mut customer = Customer::new(id, arrival, 3.0, channel);
        customer.state = CustomerState::Queued;
        let entity = world.spawn(customer).id();
        world.resource_mut::<PickupPoint>().enqueue(channel, entity);
        entity
    }

    fn run_departure(world: &mut World, entity: Entity, t: f64) {
        world
            .resource_mut::<SimulationClock>()
            .schedule_at(t, EventKind::Departure(entity));
        let event = world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("departure event");
        world.insert_resource(CurrentEvent(event));

        let mut schedule = Schedule::default();
        schedule.add_systems(departure_system);
        schedule.run(world);
    }

    #[test]
    fn departure_frees_slot_when_line_is_empty() {
        let mut world = World::new();
        build_scenario(&mut world, &params()).expect("valid");
        let entity = in_service(&mut world, 0, Channel::SelfService, 0.0);

        run_departure(&mut world, entity, 2.0);

        let customer = world.get::<Customer>(entity).expect("customer");
        assert_eq!(customer.state, CustomerState::Served);
        assert_eq!(customer.departure_time, Some(2.0));
        let point = world.resource::<PickupPoint>();
        assert_eq!(point.available(Channel::SelfService), 1);
        assert_eq!(world.resource::<SimTelemetry>().customers_served, 1);
        assert!(world.resource::<SimulationClock>().is_empty());
    }

    #[test]
    fn departure_starts_head_of_same_channel_line() {
        let mut world = World::new();
        build_scenario(&mut world, &params()).expect("valid");
        let leaving = in_service(&mut world, 0, Channel::Staff, 0.0);
        let head = queued(&mut world, 1, Channel::Staff, 0.5);
        let behind = queued(&mut world, 2, Channel::Staff, 0.7);
        let other = queued(&mut world, 3, Channel::SelfService, 0.9);

        run_departure(&mut world, leaving, 4.0);

        let started = world.get::<Customer>(head).expect("head");
        assert_eq!(started.state, CustomerState::InService);
        assert_eq!(started.service_start, Some(4.0));
        assert_eq!(started.waiting_time(), Some(3.5));

        let point = world.resource::<PickupPoint>();
        assert_eq!(point.available(Channel::Staff), 0);
        assert_eq!(point.line(Channel::Staff).front(), Some(&behind));
        assert_eq!(point.line(Channel::SelfService).front(), Some(&other));

        let next = world
            .resource_mut::<SimulationClock>()
            .pop_next()
            .expect("departure of head");
        assert_eq!(next.kind, EventKind::Departure(head));
        assert_eq!(next.timestamp, 7.0);
    }

    #[test]
    fn staff_departure_releases_first_loaded_zone() {
        let mut world = World::new();
        let params = params().with_staff(2).with_zone_balancing(ZoneBalancingConfig::default());
        build_scenario(&mut world, &params).expect("valid");
        let first = in_service(&mut world, 0, Channel::Staff, 0.0);
        let second = in_service(&mut world, 1, Channel::Staff, 0.0);
        assert_eq!(world.resource::<ZoneBoard>().loads(), vec![1, 1, 0]);

        run_departure(&mut world, second, 2.0);

        // Zone 1 served the departing customer, but zone 0 is decremented.
        assert_eq!(world.resource::<ZoneBoard>().loads(), vec![0, 1, 0]);
        assert_eq!(world.get::<Customer>(first).expect("first").zone, Some(0));
        assert_eq!(world.get::<Customer>(second).expect("second").zone, Some(1));
    }

    #[test]
    fn self_service_departure_leaves_zones_untouched() {
        let mut world = World::new();
        let params = params().with_zone_balancing(ZoneBalancingConfig::default());
        build_scenario(&mut world, &params).expect("valid");
        in_service(&mut world, 0, Channel::Staff, 0.0);
        let terminal = in_service(&mut world, 1, Channel::SelfService, 0.0);

        run_departure(&mut world, terminal, 2.0);

        assert_eq!(world.resource::<ZoneBoard>().loads(), vec![1, 0, 0]);
    }
}
