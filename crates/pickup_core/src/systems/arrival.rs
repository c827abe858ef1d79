use bevy_ecs::prelude::{Commands, Res, ResMut};
use tracing::debug;

use crate::balking::BalkingPolicy;
use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::distributions::{SimRng, VariateSource};
use crate::ecs::{Customer, CustomerState};
use crate::pickup_point::PickupPoint;
use crate::scenario::SimulationHorizon;
use crate::systems::service::begin_service;
use crate::telemetry::SimTelemetry;
use crate::zones::ZoneBoard;

/// Creates the arriving customer, then either balks it, starts its service or queues
/// it, and finally schedules the next arrival if it falls inside the horizon.
#[allow(clippy::too_many_arguments)]
pub fn arrival_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    horizon: Res<SimulationHorizon>,
    mut rng: ResMut<SimRng>,
    variates: Res<VariateSource>,
    balking: Res<BalkingPolicy>,
    mut point: ResMut<PickupPoint>,
    mut zones: Option<ResMut<ZoneBoard>>,
    mut telemetry: ResMut<SimTelemetry>,
) {
    if event.0.kind != EventKind::Arrival {
        return;
    }

    let now = clock.now();
    let rng = &mut rng.0;
    let id = telemetry.next_customer_id();
    let service_duration = variates.service_time.sample_minutes(rng);
    let channel = variates.preference.sample(rng);
    let mut customer = Customer::new(id, now, service_duration, channel);

    let queue_len = point.queue_len(channel);
    if balking.decide(rng, queue_len) {
        let entity = commands.spawn(customer).id();
        clock.schedule_at(now, EventKind::Balk(entity));
        debug!(t = now, customer = id, channel = channel.label(), queue_len, "customer balks");
    } else if point.try_seize(channel) {
        let departure = begin_service(&mut customer, now, zones.as_deref_mut(), &variates, rng);
        telemetry.services_started += 1;
        let entity = commands.spawn(customer).id();
        clock.schedule_at(departure, EventKind::Departure(entity));
    } else {
        customer.state = CustomerState::Queued;
        let entity = commands.spawn(customer).id();
        point.enqueue(channel, entity);
        debug!(
            t = now,
            customer = id,
            channel = channel.label(),
            queue_len = queue_len + 1,
            "customer queued"
        );
    }

    let next = now + variates.inter_arrival.sample_minutes(rng);
    if next < horizon.0 {
        clock.schedule_at(next, EventKind::Arrival);
    }
}
