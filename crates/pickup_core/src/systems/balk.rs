use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Customer, CustomerState};
use crate::telemetry::SimTelemetry;

/// Marks the customer as gone. No channel or zone state is touched.
pub fn balk_system(
    event: Res<CurrentEvent>,
    clock: Res<SimulationClock>,
    mut telemetry: ResMut<SimTelemetry>,
    mut customers: Query<&mut Customer>,
) {
    let EventKind::Balk(entity) = event.0.kind else {
        return;
    };
    let mut customer = customers
        .get_mut(entity)
        .expect("balk event for an unknown customer");

    let now = clock.now();
    customer.balked = true;
    customer.left_at = Some(now);
    customer.state = CustomerState::Balked;
    telemetry.customers_balked += 1;
    debug!(t = now, customer = customer.id, "customer left");
}
