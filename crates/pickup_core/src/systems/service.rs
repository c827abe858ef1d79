//! Start of service, shared by the arrival and departure transitions.

use rand::Rng;
use tracing::debug;

use crate::clock::SimTime;
use crate::distributions::VariateSource;
use crate::ecs::{Channel, Customer, CustomerState};
use crate::zones::ZoneBoard;

/// Move `customer` into service at `now` and return its departure time.
///
/// The caller must already hold a seized slot of the customer's channel. A
/// staff-assisted customer is assigned to a zone when the board is present and its
/// recorded duration is scaled by that zone's efficiency; the incident delay is drawn
/// last and added on top.
pub fn begin_service<R: Rng + ?Sized>(
    customer: &mut Customer,
    now: SimTime,
    zones: Option<&mut ZoneBoard>,
    variates: &VariateSource,
    rng: &mut R,
) -> SimTime {
    customer.service_start = Some(now);
    customer.state = CustomerState::InService;

    if customer.channel == Channel::Staff {
        if let Some((zone, efficiency)) = zones.and_then(ZoneBoard::assign) {
            customer.zone = Some(zone);
            customer.service_duration *= efficiency;
        }
    }
    let duration = customer.service_duration;
    let delay = variates.incident.sample_minutes(rng);

    debug!(
        t = now,
        customer = customer.id,
        channel = customer.channel.label(),
        zone = ?customer.zone,
        duration,
        delay,
        "service started"
    );
    now + duration + delay
}
