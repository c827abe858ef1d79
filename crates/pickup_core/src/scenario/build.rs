use bevy_ecs::prelude::World;
use tracing::info;

use crate::balking::BalkingPolicy;
use crate::clock::SimulationClock;
use crate::distributions::{
    ChannelPreference, ExponentialInterArrival, IncidentDelay, ServiceTimeDistribution, SimRng,
    VariateSource,
};
use crate::error::ConfigError;
use crate::pickup_point::PickupPoint;
use crate::profiling::EventMetrics;
use crate::scenario::params::{PickupPointParams, SimulationHorizon};
use crate::telemetry::{QueueStats, SimTelemetry};
use crate::zones::ZoneBoard;

/// Build the variate source for validated parameters.
pub fn variate_source(params: &PickupPointParams) -> Result<VariateSource, ConfigError> {
    Ok(VariateSource {
        inter_arrival: ExponentialInterArrival::new(params.arrival_rate),
        service_time: ServiceTimeDistribution::new(
            params.service_time_mean,
            params.service_time_std,
            params.min_service_time,
        )?,
        incident: IncidentDelay {
            probability: params.incident_probability,
            min_minutes: params.incident_delay_min,
            max_minutes: params.incident_delay_max,
        },
        preference: ChannelPreference {
            self_service_probability: params.self_service_probability,
        },
    })
}

/// Validate `params` and insert every resource the simulation systems need.
///
/// Nothing is inserted when validation fails. The first arrival is seeded separately by
/// [crate::runner::initialize_simulation].
pub fn build_scenario(world: &mut World, params: &PickupPointParams) -> Result<(), ConfigError> {
    params.validate()?;
    let variates = variate_source(params)?;

    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimulationHorizon(params.horizon_minutes));
    world.insert_resource(SimRng::new(params.seed));
    world.insert_resource(variates);
    world.insert_resource(BalkingPolicy {
        base_probability: params.balk_base_probability,
        increment: params.balk_increment,
        ceiling: params.balk_ceiling,
    });
    world.insert_resource(PickupPoint::new(
        params.staff_count,
        params.self_service_count,
    ));
    if let Some(zones) = &params.zone_balancing {
        world.insert_resource(ZoneBoard::new(&zones.zone_efficiencies));
    }
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(QueueStats::default());
    world.insert_resource(EventMetrics::default());

    info!(
        staff = params.staff_count,
        self_service = params.self_service_count,
        zones = params.zone_balancing.as_ref().map_or(0, |z| z.zone_efficiencies.len()),
        arrival_rate = params.arrival_rate,
        horizon = params.horizon_minutes,
        seed = ?params.seed,
        "scenario built"
    );
    Ok(())
}
