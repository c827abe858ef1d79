//! Telemetry / KPIs: aggregate counters, per-customer output records and the
//! end-of-run summary consumed by reporting.

use bevy_ecs::prelude::{Resource, World};
use serde::Serialize;

use crate::clock::SimTime;
use crate::ecs::{Channel, Customer, CustomerState};
use crate::pickup_point::PickupPoint;
use crate::scenario::SimulationHorizon;

/// Aggregate counters updated by the transition systems.
#[derive(Debug, Default, Clone, Resource)]
pub struct SimTelemetry {
    pub customers_arrived: u64,
    pub customers_balked: u64,
    pub services_started: u64,
    pub customers_served: u64,
}

impl SimTelemetry {
    /// Sequence number for the next arriving customer.
    pub fn next_customer_id(&mut self) -> u64 {
        let id = self.customers_arrived;
        self.customers_arrived += 1;
        id
    }
}

/// Time-integrated waiting line lengths, advanced by the runner before each event.
#[derive(Debug, Default, Clone, Resource)]
pub struct QueueStats {
    last_time: SimTime,
    staff_area: f64,
    self_service_area: f64,
}

impl QueueStats {
    /// Accumulate the lengths that held from the last update until `now`.
    pub fn advance(&mut self, now: SimTime, staff_len: usize, self_service_len: usize) {
        let dt = (now - self.last_time).max(0.0);
        self.staff_area += staff_len as f64 * dt;
        self.self_service_area += self_service_len as f64 * dt;
        self.last_time = self.last_time.max(now);
    }

    pub fn last_time(&self) -> SimTime {
        self.last_time
    }

    /// Time-weighted mean line length over `[0, horizon]`, extending the current
    /// lengths up to the horizon.
    pub fn mean_length(&self, channel: Channel, current_len: usize, horizon: SimTime) -> f64 {
        if horizon <= 0.0 {
            return 0.0;
        }
        let area = match channel {
            Channel::Staff => self.staff_area,
            Channel::SelfService => self.self_service_area,
        };
        let tail = (horizon - self.last_time).max(0.0) * current_len as f64;
        (area + tail) / horizon
    }
}

/// One customer as seen by reporting. Times are minutes since the start of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub id: u64,
    pub channel: Channel,
    pub state: CustomerState,
    pub arrival_time: SimTime,
    pub service_start: Option<SimTime>,
    pub departure_time: Option<SimTime>,
    pub left_at: Option<SimTime>,
    pub service_duration: f64,
    pub zone: Option<usize>,
    pub balked: bool,
}

impl CustomerRecord {
    pub fn waiting_time(&self) -> Option<f64> {
        if self.balked {
            return None;
        }
        self.service_start.map(|start| start - self.arrival_time)
    }
}

impl From<&Customer> for CustomerRecord {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            channel: customer.channel,
            state: customer.state,
            arrival_time: customer.arrival_time,
            service_start: customer.service_start,
            departure_time: customer.departure_time,
            left_at: customer.left_at,
            service_duration: customer.service_duration,
            zone: customer.zone,
            balked: customer.balked,
        }
    }
}

/// End-of-run aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub horizon: SimTime,
    pub total_customers: usize,
    /// Departed before the horizon.
    pub customers_served: usize,
    pub customers_in_service: usize,
    pub customers_waiting: usize,
    pub balked_customers: usize,
    pub avg_waiting_time: f64,
    pub max_waiting_time: f64,
    pub staff_utilization: f64,
    pub self_service_utilization: f64,
    pub avg_staff_queue_length: f64,
    pub avg_self_service_queue_length: f64,
}

/// Every customer of the run, in arrival order.
pub fn collect_customer_records(world: &mut World) -> Vec<CustomerRecord> {
    let mut records: Vec<CustomerRecord> = world
        .query::<&Customer>()
        .iter(world)
        .map(CustomerRecord::from)
        .collect();
    records.sort_by_key(|record| record.id);
    records
}

/// Waiting time of every non-balked customer whose service started, in arrival order.
pub fn waiting_times(records: &[CustomerRecord]) -> Vec<f64> {
    records.iter().filter_map(CustomerRecord::waiting_time).collect()
}

/// `(average, maximum)`; both 0.0 for an empty slice.
pub fn mean_and_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (mean, max)
}

/// Busy time of `channel` clipped to `[0, horizon]`, divided by capacity × horizon.
pub fn utilization(
    records: &[CustomerRecord],
    channel: Channel,
    capacity: u32,
    horizon: SimTime,
) -> f64 {
    if capacity == 0 || horizon <= 0.0 {
        return 0.0;
    }
    let busy: f64 = records
        .iter()
        .filter(|record| record.channel == channel)
        .filter_map(|record| {
            let start = record.service_start?;
            let end = record.departure_time.unwrap_or(horizon).min(horizon);
            Some((end - start).max(0.0))
        })
        .sum();
    busy / (capacity as f64 * horizon)
}

pub fn summarize(
    records: &[CustomerRecord],
    point: &PickupPoint,
    queue_stats: &QueueStats,
    horizon: SimTime,
) -> RunSummary {
    let waits = waiting_times(records);
    let (avg_waiting_time, max_waiting_time) = mean_and_max(&waits);
    let count = |state: CustomerState| records.iter().filter(|r| r.state == state).count();

    RunSummary {
        horizon,
        total_customers: records.len(),
        customers_served: count(CustomerState::Served),
        customers_in_service: count(CustomerState::InService),
        customers_waiting: count(CustomerState::Queued),
        balked_customers: records.iter().filter(|r| r.balked).count(),
        avg_waiting_time,
        max_waiting_time,
        staff_utilization: utilization(
            records,
            Channel::Staff,
            point.capacity(Channel::Staff),
            horizon,
        ),
        self_service_utilization: utilization(
            records,
            Channel::SelfService,
            point.capacity(Channel::SelfService),
            horizon,
        ),
        avg_staff_queue_length: queue_stats.mean_length(
            Channel::Staff,
            point.queue_len(Channel::Staff),
            horizon,
        ),
        avg_self_service_queue_length: queue_stats.mean_length(
            Channel::SelfService,
            point.queue_len(Channel::SelfService),
            horizon,
        ),
    }
}

/// Summarize a world built by [crate::scenario::build_scenario].
pub fn summarize_run(world: &mut World) -> RunSummary {
    let records = collect_customer_records(world);
    let horizon = world.resource::<SimulationHorizon>().0;
    summarize(
        &records,
        world.resource::<PickupPoint>(),
        world.resource::<QueueStats>(),
        horizon,
    )
}
