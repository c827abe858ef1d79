use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::clock::SimTime;

/// Service channel a customer prefers. Drawn once at creation and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Staff,
    SelfService,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Staff, Channel::SelfService];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Staff => "staff",
            Channel::SelfService => "self_service",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerState {
    /// Decided to balk; the balk event has not fired yet.
    Arrived,
    Queued,
    InService,
    Served,
    Balked,
}

#[derive(Debug, Clone, Component)]
pub struct Customer {
    /// Sequence number in arrival order, starting at 0.
    pub id: u64,
    pub channel: Channel,
    pub state: CustomerState,
    pub arrival_time: SimTime,
    /// Set when a server or terminal is assigned.
    pub service_start: Option<SimTime>,
    /// Set when the departure event fires.
    pub departure_time: Option<SimTime>,
    /// Set when the balk event fires.
    pub left_at: Option<SimTime>,
    /// Service duration without incident delay. Drawn at arrival and scaled in place by
    /// the zone efficiency when a zone is assigned at start of service.
    pub service_duration: f64,
    /// Zone picked by the load balancer, staff-assisted customers only.
    pub zone: Option<usize>,
    pub balked: bool,
}

impl Customer {
    pub fn new(id: u64, arrival_time: SimTime, service_duration: f64, channel: Channel) -> Self {
        Self {
            id,
            channel,
            state: CustomerState::Arrived,
            arrival_time,
            service_start: None,
            departure_time: None,
            left_at: None,
            service_duration,
            zone: None,
            balked: false,
        }
    }

    /// Time between arrival and start of service; `None` for balked or still-queued customers.
    pub fn waiting_time(&self) -> Option<f64> {
        if self.balked {
            return None;
        }
        self.service_start.map(|start| start - self.arrival_time)
    }

    pub fn is_in_service(&self) -> bool {
        self.state == CustomerState::InService
    }
}
