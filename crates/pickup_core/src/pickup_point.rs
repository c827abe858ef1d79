//! Channel capacities and waiting lines of the pickup point.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};

use crate::ecs::Channel;

#[derive(Debug, Clone)]
struct ChannelState {
    capacity: u32,
    available: u32,
    line: VecDeque<Entity>,
}

impl ChannelState {
    fn new(capacity: u32) -> Self {
        Self {
            capacity,
            available: capacity,
            line: VecDeque::new(),
        }
    }
}

/// Invariant per channel: `available + in_service == capacity`.
#[derive(Debug, Clone, Resource)]
pub struct PickupPoint {
    staff: ChannelState,
    self_service: ChannelState,
}

impl PickupPoint {
    pub fn new(staff_capacity: u32, self_service_capacity: u32) -> Self {
        Self {
            staff: ChannelState::new(staff_capacity),
            self_service: ChannelState::new(self_service_capacity),
        }
    }

    fn channel(&self, channel: Channel) -> &ChannelState {
        match channel {
            Channel::Staff => &self.staff,
            Channel::SelfService => &self.self_service,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut ChannelState {
        match channel {
            Channel::Staff => &mut self.staff,
            Channel::SelfService => &mut self.self_service,
        }
    }

    pub fn capacity(&self, channel: Channel) -> u32 {
        self.channel(channel).capacity
    }

    pub fn available(&self, channel: Channel) -> u32 {
        self.channel(channel).available
    }

    pub fn in_service(&self, channel: Channel) -> u32 {
        let state = self.channel(channel);
        state.capacity - state.available
    }

    pub fn queue_len(&self, channel: Channel) -> usize {
        self.channel(channel).line.len()
    }

    /// Waiting line in FIFO order (head first).
    pub fn line(&self, channel: Channel) -> &VecDeque<Entity> {
        &self.channel(channel).line
    }

    /// Take one free server/terminal. Returns `false` when the channel is saturated.
    pub fn try_seize(&mut self, channel: Channel) -> bool {
        let state = self.channel_mut(channel);
        if state.available == 0 {
            return false;
        }
        state.available -= 1;
        true
    }

    pub fn release(&mut self, channel: Channel) {
        let state = self.channel_mut(channel);
        assert!(
            state.available < state.capacity,
            "released a {} slot that was never seized",
            channel.label()
        );
        state.available += 1;
    }

    pub fn enqueue(&mut self, channel: Channel, customer: Entity) {
        self.channel_mut(channel).line.push_back(customer);
    }

    pub fn dequeue(&mut self, channel: Channel) -> Option<Entity> {
        self.channel_mut(channel).line.pop_front()
    }
}
