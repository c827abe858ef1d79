//! Event rate tracking for a run: counts per event kind and wall-clock throughput.

use std::collections::BTreeMap;
use std::time::Instant;

use bevy_ecs::prelude::Resource;
use tracing::info;

use crate::clock::EventKind;

#[derive(Debug, Default, Resource)]
pub struct EventMetrics {
    pub events_processed: u64,
    /// Wall-clock instant of the first recorded event.
    pub start_time: Option<Instant>,
    /// Keyed by [EventKind::label] so departures of different customers aggregate.
    pub events_by_kind: BTreeMap<&'static str, u64>,
}

impl EventMetrics {
    pub fn record_event(&mut self, kind: EventKind) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
        self.events_processed += 1;
        *self.events_by_kind.entry(kind.label()).or_insert(0) += 1;
    }

    pub fn count(&self, label: &str) -> u64 {
        self.events_by_kind.get(label).copied().unwrap_or(0)
    }

    /// Events per wall-clock second since the first recorded event.
    pub fn events_per_second(&self) -> f64 {
        let Some(start) = self.start_time else {
            return 0.0;
        };
        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.events_processed as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        info!(
            events = self.events_processed,
            events_per_second = format!("{:.0}", self.events_per_second()),
            arrivals = self.count("arrival"),
            departures = self.count("departure"),
            balks = self.count("balk"),
            "event processing summary"
        );
    }
}
