//! Zone load balancing for staff-assisted service.
//!
//! Each start of a staff-assisted service is assigned to the zone with the smallest
//! current load (lowest index on ties), and the customer's service duration is scaled
//! by that zone's efficiency. This is a greedy least-loaded rule that runs in
//! `O(zones)` per call; there is no search or convergence step.
//!
//! Release is approximate: a departure decrements the first zone with a positive load,
//! not necessarily the zone that served the departing customer. Zone loads are
//! therefore counters of in-service staff customers spread across buckets, not a
//! per-customer binding.

use bevy_ecs::prelude::Resource;

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: usize,
    pub load: u32,
    /// Multiplier applied to the service duration; 1.0 is baseline speed.
    pub efficiency: f64,
}

#[derive(Debug, Clone, Resource)]
pub struct ZoneBoard {
    zones: Vec<Zone>,
}

impl ZoneBoard {
    pub fn new(efficiencies: &[f64]) -> Self {
        let zones = efficiencies
            .iter()
            .enumerate()
            .map(|(id, &efficiency)| Zone {
                id,
                load: 0,
                efficiency,
            })
            .collect();
        Self { zones }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn loads(&self) -> Vec<u32> {
        self.zones.iter().map(|zone| zone.load).collect()
    }

    pub fn total_load(&self) -> u32 {
        self.zones.iter().map(|zone| zone.load).sum()
    }

    /// Index of the zone with the strictly smallest load; the first one wins ties.
    pub fn least_loaded(&self) -> Option<usize> {
        let mut best: Option<&Zone> = None;
        for zone in &self.zones {
            if best.map_or(true, |current| zone.load < current.load) {
                best = Some(zone);
            }
        }
        best.map(|zone| zone.id)
    }

    /// Assign one service to the least-loaded zone. Returns `(zone index, efficiency)`.
    pub fn assign(&mut self) -> Option<(usize, f64)> {
        let index = self.least_loaded()?;
        let zone = &mut self.zones[index];
        zone.load += 1;
        Some((index, zone.efficiency))
    }

    /// Decrement the first zone with a positive load. Returns the zone released, if any.
    pub fn release_any(&mut self) -> Option<usize> {
        let zone = self.zones.iter_mut().find(|zone| zone.load > 0)?;
        zone.load -= 1;
        Some(zone.id)
    }

    /// Largest difference between any two zone loads.
    pub fn imbalance(&self) -> u32 {
        let max = self.zones.iter().map(|zone| zone.load).max().unwrap_or(0);
        let min = self.zones.iter().map(|zone| zone.load).min().unwrap_or(0);
        max - min
    }
}
