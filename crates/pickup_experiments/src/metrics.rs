//! Metrics extraction from completed runs.

use pickup_core::telemetry::{waiting_times, CustomerRecord, RunSummary};
use serde::{Deserialize, Serialize};

use crate::parameters::ParameterSet;

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario: String,
    pub replication: usize,
    pub seed: u64,
    pub total_customers: usize,
    /// Customers that departed before the horizon.
    pub customers_served: usize,
    pub customers_in_service: usize,
    pub customers_waiting: usize,
    pub balked_customers: usize,
    /// Share of arrivals that balked.
    pub balk_rate: f64,
    /// Waiting time statistics in minutes, over non-balked customers whose service started.
    pub avg_waiting_time: f64,
    pub median_waiting_time: f64,
    pub p90_waiting_time: f64,
    pub max_waiting_time: f64,
    pub staff_utilization: f64,
    pub self_service_utilization: f64,
    pub avg_staff_queue_length: f64,
    pub avg_self_service_queue_length: f64,
    pub events_processed: u64,
}

impl SimulationResult {
    /// Average, median and p90 of `values`; all 0.0 for an empty slice.
    pub(crate) fn calculate_stats(values: &[f64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let avg = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
        } else {
            sorted[sorted.len() / 2]
        };
        // P90: floor(0.9 * (n-1)) index into the sorted values.
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)];

        (avg, median, p90)
    }
}

/// Build the result row for one run from its summary and per-customer records.
pub fn extract_metrics(
    param_set: &ParameterSet,
    summary: &RunSummary,
    customers: &[CustomerRecord],
    events_processed: u64,
) -> SimulationResult {
    let waits = waiting_times(customers);
    let (avg_waiting_time, median_waiting_time, p90_waiting_time) =
        SimulationResult::calculate_stats(&waits);
    let balk_rate = if summary.total_customers > 0 {
        summary.balked_customers as f64 / summary.total_customers as f64
    } else {
        0.0
    };

    SimulationResult {
        scenario: param_set.scenario.clone(),
        replication: param_set.replication,
        seed: param_set.seed,
        total_customers: summary.total_customers,
        customers_served: summary.customers_served,
        customers_in_service: summary.customers_in_service,
        customers_waiting: summary.customers_waiting,
        balked_customers: summary.balked_customers,
        balk_rate,
        avg_waiting_time,
        median_waiting_time,
        p90_waiting_time,
        max_waiting_time: summary.max_waiting_time,
        staff_utilization: summary.staff_utilization,
        self_service_utilization: summary.self_service_utilization,
        avg_staff_queue_length: summary.avg_staff_queue_length,
        avg_self_service_queue_length: summary.avg_self_service_queue_length,
        events_processed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_stats() {
        let values = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
        let (avg, median, p90) = SimulationResult::calculate_stats(&values);
        assert_eq!(avg, 55.0);
        // Median of 10 values: average of 5th (50) and 6th (60) = 55.0
        assert_eq!(median, 55.0);
        // floor(0.9 * 9) = index 8, which is 90
        assert_eq!(p90, 90.0);
    }

    #[test]
    fn test_calculate_stats_unsorted_odd() {
        let (avg, median, p90) = SimulationResult::calculate_stats(&[3.0, 1.0, 2.0]);
        assert_eq!(avg, 2.0);
        assert_eq!(median, 2.0);
        assert_eq!(p90, 2.0);
    }

    #[test]
    fn test_calculate_stats_empty() {
        let (avg, median, p90) = SimulationResult::calculate_stats(&[]);
        assert_eq!(avg, 0.0);
        assert_eq!(median, 0.0);
        assert_eq!(p90, 0.0);
    }
}
