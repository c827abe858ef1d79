//! Result export: JSON and CSV result tables, per-customer records and the persisted
//! scenario comparison read by the statistical analysis.

use std::path::Path;

use pickup_core::telemetry::CustomerRecord;

use crate::error::ExperimentError;
use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

#[path = "export/comparison.rs"]
mod comparison;
#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

pub use comparison::ScenarioComparison;

/// Export simulation results as a pretty-printed JSON array.
pub fn export_to_json(
    results: &[SimulationResult],
    path: impl AsRef<Path>,
) -> Result<(), ExperimentError> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    json::write_json(results, file)
}

/// Export one run's customer records as a JSON array.
pub fn export_customers_to_json(
    customers: &[CustomerRecord],
    path: impl AsRef<Path>,
) -> Result<(), ExperimentError> {
    let file = writer_utils::create_output_file(path)?;
    json::write_json(customers, file)
}

/// Export simulation results with parameters to CSV.
///
/// `results[i]` must correspond to `parameter_sets[i]`.
pub fn export_to_csv(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: impl AsRef<Path>,
) -> Result<(), ExperimentError> {
    writer_utils::ensure_not_empty(results)?;
    writer_utils::ensure_same_len(results, parameter_sets, "parameter_sets")?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}

/// Write the comparison file.
pub fn export_comparison(
    comparison: &ScenarioComparison,
    path: impl AsRef<Path>,
) -> Result<(), ExperimentError> {
    let file = writer_utils::create_output_file(path)?;
    json::write_json(comparison, file)
}

/// Read a comparison file written by [export_comparison] or by the existing analysis scripts.
pub fn load_comparison(path: impl AsRef<Path>) -> Result<ScenarioComparison, ExperimentError> {
    let file = std::fs::File::open(path)?;
    let comparison: ScenarioComparison = serde_json::from_reader(std::io::BufReader::new(file))?;
    comparison.validate()?;
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn result(scenario: &str, replication: usize, avg: f64) -> SimulationResult {
        SimulationResult {
            scenario: scenario.to_string(),
            replication,
            seed: 42 + replication as u64,
            total_customers: 120,
            customers_served: 100,
            customers_in_service: 3,
            customers_waiting: 7,
            balked_customers: 10,
            balk_rate: 10.0 / 120.0,
            avg_waiting_time: avg,
            median_waiting_time: avg,
            p90_waiting_time: avg * 2.0,
            max_waiting_time: avg * 3.0,
            staff_utilization: 0.8,
            self_service_utilization: 0.4,
            avg_staff_queue_length: 1.5,
            avg_self_service_queue_length: 0.2,
            events_processed: 340,
        }
    }

    #[test]
    fn test_export_to_json() {
        let results = vec![result("baseline", 0, 1.5)];
        let file = NamedTempFile::new().unwrap();
        export_to_json(&results, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("avg_waiting_time"));
        let parsed: Vec<SimulationResult> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].scenario, "baseline");
        assert_eq!(parsed[0].customers_served, 100);
        assert!((parsed[0].balk_rate - results[0].balk_rate).abs() < 1e-12);
    }

    #[test]
    fn test_export_rejects_empty_results() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            export_to_json(&[], file.path()),
            Err(ExperimentError::NoResults)
        ));
    }

    #[test]
    fn test_export_to_csv_writes_one_row_per_run() {
        use pickup_core::scenario::PickupPointParams;

        let results = vec![result("baseline", 0, 1.0), result("baseline", 1, 2.0)];
        let sets = vec![
            ParameterSet::new(PickupPointParams::default(), "baseline".into(), 0, 42),
            ParameterSet::new(PickupPointParams::default(), "baseline".into(), 1, 43),
        ];
        let file = NamedTempFile::new().unwrap();
        export_to_csv(&results, &sets, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("scenario,replication,seed,staff_count"));
        assert!(lines[2].starts_with("baseline,1,43,3,2,"));
    }

    #[test]
    fn test_export_to_csv_rejects_mismatched_lengths() {
        let file = NamedTempFile::new().unwrap();
        let err = export_to_csv(&[result("baseline", 0, 1.0)], &[], file.path()).unwrap_err();
        assert!(matches!(err, ExperimentError::LengthMismatch { .. }));
    }

    #[test]
    fn test_comparison_round_trips_through_file() {
        let results = vec![
            result("baseline", 0, 2.0),
            result("baseline", 1, 3.0),
            result("self_service", 0, 1.0),
            result("self_service", 1, 1.5),
        ];
        let comparison = ScenarioComparison::from_results(&results);
        let file = NamedTempFile::new().unwrap();
        export_comparison(&comparison, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("\"сценарии\""));
        assert!(contents.contains("\"клиенты_отказались\""));
        assert_eq!(load_comparison(file.path()).unwrap(), comparison);
    }
}
