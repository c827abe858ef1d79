use crate::error::ExperimentError;
use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), ExperimentError> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "scenario",
        "replication",
        "seed",
        "staff_count",
        "self_service_count",
        "arrival_rate",
        "zone_count",
        "horizon_minutes",
        "total_customers",
        "customers_served",
        "customers_in_service",
        "customers_waiting",
        "balked_customers",
        "balk_rate",
        "avg_waiting_time",
        "median_waiting_time",
        "p90_waiting_time",
        "max_waiting_time",
        "staff_utilization",
        "self_service_utilization",
        "avg_staff_queue_length",
        "avg_self_service_queue_length",
        "events_processed",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        let params = &param_set.params;
        let zone_count = params
            .zone_balancing
            .as_ref()
            .map_or(0, |zones| zones.zone_efficiencies.len());

        wtr.write_record([
            result.scenario.clone(),
            result.replication.to_string(),
            result.seed.to_string(),
            params.staff_count.to_string(),
            params.self_service_count.to_string(),
            params.arrival_rate.to_string(),
            zone_count.to_string(),
            params.horizon_minutes.to_string(),
            result.total_customers.to_string(),
            result.customers_served.to_string(),
            result.customers_in_service.to_string(),
            result.customers_waiting.to_string(),
            result.balked_customers.to_string(),
            result.balk_rate.to_string(),
            result.avg_waiting_time.to_string(),
            result.median_waiting_time.to_string(),
            result.p90_waiting_time.to_string(),
            result.max_waiting_time.to_string(),
            result.staff_utilization.to_string(),
            result.self_service_utilization.to_string(),
            result.avg_staff_queue_length.to_string(),
            result.avg_self_service_queue_length.to_string(),
            result.events_processed.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
