use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;
use crate::metrics::SimulationResult;

/// Per-scenario replication results in the layout the analysis reads. Field names are
/// kept as persisted by the existing analysis tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    #[serde(rename = "сценарии")]
    pub scenarios: Vec<String>,
    /// One entry per scenario: the mean waiting time of each replication.
    pub mean_waiting_times_per_replication: Vec<Vec<f64>>,
    /// Customers served per replication, averaged over replications.
    #[serde(rename = "обслуженные_клиенты")]
    pub served_customers: Vec<f64>,
    /// Customers that balked per replication, averaged over replications.
    #[serde(rename = "клиенты_отказались")]
    pub balked_customers: Vec<f64>,
}

impl ScenarioComparison {
    /// Group results by scenario in first-appearance order. Served and balked counts are
    /// averaged over each scenario's replications.
    pub fn from_results(results: &[SimulationResult]) -> Self {
        let mut comparison = Self {
            scenarios: Vec::new(),
            mean_waiting_times_per_replication: Vec::new(),
            served_customers: Vec::new(),
            balked_customers: Vec::new(),
        };
        for result in results {
            let index = match comparison
                .scenarios
                .iter()
                .position(|name| *name == result.scenario)
            {
                Some(index) => index,
                None => {
                    comparison.scenarios.push(result.scenario.clone());
                    comparison.mean_waiting_times_per_replication.push(Vec::new());
                    comparison.served_customers.push(0.0);
                    comparison.balked_customers.push(0.0);
                    comparison.scenarios.len() - 1
                }
            };
            comparison.mean_waiting_times_per_replication[index].push(result.avg_waiting_time);
            comparison.served_customers[index] += result.customers_served as f64;
            comparison.balked_customers[index] += result.balked_customers as f64;
        }

        for (index, waits) in comparison.mean_waiting_times_per_replication.iter().enumerate() {
            let replications = waits.len() as f64;
            comparison.served_customers[index] /= replications;
            comparison.balked_customers[index] /= replications;
        }
        comparison
    }

    /// Every per-scenario column must have one entry per scenario.
    pub fn validate(&self) -> Result<(), ExperimentError> {
        let expected = self.scenarios.len();
        let columns = [
            (
                "mean_waiting_times_per_replication",
                self.mean_waiting_times_per_replication.len(),
            ),
            ("served_customers", self.served_customers.len()),
            ("balked_customers", self.balked_customers.len()),
        ];
        for (name, len) in columns {
            if len != expected {
                return Err(ExperimentError::LengthMismatch {
                    results: len,
                    other: name,
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Mean over replications of the per-replication mean waiting time.
    pub fn mean_waiting_time(&self, index: usize) -> Option<f64> {
        let values = self.mean_waiting_times_per_replication.get(index)?;
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Share of balked customers among served plus balked.
    pub fn balk_share(&self, index: usize) -> Option<f64> {
        let served = *self.served_customers.get(index)?;
        let balked = *self.balked_customers.get(index)?;
        let total = served + balked;
        (total > 0.0).then(|| balked / total)
    }
}
