//! Run the three operating policies once with seed 42 and print their summaries.
//!
//! Run with: cargo run -p pickup_core --example scenario_run

use pickup_core::scenario::{PickupPointParams, ZoneBalancingConfig};
use pickup_core::simulation::Simulation;

fn main() {
    const SEED: u64 = 42;

    let policies = [
        ("baseline", PickupPointParams::default().with_self_service(0)),
        ("self_service", PickupPointParams::default()),
        (
            "zone_balancing",
            PickupPointParams::default().with_zone_balancing(ZoneBalancingConfig::default()),
        ),
    ];

    for (name, params) in policies {
        let mut sim = match Simulation::new(params.with_seed(SEED)) {
            Ok(sim) => sim,
            Err(err) => {
                eprintln!("{name}: {err}");
                continue;
            }
        };
        let steps = sim.run();
        let summary = sim.summary();

        println!("--- {name} (seed {SEED}) ---");
        println!("Events processed: {steps}");
        println!("Customers: {}", summary.total_customers);
        println!("Served: {}", summary.customers_served);
        println!("Balked: {}", summary.balked_customers);
        println!("Still waiting: {}", summary.customers_waiting);
        println!("Average wait: {:.3} min", summary.avg_waiting_time);
        println!("Max wait: {:.3} min", summary.max_waiting_time);
        println!(
            "Utilization: staff {:.1}%, terminals {:.1}%",
            summary.staff_utilization * 100.0,
            summary.self_service_utilization * 100.0
        );
    }
}
