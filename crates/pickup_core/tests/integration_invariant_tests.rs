mod support;

use pickup_core::zones::ZoneBoard;
use support::schedule::ScheduleRunner;
use support::world::TestWorldBuilder;

const SEEDS: [u64; 5] = [1, 2, 3, 17, 42];

#[test]
fn invariants_hold_after_every_event() {
    for seed in SEEDS {
        for builder in [
            TestWorldBuilder::new().with_channels(3, 0),
            TestWorldBuilder::new().with_channels(3, 2),
            TestWorldBuilder::new().with_channels(3, 2).with_zones(),
            TestWorldBuilder::new()
                .with_channels(2, 1)
                .with_arrival_rate(2.0)
                .with_zones(),
        ] {
            let mut world = builder.with_seed(seed).build();
            let steps = ScheduleRunner::new().run_checked(&mut world, |_, _| {});
            assert!(steps > 0, "seed {seed}");
        }
    }
}

#[test]
fn zone_loads_stay_balanced() {
    // Greedy least-loaded assignment with first-positive release keeps every pair of
    // zone loads within one of each other while at most four staff serve at once.
    for staff in [3, 4] {
        for seed in SEEDS {
            let mut world = TestWorldBuilder::new()
                .with_seed(seed)
                .with_channels(staff, 2)
                .with_arrival_rate(3.0)
                .with_zones()
                .build();
            let mut peak = 0;
            ScheduleRunner::new().run_checked(&mut world, |world, step| {
                let board = world.resource::<ZoneBoard>();
                assert!(
                    board.imbalance() <= 1,
                    "staff {staff} seed {seed} step {step}: loads {:?}",
                    board.loads()
                );
                peak = peak.max(board.total_load());
            });
            assert!(peak >= 2, "staff {staff} seed {seed}: zones never shared load");
        }
    }
}
