use super::*;

#[test]
fn grid_search_single_dimension() {
    let sets = ParameterSpace::grid().staff_count(vec![2, 3, 4]).generate();
    assert_eq!(sets.len(), 3);
    let staff: Vec<u32> = sets.iter().map(|set| set.params.staff_count).collect();
    assert_eq!(staff, vec![2, 3, 4]);
}

#[test]
fn grid_search_multiplies_dimensions_and_replications() {
    let sets = ParameterSpace::grid()
        .staff_count(vec![2, 3])
        .arrival_rate(vec![0.5, 1.0])
        .zone_balancing(vec![false, true])
        .replications(3)
        .generate();
    assert_eq!(sets.len(), 2 * 2 * 2 * 3);
    assert_eq!(
        sets.iter().filter(|set| set.params.zone_balancing.is_some()).count(),
        12
    );
}

#[test]
fn replications_use_consecutive_seeds() {
    let sets = ParameterSpace::grid()
        .staff_count(vec![3, 4])
        .replications(2)
        .base_seed(7)
        .generate();
    let seeds: Vec<u64> = sets.iter().map(|set| set.seed).collect();
    assert_eq!(seeds, vec![7, 8, 7, 8]);
    assert_eq!(sets[0].scenario, sets[1].scenario);
    assert_ne!(sets[0].scenario, sets[2].scenario);
    assert_eq!(sets[1].scenario_params().seed, Some(8));
}

#[test]
fn empty_space_uses_base_params() {
    let sets = ParameterSpace::grid().generate();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].params.staff_count, PickupPointParams::default().staff_count);
    assert_eq!(sets[0].scenario, "staff3_terminals2_rate1");
}

#[test]
fn invalid_combinations_are_skipped() {
    let sets = ParameterSpace::grid()
        .staff_count(vec![0, 1])
        .self_service_count(vec![0])
        .generate();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].params.staff_count, 1);
}
