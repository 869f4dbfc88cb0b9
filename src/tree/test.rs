use crate::extent::{DimSpec, SearchConfig};
use crate::station::{StationSet, StationSetBuilder};
use crate::tree::{ExpandingParams, ExpandingState, InsertionOrder, NearestMatch, ProfileIndex};
use crate::ProfileIndexError;

fn line_stations() -> StationSet<f64> {
    // Five stations on a line at x = 0, 10, 20, 30, 40; order keys 1..5.
    let mut builder = StationSetBuilder::new(1);
    for i in 0..5 {
        builder.add(&[f64::from(i) * 10.0], f64::from(i + 1));
    }
    builder.finish().unwrap()
}

fn all_three(
    index: &ProfileIndex<f64>,
    target: &[f64],
    config: &SearchConfig<f64>,
) -> [Option<NearestMatch<f64>>; 3] {
    let mut state = ExpandingState::new();
    [
        index.nearest_exhaustive(target, config),
        index.nearest_pruned(target, config),
        index.nearest_expanding(target, config, &ExpandingParams::default(), &mut state),
    ]
}

#[test]
fn equidistant_pair_takes_the_higher_index() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();
    let config = SearchConfig::unbounded(1).unwrap();

    // x = 15 is equidistant from 10 and 20; the tie rule picks x = 20.
    for result in all_three(&index, &[15.0], &config) {
        let m = result.unwrap();
        assert_eq!(m.station, 2);
        assert_eq!(m.dist_sq, 25.0);
        assert_eq!(m.ties, 2);
    }
}

#[test]
fn extent_restriction_changes_the_winner() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();
    let config =
        SearchConfig::new(vec![DimSpec::fixed(f64::NEG_INFINITY, 15.0)]).unwrap();

    for result in all_three(&index, &[15.0], &config) {
        let m = result.unwrap();
        assert_eq!(m.station, 1);
        assert_eq!(m.dist_sq, 25.0);
        assert_eq!(m.ties, 1);
    }
}

#[test]
fn coincident_stations_tie_at_distance_zero() {
    let mut builder = StationSetBuilder::new(1);
    builder.add(&[5.0], 2.0);
    builder.add(&[5.0], 3.0); // same spot, later order key, higher index
    let index = ProfileIndex::build(builder.finish().unwrap(), InsertionOrder::Sequential).unwrap();
    let config = SearchConfig::unbounded(1).unwrap();

    for result in all_three(&index, &[5.0], &config) {
        let m = result.unwrap();
        assert_eq!(m.station, 1);
        assert_eq!(m.dist_sq, 0.0);
        assert_eq!(m.ties, 2);
    }
}

#[test]
fn extent_max_is_exclusive_min_is_inclusive() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();

    // Station at x = 20 sits exactly on max: never returned.
    let config = SearchConfig::new(vec![DimSpec::fixed(10.0, 20.0)]).unwrap();
    for result in all_three(&index, &[19.0], &config) {
        assert_eq!(result.unwrap().station, 1);
    }

    // Station at x = 10 sits exactly on min: eligible.
    for result in all_three(&index, &[11.0], &config) {
        assert_eq!(result.unwrap().station, 1);
    }
}

#[test]
fn nothing_within_extents_reports_not_found() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();
    let config = SearchConfig::new(vec![DimSpec::fixed(100.0, 200.0)]).unwrap();

    for result in all_three(&index, &[150.0], &config) {
        assert!(result.is_none());
    }
}

#[test]
fn zero_participating_dimensions_tie_everything_eligible() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();
    let config =
        SearchConfig::new(vec![DimSpec::fixed(5.0, 35.0).excluded()]).unwrap();

    // Stations 1..3 are eligible; all tie at distance zero, highest wins.
    for result in all_three(&index, &[0.0], &config) {
        let m = result.unwrap();
        assert_eq!(m.station, 3);
        assert_eq!(m.dist_sq, 0.0);
        assert_eq!(m.ties, 3);
    }
}

#[test]
fn participation_gates_ranking_not_eligibility() {
    // Two dimensions: y separates the stations, x extent gates them.
    let mut builder = StationSetBuilder::new(2);
    builder.add(&[0.0, 0.0], 1.0);
    builder.add(&[9.0, 100.0], 2.0);
    builder.add(&[20.0, 1.0], 3.0);
    let index = ProfileIndex::build(builder.finish().unwrap(), InsertionOrder::Dispersed).unwrap();

    let gated = |participates: bool| {
        let x = DimSpec::fixed(-5.0, 10.0);
        let x = if participates { x } else { x.excluded() };
        SearchConfig::new(vec![x, DimSpec::unbounded()]).unwrap()
    };

    // Station 2 is outside the x extent either way; toggling x's
    // participation re-ranks stations 0 and 1 but never admits station 2.
    let target = [8.0, 60.0];
    let with_x = index.nearest_exhaustive(&target, &gated(true)).unwrap();
    assert_eq!(with_x.station, 1); // 1 + 1600 beats 64 + 3600
    let without_x = index.nearest_exhaustive(&target, &gated(false)).unwrap();
    assert_eq!(without_x.station, 1); // 1600 still beats 3600
    for config in [gated(true), gated(false)] {
        for result in all_three(&index, &target, &config) {
            assert_eq!(result.unwrap().station, 1);
        }
    }
}

#[test]
fn relative_extents_follow_the_query() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();
    let config = SearchConfig::new(vec![DimSpec::relative(-6.0, 6.0)]).unwrap();

    // Window [6, 18) admits only x = 10.
    for result in all_three(&index, &[12.0], &config) {
        let m = result.unwrap();
        assert_eq!(m.station, 1);
        assert_eq!(m.ties, 1);
    }

    // Window [28, 40) admits only x = 30; x = 40 dies on the exclusive max.
    for result in all_three(&index, &[34.0], &config) {
        let m = result.unwrap();
        assert_eq!(m.station, 3);
        assert_eq!(m.dist_sq, 16.0);
        assert_eq!(m.ties, 1);
    }
}

#[test]
fn repeated_queries_are_idempotent() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();
    let config = SearchConfig::unbounded(1).unwrap();
    let params = ExpandingParams::default();
    let mut state = ExpandingState::new();

    let first = index.nearest_expanding(&[17.0], &config, &params, &mut state);
    // The second run starts from the seeded radius; results must not move.
    let second = index.nearest_expanding(&[17.0], &config, &params, &mut state);
    assert_eq!(first, second);
    assert_eq!(index.nearest_pruned(&[17.0], &config), first);
}

#[test]
fn seed_from_an_exact_hit_does_not_wedge_the_search() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();
    let config = SearchConfig::unbounded(1).unwrap();
    let params = ExpandingParams::default();
    let mut state = ExpandingState::new();

    let hit = index
        .nearest_expanding(&[20.0], &config, &params, &mut state)
        .unwrap();
    assert_eq!(hit.dist_sq, 0.0);

    let next = index
        .nearest_expanding(&[17.0], &config, &params, &mut state)
        .unwrap();
    assert_eq!(next.station, 2);
    assert_eq!(next.dist_sq, 9.0);
}

#[test]
fn expanding_cycles_stay_bounded() {
    let index = ProfileIndex::build(line_stations(), InsertionOrder::Dispersed).unwrap();
    let config = SearchConfig::new(vec![DimSpec::fixed(-1.0e6, 1.0e6)]).unwrap();
    let params = ExpandingParams {
        initial_radius: 1.0e-3,
        growth: 2.0,
        safety: 1.05,
    };
    let mut state = ExpandingState::new();

    let m = index
        .nearest_expanding(&[-9.0e5], &config, &params, &mut state)
        .unwrap();
    assert_eq!(m.station, 0);

    // log2(extent span / initial radius) + 2 cycles at the very most.
    let bound = (2.0e6f64 / 1.0e-3).log2().ceil() as u32 + 2;
    assert!(state.last_cycles() <= bound, "{} cycles", state.last_cycles());
}

#[test]
fn insertion_orders_agree_on_results() {
    let stations = line_stations();
    let explicit = InsertionOrder::Explicit(vec![2, 0, 4, 1, 3]);
    let config = SearchConfig::unbounded(1).unwrap();

    for order in [InsertionOrder::Sequential, InsertionOrder::Dispersed, explicit] {
        let index = ProfileIndex::build(stations.clone(), order).unwrap();
        for result in all_three(&index, &[15.0], &config) {
            let m = result.unwrap();
            assert_eq!((m.station, m.dist_sq, m.ties), (2, 25.0, 2));
        }
    }
}

#[test]
fn dispersed_order_avoids_degenerate_chains() {
    let mut builder = StationSetBuilder::new(1);
    let n = 500;
    for i in 0..n {
        builder.add(&[f64::from(i)], f64::from(i));
    }
    let stations = builder.finish().unwrap();

    let chain = ProfileIndex::build(stations.clone(), InsertionOrder::Sequential).unwrap();
    assert_eq!(chain.depth(), n as usize);

    let dispersed = ProfileIndex::build(stations, InsertionOrder::Dispersed).unwrap();
    assert!(dispersed.depth() <= 32, "depth {}", dispersed.depth());
}

#[test]
fn bad_explicit_permutations_are_rejected() {
    let stations = line_stations();
    for order in [
        InsertionOrder::Explicit(vec![0, 1, 2]),
        InsertionOrder::Explicit(vec![0, 1, 2, 3, 3]),
        InsertionOrder::Explicit(vec![0, 1, 2, 3, 9]),
    ] {
        assert!(matches!(
            ProfileIndex::build(stations.clone(), order),
            Err(ProfileIndexError::BadPermutation { len: 5 })
        ));
    }
}

#[test]
fn duplicate_order_keys_fail_the_load() {
    let mut builder = StationSetBuilder::new(1);
    builder.add(&[0.0], 7.0);
    builder.add(&[1.0], 7.0);
    assert!(matches!(
        builder.finish(),
        Err(ProfileIndexError::DuplicateOrderKey { first: 0, second: 1, .. })
    ));
}

#[test]
fn inverted_extents_fail_configuration() {
    assert!(matches!(
        SearchConfig::new(vec![DimSpec::fixed(10.0, 5.0)]),
        Err(ProfileIndexError::InvertedExtent { dim: 0, .. })
    ));
    assert!(matches!(
        SearchConfig::<f64>::new(vec![DimSpec::unbounded(), DimSpec::relative(6.0, -6.0)]),
        Err(ProfileIndexError::InvertedExtent { dim: 1, .. })
    ));
}

#[test]
fn tangents_follow_the_path_and_survive_coincident_points() {
    let mut builder = StationSetBuilder::new(2);
    builder.add(&[0.0, 0.0], 1.0);
    builder.add(&[10.0, 0.0], 2.0);
    builder.add(&[10.0, 0.0], 3.0); // coincident with its predecessor
    builder.add(&[10.0, 10.0], 4.0);
    let stations = builder.finish().unwrap();

    // First station borrows the first valid segment (+x).
    assert_eq!(stations.tangent(0), Some((0.0, 1.0)));
    assert_eq!(stations.tangent(1), Some((0.0, 1.0)));
    // Coincident pair reuses the previous valid tangent.
    assert_eq!(stations.tangent(2), Some((0.0, 1.0)));
    // Then the path turns to +y.
    assert_eq!(stations.tangent(3), Some((1.0, 0.0)));
}
