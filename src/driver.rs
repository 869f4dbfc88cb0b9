//! The per-query driver: strategy selection, not-found policy, direction
//! resolution and run diagnostics.

use crate::direction::{Deviation, DirectionMode, DirectionResolver};
use crate::error::{ProfileIndexError, Result};
use crate::extent::SearchConfig;
use crate::r#type::CoordFloat;
use crate::tree::{ExpandingParams, ExpandingState, NearestMatch, ProfileIndex};

/// Which nearest-station strategy a run uses. A run-level configuration
/// choice, not a per-query one; all three produce identical matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Linear scan; fastest for small station sets.
    Exhaustive,
    /// One pruned tree descent per query; best for tight extents.
    Pruned,
    /// Expanding-radius pruned descents; the default for wide extents.
    #[default]
    Expanding,
}

/// What to do when no station satisfies a query's extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFoundPolicy {
    /// Abort the run with [`ProfileIndexError::NotFound`].
    #[default]
    Strict,
    /// Report a default [`Located`] with `found == false` and tally the
    /// miss for the end-of-run report.
    Lenient,
}

/// End-of-run diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Queries handled.
    pub queries: u64,
    /// Queries with no eligible station (lenient policy only).
    pub not_found: u64,
    /// Cross-check disagreements against the exhaustive oracle. Any value
    /// above zero indicates an implementation defect, not a data problem.
    pub disagreements: u64,
    /// Cumulative expanding-search cycles.
    pub expanding_cycles: u64,
}

/// The outcome of one query, merged back into the caller's record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located<N: CoordFloat> {
    /// Whether any station satisfied the extents. When false (lenient
    /// policy), the remaining fields are zeroed defaults.
    pub found: bool,
    /// The matched station index.
    pub station: u32,
    /// Stations tied at the minimum distance.
    pub ties: u32,
    /// Along-path offset from the matched station.
    pub along: N,
    /// Across-path offset (or raw distance, per the resolver mode).
    pub across: N,
}

/// Drives queries against a built [`ProfileIndex`].
///
/// Owns the run configuration and the expanding search's cross-query
/// radius seed; one query is handled to completion before the next begins.
#[derive(Debug)]
pub struct Matcher<N: CoordFloat> {
    index: ProfileIndex<N>,
    config: SearchConfig<N>,
    strategy: Strategy,
    policy: NotFoundPolicy,
    resolver: DirectionResolver,
    params: ExpandingParams<N>,
    state: ExpandingState<N>,
    verify: bool,
    stats: RunStats,
}

impl<N: CoordFloat> Matcher<N> {
    /// Validate a run configuration against the index and build a matcher.
    pub fn new(
        index: ProfileIndex<N>,
        config: SearchConfig<N>,
        strategy: Strategy,
        resolver: DirectionResolver,
    ) -> Result<Self> {
        let ndims = index.stations().ndims();
        if config.ndims() != ndims {
            return Err(ProfileIndexError::DimensionMismatch {
                expected: ndims,
                got: config.ndims(),
            });
        }
        let (x_dim, y_dim) = resolver.dims();
        if x_dim >= ndims || y_dim >= ndims {
            return Err(ProfileIndexError::DimensionMismatch {
                expected: ndims,
                got: x_dim.max(y_dim) + 1,
            });
        }
        if resolver.mode() == DirectionMode::PathFrame && !index.stations().has_tangents() {
            return Err(ProfileIndexError::MissingTangents);
        }
        Ok(Self {
            index,
            config,
            strategy,
            policy: NotFoundPolicy::default(),
            resolver,
            params: ExpandingParams::default(),
            state: ExpandingState::new(),
            verify: false,
            stats: RunStats::default(),
        })
    }

    /// Select the not-found policy (default: strict).
    pub fn with_policy(mut self, policy: NotFoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the expanding-search tuning values.
    pub fn with_expanding_params(mut self, params: ExpandingParams<N>) -> Result<Self> {
        params.validate()?;
        self.params = params;
        self.state.clear_seed();
        Ok(self)
    }

    /// Cross-check every tree-based result against the exhaustive oracle,
    /// counting disagreements in [`RunStats`]. A self-test mode.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// The diagnostics accumulated so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// The underlying index.
    pub fn index(&self) -> &ProfileIndex<N> {
        &self.index
    }

    /// Handle one query: search, cross-check if enabled, resolve direction.
    ///
    /// `target.len()` must equal the station set's dimension count.
    pub fn locate(&mut self, target: &[N]) -> Result<Located<N>> {
        if target.len() != self.index.stations().ndims() {
            return Err(ProfileIndexError::DimensionMismatch {
                expected: self.index.stations().ndims(),
                got: target.len(),
            });
        }
        self.stats.queries += 1;

        let found = match self.strategy {
            Strategy::Exhaustive => self.index.nearest_exhaustive(target, &self.config),
            Strategy::Pruned => self.index.nearest_pruned(target, &self.config),
            Strategy::Expanding => {
                let found = self.index.nearest_expanding(
                    target,
                    &self.config,
                    &self.params,
                    &mut self.state,
                );
                self.stats.expanding_cycles += u64::from(self.state.last_cycles());
                found
            }
        };

        if self.verify && self.strategy != Strategy::Exhaustive {
            let oracle = self.index.nearest_exhaustive(target, &self.config);
            if !agrees(&found, &oracle) {
                self.stats.disagreements += 1;
            }
        }

        match found {
            Some(m) => {
                let Deviation { along, across } =
                    self.resolver.resolve(self.index.stations(), m.station, target);
                Ok(Located {
                    found: true,
                    station: m.station,
                    ties: m.ties,
                    along,
                    across,
                })
            }
            None => match self.policy {
                NotFoundPolicy::Strict => Err(ProfileIndexError::NotFound),
                NotFoundPolicy::Lenient => {
                    self.stats.not_found += 1;
                    Ok(Located {
                        found: false,
                        station: 0,
                        ties: 0,
                        along: N::zero(),
                        across: N::zero(),
                    })
                }
            },
        }
    }
}

fn agrees<N: CoordFloat>(a: &Option<NearestMatch<N>>, b: &Option<NearestMatch<N>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.station == b.station && a.dist_sq == b.dist_sq && a.ties == b.ties
        }
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::direction::{DirectionMode, DirectionResolver};
    use crate::extent::DimSpec;
    use crate::station::StationSetBuilder;
    use crate::tree::InsertionOrder;

    fn straight_line_index() -> ProfileIndex<f64> {
        let mut builder = StationSetBuilder::new(2);
        for i in 0..10 {
            let x = f64::from(i) * 10.0;
            builder.add(&[x, 0.0], f64::from(i + 1));
        }
        let stations = builder.finish().unwrap();
        ProfileIndex::build(stations, InsertionOrder::Dispersed).unwrap()
    }

    fn matcher(strategy: Strategy) -> Matcher<f64> {
        let config = SearchConfig::unbounded(2).unwrap();
        let resolver = DirectionResolver::new(0, 1, DirectionMode::PathFrame);
        Matcher::new(straight_line_index(), config, strategy, resolver).unwrap()
    }

    #[test]
    fn locates_and_resolves_direction() {
        let mut m = matcher(Strategy::Expanding);
        let located = m.locate(&[42.0, 3.0]).unwrap();
        assert!(located.found);
        assert_eq!(located.station, 4);
        assert_eq!(located.ties, 1);
        // Path runs along +x, so the tangent frame is the identity.
        assert_eq!(located.along, 2.0);
        assert_eq!(located.across, 3.0);
    }

    #[test]
    fn strict_policy_aborts_on_miss() {
        let config = SearchConfig::new(vec![
            DimSpec::fixed(1000.0, 2000.0),
            DimSpec::unbounded(),
        ])
        .unwrap();
        let resolver = DirectionResolver::new(0, 1, DirectionMode::PathFrame);
        let mut m =
            Matcher::new(straight_line_index(), config, Strategy::Expanding, resolver).unwrap();
        assert!(matches!(
            m.locate(&[1500.0, 0.0]),
            Err(ProfileIndexError::NotFound)
        ));
    }

    #[test]
    fn lenient_policy_tallies_misses() {
        let config = SearchConfig::new(vec![
            DimSpec::fixed(1000.0, 2000.0),
            DimSpec::unbounded(),
        ])
        .unwrap();
        let resolver = DirectionResolver::new(0, 1, DirectionMode::PathFrame);
        let mut m = Matcher::new(straight_line_index(), config, Strategy::Pruned, resolver)
            .unwrap()
            .with_policy(NotFoundPolicy::Lenient);
        let located = m.locate(&[1500.0, 0.0]).unwrap();
        assert!(!located.found);
        assert_eq!(located.station, 0);
        assert_eq!(m.stats().not_found, 1);
        assert_eq!(m.stats().queries, 1);
    }

    #[test]
    fn verify_mode_sees_no_disagreements() {
        let mut m = matcher(Strategy::Expanding).with_verify(true);
        for i in 0..50 {
            let x = f64::from(i) * 2.3 - 10.0;
            let y = f64::from(i % 7) - 3.0;
            m.locate(&[x, y]).unwrap();
        }
        assert_eq!(m.stats().disagreements, 0);
        assert_eq!(m.stats().queries, 50);
        assert!(m.stats().expanding_cycles >= 50);
    }

    #[test]
    fn euclidean_mode_reports_raw_distance() {
        let config = SearchConfig::unbounded(2).unwrap();
        let resolver = DirectionResolver::new(0, 1, DirectionMode::EuclideanOnly);
        let mut m =
            Matcher::new(straight_line_index(), config, Strategy::Exhaustive, resolver).unwrap();
        let located = m.locate(&[42.0, 3.0]).unwrap();
        assert_eq!(located.along, 0.0);
        assert_eq!(located.across, 13.0f64.sqrt());
    }

    #[test]
    fn target_length_is_checked() {
        let mut m = matcher(Strategy::Pruned);
        assert!(matches!(
            m.locate(&[1.0]),
            Err(ProfileIndexError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn path_frame_requires_tangents() {
        let mut builder = StationSetBuilder::new(1);
        builder.add(&[0.0], 1.0);
        let index =
            ProfileIndex::build(builder.finish().unwrap(), InsertionOrder::Sequential).unwrap();
        let config = SearchConfig::unbounded(1).unwrap();
        let resolver = DirectionResolver::new(0, 0, DirectionMode::PathFrame);
        assert!(matches!(
            Matcher::new(index, config, Strategy::Pruned, resolver),
            Err(ProfileIndexError::MissingTangents)
        ));
    }
}
