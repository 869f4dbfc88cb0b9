//! Expanding-radius nearest search: pruned searches over a growing box
//! around the target, certified exact before returning.
//!
//! With wide outer extents a single pruned search degenerates toward
//! exhaustive cost. Searching a small axis-aligned box first and growing it
//! until a result is certified usually visits far fewer nodes. The box is a
//! hypercube while the result must be correct over a hypersphere, so a
//! found match only counts once its squared distance fits inside the
//! half-box-width squared (or the box already fills the outer extents and
//! nothing larger exists).

use float_next_after::NextAfter;

use crate::error::{ProfileIndexError, Result};
use crate::extent::SearchConfig;
use crate::r#type::CoordFloat;
use crate::tree::{NearestMatch, ProfileIndex};

/// Tuning values for the expanding search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandingParams<N: CoordFloat> {
    /// Half-width of the first search box, absent a seed.
    pub initial_radius: N,
    /// Multiplier applied to the radius when a cycle finds nothing.
    pub growth: N,
    /// Factor (> 1) applied to a found-but-uncertified distance to size the
    /// re-search box with margin, guaranteeing one extra cycle at most.
    pub safety: N,
}

impl<N: CoordFloat> Default for ExpandingParams<N> {
    fn default() -> Self {
        Self {
            initial_radius: N::one(),
            growth: N::from(2.0).unwrap(),
            safety: N::from(1.05).unwrap(),
        }
    }
}

impl<N: CoordFloat> ExpandingParams<N> {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.initial_radius > N::zero() && self.growth > N::one() && self.safety > N::one() {
            Ok(())
        } else {
            Err(ProfileIndexError::BadExpandingParams)
        }
    }
}

/// Mutable cross-query state for the expanding search.
///
/// The previous query's found distance primes the next query's initial
/// radius. This is purely a cycle-count optimization for spatially-coherent
/// query streams; clearing the seed never changes any result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandingState<N: CoordFloat> {
    seed: Option<N>,
    cycles: u32,
}

impl<N: CoordFloat> ExpandingState<N> {
    /// Fresh state with no seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the radius seed; the next query starts from the configured
    /// initial radius.
    pub fn clear_seed(&mut self) {
        self.seed = None;
    }

    /// Pruned-search cycles spent on the most recent query.
    pub fn last_cycles(&self) -> u32 {
        self.cycles
    }
}

impl<N: CoordFloat> ProfileIndex<N> {
    /// Nearest eligible station by expanding-radius search.
    ///
    /// Identical in output to the other two strategies; only the number of
    /// tree descents differs. `params` must satisfy
    /// [`ExpandingParams::validate`]; the per-query cycle count lands in
    /// `state`.
    pub fn nearest_expanding(
        &self,
        target: &[N],
        config: &SearchConfig<N>,
        params: &ExpandingParams<N>,
        state: &mut ExpandingState<N>,
    ) -> Option<NearestMatch<N>> {
        debug_assert!(params.validate().is_ok());
        let outer = config.resolve(target);
        let ndims = self.stations.ndims();

        // An exact hit last query seeds a zero radius; fall back.
        let mut radius = match state.seed {
            Some(d2) if d2 > N::zero() => d2.sqrt() * params.safety,
            _ => params.initial_radius,
        };
        state.cycles = 0;

        loop {
            state.cycles += 1;

            // Clip the radius box to the outer extents on the participating
            // dimensions; non-participating dimensions always search their
            // full outer extent. The upper bound is nudged one ULP so a
            // station at exactly target + radius survives the exclusive
            // max, keeping the <= certification below exact.
            //
            // The box is saturated once every side has either reached the
            // outer extent or passed the station set's own coordinate
            // bounds: growing a saturated box cannot admit any further
            // station, so a saturated miss is final and a saturated find
            // is certified. This covers "box == outer extents everywhere"
            // and also terminates when the outer extents are unbounded.
            let mut boxed = outer.clone();
            let mut saturated = true;
            for dim in 0..ndims {
                if !config.participates(dim) {
                    continue;
                }
                let lo = target[dim] - radius;
                let hi = (target[dim] + radius).next_after(N::infinity());
                let (set_lo, set_hi) = self.stations.bounds(dim);
                if lo > outer[dim].min {
                    boxed[dim].min = lo;
                    if lo > set_lo {
                        saturated = false;
                    }
                }
                if hi < outer[dim].max {
                    boxed[dim].max = hi;
                    if hi <= set_hi {
                        saturated = false;
                    }
                }
            }

            match self.nearest_pruned_in(&boxed, config, target) {
                None if !saturated => radius = radius * params.growth,
                None => {
                    state.seed = None;
                    return None;
                }
                Some(found) => {
                    if saturated || found.dist_sq <= radius * radius {
                        state.seed = Some(found.dist_sq);
                        return Some(found);
                    }
                    // The box is a square; the true nearest may sit outside
                    // it but inside the circle of the found distance.
                    // Re-search a box guaranteed to contain that circle.
                    radius = found.dist_sq.sqrt() * params.safety;
                }
            }
        }
    }
}
