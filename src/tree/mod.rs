//! An immutable cyclic-axis binary tree over a station set, and the three
//! nearest-station search strategies that share its tie and extent
//! semantics.

#![warn(missing_docs)]

mod builder;
mod exhaustive;
mod expanding;
mod index;
mod search;

pub use builder::InsertionOrder;
pub use expanding::{ExpandingParams, ExpandingState};
pub use index::ProfileIndex;

#[cfg(test)]
mod test;

use crate::extent::{Extents, SearchConfig};
use crate::r#type::CoordFloat;
use crate::station::StationSet;

/// One node of the index tree: a station index plus two exclusively-owned
/// child links into the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TreeNode {
    pub(crate) station: u32,
    pub(crate) left: Option<u32>,
    pub(crate) right: Option<u32>,
}

impl TreeNode {
    pub(crate) fn leaf(station: u32) -> Self {
        Self {
            station,
            left: None,
            right: None,
        }
    }
}

/// The result of a nearest-station query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestMatch<N: CoordFloat> {
    /// The matched station: the highest-indexed station at the minimum
    /// distance.
    pub station: u32,
    /// Squared distance over the participating dimensions.
    pub dist_sq: N,
    /// The number of eligible stations at exactly the minimum distance.
    pub ties: u32,
}

/// The minimum tracker shared by all three strategies, so tie semantics
/// cannot drift between them. Candidates may be offered in any order; ties
/// resolve to the highest station index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BestMatch<N: CoordFloat> {
    station: u32,
    dist_sq: N,
    ties: u32,
}

impl<N: CoordFloat> BestMatch<N> {
    pub(crate) fn new() -> Self {
        Self {
            station: 0,
            dist_sq: N::infinity(),
            ties: 0,
        }
    }

    #[inline]
    pub(crate) fn offer(&mut self, station: u32, dist_sq: N) {
        if self.ties == 0 || dist_sq < self.dist_sq {
            self.station = station;
            self.dist_sq = dist_sq;
            self.ties = 1;
        } else if dist_sq == self.dist_sq {
            self.ties += 1;
            if station > self.station {
                self.station = station;
            }
        }
    }

    pub(crate) fn finish(self) -> Option<NearestMatch<N>> {
        (self.ties > 0).then_some(NearestMatch {
            station: self.station,
            dist_sq: self.dist_sq,
            ties: self.ties,
        })
    }
}

/// Whether a station's coordinates fall inside every dimension's extent.
#[inline]
pub(crate) fn in_extents<N: CoordFloat>(
    stations: &StationSet<N>,
    extents: &Extents<N>,
    station: u32,
) -> bool {
    extents
        .iter()
        .enumerate()
        .all(|(dim, ext)| ext.contains(stations.coord(dim, station)))
}

/// Squared distance between a station and the target over the participating
/// dimensions only. Zero participating dimensions give distance zero.
#[inline]
pub(crate) fn participating_dist_sq<N: CoordFloat>(
    stations: &StationSet<N>,
    config: &SearchConfig<N>,
    target: &[N],
    station: u32,
) -> N {
    let mut d2 = N::zero();
    for (dim, &t) in target.iter().enumerate() {
        if config.participates(dim) {
            let d = stations.coord(dim, station) - t;
            d2 = d2 + d * d;
        }
    }
    d2
}
