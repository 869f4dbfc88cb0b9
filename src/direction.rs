//! Decomposition of a query's offset from its matched station into
//! along-path and across-path components.

use crate::r#type::CoordFloat;
use crate::station::StationSet;

/// How a match's offset from the query is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionMode {
    /// Rotate the offset into the matched station's path tangent frame,
    /// producing along-path and across-path components.
    PathFrame,
    /// Path ordering disabled: report the raw Euclidean offset distance in
    /// the across-path slot, with a zero along-path component.
    EuclideanOnly,
}

/// A query's offset from its matched station, in the station's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation<N: CoordFloat> {
    /// Signed offset along the path tangent (inline direction).
    pub along: N,
    /// Signed offset across the path tangent (crossline direction), or the
    /// raw Euclidean distance under [`DirectionMode::EuclideanOnly`].
    pub across: N,
}

/// Projects query offsets into the matched station's tangent frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionResolver {
    x_dim: usize,
    y_dim: usize,
    mode: DirectionMode,
}

impl DirectionResolver {
    /// A resolver over the two designated spatial dimensions.
    pub fn new(x_dim: usize, y_dim: usize, mode: DirectionMode) -> Self {
        Self { x_dim, y_dim, mode }
    }

    /// The two spatial dimensions the resolver reads.
    pub fn dims(&self) -> (usize, usize) {
        (self.x_dim, self.y_dim)
    }

    /// The configured reporting mode.
    pub fn mode(&self) -> DirectionMode {
        self.mode
    }

    /// Decompose the offset of `target` from the matched `station`.
    ///
    /// Under [`DirectionMode::PathFrame`] the station set must carry path
    /// tangents; stations without one (never the case for a set built with
    /// two or more dimensions) fall back to the identity frame.
    pub fn resolve<N: CoordFloat>(
        &self,
        stations: &StationSet<N>,
        station: u32,
        target: &[N],
    ) -> Deviation<N> {
        let dx = target[self.x_dim] - stations.coord(self.x_dim, station);
        let dy = target[self.y_dim] - stations.coord(self.y_dim, station);
        match self.mode {
            DirectionMode::PathFrame => {
                let (sin, cos) = stations.tangent(station).unwrap_or((N::zero(), N::one()));
                Deviation {
                    along: dx * cos + dy * sin,
                    across: dy * cos - dx * sin,
                }
            }
            DirectionMode::EuclideanOnly => Deviation {
                along: N::zero(),
                across: (dx * dx + dy * dy).sqrt(),
            },
        }
    }
}
