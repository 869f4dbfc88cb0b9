//! Linear-scan nearest search: the ground-truth oracle, and the faster
//! path for small station sets.

use crate::extent::{Extents, SearchConfig};
use crate::r#type::CoordFloat;
use crate::station::StationSet;
use crate::tree::{in_extents, participating_dist_sq, BestMatch, NearestMatch, ProfileIndex};

impl<N: CoordFloat> StationSet<N> {
    /// Scan every station for the nearest eligible one. Needs no tree.
    ///
    /// Ties at the minimum distance resolve to the highest station index;
    /// returns `None` when no station satisfies the extents.
    pub fn nearest_exhaustive(
        &self,
        target: &[N],
        config: &SearchConfig<N>,
    ) -> Option<NearestMatch<N>> {
        let extents = config.resolve(target);
        scan(self, config, &extents, target)
    }
}

impl<N: CoordFloat> ProfileIndex<N> {
    /// Exhaustive nearest search over the indexed station set.
    pub fn nearest_exhaustive(
        &self,
        target: &[N],
        config: &SearchConfig<N>,
    ) -> Option<NearestMatch<N>> {
        self.stations.nearest_exhaustive(target, config)
    }
}

pub(crate) fn scan<N: CoordFloat>(
    stations: &StationSet<N>,
    config: &SearchConfig<N>,
    extents: &Extents<N>,
    target: &[N],
) -> Option<NearestMatch<N>> {
    let mut best = BestMatch::new();
    for station in 0..stations.len() as u32 {
        if !in_extents(stations, extents, station) {
            continue;
        }
        best.offer(station, participating_dist_sq(stations, config, target, station));
    }
    best.finish()
}
