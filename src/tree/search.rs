//! Branch-and-bound nearest search over the index tree for fixed extents.

use crate::extent::{Extents, SearchConfig};
use crate::r#type::CoordFloat;
use crate::tree::{in_extents, participating_dist_sq, BestMatch, NearestMatch, ProfileIndex};

impl<N: CoordFloat> ProfileIndex<N> {
    /// Nearest eligible station by recursive descent, pruning subtrees that
    /// cannot contain an in-extent station.
    ///
    /// Exact for the given extents and identical in output to
    /// [`nearest_exhaustive`][Self::nearest_exhaustive], including tie
    /// counts.
    pub fn nearest_pruned(
        &self,
        target: &[N],
        config: &SearchConfig<N>,
    ) -> Option<NearestMatch<N>> {
        let extents = config.resolve(target);
        self.nearest_pruned_in(&extents, config, target)
    }

    /// Pruned search against already-resolved extents. The expanding search
    /// calls this with its shrunken per-cycle box.
    pub(crate) fn nearest_pruned_in(
        &self,
        extents: &Extents<N>,
        config: &SearchConfig<N>,
        target: &[N],
    ) -> Option<NearestMatch<N>> {
        let mut best = BestMatch::new();
        if !self.nodes.is_empty() {
            self.descend(0, 0, extents, config, target, &mut best);
        }
        best.finish()
    }

    fn descend(
        &self,
        at: usize,
        depth: usize,
        extents: &Extents<N>,
        config: &SearchConfig<N>,
        target: &[N],
        best: &mut BestMatch<N>,
    ) {
        let node = self.nodes[at];
        if in_extents(&self.stations, extents, node.station) {
            best.offer(
                node.station,
                participating_dist_sq(&self.stations, config, target, node.station),
            );
        }

        // The left subtree holds stations strictly below this node's
        // coordinate in the splitting dimension, the right subtree the
        // rest; each side is visited only while its half-space can still
        // intersect the extent. Non-participating dimensions prune through
        // their extents exactly the same way.
        let dim = depth % self.stations.ndims();
        let c = self.stations.coord(dim, node.station);
        if let Some(left) = node.left {
            if c >= extents[dim].min {
                self.descend(left as usize, depth + 1, extents, config, target, best);
            }
        }
        if let Some(right) = node.right {
            if c < extents[dim].max {
                self.descend(right as usize, depth + 1, extents, config, target, best);
            }
        }
    }
}
