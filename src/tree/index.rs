use crate::error::Result;
use crate::r#type::CoordFloat;
use crate::station::StationSet;
use crate::tree::builder::{build_nodes, InsertionOrder};
use crate::tree::TreeNode;

/// An immutable cyclic-axis binary tree over a [`StationSet`].
///
/// Built exactly once; read-only afterwards, so it can be shared across
/// concurrent readers without locking. Nodes live in a flat arena and
/// reference each other by index; every station appears in exactly one
/// node, and node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileIndex<N: CoordFloat> {
    pub(crate) stations: StationSet<N>,
    pub(crate) nodes: Vec<TreeNode>,
}

impl<N: CoordFloat> ProfileIndex<N> {
    /// Build the index tree over a loaded station set.
    ///
    /// Any [`InsertionOrder`] yields a valid tree with identical search
    /// results; [`InsertionOrder::Dispersed`] is the sensible default for
    /// input sorted by station number.
    pub fn build(stations: StationSet<N>, order: InsertionOrder) -> Result<Self> {
        let nodes = build_nodes(&stations, &order)?;
        Ok(Self { stations, nodes })
    }

    /// The indexed station set.
    pub fn stations(&self) -> &StationSet<N> {
        &self.stations
    }

    /// The number of indexed stations.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index is empty. Always false for a built index.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The height of the tree: nodes on the longest root-to-leaf chain.
    ///
    /// A diagnostic for the insertion-order heuristic; `n` stations in
    /// sequential monotone order give height `n`, dispersed order stays
    /// near `log2(n)`.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], at: usize) -> usize {
            let node = nodes[at];
            let left = node.left.map_or(0, |c| walk(nodes, c as usize));
            let right = node.right.map_or(0, |c| walk(nodes, c as usize));
            1 + left.max(right)
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Tear the index down into its station set.
    pub fn into_stations(self) -> StationSet<N> {
        self.stations
    }
}
