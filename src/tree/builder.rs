//! Index tree construction: insertion-order scheduling and node insertion.

use crate::error::{ProfileIndexError, Result};
use crate::r#type::CoordFloat;
use crate::station::StationSet;
use crate::tree::TreeNode;

/// The order stations are inserted into the tree.
///
/// The tree is a cyclic-axis binary search tree, so any order produces a
/// valid tree and identical search results; order only affects shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionOrder {
    /// Raw input order. Monotonically-ordered input (stations sorted by
    /// station or shot number, the common case) degenerates into a
    /// linked-list-shaped tree.
    Sequential,
    /// Stride-dispersal heuristic (the default): insert points far apart in
    /// the input order first, so they land near the root and the tree
    /// self-balances approximately regardless of input ordering.
    Dispersed,
    /// A caller-supplied permutation of `0..N` for exact control.
    Explicit(Vec<u32>),
}

impl Default for InsertionOrder {
    fn default() -> Self {
        Self::Dispersed
    }
}

impl InsertionOrder {
    /// The insertion schedule for `n` stations.
    fn schedule(&self, n: usize) -> Result<Vec<u32>> {
        match self {
            Self::Sequential => Ok((0..n as u32).collect()),
            Self::Dispersed => Ok(dispersed_order(n)),
            Self::Explicit(order) => {
                validate_permutation(order, n)?;
                Ok(order.clone())
            }
        }
    }
}

/// A dispersed insertion schedule for `n` points.
///
/// The outer loop halves the stride each pass; within a pass, the
/// not-yet-scheduled positions are visited at that spacing, offset by half
/// a stride so successive passes interleave. For input sorted along any
/// one axis this inserts midpoints first, giving a near-balanced tree; the
/// final stride-1 pass guarantees every point is scheduled.
fn dispersed_order(n: usize) -> Vec<u32> {
    let mut order = Vec::with_capacity(n);
    let mut scheduled = vec![false; n];

    let mut stride = n;
    loop {
        let mut i = stride / 2;
        while i < n {
            if !scheduled[i] {
                scheduled[i] = true;
                order.push(i as u32);
            }
            i += stride.max(1);
        }
        if stride <= 1 {
            break;
        }
        stride /= 2;
    }

    debug_assert_eq!(order.len(), n);
    order
}

fn validate_permutation(order: &[u32], n: usize) -> Result<()> {
    if order.len() != n {
        return Err(ProfileIndexError::BadPermutation { len: n });
    }
    let mut seen = vec![false; n];
    for &i in order {
        let i = i as usize;
        if i >= n || seen[i] {
            return Err(ProfileIndexError::BadPermutation { len: n });
        }
        seen[i] = true;
    }
    Ok(())
}

/// Build the tree arena by inserting every station in the scheduled order.
///
/// The splitting dimension cycles with depth (`depth % ndims`); a station
/// descends left when its coordinate is strictly less than the node's in
/// the splitting dimension, else right, and attaches at the first empty
/// slot. Node 0 is the root.
pub(crate) fn build_nodes<N: CoordFloat>(
    stations: &StationSet<N>,
    order: &InsertionOrder,
) -> Result<Vec<TreeNode>> {
    let n = stations.len();
    let ndims = stations.ndims();
    let schedule = order.schedule(n)?;

    let mut nodes: Vec<TreeNode> = Vec::with_capacity(n);
    for &station in &schedule {
        if nodes.is_empty() {
            nodes.push(TreeNode::leaf(station));
            continue;
        }

        let mut cur = 0usize;
        let mut depth = 0usize;
        loop {
            let dim = depth % ndims;
            let node = nodes[cur];
            let go_left = stations.coord(dim, station) < stations.coord(dim, node.station);
            let child = if go_left { node.left } else { node.right };
            match child {
                Some(c) => {
                    cur = c as usize;
                    depth += 1;
                }
                None => {
                    let slot = nodes.len() as u32;
                    nodes.push(TreeNode::leaf(station));
                    if go_left {
                        nodes[cur].left = Some(slot);
                    } else {
                        nodes[cur].right = Some(slot);
                    }
                    break;
                }
            }
        }
    }

    Ok(nodes)
}
