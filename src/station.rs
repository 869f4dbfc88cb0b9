//! The immutable reference point set ("stations") and its loader.

use std::cmp::Ordering;

use num_traits::ToPrimitive;

use crate::error::{ProfileIndexError, Result};
use crate::extent::MAX_DIMS;
use crate::r#type::CoordFloat;

/// An immutable set of N stations with D coordinate dimensions each.
///
/// Coordinates are stored as one parallel array per dimension. Every
/// station carries a unique order key defining a 1-D path through the set;
/// when the set has at least two dimensions, a unit tangent `(sin, cos)` of
/// that path is precomputed per station for the direction resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSet<N: CoordFloat> {
    ndims: usize,
    spatial_dims: (usize, usize),
    coords: Vec<Vec<N>>,
    order_keys: Vec<N>,
    tangents: Vec<(N, N)>,
    bounds: Vec<(N, N)>,
}

impl<N: CoordFloat> StationSet<N> {
    /// The number of stations.
    pub fn len(&self) -> usize {
        self.order_keys.len()
    }

    /// Whether the set holds no stations. Always false for a built set.
    pub fn is_empty(&self) -> bool {
        self.order_keys.is_empty()
    }

    /// The number of coordinate dimensions.
    pub fn ndims(&self) -> usize {
        self.ndims
    }

    /// The coordinate of one station in one dimension.
    #[inline]
    pub fn coord(&self, dim: usize, station: u32) -> N {
        self.coords[dim][station as usize]
    }

    /// The full coordinate array for one dimension.
    pub fn coords_dim(&self, dim: usize) -> &[N] {
        &self.coords[dim]
    }

    /// The order key of one station.
    pub fn order_key(&self, station: u32) -> N {
        self.order_keys[station as usize]
    }

    /// The `(sin, cos)` path tangent of one station, if tangents exist.
    #[inline]
    pub fn tangent(&self, station: u32) -> Option<(N, N)> {
        self.tangents.get(station as usize).copied()
    }

    /// Whether path tangents were computed at load time.
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    /// The two dimensions the path tangents were computed over.
    pub fn spatial_dims(&self) -> (usize, usize) {
        self.spatial_dims
    }

    /// The `(min, max)` coordinate bounds of the set in one dimension.
    pub(crate) fn bounds(&self, dim: usize) -> (N, N) {
        self.bounds[dim]
    }
}

/// A builder to load a [`StationSet`].
pub struct StationSetBuilder<N: CoordFloat> {
    ndims: usize,
    spatial_dims: (usize, usize),
    coords: Vec<Vec<N>>,
    order_keys: Vec<N>,
}

impl<N: CoordFloat> StationSetBuilder<N> {
    /// Create a builder for stations with `ndims` coordinate dimensions.
    ///
    /// Panics if `ndims` is zero or exceeds [`MAX_DIMS`].
    pub fn new(ndims: usize) -> Self {
        assert!((1..=MAX_DIMS).contains(&ndims));
        Self {
            ndims,
            spatial_dims: (0, 1),
            coords: vec![Vec::new(); ndims],
            order_keys: Vec::new(),
        }
    }

    /// Designate the two dimensions the path tangents are computed over.
    /// Defaults to dimensions 0 and 1.
    pub fn spatial_dims(mut self, x_dim: usize, y_dim: usize) -> Self {
        assert!(x_dim < self.ndims && y_dim < self.ndims && x_dim != y_dim);
        self.spatial_dims = (x_dim, y_dim);
        self
    }

    /// Add one station. Returns its index.
    ///
    /// Panics if `coords.len()` does not match the builder's dimension
    /// count.
    pub fn add(&mut self, coords: &[N], order_key: N) -> u32 {
        assert_eq!(coords.len(), self.ndims);
        let index = self.order_keys.len();
        for (dim, &c) in coords.iter().enumerate() {
            self.coords[dim].push(c);
        }
        self.order_keys.push(order_key);
        index as u32
    }

    /// Validate the loaded stations and freeze the set.
    ///
    /// Order keys must be unique; a duplicate (or non-comparable) key is a
    /// fatal load error. Path tangents are precomputed here when the set
    /// has two or more dimensions.
    pub fn finish(self) -> Result<StationSet<N>> {
        let n = self.order_keys.len();
        if n == 0 {
            return Err(ProfileIndexError::EmptyStationSet);
        }

        let path = self.path_order()?;
        let tangents = if self.ndims >= 2 {
            self.compute_tangents(&path)
        } else {
            Vec::new()
        };

        let bounds = self
            .coords
            .iter()
            .map(|dim| {
                let mut lo = dim[0];
                let mut hi = dim[0];
                for &c in &dim[1..] {
                    if c < lo {
                        lo = c;
                    }
                    if c > hi {
                        hi = c;
                    }
                }
                (lo, hi)
            })
            .collect();

        Ok(StationSet {
            ndims: self.ndims,
            spatial_dims: self.spatial_dims,
            coords: self.coords,
            order_keys: self.order_keys,
            tangents,
            bounds,
        })
    }

    /// Station indices sorted by order key, validating uniqueness.
    fn path_order(&self) -> Result<Vec<u32>> {
        let mut path: Vec<u32> = (0..self.order_keys.len() as u32).collect();
        path.sort_by(|&a, &b| {
            self.order_keys[a as usize]
                .partial_cmp(&self.order_keys[b as usize])
                .unwrap_or(Ordering::Equal)
        });
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ka, kb) = (self.order_keys[a as usize], self.order_keys[b as usize]);
            // NaN keys sort as equal and are rejected here as well.
            if ka.partial_cmp(&kb) != Some(Ordering::Less) {
                return Err(ProfileIndexError::DuplicateOrderKey {
                    key: ka.to_f64().unwrap_or(f64::NAN),
                    first: a.min(b),
                    second: a.max(b),
                });
            }
        }
        Ok(path)
    }

    /// Unit path tangents per station over the designated spatial dims.
    ///
    /// Each station takes the direction of the segment arriving from its
    /// path predecessor. Coincident consecutive stations reuse the previous
    /// valid tangent; the first station takes the first valid segment's
    /// direction, so a single-station path falls back to `(0, 1)`.
    fn compute_tangents(&self, path: &[u32]) -> Vec<(N, N)> {
        let (xd, yd) = self.spatial_dims;
        let xs = &self.coords[xd];
        let ys = &self.coords[yd];

        let mut tangents = vec![(N::zero(), N::one()); path.len()];
        let mut last: Option<(N, N)> = None;
        let mut first_valid: Option<(N, N)> = None;

        for pair in path.windows(2) {
            let (a, b) = (pair[0] as usize, pair[1] as usize);
            let dx = xs[b] - xs[a];
            let dy = ys[b] - ys[a];
            let h = (dx * dx + dy * dy).sqrt();
            let t = if h > N::zero() {
                let t = (dy / h, dx / h);
                if first_valid.is_none() {
                    first_valid = Some(t);
                }
                last = Some(t);
                t
            } else {
                last.unwrap_or((N::zero(), N::one()))
            };
            tangents[b] = t;
        }
        tangents[path[0] as usize] = first_valid.unwrap_or((N::zero(), N::one()));

        tangents
    }
}
