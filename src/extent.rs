//! Per-dimension range constraints and search configuration.
//!
//! Every dimension of a query carries an *extent*: an inclusive-min,
//! exclusive-max range a station's coordinate must fall in to be eligible
//! at all, plus a flag saying whether the dimension contributes to the
//! squared-distance ranking. Extents may be fixed for the whole run or
//! resolved per query relative to the query's own coordinate.

use num_traits::ToPrimitive;
use tinyvec::TinyVec;

use crate::error::{ProfileIndexError, Result};
use crate::r#type::CoordFloat;

/// The maximum number of coordinate dimensions an index supports.
pub const MAX_DIMS: usize = 9;

/// A resolved range on one dimension: `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimExtent<N: CoordFloat> {
    pub min: N,
    pub max: N,
}

impl<N: CoordFloat> DimExtent<N> {
    /// Whether a coordinate falls inside this extent (`min <= c < max`).
    #[inline]
    pub fn contains(&self, c: N) -> bool {
        c >= self.min && c < self.max
    }
}

impl<N: CoordFloat> Default for DimExtent<N> {
    fn default() -> Self {
        Self {
            min: N::zero(),
            max: N::zero(),
        }
    }
}

/// Resolved extents for every dimension of one query.
///
/// Inline storage for up to [`MAX_DIMS`] dimensions so per-query resolution
/// never allocates.
pub type Extents<N> = TinyVec<[DimExtent<N>; MAX_DIMS]>;

/// How one dimension's extent is produced for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtentSpec<N: CoordFloat> {
    /// The same `[min, max)` range for every query.
    Fixed { min: N, max: N },
    /// A window around the query's own coordinate in this dimension:
    /// `[target + below, target + above)`. `below` is usually negative.
    Relative { below: N, above: N },
}

/// One dimension's configuration: its extent plus whether its coordinate
/// difference participates in the squared-distance ranking.
///
/// A non-participating dimension still gates eligibility through its
/// extent; it only stops contributing to the distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimSpec<N: CoordFloat> {
    pub participates: bool,
    pub extent: ExtentSpec<N>,
}

impl<N: CoordFloat> DimSpec<N> {
    /// A participating dimension with an unbounded extent.
    pub fn unbounded() -> Self {
        Self {
            participates: true,
            extent: ExtentSpec::Fixed {
                min: N::neg_infinity(),
                max: N::infinity(),
            },
        }
    }

    /// A participating dimension with a fixed `[min, max)` extent.
    pub fn fixed(min: N, max: N) -> Self {
        Self {
            participates: true,
            extent: ExtentSpec::Fixed { min, max },
        }
    }

    /// A participating dimension with a query-relative window.
    pub fn relative(below: N, above: N) -> Self {
        Self {
            participates: true,
            extent: ExtentSpec::Relative { below, above },
        }
    }

    /// Exclude this dimension from the distance ranking, keeping its extent.
    pub fn excluded(mut self) -> Self {
        self.participates = false;
        self
    }
}

/// The immutable per-run search configuration: one [`DimSpec`] per station
/// dimension, validated once and passed by reference into every search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig<N: CoordFloat> {
    dims: Vec<DimSpec<N>>,
}

impl<N: CoordFloat> SearchConfig<N> {
    /// Validate and freeze a configuration.
    ///
    /// Fails with [`ProfileIndexError::InvertedExtent`] when any extent has
    /// `min > max` (or relative offsets that always would), and with
    /// [`ProfileIndexError::BadDimensionCount`] outside `1..=`[`MAX_DIMS`]
    /// dimensions.
    pub fn new(dims: Vec<DimSpec<N>>) -> Result<Self> {
        if dims.is_empty() || dims.len() > MAX_DIMS {
            return Err(ProfileIndexError::BadDimensionCount { got: dims.len() });
        }
        for (dim, spec) in dims.iter().enumerate() {
            let (lo, hi) = match spec.extent {
                ExtentSpec::Fixed { min, max } => (min, max),
                ExtentSpec::Relative { below, above } => (below, above),
            };
            if lo > hi {
                return Err(ProfileIndexError::InvertedExtent {
                    dim,
                    min: lo.to_f64().unwrap_or(f64::NAN),
                    max: hi.to_f64().unwrap_or(f64::NAN),
                });
            }
        }
        Ok(Self { dims })
    }

    /// An all-participating, unbounded configuration for `ndims` dimensions.
    pub fn unbounded(ndims: usize) -> Result<Self> {
        Self::new(vec![DimSpec::unbounded(); ndims])
    }

    /// The number of configured dimensions.
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Whether dimension `dim` participates in the distance ranking.
    #[inline]
    pub fn participates(&self, dim: usize) -> bool {
        self.dims[dim].participates
    }

    /// Resolve the configured extents against a query target.
    ///
    /// Fixed extents are copied through; relative extents are anchored on
    /// the target's coordinate in their dimension. `target.len()` must
    /// equal [`ndims`][Self::ndims].
    pub fn resolve(&self, target: &[N]) -> Extents<N> {
        debug_assert_eq!(target.len(), self.dims.len());
        self.dims
            .iter()
            .zip(target)
            .map(|(spec, &t)| match spec.extent {
                ExtentSpec::Fixed { min, max } => DimExtent { min, max },
                ExtentSpec::Relative { below, above } => DimExtent {
                    min: t + below,
                    max: t + above,
                },
            })
            .collect()
    }
}
