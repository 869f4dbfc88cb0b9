use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum ProfileIndexError {
    /// Two stations carry the same order key; the path through the profile
    /// would be ambiguous.
    #[error("duplicate order key {key} shared by stations {first} and {second}")]
    DuplicateOrderKey {
        key: f64,
        first: u32,
        second: u32,
    },

    /// A fixed extent with `min > max`, or a relative extent whose offsets
    /// would always produce one.
    #[error("inverted extent on dimension {dim}: min {min} > max {max}")]
    InvertedExtent { dim: usize, min: f64, max: f64 },

    /// A configuration, target vector, or resolver dimension does not match
    /// the station set's dimension count.
    #[error("dimension mismatch: station set has {expected} dimensions, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// An explicit insertion order that is not a permutation of `0..len`.
    #[error("insertion order is not a permutation of 0..{len}")]
    BadPermutation { len: usize },

    /// A station set must hold at least one station.
    #[error("station set is empty")]
    EmptyStationSet,

    /// A dimension count outside the supported `1..=9` range.
    #[error("unsupported dimension count {got}: must be between 1 and 9")]
    BadDimensionCount { got: usize },

    /// Expanding-search tuning values that cannot terminate.
    #[error("expanding search requires initial radius > 0, growth > 1 and safety > 1")]
    BadExpandingParams,

    /// The direction resolver needs path tangents but the station set was
    /// loaded without them (fewer than two dimensions).
    #[error("direction resolver requires path tangents but the station set has none")]
    MissingTangents,

    /// No station satisfied the extents for a query, under the strict
    /// not-found policy.
    #[error("no station within the configured extents")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, ProfileIndexError>;
