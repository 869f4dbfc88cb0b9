#![doc = include_str!("../README.md")]

mod direction;
mod driver;
mod error;
pub mod extent;
pub mod station;
pub mod tree;
mod r#type;

pub use direction::{Deviation, DirectionMode, DirectionResolver};
pub use driver::{Located, Matcher, NotFoundPolicy, RunStats, Strategy};
pub use error::ProfileIndexError;
pub use extent::{DimExtent, DimSpec, ExtentSpec, SearchConfig, MAX_DIMS};
pub use station::{StationSet, StationSetBuilder};
pub use tree::{
    ExpandingParams, ExpandingState, InsertionOrder, NearestMatch, ProfileIndex,
};
pub use r#type::CoordFloat;
