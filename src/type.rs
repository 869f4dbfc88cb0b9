use std::fmt::Debug;

use float_next_after::NextAfter;
use num_traits::Float;

/// A trait for types that can be used as station coordinates.
///
/// This trait is sealed and cannot be implemented for external types: the
/// expanding search relies on [`float_next_after`] boundary nudging, which
/// only exists for the two IEEE float widths.
pub trait CoordFloat:
    private::Sealed + Float + NextAfter + Debug + Default + Send + Sync + 'static
{
}

impl CoordFloat for f32 {}
impl CoordFloat for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
