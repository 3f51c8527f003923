pub mod color;
pub mod units;

pub use color::Color;
pub use units::{must_sp, sp, ScaledPoint, Unit, UnitError, FACTOR};
