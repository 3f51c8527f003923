pub mod builder;
pub mod shaper;
