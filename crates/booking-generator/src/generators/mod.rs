//! Individual value generators for the booking event fields.
//!
//! Every generator takes the caller's RNG so that a seeded generator yields
//! the same sequence of values across runs.

pub mod numeric;
pub mod timestamp;
pub mod uuid;
pub mod weighted;

pub use weighted::{pick_uniform, WeightedTable};
