//! Identity tracking between values and their wrappers.

mod map;

pub use map::{IdentityMap, Provenance};
