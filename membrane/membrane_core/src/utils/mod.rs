//! Utility types shared across the membrane crates.

pub mod logging;

pub use logging::LogLevel;
