//! Utility functions and helpers

pub mod address;
pub mod logging;

pub use address::*;
pub use logging::*;
