//! Configuration management for the pool cache

pub mod settings;
pub mod guard;

pub use settings::*;
pub use guard::*;
