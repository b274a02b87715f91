//! Core data types and structures

pub mod pools;
pub mod snapshot;
pub mod quote;
pub mod health;

pub use pools::*;
pub use snapshot::*;
pub use quote::*;
pub use health::*;
