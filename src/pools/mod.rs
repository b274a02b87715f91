//! Pool normalization, storage and listing

pub mod projection;
pub mod validation;
pub mod store;
pub mod listing;

pub use projection::*;
pub use validation::*;
pub use store::*;
pub use listing::*;
