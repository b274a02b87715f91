//! Error types shared by the cache, the scheduler and the quote path

pub mod cache_error;

pub use cache_error::*;
