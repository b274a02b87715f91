//! Swap quote resolution

pub mod tokens;
pub mod resolver;

pub use tokens::*;
pub use resolver::*;
