//! Chain client interface, HTTP implementation and call helpers

pub mod client;
pub mod http;
pub mod retry;

pub use client::*;
pub use http::*;
pub use retry::*;
