//! Cache gateway, background refresh and listing operations

pub mod gateway;
pub mod scheduler;
pub mod queries;

pub use gateway::*;
pub use scheduler::*;
pub use queries::*;
