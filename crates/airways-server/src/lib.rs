//! Server internals, exposed as a library so integration tests can drive
//! the persistence layer and loops directly.

pub mod config;
pub mod fixtures;
pub mod loops;
pub mod persistence;
pub mod state;
