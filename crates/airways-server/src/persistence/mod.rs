//! SQLite persistence layer.

pub mod airports;
pub mod db;
pub mod locations;
pub mod obstacles;

pub use db::{init_database, init_memory_database, Database};
