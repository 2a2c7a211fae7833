//! Storage adapters for the domain's repository ports: diesel + r2d2 over
//! SQLite, plus in-memory equivalents.

pub mod database;
pub mod repositories;

pub use database::{Database, SqlitePool, IN_MEMORY_URL};
pub use repositories::*;
