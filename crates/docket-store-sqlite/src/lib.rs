//! SQLite backend for the Docket tracker store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Each entity mutation and the
//! timeline event it records are committed in a single transaction.

mod encode;
mod ops;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
