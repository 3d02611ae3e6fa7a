//! Core domain model for the Docket tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod entity;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod notification;
pub mod recorder;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
