//! Core identifiers and error handling for the cadence task scheduler.
//!
//! This crate provides the foundational types used throughout the
//! scheduler: strongly-typed IDs and the `Result` alias used for
//! layered error context.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::TaskId;
