//! # SeamKit Core
//!
//! Core types and utilities shared by the SeamKit crates.
//! Provides the error taxonomy, machine defaults, and feed-rate unit helpers.

pub mod constants;
pub mod error;
pub mod units;

pub use error::{Error, Result, ToolpathError};
pub use units::FeedRateUnits;
