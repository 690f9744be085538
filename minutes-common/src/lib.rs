//! # Minutes Common Library
//!
//! Shared code for the minutes service crates:
//! - Database initialization and row models
//! - Bootstrap configuration loading
//! - Common error type
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
