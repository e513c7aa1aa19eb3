//! # Encore Common Library
//!
//! Shared code for the Encore notifier service:
//! - Common error type
//! - Configuration loading
//! - Database initialization and schema

pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
