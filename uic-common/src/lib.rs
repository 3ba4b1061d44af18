//! uic-common - shared library for the UIC WhatsApp generator
//!
//! Holds the pieces both the service binary and its tests need:
//! the common error type, settings resolution, and SQLite
//! initialization with the schema for sessions and issued codes.

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
