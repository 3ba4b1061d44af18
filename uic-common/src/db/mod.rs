//! Database access layer shared across the UIC service

mod init;

pub use init::{create_schema, init_database, init_in_memory};
