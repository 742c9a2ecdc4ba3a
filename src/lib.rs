//! studentdb - Student records over a JSON HTTP API
//!
//! Backed by PostgreSQL or SQLite, selected by the database URL.

pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod store;
pub mod student;
