//! Observability for studentdb
//!
//! Logging goes through `tracing`; this module only installs the
//! subscriber. Request spans come from `tower_http::trace::TraceLayer`
//! in the HTTP server.

mod logger;

pub use logger::{init_logging, LogConfig, LogFormat, LoggingError, LOG_ENV};
