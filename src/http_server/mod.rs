//! # Student HTTP Server Module
//!
//! The HTTP request layer: parses requests, calls the student repository,
//! and maps results to status codes and JSON bodies.
//!
//! # Endpoints
//!
//! - `POST /api/students` - Create a student
//! - `GET /api/students` - List with filter, sort and pagination
//! - `PUT /api/students/:id` - Replace a student
//! - `DELETE /api/students/:id` - Delete a student
//! - `/health`, `/health/ready` - Liveness and readiness

pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod params;
pub mod response;
pub mod server;
pub mod student_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
pub use student_routes::StudentState;
