//! HTTP server layer
//!
//! The ingress adapter: accepts batch submissions over HTTP and hands them
//! to the orchestrator.

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;

pub use builder::{ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::AppState;
