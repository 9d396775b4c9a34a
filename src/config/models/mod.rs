//! Configuration models

pub mod processing;
pub mod server;
pub mod store;

pub use processing::ProcessingConfig;
pub use server::ServerConfig;
pub use store::SupabaseConfig;
