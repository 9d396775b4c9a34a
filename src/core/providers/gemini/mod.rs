//! Gemini provider
//!
//! Google AI Studio `generateContent` integration: configuration, HTTP
//! client, and HTTP/API error mapping.

pub mod client;
pub mod config;
pub mod error;

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use error::GeminiErrorMapper;
