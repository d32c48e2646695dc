//! Tiedot Core Library
//!
//! Types shared by the tiedot HTTP client:
//! - Client configuration (base URL, port, timeout)
//! - The `Model` trait documents must implement
//! - The `Query` filter sent to the query endpoint

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::ClientConfig;
pub use models::*;
