//! Tiedot Client Library
//!
//! Blocking HTTP client for the tiedot document database API.

mod client;

pub use client::Client;
pub use tiedot_core::{ClientConfig, Model, Query};

/// Raw response handed back by the read operations
pub use reqwest::blocking::Response;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Insert was answered with something other than 201; the message is the response body
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Invalid document ID in response: {body}")]
    InvalidId {
        body: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;
