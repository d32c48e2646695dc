//! Query Example
//!
//! Seeds a few users and runs an inclusion filter with a result limit.
//!
//! Run with: cargo run --example query_collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tiedot_rs::{Client, ClientConfig, ClientError, Model, Query};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Serialize, Deserialize)]
struct User {
    name: String,
    role: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl Model for User {
    fn collection_name(&self) -> &str {
        "users"
    }

    fn migrations(&self) -> Vec<String> {
        Vec::new()
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }
}

fn init_logging() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tiedot_rs=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .try_init()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    // Config file first, then the environment
    let config = ClientConfig::load("tiedot.json").unwrap_or_else(|_| {
        tracing::warn!("Failed to load tiedot.json, using environment");
        ClientConfig::from_env()
    });
    let client = Client::new(&config)?;

    for (name, role) in [("ada", "admin"), ("bob", "editor"), ("cy", "viewer")] {
        let mut user = User {
            name: name.to_string(),
            role: role.to_string(),
            created_at: None,
        };
        match client.insert(&mut user) {
            Ok(id) => println!("Inserted {} as {}", name, id),
            Err(ClientError::Server { status, message }) => {
                println!("Server refused {} ({}): {}", name, status, message)
            }
            Err(e) => return Err(e.into()),
        }
    }

    let probe = User {
        name: String::new(),
        role: String::new(),
        created_at: None,
    };
    let filter = Query::new("role", ["admin", "editor"]).with_limit(10);
    let response = client.query(&probe, &filter)?;

    println!("\n🔍 Query {} -> {}", filter.to_json()?, response.status());
    println!("{}", response.text()?);

    Ok(())
}
