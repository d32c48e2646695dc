//! Basic Client Example
//!
//! Inserts a document, reads it back, updates and deletes it against a
//! running tiedot server (`TIEDOT_URL` / `TIEDOT_PORT`, default
//! `http://localhost:5830`).
//!
//! Run with: cargo run --example basic_client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tiedot_rs::{Client, Model};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Serialize, Deserialize)]
struct Article {
    title: String,
    body: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl Model for Article {
    fn collection_name(&self) -> &str {
        "articles"
    }

    fn migrations(&self) -> Vec<String> {
        vec!["index:title".to_string()]
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

    let client = Client::from_env()?;
    println!("Using tiedot at {}\n", client.config());

    let mut article = Article {
        title: "Hello".to_string(),
        body: "First post".to_string(),
        created_at: None,
    };

    let id = client.insert(&mut article)?;
    println!("📝 Inserted article {} (created at {:?})", id, article.created_at);

    let fetched: Article = client.fetch_by_id(&article, id.to_string())?.json()?;
    println!("   Fetched: {}", fetched.title);

    article.body = "Edited post".to_string();
    client.update(&article, id.to_string())?;
    println!("✏️  Updated article {}", id);

    let page = client.fetch_page(&article, 0, 1)?;
    println!("📄 Page 0/1: {}", page.text()?);

    client.delete(&article, id.to_string())?;
    println!("🗑️  Deleted article {}", id);

    client.migrate()?;

    Ok(())
}
