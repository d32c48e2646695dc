use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Model is implemented by every document type stored through the client
pub trait Model: Serialize {
    /// Name of the remote collection holding this document type
    fn collection_name(&self) -> &str;

    /// Migration statements for the collection (not applied by any operation yet)
    fn migrations(&self) -> Vec<String>;

    /// Called by insert right before the document is serialized
    fn set_created_at(&mut self, at: DateTime<Utc>);
}

/// Query is the equality/inclusion filter sent to the query endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub eq: String,
    #[serde(rename = "in", default)]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Query {
    pub fn new<I, S>(eq: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            eq: eq.into(),
            values: values.into_iter().map(Into::into).collect(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Compact JSON form passed as the `q` parameter
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
