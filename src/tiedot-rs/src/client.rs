use crate::{ClientError, Result};
use chrono::Utc;
use reqwest::blocking::{Client as HttpClient, Request, Response};
use reqwest::header::{CONNECTION, CONTENT_TYPE};
use reqwest::StatusCode;
use tiedot_core::{ClientConfig, Model, Query};

/// Tiedot HTTP API Client
///
/// Every call is one blocking round trip bounded by the configured timeout.
/// Only `insert` looks at the status code; the other operations hand back
/// the raw response or discard it.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    client: HttpClient,
}

impl Client {
    /// Create a new client bound to the given configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Create a client from the process-wide configuration
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::global())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get one page of a collection
    pub fn fetch_page<M: Model>(&self, model: &M, page: u32, total: u32) -> Result<Response> {
        let req = self.fetch_page_request(model, page, total)?;
        self.execute(req)
    }

    /// Get a document by ID
    pub fn fetch_by_id<M: Model>(&self, model: &M, id: impl AsRef<str>) -> Result<Response> {
        let req = self.fetch_by_id_request(model, id.as_ref())?;
        self.execute(req)
    }

    /// Run a filter against the model's collection
    pub fn query<M: Model>(&self, model: &M, query: &Query) -> Result<Response> {
        let req = self.query_request(model, query)?;
        self.execute(req)
    }

    /// Insert a document and return the ID assigned by the server.
    ///
    /// The creation timestamp is set on `model` before it is serialized.
    pub fn insert<M: Model>(&self, model: &mut M) -> Result<i64> {
        model.set_created_at(Utc::now());
        let req = self.insert_request(&*model)?;
        let response = self.execute(req)?;

        let status = response.status();
        let body = response.text()?;
        if status != StatusCode::CREATED {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: body,
            });
        }

        body.trim()
            .parse::<i64>()
            .map_err(|source| ClientError::InvalidId { body, source })
    }

    /// Replace the document stored under `id`. The response is not inspected.
    pub fn update<M: Model>(&self, model: &M, id: impl AsRef<str>) -> Result<()> {
        let req = self.update_request(model, id.as_ref())?;
        self.execute(req)?;
        Ok(())
    }

    /// Delete the document stored under `id`. The response is not inspected.
    pub fn delete<M: Model>(&self, model: &M, id: impl AsRef<str>) -> Result<()> {
        let req = self.delete_request(model, id.as_ref())?;
        self.execute(req)?;
        Ok(())
    }

    /// Bring all collections up to date.
    ///
    /// Not implemented: migrations are never applied and this always succeeds.
    pub fn migrate(&self) -> Result<()> {
        Ok(())
    }

    fn fetch_page_request<M: Model>(&self, model: &M, page: u32, total: u32) -> Result<Request> {
        self.get_request(
            "getpage",
            &[
                ("col", model.collection_name()),
                ("page", &page.to_string()),
                ("total", &total.to_string()),
            ],
        )
    }

    fn fetch_by_id_request<M: Model>(&self, model: &M, id: &str) -> Result<Request> {
        self.get_request("get", &[("col", model.collection_name()), ("id", id)])
    }

    fn query_request<M: Model>(&self, model: &M, query: &Query) -> Result<Request> {
        let q = query.to_json()?;
        self.get_request("query", &[("col", model.collection_name()), ("q", &q)])
    }

    fn insert_request<M: Model>(&self, model: &M) -> Result<Request> {
        let doc = serde_json::to_string(model)?;
        let req = self
            .client
            .post(self.config.endpoint("insert"))
            .header(CONNECTION, "close")
            .header(CONTENT_TYPE, "application/json")
            .query(&[("col", model.collection_name())])
            .body(doc)
            .build()?;
        Ok(req)
    }

    fn update_request<M: Model>(&self, model: &M, id: &str) -> Result<Request> {
        let doc = serde_json::to_string(model)?;
        self.get_request(
            "update",
            &[("col", model.collection_name()), ("id", id), ("doc", &doc)],
        )
    }

    fn delete_request<M: Model>(&self, model: &M, id: &str) -> Result<Request> {
        self.get_request("delete", &[("col", model.collection_name()), ("id", id)])
    }

    fn get_request(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Request> {
        let req = self
            .client
            .get(self.config.endpoint(endpoint))
            .header(CONNECTION, "close")
            .query(params)
            .build()?;
        Ok(req)
    }

    fn execute(&self, req: Request) -> Result<Response> {
        let col = req
            .url()
            .query_pairs()
            .find(|(key, _)| key == "col")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        tracing::debug!(
            method = %req.method(),
            endpoint = req.url().path(),
            col = %col,
            "Sending tiedot request"
        );
        let response = self.client.execute(req)?;
        tracing::debug!(status = response.status().as_u16(), "Received tiedot response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde::Serialize;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct User {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
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

    fn test_client() -> Client {
        Client::new(&ClientConfig::default()).unwrap()
    }

    fn user(name: &str) -> User {
        User {
            name: name.to_string(),
            created_at: None,
        }
    }

    fn params(req: &Request) -> HashMap<String, String> {
        req.url().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_fetch_page_request() {
        let req = test_client().fetch_page_request(&user("a"), 2, 10).unwrap();

        assert_eq!(req.method(), "GET");
        assert_eq!(req.url().path(), "/getpage");
        assert_eq!(req.url().port(), Some(5830));
        assert_eq!(
            params(&req),
            HashMap::from([
                ("col".to_string(), "users".to_string()),
                ("page".to_string(), "2".to_string()),
                ("total".to_string(), "10".to_string()),
            ])
        );
        assert_eq!(req.headers().get(CONNECTION).unwrap(), "close");
    }

    #[test]
    fn test_fetch_by_id_request_encodes_id() {
        let req = test_client().fetch_by_id_request(&user("a"), "12 &34").unwrap();

        assert_eq!(req.url().path(), "/get");
        assert!(!req.url().query().unwrap().contains(' '));
        assert_eq!(params(&req)["id"], "12 &34");
        assert_eq!(params(&req)["col"], "users");
    }

    #[test]
    fn test_query_request_carries_filter_json() {
        let query = Query::new("name", ["a", "b"]).with_limit(10);
        let req = test_client().query_request(&user("a"), &query).unwrap();

        assert_eq!(req.method(), "GET");
        assert_eq!(req.url().path(), "/query");

        let pairs = params(&req);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs["col"], "users");
        let sent: Query = serde_json::from_str(&pairs["q"]).unwrap();
        assert_eq!(sent, query);
    }

    #[test]
    fn test_insert_request_posts_json_body() {
        let req = test_client().insert_request(&user("a")).unwrap();

        assert_eq!(req.method(), "POST");
        assert_eq!(req.url().path(), "/insert");
        assert_eq!(params(&req).len(), 1);
        assert_eq!(params(&req)["col"], "users");
        assert_eq!(req.headers().get(CONTENT_TYPE).unwrap(), "application/json");

        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(value, serde_json::json!({"name": "a"}));
    }

    #[test]
    fn test_update_request_uses_get_with_doc_param() {
        let req = test_client().update_request(&user("b"), "7").unwrap();

        assert_eq!(req.method(), "GET");
        assert_eq!(req.url().path(), "/update");
        let pairs = params(&req);
        assert_eq!(pairs["col"], "users");
        assert_eq!(pairs["id"], "7");
        let doc: serde_json::Value = serde_json::from_str(&pairs["doc"]).unwrap();
        assert_eq!(doc, serde_json::json!({"name": "b"}));
        assert!(req.body().is_none());
    }

    #[test]
    fn test_delete_request() {
        let req = test_client().delete_request(&user("a"), "7").unwrap();

        assert_eq!(req.method(), "GET");
        assert_eq!(req.url().path(), "/delete");
        assert_eq!(
            params(&req),
            HashMap::from([
                ("col".to_string(), "users".to_string()),
                ("id".to_string(), "7".to_string()),
            ])
        );
    }

    #[test]
    fn test_custom_base_url() {
        let config = ClientConfig {
            url: "http://127.0.0.1".to_string(),
            port: 9000,
            timeout_secs: 1,
        };
        let client = Client::new(&config).unwrap();
        let req = client.delete_request(&user("a"), "1").unwrap();

        assert_eq!(req.url().host_str(), Some("127.0.0.1"));
        assert_eq!(req.url().port(), Some(9000));
        assert_eq!(client.config(), &config);
    }

    #[test]
    fn test_migrate_is_noop() {
        assert!(test_client().migrate().is_ok());
    }
}
