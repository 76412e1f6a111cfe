//! Graph API client: authenticated requests and cursor-based pagination.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::http::{HttpRequest, HttpTransport};

use super::error::GraphError;
use super::types::{Envelope, MetricSeries};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";

/// Default API version segment.
pub const DEFAULT_VERSION: &str = "v19.0";

/// Safety bound on cursor follows in [`GraphClient::fetch_all`].
///
/// A malformed or self-referencing cursor chain must terminate with an error
/// rather than loop forever.
pub const MAX_PAGE_FOLLOWS: usize = 500;

/// One fetched page of records.
#[derive(Debug, Clone)]
pub struct PageBatch<T> {
    /// Records in this page, in API order.
    pub items: Vec<T>,
    /// Cursor URL for the next page, absent on the last page.
    pub next: Option<String>,
}

/// Client for the remote Graph API.
///
/// Every call is a fresh network round-trip: no caching, and no automatic
/// retries at this layer. Retry policy for transient failures belongs to the
/// sync engine.
#[derive(Clone)]
pub struct GraphClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    version: String,
    max_page_follows: usize,
}

impl GraphClient {
    /// Create a client with the default host and version.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_VERSION.to_string(),
            max_page_follows: MAX_PAGE_FOLLOWS,
        }
    }

    /// Override the API host (e.g. for a stub server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the API version segment.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Override the pagination safety bound.
    #[must_use]
    pub fn with_max_page_follows(mut self, limit: usize) -> Self {
        self.max_page_follows = limit;
        self
    }

    /// Build the full URL for an API path, query parameters and credential.
    ///
    /// Parameters are serialized in the given order with the access token
    /// appended last, so URLs are deterministic.
    #[must_use]
    pub fn endpoint_url(&self, path: &str, params: &[(&str, &str)], access_token: &str) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key, value);
        }
        query.append_pair("access_token", access_token);
        format!("{}/{}{}?{}", self.base_url, self.version, path, query.finish())
    }

    /// Fetch one page of records from an API path.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        access_token: &str,
    ) -> Result<PageBatch<T>, GraphError> {
        let url = self.endpoint_url(path, params, access_token);
        self.get_page_url(&url).await
    }

    /// Fetch one page of records from a full URL (used for cursor follows;
    /// the cursor URL already carries parameters and credential).
    pub async fn get_page_url<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<PageBatch<T>, GraphError> {
        let envelope: Envelope<T> = self.get_envelope(url).await?;
        Ok(PageBatch {
            items: envelope.data.unwrap_or_default(),
            next: envelope.paging.and_then(|p| p.next),
        })
    }

    /// Fetch all pages of an API path, following `paging.next` cursors until
    /// absent and concatenating batches in order.
    ///
    /// The sequence is bounded by the configured safety limit; exceeding it
    /// yields [`GraphError::PaginationLimit`]. Each call re-issues requests
    /// from the first page.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        access_token: &str,
    ) -> Result<Vec<T>, GraphError> {
        let mut batch = self.get_page::<T>(path, params, access_token).await?;
        let mut all_items = batch.items;
        let mut follows = 0usize;

        while let Some(next) = batch.next.take() {
            if follows >= self.max_page_follows {
                return Err(GraphError::PaginationLimit {
                    limit: self.max_page_follows,
                });
            }
            follows += 1;

            batch = self.get_page_url::<T>(&next).await?;
            all_items.extend(batch.items.drain(..));
        }

        Ok(all_items)
    }

    /// Fetch an insights endpoint as metric series.
    ///
    /// Insight responses fit in a single page; any cursor is ignored.
    pub async fn get_series(
        &self,
        path: &str,
        params: &[(&str, &str)],
        access_token: &str,
    ) -> Result<Vec<MetricSeries>, GraphError> {
        let batch = self
            .get_page::<MetricSeries>(path, params, access_token)
            .await?;
        Ok(batch.items)
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Envelope<T>, GraphError> {
        let response = self.transport.send(HttpRequest::get(url)).await?;

        match serde_json::from_slice::<Envelope<T>>(&response.body) {
            Ok(envelope) => {
                if let Some(error) = envelope.error {
                    return Err(GraphError::api(error.message_or_default()));
                }
                if !response.is_success() {
                    return Err(GraphError::api(format!("HTTP {}", response.status)));
                }
                Ok(envelope)
            }
            Err(decode_err) => {
                if !response.is_success() {
                    Err(GraphError::api(format!(
                        "HTTP {}: {}",
                        response.status,
                        body_snippet(&response.body)
                    )))
                } else {
                    Err(GraphError::decode(decode_err.to_string()))
                }
            }
        }
    }
}

/// First part of a response body, for error messages.
fn body_snippet(body: &[u8]) -> String {
    const MAX_LEN: usize = 200;
    let text = String::from_utf8_lossy(body);
    let mut snippet: String = text.chars().take(MAX_LEN).collect();
    if text.chars().count() > MAX_LEN {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::RemotePost;
    use crate::http::{HttpMethod, HttpResponse, MockTransport};

    fn client(transport: &MockTransport) -> GraphClient {
        GraphClient::new(Arc::new(transport.clone()))
            .with_base_url("https://graph.test")
            .with_version("v19.0")
    }

    fn post_json(id: &str) -> String {
        format!(r#"{{"id": "{id}", "created_time": "2024-01-01T00:00:00+0000"}}"#)
    }

    #[test]
    fn endpoint_url_orders_params_and_appends_token() {
        let transport = MockTransport::new();
        let url = client(&transport).endpoint_url(
            "/123/posts",
            &[("fields", "id,message,created_time")],
            "tok",
        );
        assert_eq!(
            url,
            "https://graph.test/v19.0/123/posts?fields=id%2Cmessage%2Ccreated_time&access_token=tok"
        );
    }

    #[tokio::test]
    async fn get_page_returns_items_and_cursor() {
        let transport = MockTransport::new();
        let client = client(&transport);
        let url = client.endpoint_url("/123/posts", &[], "tok");
        transport.push_json(
            HttpMethod::Get,
            &url,
            &format!(
                r#"{{"data": [{}], "paging": {{"next": "https://graph.test/cursor"}}}}"#,
                post_json("p1")
            ),
        );

        let batch: PageBatch<RemotePost> = client.get_page("/123/posts", &[], "tok").await.unwrap();
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].id, "p1");
        assert_eq!(batch.next.as_deref(), Some("https://graph.test/cursor"));
    }

    #[tokio::test]
    async fn error_envelope_in_2xx_body_maps_to_api_error() {
        let transport = MockTransport::new();
        let client = client(&transport);
        let url = client.endpoint_url("/123/posts", &[], "bad");
        transport.push_json(
            HttpMethod::Get,
            &url,
            r#"{"error": {"message": "Invalid OAuth access token", "code": 190}}"#,
        );

        let err = client
            .get_page::<RemotePost>("/123/posts", &[], "bad")
            .await
            .expect_err("error envelope should fail");
        match err {
            GraphError::Api { message } => assert_eq!(message, "Invalid OAuth access token"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_2xx_status_maps_to_api_error() {
        let transport = MockTransport::new();
        let client = client(&transport);
        let url = client.endpoint_url("/123/posts", &[], "tok");
        transport.push_response(
            HttpMethod::Get,
            &url,
            HttpResponse {
                status: 500,
                headers: Vec::new(),
                body: b"Internal Server Error".to_vec(),
            },
        );

        let err = client
            .get_page::<RemotePost>("/123/posts", &[], "tok")
            .await
            .expect_err("500 should fail");
        match err {
            GraphError::Api { message } => {
                assert!(message.contains("HTTP 500"), "message: {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_2xx_body_maps_to_decode_error() {
        let transport = MockTransport::new();
        let client = client(&transport);
        let url = client.endpoint_url("/123/posts", &[], "tok");
        transport.push_json(HttpMethod::Get, &url, "<html>not json</html>");

        let err = client
            .get_page::<RemotePost>("/123/posts", &[], "tok")
            .await
            .expect_err("garbage body should fail");
        assert!(matches!(err, GraphError::Decode { .. }));
    }

    #[tokio::test]
    async fn fetch_all_follows_cursors_in_order_with_one_call_per_page() {
        let transport = MockTransport::new();
        let client = client(&transport);
        let first_url = client.endpoint_url("/123/posts", &[], "tok");
        transport.push_json(
            HttpMethod::Get,
            &first_url,
            &format!(
                r#"{{"data": [{}, {}], "paging": {{"next": "https://graph.test/page2"}}}}"#,
                post_json("p1"),
                post_json("p2")
            ),
        );
        transport.push_json(
            HttpMethod::Get,
            "https://graph.test/page2",
            &format!(
                r#"{{"data": [{}], "paging": {{"next": "https://graph.test/page3"}}}}"#,
                post_json("p3")
            ),
        );
        transport.push_json(
            HttpMethod::Get,
            "https://graph.test/page3",
            &format!(r#"{{"data": [{}]}}"#, post_json("p4")),
        );

        let posts: Vec<RemotePost> = client.fetch_all("/123/posts", &[], "tok").await.unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4"]);
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn fetch_all_stops_at_the_safety_bound() {
        let transport = MockTransport::new();
        let client = client(&transport).with_max_page_follows(2);
        let first_url = client.endpoint_url("/123/posts", &[], "tok");

        // A chain that never terminates: every page points at the same URL.
        let looping = format!(
            r#"{{"data": [{}], "paging": {{"next": "https://graph.test/loop"}}}}"#,
            post_json("p")
        );
        transport.push_json(HttpMethod::Get, &first_url, &looping);
        transport.push_json(HttpMethod::Get, "https://graph.test/loop", &looping);
        transport.push_json(HttpMethod::Get, "https://graph.test/loop", &looping);
        transport.push_json(HttpMethod::Get, "https://graph.test/loop", &looping);

        let err = client
            .fetch_all::<RemotePost>("/123/posts", &[], "tok")
            .await
            .expect_err("looping cursors should hit the bound");
        assert!(matches!(err, GraphError::PaginationLimit { limit: 2 }));
    }

    #[tokio::test]
    async fn missing_data_array_yields_empty_batch() {
        let transport = MockTransport::new();
        let client = client(&transport);
        let url = client.endpoint_url("/123/posts", &[], "tok");
        transport.push_json(HttpMethod::Get, &url, "{}");

        let batch: PageBatch<RemotePost> = client.get_page("/123/posts", &[], "tok").await.unwrap();
        assert!(batch.items.is_empty());
        assert!(batch.next.is_none());
    }

    #[test]
    fn body_snippet_truncates_long_bodies() {
        let long = "x".repeat(500);
        let snippet = body_snippet(long.as_bytes());
        assert_eq!(snippet.len(), 203);
        assert!(snippet.ends_with("..."));
    }
}
