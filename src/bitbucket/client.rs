use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{header, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::models::{CommitRecord, Page, RepositoryRecord};
use crate::error::{AppError, Result};

pub const DEFAULT_API_URL: &str = "https://api.bitbucket.org/2.0";

/// Page size applied to every request unless the caller overrides it.
pub const DEFAULT_PAGE_LEN: (&str, &str) = ("pagelen", "100");

const USER_AGENT: &str = concat!("workspace-pulse/", env!("CARGO_PKG_VERSION"));

// -------------------------------------------------------------------------------------------------
// ApiClient
// -------------------------------------------------------------------------------------------------

/// Authenticated GET client for the upstream REST API.
///
/// Each call carries the token of the member it acts for. There is no retry
/// and no caching at this level; see `ResponseCache` and `CachedSource`.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    inner: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("Invalid API URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!("Invalid API URL {base_url:?}")));
        }

        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { base_url, inner })
    }

    /// `GET /repositories/{workspace}`
    pub fn repositories_url(&self, workspace: &str) -> Url {
        self.make_url(&["repositories", workspace])
    }

    /// `GET /repositories/{workspace}/{repo}/commits`
    pub fn commits_url(&self, workspace: &str, repo_slug: &str) -> Url {
        self.make_url(&["repositories", workspace, repo_slug, "commits"])
    }

    /// Issue one GET and return the raw JSON body.
    ///
    /// `overrides` are merged over the default page size.
    pub async fn fetch(&self, url: &Url, token: &str, overrides: &[(&str, &str)]) -> Result<Value> {
        let params = request_params(overrides);

        let response = self
            .inner
            .get(url.clone())
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body).unwrap_or_else(|| {
                format!("Upstream request failed with status {}", status.as_u16())
            });
            tracing::warn!(%url, status = status.as_u16(), "upstream request failed: {}", message);
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    pub async fn list_repositories(
        &self,
        workspace: &str,
        token: &str,
        overrides: &[(&str, &str)],
    ) -> Result<Page<RepositoryRecord>> {
        let url = self.repositories_url(workspace);
        decode(self.fetch(&url, token, overrides).await?)
    }

    pub async fn list_commits(
        &self,
        workspace: &str,
        repo_slug: &str,
        token: &str,
        overrides: &[(&str, &str)],
    ) -> Result<Page<CommitRecord>> {
        let url = self.commits_url(workspace, repo_slug);
        decode(self.fetch(&url, token, overrides).await?)
    }

    /// Append percent-encoded path segments to the base URL.
    fn make_url(&self, path_parts: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path_parts);
        }
        url
    }
}

/// Effective query parameters for a request, sorted by name.
pub fn request_params(overrides: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert(DEFAULT_PAGE_LEN.0.to_string(), DEFAULT_PAGE_LEN.1.to_string());
    for (name, value) in overrides {
        params.insert(name.to_string(), value.to_string());
    }
    params
}

/// Deterministic cache key for a URL and its effective query parameters.
pub fn cache_key(url: &Url, params: &BTreeMap<String, String>) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{url}:{query}")
}

/// Pull `error.message` out of an upstream error body, if there is one.
pub fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::extract::{Path, RawQuery};
    use axum::http::{HeaderMap, HeaderName, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Request details the fake upstream saw, returned under `echo`.
    fn echo(headers: &HeaderMap, query: Option<String>) -> Value {
        let value_of = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        json!({
            "authorization": value_of(header::AUTHORIZATION),
            "accept": value_of(header::ACCEPT),
            "query": query,
        })
    }

    /// Canned failures keyed by workspace name; anything else succeeds.
    fn canned_failure(workspace: &str) -> Option<(StatusCode, String)> {
        match workspace {
            "missing" => Some((
                StatusCode::NOT_FOUND,
                json!({"type": "error", "error": {"message": "Repository not found"}}).to_string(),
            )),
            "down" => Some((
                StatusCode::SERVICE_UNAVAILABLE,
                "<html>maintenance</html>".to_string(),
            )),
            _ => None,
        }
    }

    async fn fake_repositories(
        Path(workspace): Path<String>,
        headers: HeaderMap,
        RawQuery(query): RawQuery,
    ) -> (StatusCode, String) {
        if let Some(failure) = canned_failure(&workspace) {
            return failure;
        }
        let body = json!({
            "values": [{ "slug": "api", "name": "API", "uuid": "{1}" }],
            "echo": echo(&headers, query),
        });
        (StatusCode::OK, body.to_string())
    }

    async fn fake_commits(
        Path((workspace, repo)): Path<(String, String)>,
        headers: HeaderMap,
        RawQuery(query): RawQuery,
    ) -> (StatusCode, String) {
        if let Some(failure) = canned_failure(&workspace) {
            return failure;
        }
        let body = json!({
            "values": [{
                "hash": format!("{repo}-1"),
                "date": "2024-01-02T09:00:00+00:00",
                "message": "Initial commit",
                "author": { "raw": "Ada <ada@example.com>" }
            }],
            "echo": echo(&headers, query),
        });
        (StatusCode::OK, body.to_string())
    }

    /// Serve a fake upstream API on an ephemeral port and return its base URL.
    ///
    /// Workspace `missing` answers 404 with an upstream error body, `down`
    /// answers 503 with an HTML body.
    pub(crate) async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/2.0/repositories/{workspace}", get(fake_repositories))
            .route("/2.0/repositories/{workspace}/{repo}/commits", get(fake_commits));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}/2.0")
    }

    async fn upstream_client() -> ApiClient {
        ApiClient::new(&spawn_upstream().await, Duration::from_secs(5)).unwrap()
    }

    fn client() -> ApiClient {
        ApiClient::new("https://api.example.com/2.0", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn urls_are_built_under_the_base_path() {
        let client = client();
        assert_eq!(
            client.repositories_url("team-7").as_str(),
            "https://api.example.com/2.0/repositories/team-7"
        );
        assert_eq!(
            client.commits_url("team-7", "web-app").as_str(),
            "https://api.example.com/2.0/repositories/team-7/web-app/commits"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let client = ApiClient::new("https://api.example.com/2.0/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.repositories_url("ws").as_str(),
            "https://api.example.com/2.0/repositories/ws"
        );
    }

    #[test]
    fn path_segments_are_escaped() {
        let url = client().commits_url("ws", "a/b");
        assert_eq!(url.as_str(), "https://api.example.com/2.0/repositories/ws/a%2Fb/commits");
    }

    #[test]
    fn page_size_defaults_to_100_and_can_be_overridden() {
        let defaults = request_params(&[]);
        assert_eq!(defaults.get("pagelen").map(String::as_str), Some("100"));

        let custom = request_params(&[("pagelen", "2"), ("sort", "-date")]);
        assert_eq!(custom.get("pagelen").map(String::as_str), Some("2"));
        assert_eq!(custom.get("sort").map(String::as_str), Some("-date"));
    }

    #[test]
    fn cache_key_is_order_independent() {
        let url = client().commits_url("ws", "repo");
        let a = cache_key(&url, &request_params(&[("sort", "-date"), ("q", "x")]));
        let b = cache_key(&url, &request_params(&[("q", "x"), ("sort", "-date")]));
        assert_eq!(a, b);
        assert_eq!(
            a,
            "https://api.example.com/2.0/repositories/ws/repo/commits:pagelen=100&q=x&sort=-date"
        );
    }

    #[test]
    fn upstream_message_is_extracted_when_present() {
        let body = r#"{"type": "error", "error": {"message": "Repository not found"}}"#;
        assert_eq!(upstream_message(body).as_deref(), Some("Repository not found"));
        assert_eq!(upstream_message("<html>bad gateway</html>"), None);
        assert_eq!(upstream_message(r#"{"error": {}}"#), None);
    }

    #[tokio::test]
    async fn fetch_sends_bearer_token_accept_header_and_default_page_size() {
        let client = upstream_client().await;
        let url = client.repositories_url("team-7");

        let body = client.fetch(&url, "tok", &[]).await.unwrap();
        assert_eq!(
            body["echo"],
            json!({
                "authorization": "Bearer tok",
                "accept": "application/json",
                "query": "pagelen=100",
            })
        );
    }

    #[tokio::test]
    async fn fetch_applies_query_overrides() {
        let client = upstream_client().await;
        let url = client.commits_url("team-7", "web");

        let body = client
            .fetch(&url, "tok", &[("pagelen", "2"), ("sort", "-date")])
            .await
            .unwrap();
        assert_eq!(body["echo"]["query"], "pagelen=2&sort=-date");
    }

    #[tokio::test]
    async fn upstream_error_message_is_surfaced_with_its_status() {
        let client = upstream_client().await;
        let url = client.repositories_url("missing");

        let err = client.fetch(&url, "tok", &[]).await.unwrap_err();
        assert!(
            matches!(&err, AppError::Upstream { status: 404, message } if message == "Repository not found"),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn non_json_error_body_gets_a_generic_message() {
        let client = upstream_client().await;
        let url = client.repositories_url("down");

        let err = client.fetch(&url, "tok", &[]).await.unwrap_err();
        assert!(
            matches!(
                &err,
                AppError::Upstream { status: 503, message }
                    if message == "Upstream request failed with status 503"
            ),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn listings_decode_into_wire_pages() {
        let client = upstream_client().await;

        let repositories = client.list_repositories("team-7", "tok", &[]).await.unwrap();
        assert_eq!(repositories.values.len(), 1);
        assert_eq!(repositories.values[0].slug, "api");

        let commits = client.list_commits("team-7", "api", "tok", &[]).await.unwrap();
        assert_eq!(commits.values[0].hash, "api-1");
        assert_eq!(commits.values[0].author.raw, "Ada <ada@example.com>");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ApiClient::new("not a url", Duration::from_secs(5)).is_err());
        assert!(ApiClient::new("mailto:someone@example.com", Duration::from_secs(5)).is_err());
    }
}
