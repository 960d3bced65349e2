//! JSON-over-HTTP client shared by the registry and pipeline clients.
//!
//! Provides a wrapper around reqwest with:
//! - Configurable timeouts
//! - User-agent management
//! - Optional bearer authentication
//! - Status checking that turns non-2xx responses into [`RegistrarError::Api`]

use crate::config::NetworkConfig;
use crate::{RegistrarError, Result};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Longest response body echoed back in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP client for JSON APIs.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    /// Bearer token sent with every request, if set.
    bearer: Option<String>,
    /// Default timeout for requests.
    default_timeout: Duration,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("has_bearer", &self.bearer.is_some())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| RegistrarError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e),
            })?;

        Ok(Self {
            client,
            bearer: None,
            default_timeout: timeout,
        })
    }

    /// Attach a bearer token to every request made by this client.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// GET a JSON document. A 404 yields `None`.
    pub async fn get_optional_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self.send(self.client.get(url), None, "GET", url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_response_status(response, url).await?;
        Ok(Some(response.json::<T>().await?))
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_json_with_bearer(url, body, None).await
    }

    /// POST a JSON body, overriding the client's bearer token for this call.
    ///
    /// When `bearer` is set it replaces the client-level token; only one
    /// `Authorization` header is ever sent.
    pub async fn post_json_with_bearer<B, T>(
        &self,
        url: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(body);
        let response = self.send(request, bearer, "POST", url).await?;
        let response = check_response_status(response, url).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send(
        &self,
        mut request: RequestBuilder,
        bearer: Option<&str>,
        method: &str,
        url: &str,
    ) -> Result<Response> {
        if let Some(token) = bearer.or(self.bearer.as_deref()) {
            request = request.bearer_auth(token);
        }

        debug!("{} {}", method, url);
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                RegistrarError::Timeout(self.default_timeout)
            } else {
                RegistrarError::Network {
                    message: format!("{} {} failed: {}", method, url, e),
                    source: Some(e),
                }
            }
        })
    }
}

async fn check_response_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.chars().take(MAX_ERROR_BODY_CHARS).collect()
    };

    Err(RegistrarError::Api {
        service: extract_domain(url),
        status: status.as_u16(),
        message,
    })
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("http://model-registry-service.kubeflow.svc.cluster.local:8080/api"),
            "model-registry-service.kubeflow.svc.cluster.local"
        );
        assert_eq!(extract_domain("https://ig.aidtaas.com/login"), "ig.aidtaas.com");
        assert_eq!(extract_domain("invalid-url"), "unknown");
    }

    #[test]
    fn test_client_with_timeout() {
        let client = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(client.default_timeout, Duration::from_secs(5));
        assert!(client.bearer.is_none());
    }

    #[tokio::test]
    async fn test_bearer_is_sent() {
        let app = Router::new().route(
            "/echo",
            post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({"auth": auth, "body": body}))
            }),
        );
        let base = spawn(app).await;

        let client = HttpClient::new().unwrap().with_bearer("tok");
        let value: Value = client
            .post_json(&format!("{base}/echo"), &json!({"a": 1}))
            .await
            .unwrap();
        assert_eq!(value["auth"], "Bearer tok");
        assert_eq!(value["body"]["a"], 1);
    }

    #[tokio::test]
    async fn test_bearer_override_replaces_client_token() {
        let app = Router::new().route(
            "/echo",
            post(|headers: axum::http::HeaderMap| async move {
                let auth: Vec<String> = headers
                    .get_all("authorization")
                    .iter()
                    .filter_map(|v| v.to_str().ok())
                    .map(str::to_string)
                    .collect();
                Json(json!({"auth": auth}))
            }),
        );
        let base = spawn(app).await;

        let client = HttpClient::new().unwrap().with_bearer("client-token");
        let value: Value = client
            .post_json_with_bearer(&format!("{base}/echo"), &json!({}), Some("call-token"))
            .await
            .unwrap();
        assert_eq!(value["auth"], json!(["Bearer call-token"]));

        let value: Value = client
            .post_json(&format!("{base}/echo"), &json!({}))
            .await
            .unwrap();
        assert_eq!(value["auth"], json!(["Bearer client-token"]));
    }

    #[tokio::test]
    async fn test_not_found_is_none_and_errors_carry_body() {
        let app = Router::new()
            .route("/missing", get(|| async { AxumStatus::NOT_FOUND }))
            .route(
                "/broken",
                get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "registry exploded") }),
            );
        let base = spawn(app).await;
        let client = HttpClient::new().unwrap();

        let missing: Option<Value> = client
            .get_optional_json(&format!("{base}/missing"))
            .await
            .unwrap();
        assert!(missing.is_none());

        let err = client
            .get_optional_json::<Value>(&format!("{base}/broken"))
            .await
            .unwrap_err();
        match err {
            RegistrarError::Api {
                service,
                status,
                message,
            } => {
                assert_eq!(service, "127.0.0.1");
                assert_eq!(status, 500);
                assert_eq!(message, "registry exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
