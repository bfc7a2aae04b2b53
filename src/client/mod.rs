//! Confman HTTP client

pub mod error;
pub mod lenient;

pub use error::ClientError;
pub use lenient::LenientConfmanClient;

use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use serde_json::value::RawValue;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::models::{DeleteKeysRequest, ListQuery, ReadKeyQuery, WriteKeyRequest};
use crate::routes;

/// A listing exactly as the backend sent it
///
/// Key order, number precision and whitespace inside the document are those of
/// the response body. Use [`RawValue::get`] for the text, or parse it when the
/// structure is needed.
pub type ServicePathListing = Box<RawValue>;

/// Client for the confman configuration API
///
/// Holds nothing but the base URL and a pooled transport, so it is cheap to
/// clone and safe to use from concurrent tasks.
#[derive(Clone, Debug)]
pub struct ConfmanClient {
    client: Client,
    base_url: String,
}

impl ConfmanClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from environment-derived configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Self::builder().base_url(config.backend_api_base_url.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Create a new client builder
    pub fn builder() -> ConfmanClientBuilder {
        ConfmanClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List every configuration entry under every service path
    ///
    /// The body of a 200 response is returned exactly as the backend sent it.
    pub async fn get_service_path_configs(&self) -> Result<ServicePathListing, ClientError> {
        self.list(ListQuery {
            path: None,
            recursive: Some(true),
        })
        .await
    }

    /// List the entries of one service path, optionally including nested paths
    pub async fn list_service_path(
        &self,
        path: &str,
        recursive: bool,
    ) -> Result<ServicePathListing, ClientError> {
        require_non_empty("service path", path)?;
        self.list(ListQuery {
            path: Some(path.to_string()),
            recursive: Some(recursive),
        })
        .await
    }

    /// Read the value stored at `key` under `path`
    pub async fn read_service_path_key(&self, path: &str, key: &str) -> Result<String, ClientError> {
        require_non_empty("service path", path)?;
        require_non_empty("key", key)?;

        let request = self
            .request(Method::GET, routes::SERVICE_PATH_KEY)
            .query(&ReadKeyQuery {
                service_path: path.to_string(),
                key: key.to_string(),
            });
        let response = self.send(request).await?;
        let body = response.text().await?;

        tracing::debug!("Read key {} under {}", key, path);
        Ok(decode_value(body))
    }

    /// Create or overwrite the value stored at `key` under `path`
    pub async fn write_service_path_key(
        &self,
        path: &str,
        key: &str,
        value: &str,
    ) -> Result<(), ClientError> {
        require_non_empty("service path", path)?;
        require_non_empty("key", key)?;

        let request = self
            .request(Method::PUT, routes::SERVICE_PATH_KEY)
            .json(&WriteKeyRequest {
                path: path.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            });
        self.send(request).await?;

        tracing::debug!("Wrote key {} under {}", key, path);
        Ok(())
    }

    /// Delete a batch of keys under one service path
    ///
    /// The batch succeeds or fails as a whole from the caller's point of view.
    pub async fn delete_service_path_keys<S: AsRef<str>>(
        &self,
        path: &str,
        keys: &[S],
    ) -> Result<(), ClientError> {
        require_non_empty("service path", path)?;
        if keys.is_empty() {
            return Err(ClientError::InvalidArgument("keys must not be empty".into()));
        }
        for key in keys {
            require_non_empty("key", key.as_ref())?;
        }

        let request = self
            .request(Method::DELETE, routes::SERVICE_PATH_KEYS)
            .json(&DeleteKeysRequest {
                path: path.to_string(),
                keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
            });
        self.send(request).await?;

        tracing::debug!("Deleted {} keys under {}", keys.len(), path);
        Ok(())
    }

    /// The body is checked to be JSON but never re-serialized
    async fn list(&self, query: ListQuery) -> Result<ServicePathListing, ClientError> {
        let request = self.request(Method::GET, routes::SERVICE_PATHS).query(&query);
        let response = self.send(request).await?;
        let body = response.text().await?;

        Ok(RawValue::from_string(body)?)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Send a request, treating anything but exactly 200 as a failure
    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::OK {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<(), ClientError> {
    if value.is_empty() {
        Err(ClientError::InvalidArgument(format!("{name} must not be empty")))
    } else {
        Ok(())
    }
}

/// A JSON string body yields its contents, any other JSON its text, and
/// anything else the raw body.
fn decode_value(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::String(value)) => value,
        Ok(other) => other.to_string(),
        Err(_) => body,
    }
}

/// Builder for ConfmanClient
#[derive(Default)]
pub struct ConfmanClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ConfmanClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ConfmanClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        let parsed = Url::parse(&base_url)
            .map_err(|err| ClientError::Configuration(format!("invalid base_url '{base_url}': {err}")))?;

        // Endpoint paths are appended to the base URL as text
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ClientError::Configuration(format!(
                "base_url '{base_url}' must not carry a query or fragment"
            )));
        }

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| concat!("confman-client/", env!("CARGO_PKG_VERSION")).to_string()),
        );

        let client = client_builder.build()?;

        Ok(ConfmanClient { client, base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ConfmanClient::builder().build();
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_relative_url() {
        let result = ConfmanClient::new("service_paths");
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_query_and_fragment() {
        let result = ConfmanClient::new("http://localhost:8000/api?token=abc");
        assert!(matches!(result, Err(ClientError::Configuration(_))));

        let result = ConfmanClient::new("http://localhost:8000/api#section");
        assert!(matches!(result, Err(ClientError::Configuration(_))));

        let result = ConfmanClient::new("http://localhost:8000/api/?");
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = ConfmanClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            backend_api_base_url: "http://confman.internal".to_string(),
            request_timeout: Some(Duration::from_secs(5)),
        };

        let client = ConfmanClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://confman.internal");
    }

    #[test]
    fn test_decode_value() {
        assert_eq!(decode_value(r#""v2""#.to_string()), "v2");
        assert_eq!(decode_value("42".to_string()), "42");
        assert_eq!(decode_value("plain text".to_string()), "plain text");
        assert_eq!(decode_value(String::new()), "");
    }

    #[tokio::test]
    async fn test_empty_arguments_rejected_without_request() {
        // Nothing listens on this port; validation must fail first.
        let client = ConfmanClient::new("http://127.0.0.1:9").unwrap();

        let read = client.read_service_path_key("", "k1").await;
        assert!(matches!(read, Err(ClientError::InvalidArgument(_))));

        let write = client.write_service_path_key("/svc/a", "", "v").await;
        assert!(matches!(write, Err(ClientError::InvalidArgument(_))));

        let delete = client.delete_service_path_keys::<&str>("/svc/a", &[]).await;
        assert!(matches!(delete, Err(ClientError::InvalidArgument(_))));

        let delete = client.delete_service_path_keys("/svc/a", &["k1", ""]).await;
        assert!(matches!(delete, Err(ClientError::InvalidArgument(_))));
    }
}
