//! HTTP client for the Foodzippy admin API
//!
//! Every endpoint module goes through [`ApiClient`], which injects the bearer
//! token, encodes JSON or multipart bodies and turns non-success responses
//! into [`ClientError`] values carrying the server's `message`.

use crate::error::{ClientError, ClientResult};
use foodzippy_core::config::ApiConfig;
use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::debug;

/// Message used when the server gives no reason for a failure
pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

/// Query string parameters, already rendered
pub type QueryPairs = [(&'static str, String)];

/// API client for the admin backend
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a client with default timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::from_config(&config)
    }

    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("foodzippy-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Set the bearer token
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    /// Replace or clear the bearer token for this client and its clones
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    /// Current bearer token
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(token) = self.token.read().as_deref() {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<R> {
        let response = request.send().await?;
        let body = Self::check(response).await?;
        let slice: &[u8] = if body.is_empty() { b"null" } else { &body };
        Ok(serde_json::from_slice(slice)?)
    }

    /// Map the status to an error, returning the raw body on success
    async fn check(response: Response) -> ClientResult<Vec<u8>> {
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::unauthorized(message),
            _ => ClientError::api(status.as_u16(), message),
        })
    }

    /// GET a JSON resource
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        self.send(self.request(Method::GET, path)).await
    }

    /// GET with query parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn get_with_query<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryPairs,
    ) -> ClientResult<R> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    /// GET a plain-text resource such as a CSV export
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not UTF-8.
    pub async fn get_text(&self, path: &str) -> ClientResult<String> {
        let response = self.request(Method::GET, path).send().await?;
        let body = Self::check(response).await?;
        String::from_utf8(body).map_err(|e| ClientError::validation(e.to_string()))
    }

    /// POST a JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// PUT a JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn put<B, R>(&self, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// PATCH a JSON body
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn patch<B, R>(&self, path: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    /// PATCH without a body
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn patch_empty<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        self.send(self.request(Method::PATCH, path)).await
    }

    /// DELETE a resource
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        self.send(self.request(Method::DELETE, path)).await
    }

    /// PUT a multipart form; reqwest writes the boundary header
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn put_multipart<R: DeserializeOwned>(&self, path: &str, form: Form) -> ClientResult<R> {
        self.send(self.request(Method::PUT, path).multipart(form)).await
    }

    /// Wake a cold backend; callers usually ignore the result
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached.
    pub async fn ping(&self) -> ClientResult<()> {
        let response = self.request(Method::GET, "/api/health").send().await?;
        Self::check(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_token_is_shared_between_clones() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let clone = client.clone();
        client.set_token(Some("abc".to_string()));
        assert_eq!(clone.token().as_deref(), Some("abc"));

        clone.set_token(None);
        assert!(client.token().is_none());
    }
}
