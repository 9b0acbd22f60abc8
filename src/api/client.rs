//! HTTP transport for the chef API: auth header, status mapping, retries.

use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Typed client for the chef REST API.
///
/// Holds two `reqwest` clients: one with the ordinary timeout and one with
/// the long timeout used for create operations.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    long_http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if reqwest::Url::parse(&config.base_url).is_err() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let long_http = reqwest::Client::builder()
            .timeout(config.long_timeout)
            .build()?;
        Ok(Self {
            http,
            long_http,
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn request(&self, client: &reqwest::Client, method: Method, path: &str) -> RequestBuilder {
        let builder = client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.config.auth_token {
            Some(token) => builder.header(
                reqwest::header::AUTHORIZATION,
                bearer_header(token.expose_secret()),
            ),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let builder = self.request(&self.http, Method::GET, path).query(query);
        send(builder).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "POST");
        let builder = self.request(&self.http, Method::POST, path).json(body);
        send(builder).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "PUT");
        let builder = self.request(&self.http, Method::PUT, path).json(body);
        send(builder).await
    }

    /// POST on the long-timeout client; transport timeouts are retried.
    pub(crate) async fn post_long<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_long(Method::POST, path, body).await
    }

    pub(crate) async fn put_long<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_long(Method::PUT, path, body).await
    }

    pub(crate) async fn patch_long<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send_long(Method::PATCH, path, body).await
    }

    async fn send_long<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            tracing::debug!(path, %method, attempt, "long request");
            let builder = self.request(&self.long_http, method.clone(), path).json(body);
            match send(builder).await {
                Err(ApiError::Network(e)) if e.is_timeout() && attempt < self.config.retry_count => {
                    attempt += 1;
                    tracing::warn!(path, attempt, "Request timed out, retrying");
                }
                other => return other,
            }
        }
    }

    /// Multipart POST on the long-timeout client. Not retried: the form is consumed.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "POST (multipart)");
        let builder = self
            .request(&self.long_http, Method::POST, path)
            .multipart(form);
        send(builder).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "DELETE");
        let builder = self.request(&self.http, Method::DELETE, path).query(query);
        send(builder).await
    }
}

/// Tokens already carrying the scheme are sent unchanged.
fn bearer_header(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
    let response = builder.send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    check_status(status, &body)?;
    Ok(serde_json::from_slice(&body)?)
}

/// Map an HTTP status (and error body) onto the error taxonomy.
pub(crate) fn check_status(status: u16, body: &[u8]) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(ApiError::Server {
            status,
            message: "Authentication expired. Please log in again.".to_string(),
        }),
        400..=499 | 500..=599 => {
            let fallback = if status < 500 {
                "Client error"
            } else {
                "Server error"
            };
            let message = error_message(body).unwrap_or_else(|| fallback.to_string());
            tracing::debug!(status, %message, "Request failed");
            Err(ApiError::Server { status, message })
        }
        _ => Err(ApiError::InvalidResponse),
    }
}

/// `error` field of a JSON body, else its `message` field.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_string))
}
