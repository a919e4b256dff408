//! HTTP client shared by the panel front ends
//!
//! [`PanelClient::request`] is the single request helper for both upstreams:
//! the local admin API and the messaging gateway reached through the
//! same-origin proxy prefix. It attaches the stored token, defaults the JSON
//! content type for bodies, turns 401 into a cleared token plus
//! [`ClientError::Unauthorized`] and decodes the body according to the
//! declared content type.

use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

pub use reqwest::Method;

use crate::config::PanelConfig;
use crate::error::{ClientError, ClientResult};
use crate::message::{Outcome, Page, StatusMessage};
use crate::token::TokenStore;

/// Which backend a request is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// Local admin API, paths start with `/api`
    Api,
    /// Messaging gateway behind the proxy prefix
    Gateway,
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// The body as JSON; text bodies become a JSON string
    pub fn into_json(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        }
    }

    /// Deserialize a JSON body into `T`
    pub fn decode<T: DeserializeOwned>(self) -> ClientResult<T> {
        match self {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
            }
            Payload::Text(text) => Err(ClientError::Decode(format!(
                "expected JSON, got text: {}",
                text.trim()
            ))),
        }
    }

    /// Deserialize the body into `T`, parsing text bodies as JSON too
    pub fn parse<T: DeserializeOwned>(self) -> ClientResult<T> {
        match self {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
            }
            Payload::Text(text) => {
                serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
            }
        }
    }
}

/// Panel HTTP client
#[derive(Debug, Clone)]
pub struct PanelClient {
    http: reqwest::Client,
    base_url: String,
    gateway_prefix: String,
    auth_header: HeaderName,
    tokens: TokenStore,
}

impl PanelClient {
    /// Build a client from configuration
    pub fn new(config: &PanelConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Configuration(format!("Invalid HTTP client: {}", e)))?;

        let auth_header = HeaderName::from_bytes(config.auth_header.trim().as_bytes())
            .map_err(|e| ClientError::Configuration(format!("Invalid auth header: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            gateway_prefix: config.gateway_prefix.clone(),
            auth_header,
            tokens: TokenStore::new(&config.state_dir),
        })
    }

    /// Token store backing this client
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Page guard: without a stored token the only way forward is the login page
    pub fn require_session(&self) -> Result<(), Outcome> {
        if self.tokens.is_present() {
            Ok(())
        } else {
            Err(Outcome::navigate(StatusMessage::cleared(), Page::Login))
        }
    }

    /// Absolute URL of `path` on the given upstream
    pub fn url(&self, upstream: Upstream, path: &str) -> String {
        match upstream {
            Upstream::Api => format!("{}{}", self.base_url, path),
            Upstream::Gateway => format!("{}{}{}", self.base_url, self.gateway_prefix, path),
        }
    }

    /// Issue an authenticated request
    pub async fn request(
        &self,
        upstream: Upstream,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<Payload> {
        let url = self.url(upstream, path);
        let token = self.tokens.load()?.unwrap_or_default();
        let token = HeaderValue::from_str(&token).map_err(|_| {
            ClientError::Validation("Stored token is not a valid header value".to_string())
        })?;

        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(self.auth_header.clone(), token);

        if let Some(body) = body {
            let bytes = serde_json::to_vec(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(bytes);
        }

        let response = request.send().await.map_err(|e| {
            error!("{} {} failed: {}", method, url, e);
            ClientError::Network(e)
        })?;

        let status = response.status();
        debug!("{} {} -> {}", method, url, status);

        if status == StatusCode::UNAUTHORIZED {
            warn!("{} {} rejected the session, clearing token", method, url);
            if let Err(e) = self.tokens.clear() {
                error!("Failed to clear session token: {}", e);
            }
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            return Err(http_error(response).await);
        }

        decode_payload(response).await
    }

    /// GET a JSON document
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        upstream: Upstream,
        path: &str,
    ) -> ClientResult<T> {
        self.request(upstream, Method::GET, path, None)
            .await?
            .decode()
    }

    /// GET a body parsed as JSON whatever its declared content type
    pub async fn get_json_body<T: DeserializeOwned>(
        &self,
        upstream: Upstream,
        path: &str,
    ) -> ClientResult<T> {
        self.request(upstream, Method::GET, path, None)
            .await?
            .parse()
    }

    /// POST a JSON body and return the decoded response
    pub async fn post_json<B: Serialize>(
        &self,
        upstream: Upstream,
        path: &str,
        body: &B,
    ) -> ClientResult<Payload> {
        let body = serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.request(upstream, Method::POST, path, Some(body)).await
    }

    /// DELETE a resource
    pub async fn delete(&self, upstream: Upstream, path: &str) -> ClientResult<Payload> {
        self.request(upstream, Method::DELETE, path, None).await
    }

    /// POST without the session header and without the 401 rule
    ///
    /// Used for the login exchange, which has no session yet and reports every
    /// failure status the same way.
    pub async fn post_anonymous<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Response> {
        let url = self.url(Upstream::Api, path);
        debug!("POST {}", url);

        self.http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("POST {} failed: {}", url, e);
                ClientError::Network(e)
            })
    }
}

async fn http_error(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body = body.trim().to_string();

    let message = if !body.is_empty() {
        body.clone()
    } else if let Some(reason) = status.canonical_reason() {
        reason.to_string()
    } else {
        format!("HTTP {}", status.as_u16())
    };

    warn!("Request failed with {}: {}", status.as_u16(), message);

    ClientError::Http {
        status: status.as_u16(),
        message,
        body,
    }
}

async fn decode_payload(response: Response) -> ClientResult<Payload> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        response
            .json::<Value>()
            .await
            .map(Payload::Json)
            .map_err(|e| ClientError::Decode(e.to_string()))
    } else {
        response
            .text()
            .await
            .map(Payload::Text)
            .map_err(ClientError::Network)
    }
}
