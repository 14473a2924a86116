//! Thin REST client over `reqwest`.
//!
//! Every call resolves to an [`Envelope`] or an [`ApiError`]; the auth
//! header is taken from the session at request time so a cleared
//! credential store takes effect immediately.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use super::envelope::Envelope;
use super::error::{ApiError, ApiResult};
use crate::config::{build_auth_header, ApiConfig, Session};
use crate::store::QueryParams;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .build()
            .map_err(|e| ApiError::Transport {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `path`, with `params` as the query string.
    pub fn url(&self, path: &str, params: Option<&QueryParams>) -> ApiResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if let Some(params) = params {
            let pairs = params.to_pairs();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }
        Ok(url)
    }

    pub async fn get(&self, path: &str, params: Option<&QueryParams>) -> ApiResult<Envelope> {
        let url = self.url(path, params)?;
        self.send(Method::GET, url, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ApiResult<Envelope> {
        let url = self.url(path, None)?;
        self.send(Method::POST, url, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Option<&Value>) -> ApiResult<Envelope> {
        let url = self.url(path, None)?;
        self.send(Method::PATCH, url, body).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Envelope> {
        let url = self.url(path, None)?;
        self.send(Method::DELETE, url, None).await
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> ApiResult<Envelope> {
        let target = url.to_string();
        debug!(%method, url = %target, "API request");

        let mut builder: RequestBuilder = self.client.request(method, url);
        if let Some((name, value)) = build_auth_header(&self.session) {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ApiError::Transport {
            url: target.clone(),
            source: e,
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| ApiError::Transport {
            url: target.clone(),
            source: e,
        })?;

        if !status.is_success() {
            // Error bodies usually carry the envelope; its statusCode wins.
            let parsed = serde_json::from_slice::<Envelope>(&bytes).ok();
            let status_code = parsed
                .as_ref()
                .map(|env| env.status_code)
                .filter(|code| *code != 0)
                .unwrap_or_else(|| status.as_u16());
            let message = parsed
                .map(|env| env.message)
                .filter(|message| !message.is_empty());
            debug!(url = %target, status = status_code, "API error response");
            return Err(ApiError::Status {
                status: status_code,
                message,
            });
        }

        if bytes.is_empty() {
            let mut envelope = Envelope::ok(Value::Null);
            envelope.status_code = status.as_u16();
            return Ok(envelope);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}
