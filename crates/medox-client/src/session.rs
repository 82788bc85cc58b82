//! Session context: base origin, credential, shared HTTP client.
//!
//! The session is passed explicitly to every call site; nothing in this
//! crate reads the key from ambient storage. Persisting the key between
//! runs is the caller's concern (see [`crate::keystore`]).

use reqwest::{Response, StatusCode};
use url::Url;

use crate::error::{ApiError, Result};

/// Header carrying the API key on authenticated requests.
pub const HEADER_API_KEY: &str = "X-API-Key";

/// A connection context for the medox API.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: Url,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl Session {
    /// Create an unauthenticated session. Only `create_api_key` and the
    /// key-management calls work without a key.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            api_key: None,
            client: reqwest::Client::new(),
        })
    }

    /// Create a session with a credential already attached.
    pub fn with_key(base_url: &str, key: impl Into<String>) -> Result<Self> {
        let mut session = Self::new(base_url)?;
        session.api_key = Some(key.into());
        Ok(session)
    }

    /// Attach (or replace) the credential used for authenticated calls.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Build an `/api/v1/...` URL. Every segment is percent-encoded, so
    /// drug and disease names with spaces or slashes are safe in paths.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| {
                    ApiError::InvalidInput(
                        "base URL does not accept path segments (e.g. mailto:)".to_string(),
                    )
                })?;
            path.pop_if_empty();
            path.extend(["api", "v1"]);
            path.extend(segments);
        }
        Ok(url)
    }

    /// The key for an authenticated request, or `InvalidInput` before any
    /// request is sent.
    pub(crate) fn key_header(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ApiError::InvalidInput("no API key attached to this session".to_string()))
    }

    /// Map a non-success response to the error taxonomy.
    pub(crate) async fn check_status(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(error_detail(resp).await)),
            _ => Err(ApiError::UnexpectedStatus {
                status,
                detail: error_detail(resp).await,
            }),
        }
    }

    /// Check status, require a JSON content type, decode.
    pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
        let resp = Self::check_status(resp).await?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("application/json") {
            return Err(ApiError::UnexpectedContentType(content_type));
        }
        Ok(resp.json().await?)
    }
}

/// Extract the server's error message. The server wraps errors as
/// `{"detail": "..."}`; fall back to the raw body.
async fn error_detail(resp: Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or(body)
}
