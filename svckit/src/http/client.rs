// svckit/src/http/client.rs
//
// Transport wrapper for the admin API: bearer auth, JSON bodies, fixed
// timeout, and one place where responses are classified into ApiError.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::errors::ApiError;
use crate::http::session::Session;
use crate::metrics;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        // Fail early on a malformed base URL rather than on the first request.
        Url::parse(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Issue a request and decode the payload into `T`.
    ///
    /// The stored bearer token is attached when present. A `{success,
    /// message, data}` envelope is unwrapped here; bodies without `data` are
    /// decoded as `T` directly.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let token = self.session.token();
        self.execute(method, path, body, query, token.as_deref()).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let endpoint = endpoint_label(&method, path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        debug!(%method, path, params = query.len(), "Sending API request");
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = self.classify_transport_error(e);
                let elapsed = started.elapsed().as_secs_f64();
                metrics::record_request(&endpoint, failure_label(&err), elapsed);
                error!("API Error [{} {}]: {}", method, path, err);
                return Err(err);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = self.classify_transport_error(e);
                let elapsed = started.elapsed().as_secs_f64();
                metrics::record_request(&endpoint, failure_label(&err), elapsed);
                error!("API Error [{} {}] reading body: {}", method, path, err);
                return Err(err);
            }
        };
        metrics::record_request(&endpoint, status.as_str(), started.elapsed().as_secs_f64());

        if !status.is_success() {
            let message = error_message(status, &bytes);
            warn!("API Error [{} {}]: HTTP {} {}", method, path, status.as_u16(), message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                error!("API Error [{} {}]: body is not JSON: {}", method, path, e);
                ApiError::InvalidResponseShape(format!("body is not JSON: {}", e))
            })?
        };

        unwrap_envelope(status, value).map_err(|e| {
            error!("API Error [{} {}]: {}", method, path, e);
            e
        })
    }

    /// Like [`send`](Self::send), but refuses to touch the network without a
    /// stored token. A 401 clears the session unless a newer login has
    /// replaced the token this request carried.
    pub async fn send_protected<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let Some(token) = self.session.token() else {
            debug!(%method, path, "Skipping protected call without credentials");
            return Err(ApiError::Unauthenticated);
        };

        let result = self.execute(method, path, body, query, Some(&token)).await;
        if let Err(ApiError::Http { status: 401, .. }) = &result {
            if self.session.clear_if_token(&token) {
                warn!("Token rejected by {}, session cleared", path);
            }
        }
        result
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send_protected(Method::GET, path, None, query).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let body = body.map(to_json_body).transpose()?;
        self.send_protected(Method::POST, path, body, &[]).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_json_body(body)?;
        self.send_protected(Method::PUT, path, Some(body), &[]).await
    }

    fn classify_transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else if err.is_decode() {
            ApiError::InvalidResponseShape(err.to_string())
        } else {
            ApiError::NetworkUnavailable(err.to_string())
        }
    }
}

fn to_json_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::InvalidArgument(format!("request body: {}", e)))
}

fn failure_label(err: &ApiError) -> &'static str {
    match err {
        ApiError::Timeout(_) => "timeout",
        ApiError::InvalidResponseShape(_) => "invalid_body",
        _ => "network",
    }
}

/// Metric label for a request: numeric path segments collapse to `:id`.
fn endpoint_label(method: &Method, path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    let normalized: Vec<&str> = path
        .split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().any(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                segment
            }
        })
        .collect();
    format!("{} {}", method, normalized.join("/"))
}

/// Prefer the server's `message` field; fall back to the status reason.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let from_body = serde_json::from_slice::<Value>(body).ok().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    from_body
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

const PAGING_KEYS: [&str; 3] = ["pagination", "total", "totalCount"];

/// Validate the success envelope once and extract the payload.
fn unwrap_envelope<T: DeserializeOwned>(
    status: StatusCode,
    value: Value,
) -> Result<T, ApiError> {
    let payload = match value {
        Value::Object(mut map) => {
            if let Some(Value::Bool(false)) = map.get("success") {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Request was not successful")
                    .to_string();
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    message,
                });
            }
            match map.remove("data") {
                // List payloads keep their paging siblings.
                Some(Value::Array(items)) if PAGING_KEYS.iter().any(|k| map.contains_key(*k)) => {
                    let mut listing = serde_json::Map::new();
                    listing.insert("items".to_string(), Value::Array(items));
                    for key in PAGING_KEYS {
                        if let Some(value) = map.remove(key) {
                            listing.insert(key.to_string(), value);
                        }
                    }
                    Value::Object(listing)
                }
                Some(data) => data,
                None => Value::Object(map),
            }
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(ApiError::from)
}
