//! Private HTTP client for KEF speaker communication
//!
//! This crate provides a minimal client for the JSON API exposed by KEF
//! wireless speakers (LS50 Wireless II, LSX II, LS60). The speaker serves
//! two endpoints on port 80:
//!
//! - `GET /api/getData?path=<path>&roles=value` reads a value
//! - `GET /api/setData?path=<path>&roles=<role>&value=<json>` writes a value
//!   or activates a control
//!
//! Every request is bounded by an explicit connect and request deadline so
//! that callers never wait on an unresponsive speaker indefinitely.

mod error;

pub use error::ClientError;

use std::net::Ipv6Addr;
use std::time::Duration;

use serde_json::Value;
use tracing::trace;

/// Default HTTP port of the speaker API
pub const DEFAULT_PORT: u16 = 80;

/// Connection and timeout settings for [`KefClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// TCP port of the speaker API
    /// Default: 80
    pub port: u16,

    /// Deadline for establishing the TCP connection
    /// Default: 5 seconds
    pub connect_timeout: Duration,

    /// Deadline for the whole request, connection included
    /// Default: 10 seconds
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Set the request deadline
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect deadline
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the TCP port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// A minimal JSON client bound to a single speaker
#[derive(Debug, Clone)]
pub struct KefClient {
    http: reqwest::Client,
    base_url: String,
}

impl KefClient {
    /// Create a client for `host` with the default configuration
    pub fn new(host: &str) -> Result<Self, ClientError> {
        Self::with_config(host, &ClientConfig::default())
    }

    /// Create a client for `host` with a custom configuration
    pub fn with_config(host: &str, config: &ClientConfig) -> Result<Self, ClientError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ClientError::Network("empty host".to_string()));
        }
        Self::with_base_url(&base_url_for(host, config.port), config)
    }

    /// Create a client against an explicit base URL such as `http://127.0.0.1:8080`
    pub fn with_base_url(base_url: &str, config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read the value stored at `path`
    ///
    /// The speaker answers with a JSON array holding a single typed value
    /// object; that object is returned.
    pub async fn get_data(&self, path: &str) -> Result<Value, ClientError> {
        let url = format!("{}/api/getData", self.base_url);
        trace!(path, "getData");

        let response = self
            .http
            .get(&url)
            .query(&[("path", path), ("roles", "value")])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        extract_value(body)
    }

    /// Write `value` to `path` using the given role
    ///
    /// Plain settings use the `value` role; player controls use `activate`.
    pub async fn set_data(&self, path: &str, role: &str, value: &Value) -> Result<(), ClientError> {
        let url = format!("{}/api/setData", self.base_url);
        let encoded =
            serde_json::to_string(value).map_err(|e| ClientError::Parse(e.to_string()))?;
        trace!(path, role, value = %encoded, "setData");

        self.http
            .get(&url)
            .query(&[("path", path), ("roles", role), ("value", encoded.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// `http://host:port`, bracketing IPv6 literals
fn base_url_for(host: &str, port: u16) -> String {
    match host.parse::<Ipv6Addr>() {
        Ok(addr) => format!("http://[{}]:{}", addr, port),
        Err(_) => format!("http://{}:{}", host, port),
    }
}

fn extract_value(body: Value) -> Result<Value, ClientError> {
    match body {
        Value::Array(mut items) => {
            if items.is_empty() {
                Err(ClientError::Parse("Empty value array".to_string()))
            } else {
                Ok(items.swap_remove(0))
            }
        }
        Value::Object(_) => Ok(body),
        other => Err(ClientError::Parse(format!(
            "Expected array or object, got {}",
            other
        ))),
    }
}
