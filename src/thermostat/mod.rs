pub mod error;
pub mod models;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, error};

pub use self::{
    error::ThermostatError,
    models::{parse_status, FanMode, ThermostatMode, ThermostatStatus},
};

/// Anything that can report the current thermostat status.
///
/// The API and the monitor hold an `Arc<dyn StatusSource>` so they can be
/// driven by an in-memory source in tests.
#[async_trait]
pub trait StatusSource: Send + Sync + std::fmt::Debug {
    async fn get_status(&self) -> Result<ThermostatStatus, ThermostatError>;
}

/// HTTP client for a Radio Thermostat style device exposing `GET /tstat`.
#[derive(Debug, Clone)]
pub struct ThermostatClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    base_url: String,
}

impl ThermostatClient {
    pub const STATUS_PATH: &'static str = "/tstat";

    /// Build a client for `base_url` (e.g. `http://thermostat.lan`).
    ///
    /// `timeout` bounds the whole request including the body read; `None`
    /// leaves the request unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("invalid thermostat base URL: {base_url:?}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("thermostat base URL must be http or https, got: {base_url:?}");
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build thermostat HTTP client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: base_url.trim_end_matches('/').to_owned(),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Fetch and decode the current device status.
    pub async fn get_status(&self) -> Result<ThermostatStatus, ThermostatError> {
        let url = format!("{}{}", self.inner.base_url, Self::STATUS_PATH);
        debug!(url = %url, "Fetching thermostat status");

        let resp = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .map_err(ThermostatError::Connection)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(ThermostatError::Connection)?;

        if status.as_u16() >= 400 {
            error!(
                url = %url,
                status = %status,
                headers = ?headers,
                body = %String::from_utf8_lossy(&bytes),
                "Thermostat API error"
            );
            return Err(ThermostatError::Api {
                status: status.as_u16(),
            });
        }

        parse_status(&bytes)
    }
}

#[async_trait]
impl StatusSource for ThermostatClient {
    async fn get_status(&self) -> Result<ThermostatStatus, ThermostatError> {
        ThermostatClient::get_status(self).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
