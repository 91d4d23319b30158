//! Liveness protocol: `GET http://{host}/healthz` answered with the literal
//! body `OK`.
//!
//! The server side is [`healthz`], mounted by `api::router`. The client side
//! is [`LivenessProbe`], which reduces every failure to `false`.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use tokio::task::JoinSet;
use tracing::{debug, info};

pub const HEALTHZ_PATH: &str = "/healthz";
pub const HEALTHZ_BODY: &str = "OK";

/// Liveness handler. Responds `200 OK` with body `OK` and no trailing newline.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Process is alive", body = String, content_type = "text/plain"),
    ),
    tag = "system"
)]
pub async fn healthz() -> &'static str {
    HEALTHZ_BODY
}

/// Outcome of probing a single host.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub host: String,
    pub alive: bool,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LivenessProbe {
    http: Client,
    timeout: Duration,
}

impl LivenessProbe {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    /// `timeout` bounds connect, request and body read together.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build liveness probe HTTP client")?;
        Ok(Self { http, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` iff `http://{host}/healthz` answers with exactly `OK`.
    ///
    /// Never fails: connection errors, read errors and unexpected bodies are
    /// logged and reported as `false`. The status code is not inspected.
    pub async fn is_alive(&self, host: &str) -> bool {
        let url = format!("http://{host}{HEALTHZ_PATH}");
        debug!(url = %url, "Probing liveness");

        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                info!(host = %host, error = %e, "Liveness probe connection failed");
                return false;
            }
        };

        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                info!(host = %host, error = %e, "Liveness probe failed to read body");
                return false;
            }
        };

        if body.as_ref() != HEALTHZ_BODY.as_bytes() {
            info!(
                host = %host,
                body = %String::from_utf8_lossy(&body),
                "Liveness probe body was not OK"
            );
            return false;
        }

        true
    }

    /// Probe every host concurrently. Results come back in input order.
    pub async fn probe_all(&self, hosts: &[String]) -> Vec<ProbeResult> {
        let mut set = JoinSet::new();
        for (idx, host) in hosts.iter().enumerate() {
            let probe = self.clone();
            let host = host.clone();
            set.spawn(async move {
                let alive = probe.is_alive(&host).await;
                (idx, ProbeResult { host, alive, checked_at: Utc::now() })
            });
        }

        let mut results: Vec<Option<ProbeResult>> = vec![None; hosts.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, result)) => results[idx] = Some(result),
                Err(e) => tracing::error!(error = %e, "Liveness probe task failed"),
            }
        }

        // A panicked task still yields a result for its host.
        results
            .into_iter()
            .zip(hosts)
            .map(|(result, host)| {
                result.unwrap_or_else(|| ProbeResult {
                    host: host.clone(),
                    alive: false,
                    checked_at: Utc::now(),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
