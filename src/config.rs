use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Thermostat base URL, e.g. `http://thermostat.lan`. `None` disables
    /// the thermostat endpoints and polling.
    pub thermostat_url: Option<String>,
    /// Request timeout for the thermostat client, in seconds.
    pub thermostat_timeout_secs: u64,
    /// Hosts polled by the liveness monitor.
    /// Format: `"host1:port,host2"` (no scheme).
    pub probe_hosts: Vec<String>,
    /// Liveness probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Monitor loop interval in seconds.
    pub monitor_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            thermostat_url: maybe("THERMOSTAT_URL"),
            thermostat_timeout_secs: parse_non_negative(
                "THERMOSTAT_TIMEOUT_SECS",
                &optional("THERMOSTAT_TIMEOUT_SECS", "10"),
            )?,
            probe_hosts: parse_hosts(&optional("PROBE_HOSTS", "")),
            probe_timeout_ms: parse_positive(
                "PROBE_TIMEOUT_MS",
                &optional("PROBE_TIMEOUT_MS", "1000"),
            )?,
            monitor_interval_secs: parse_positive(
                "MONITOR_INTERVAL_SECS",
                &optional("MONITOR_INTERVAL_SECS", "60"),
            )?,
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// `0` means no timeout.
    pub fn thermostat_timeout(&self) -> Option<Duration> {
        (self.thermostat_timeout_secs > 0)
            .then(|| Duration::from_secs(self.thermostat_timeout_secs))
    }
}

/// Parse `"host1,host2:8080"` into a list of hosts, skipping blank entries.
fn parse_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Accepts `0`, which callers treat as "disabled".
fn parse_non_negative(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{key} must be a non-negative integer, got: {raw:?}"))
}

/// Zero would mean an instantly expiring timeout or a busy monitor loop.
fn parse_positive(key: &str, raw: &str) -> Result<u64> {
    let v: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a positive integer, got: {raw:?}"))?;
    if v == 0 {
        anyhow::bail!("{key} must be a positive integer, got: 0");
    }
    Ok(v)
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn maybe(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
