use std::{sync::Arc, time::Duration};

use tokio::time;
use tracing::{error, info, warn};

use crate::{
    healthz::{LivenessProbe, ProbeResult},
    thermostat::StatusSource,
};

/// Periodically probes the configured hosts and polls the thermostat,
/// logging what it sees. Holds no state between iterations.
pub struct MonitorService {
    probe: LivenessProbe,
    hosts: Vec<String>,
    thermostat: Option<Arc<dyn StatusSource>>,
    interval: Duration,
}

impl MonitorService {
    pub fn new(
        probe: LivenessProbe,
        hosts: Vec<String>,
        thermostat: Option<Arc<dyn StatusSource>>,
        interval_secs: u64,
    ) -> Self {
        Self {
            probe,
            hosts,
            thermostat,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Whether there is anything for the loop to do.
    pub fn has_targets(&self) -> bool {
        !self.hosts.is_empty() || self.thermostat.is_some()
    }

    /// Runs the monitor loop indefinitely.
    /// Spawn this via `tokio::spawn`.
    pub async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            hosts = self.hosts.len(),
            thermostat = self.thermostat.is_some(),
            "Monitor loop started"
        );
        let mut ticker = time::interval(self.interval);

        loop {
            ticker.tick().await;
            let summary = self.run_once().await;
            info!(
                alive = summary.alive,
                down = summary.down,
                thermostat_ok = ?summary.thermostat_ok,
                "Monitor iteration complete"
            );
        }
    }

    async fn run_once(&self) -> IterationSummary {
        let results = self.probe.probe_all(&self.hosts).await;
        let mut summary = IterationSummary::from_probes(&results);

        for r in &results {
            if r.alive {
                info!(host = %r.host, "Host is alive");
            } else {
                warn!(
                    host = %r.host,
                    timeout_ms = self.probe.timeout().as_millis() as u64,
                    "Host is not alive"
                );
            }
        }

        if let Some(thermostat) = &self.thermostat {
            match thermostat.get_status().await {
                Ok(s) => {
                    info!(
                        temperature = s.temperature,
                        thermostat_mode = %s.thermostat_mode,
                        fan_mode = %s.fan_mode,
                        override_active = s.override_active,
                        hold = s.hold,
                        "Thermostat status"
                    );
                    summary.thermostat_ok = Some(true);
                }
                Err(e) => {
                    error!(kind = e.kind(), error = %e, "Thermostat poll failed");
                    summary.thermostat_ok = Some(false);
                }
            }
        }

        summary
    }
}

#[derive(Debug, Default, PartialEq)]
struct IterationSummary {
    alive: usize,
    down: usize,
    /// `None` when no thermostat is configured.
    thermostat_ok: Option<bool>,
}

impl IterationSummary {
    fn from_probes(results: &[ProbeResult]) -> Self {
        let alive = results.iter().filter(|r| r.alive).count();
        Self {
            alive,
            down: results.len() - alive,
            thermostat_ok: None,
        }
    }
}
