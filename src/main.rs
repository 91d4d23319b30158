use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use home_status_service::{
    api::{self, AppState},
    config::Config,
    healthz::LivenessProbe,
    monitor::MonitorService,
    thermostat::{StatusSource, ThermostatClient},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; variables may also come from the environment
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let thermostat = config
        .thermostat_url
        .as_deref()
        .map(|url| ThermostatClient::new(url, config.thermostat_timeout()))
        .transpose()?;
    match &thermostat {
        Some(t) => info!(base_url = %t.base_url(), "Thermostat client configured"),
        None => info!("THERMOSTAT_URL not set; thermostat endpoints disabled"),
    }
    let thermostat = thermostat.map(|t| Arc::new(t) as Arc<dyn StatusSource>);

    let probe = LivenessProbe::new(config.probe_timeout())?;

    // Background monitor; skipped when there is nothing to watch
    let monitor = MonitorService::new(
        probe.clone(),
        config.probe_hosts.clone(),
        thermostat.clone(),
        config.monitor_interval_secs,
    );
    if monitor.has_targets() {
        tokio::spawn(monitor.run());
    }

    // Start HTTP server
    let state = AppState::new(thermostat, probe, config.probe_hosts.clone());
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
