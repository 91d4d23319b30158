use axum::{extract::State, Json};
use tracing::warn;
use utoipa::OpenApi;

use super::{
    dto::{ProbeResultDto, ThermostatStatusDto},
    errors::AppError,
    AppState,
};
use crate::thermostat::{FanMode, ThermostatMode};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Fetch and decode the current thermostat status.
#[utoipa::path(
    get,
    path = "/thermostat/status",
    responses(
        (status = 200, description = "Decoded thermostat status", body = ThermostatStatusDto),
        (status = 502, description = "Thermostat unreachable, returned an error status, or sent an invalid payload"),
        (status = 503, description = "No thermostat configured"),
    ),
    tag = "thermostat"
)]
pub async fn get_thermostat_status(
    State(state): State<AppState>,
) -> Result<Json<ThermostatStatusDto>, AppError> {
    let client = state
        .thermostat
        .as_ref()
        .ok_or_else(AppError::thermostat_not_configured)?;

    let status = client.get_status().await.map_err(|e| {
        warn!(kind = e.kind(), error = %e, "Thermostat status request failed");
        AppError::from(e)
    })?;

    Ok(Json(status.into()))
}

/// Probe every configured host's `/healthz` endpoint concurrently.
#[utoipa::path(
    get,
    path = "/probes",
    responses(
        (status = 200, description = "One result per configured host, in configuration order", body = Vec<ProbeResultDto>),
    ),
    tag = "system"
)]
pub async fn get_probes(State(state): State<AppState>) -> Json<Vec<ProbeResultDto>> {
    let results = state.probe.probe_all(&state.probe_hosts).await;
    Json(results.into_iter().map(Into::into).collect())
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(get_thermostat_status, get_probes, crate::healthz::healthz),
    components(schemas(ThermostatStatusDto, ProbeResultDto, ThermostatMode, FanMode)),
    tags(
        (name = "thermostat", description = "Thermostat status endpoints"),
        (name = "system",     description = "Liveness endpoints"),
    ),
    info(
        title = "Home Status Service API",
        version = "0.1.0",
        description = "Thermostat status and liveness probing"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::{
        api::{router, AppState},
        healthz::{LivenessProbe, HEALTHZ_PATH},
        test_support::{fixed_response, unused_addr, FakeThermostat},
        thermostat::{FanMode, ThermostatClient, ThermostatMode, ThermostatStatus},
    };

    fn probe() -> LivenessProbe {
        LivenessProbe::new(LivenessProbe::DEFAULT_TIMEOUT).unwrap()
    }

    fn test_server(state: AppState) -> TestServer {
        TestServer::new(router(state)).unwrap()
    }

    fn bare_state() -> AppState {
        AppState::new(None, probe(), vec![])
    }

    fn state_with(thermostat: FakeThermostat) -> AppState {
        AppState::new(thermostat.shared(), probe(), vec![])
    }

    // -----------------------------------------------------------------------
    // GET /healthz
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn healthz_returns_literal_ok() {
        let server = test_server(bare_state());
        let resp = server.get("/healthz").await;
        resp.assert_status_ok();
        assert_eq!(resp.text(), "OK");
    }

    // -----------------------------------------------------------------------
    // GET /thermostat/status
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn thermostat_status_unconfigured_is_503() {
        let server = test_server(bare_state());
        let resp = server.get("/thermostat/status").await;
        resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = resp.json();
        assert!(body["error"].as_str().unwrap().contains("THERMOSTAT_URL"));
    }

    #[tokio::test]
    async fn thermostat_status_returns_decoded_fields() {
        let server = test_server(state_with(FakeThermostat::Status(ThermostatStatus {
            temperature: 71.5,
            thermostat_mode: ThermostatMode::Cool,
            fan_mode: FanMode::AutoCirculate,
            override_active: true,
            hold: false,
        })));

        let resp = server.get("/thermostat/status").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["temperature"], 71.5);
        assert_eq!(body["thermostat_mode"], "COOL");
        assert_eq!(body["fan_mode"], "AUTO_CIRCULATE");
        assert_eq!(body["override"], true);
        assert_eq!(body["hold"], false);
    }

    #[tokio::test]
    async fn thermostat_status_upstream_error_is_502() {
        let server = test_server(state_with(FakeThermostat::Api(503)));

        let resp = server.get("/thermostat/status").await;
        resp.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = resp.json();
        assert!(body["error"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn thermostat_status_invalid_payload_is_502() {
        let server = test_server(state_with(FakeThermostat::Format("invalid fan mode value: 9")));

        let resp = server.get("/thermostat/status").await;
        resp.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = resp.json();
        assert!(body["error"].as_str().unwrap().contains("fan mode"));
    }

    #[tokio::test]
    async fn thermostat_status_through_http_client() {
        let addr = fixed_response(
            ThermostatClient::STATUS_PATH,
            StatusCode::OK,
            r#"{"Temp":66.0,"TMode":1}"#,
        )
        .await;
        let client =
            ThermostatClient::new(&format!("http://{addr}"), Some(Duration::from_secs(5))).unwrap();
        let server = test_server(AppState::new(Some(Arc::new(client)), probe(), vec![]));

        let resp = server.get("/thermostat/status").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["temperature"], 66.0);
        assert_eq!(body["thermostat_mode"], "HEAT");
    }

    // -----------------------------------------------------------------------
    // GET /probes
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn probes_empty_when_no_hosts() {
        let server = test_server(bare_state());
        let resp = server.get("/probes").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn probes_report_each_host_in_order() {
        let up = fixed_response(HEALTHZ_PATH, StatusCode::OK, "OK").await;
        let down = unused_addr().await;
        let hosts = vec![up.to_string(), down.to_string()];
        let server = test_server(AppState::new(None, probe(), hosts.clone()));

        let resp = server.get("/probes").await;
        resp.assert_status_ok();
        let body: Vec<Value> = resp.json();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0]["host"], hosts[0].as_str());
        assert_eq!(body[0]["alive"], true);
        assert_eq!(body[1]["host"], hosts[1].as_str());
        assert_eq!(body[1]["alive"], false);
        assert!(body[0]["checked_at"].is_string());
    }

    // -----------------------------------------------------------------------
    // GET /api-docs/openapi.json
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn openapi_spec_is_served() {
        let server = test_server(bare_state());
        let resp = server.get("/api-docs/openapi.json").await;
        resp.assert_status_ok();
        let body: Value = resp.json();
        assert_eq!(body["info"]["title"], "Home Status Service API");
        assert!(body["paths"]["/thermostat/status"].is_object());
        assert!(body["paths"]["/healthz"].is_object());
    }
}
