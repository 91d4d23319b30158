pub mod dto;
pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    healthz::{self, LivenessProbe},
    thermostat::StatusSource,
};

use handlers::ApiDoc;

/// Shared handler state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub thermostat: Option<Arc<dyn StatusSource>>,
    pub probe: LivenessProbe,
    pub probe_hosts: Arc<[String]>,
}

impl AppState {
    pub fn new(
        thermostat: Option<Arc<dyn StatusSource>>,
        probe: LivenessProbe,
        probe_hosts: Vec<String>,
    ) -> Self {
        Self {
            thermostat,
            probe,
            probe_hosts: probe_hosts.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/thermostat/status", get(handlers::get_thermostat_status))
        .route("/probes", get(handlers::get_probes))
        .with_state(state)
        .split_for_parts();

    router
        .route(healthz::HEALTHZ_PATH, get(healthz::healthz))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
