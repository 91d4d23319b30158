//! In-process HTTP servers for exercising the clients against real sockets,
//! plus an in-memory thermostat for the layers above the client.

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;

use crate::thermostat::{StatusSource, ThermostatError, ThermostatStatus};

/// Serve `router` on an ephemeral localhost port for the rest of the test.
pub(crate) async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Serve a single `GET path` route that always answers `status` with `body`.
pub(crate) async fn fixed_response(
    path: &'static str,
    status: StatusCode,
    body: &'static str,
) -> SocketAddr {
    serve(Router::new().route(path, get(move || async move { (status, body) }))).await
}

/// A localhost address with nothing listening on it.
pub(crate) async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Canned thermostat answers. Errors are rebuilt on every call since
/// `ThermostatError` is not `Clone`.
#[derive(Debug, Clone)]
pub(crate) enum FakeThermostat {
    Status(ThermostatStatus),
    Api(u16),
    Format(&'static str),
}

impl FakeThermostat {
    pub(crate) fn shared(self) -> Option<Arc<dyn StatusSource>> {
        Some(Arc::new(self))
    }
}

#[async_trait]
impl StatusSource for FakeThermostat {
    async fn get_status(&self) -> Result<ThermostatStatus, ThermostatError> {
        match self {
            Self::Status(status) => Ok(*status),
            Self::Api(status) => Err(ThermostatError::Api { status: *status }),
            Self::Format(msg) => Err(ThermostatError::Format((*msg).to_owned())),
        }
    }
}
