use thiserror::Error;

/// Failures surfaced by [`ThermostatClient`](super::ThermostatClient).
#[derive(Debug, Error)]
pub enum ThermostatError {
    /// Transport failure: DNS, refused, reset, timeout, or a truncated body.
    #[error("thermostat connection failed: {0}")]
    Connection(#[source] reqwest::Error),

    /// The device answered with an HTTP status of 400 or above.
    #[error("thermostat API returned status {status}")]
    Api { status: u16 },

    /// The body was not valid JSON, or an enumerated field was out of range.
    #[error("invalid thermostat status payload: {0}")]
    Format(String),
}

impl ThermostatError {
    /// Short machine-readable name, used in logs and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Api { .. } => "api",
            Self::Format(_) => "format",
        }
    }
}
