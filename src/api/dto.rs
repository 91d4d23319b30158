use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    healthz::ProbeResult,
    thermostat::{FanMode, ThermostatMode, ThermostatStatus},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ThermostatStatusDto {
    /// Current temperature as reported by the device.
    pub temperature: f64,
    pub thermostat_mode: ThermostatMode,
    pub fan_mode: FanMode,
    /// `true` when the target temperature is temporarily overridden.
    #[serde(rename = "override")]
    pub override_active: bool,
    pub hold: bool,
}

impl From<ThermostatStatus> for ThermostatStatusDto {
    fn from(s: ThermostatStatus) -> Self {
        Self {
            temperature: s.temperature,
            thermostat_mode: s.thermostat_mode,
            fan_mode: s.fan_mode,
            override_active: s.override_active,
            hold: s.hold,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeResultDto {
    /// Probed `host[:port]`.
    pub host: String,
    pub alive: bool,
    pub checked_at: DateTime<Utc>,
}

impl From<ProbeResult> for ProbeResultDto {
    fn from(r: ProbeResult) -> Self {
        Self {
            host: r.host,
            alive: r.alive,
            checked_at: r.checked_at,
        }
    }
}
