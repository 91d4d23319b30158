use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::error::ThermostatError;

// ---------------------------------------------------------------------------
// Wire format: GET {base}/tstat
//
// Observed payload (only the mapped fields are listed):
//
//   { "temp": 71.50, "tmode": 1, "fmode": 0, "override": 0, "hold": 0, ... }
//
//   temp      number   current temperature
//   tmode     number   0 = off, 1 = heat, 2 = cool, 3 = auto
//   fmode     number   0 = auto, 1 = auto/circulate, 2 = on
//   override  integer  1 = target temperature overridden
//   hold      integer  1 = hold engaged
//
// Every field is optional; absent or null fields fall back to zero values.
// Unknown fields (time, tstate, t_heat, ...) are ignored. Keys are matched
// without regard to case, so `Temp`, `TMode` and `FMode` decode too.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct StatusWire {
    #[serde(default)]
    pub temp: Option<f64>,

    #[serde(default)]
    pub tmode: Option<f64>,

    #[serde(default)]
    pub fmode: Option<f64>,

    #[serde(default, rename = "override")]
    pub override_flag: Option<i64>,

    #[serde(default)]
    pub hold: Option<i64>,
}

// ---------------------------------------------------------------------------
// ThermostatMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThermostatMode {
    #[default]
    Off,
    Heat,
    Cool,
    Auto,
}

impl ThermostatMode {
    pub const ALL: [ThermostatMode; 4] = [Self::Off, Self::Heat, Self::Cool, Self::Auto];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
            Self::Auto => "AUTO",
        }
    }

    /// Numeric value the device uses for this mode.
    pub fn wire_value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<f64> for ThermostatMode {
    type Error = ThermostatError;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        match enum_index(v, Self::ALL.len()) {
            Some(i) => Ok(Self::ALL[i]),
            None => Err(ThermostatError::Format(format!(
                "invalid thermostat mode value: {v}"
            ))),
        }
    }
}

impl fmt::Display for ThermostatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FanMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FanMode {
    #[default]
    Auto,
    AutoCirculate,
    On,
}

impl FanMode {
    pub const ALL: [FanMode; 3] = [Self::Auto, Self::AutoCirculate, Self::On];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::AutoCirculate => "AUTO_CIRCULATE",
            Self::On => "ON",
        }
    }

    /// Numeric value the device uses for this fan mode.
    pub fn wire_value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<f64> for FanMode {
    type Error = ThermostatError;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        match enum_index(v, Self::ALL.len()) {
            Some(i) => Ok(Self::ALL[i]),
            None => Err(ThermostatError::Format(format!("invalid fan mode value: {v}"))),
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a JSON number onto an index in `0..len`. Fractional values are not
/// valid enum members.
fn enum_index(v: f64, len: usize) -> Option<usize> {
    if v.fract() != 0.0 || v < 0.0 || v >= len as f64 {
        return None;
    }
    Some(v as usize)
}

// ---------------------------------------------------------------------------
// ThermostatStatus
// ---------------------------------------------------------------------------

/// Decoded thermostat status. Built fresh for every successful request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThermostatStatus {
    pub temperature: f64,
    pub thermostat_mode: ThermostatMode,
    pub fan_mode: FanMode,
    pub override_active: bool,
    pub hold: bool,
}

impl TryFrom<StatusWire> for ThermostatStatus {
    type Error = ThermostatError;

    fn try_from(wire: StatusWire) -> Result<Self, Self::Error> {
        let thermostat_mode = wire
            .tmode
            .map(ThermostatMode::try_from)
            .transpose()?
            .unwrap_or_default();

        let fan_mode = wire
            .fmode
            .map(FanMode::try_from)
            .transpose()?
            .unwrap_or_default();

        // Only an exact 1 counts; negative and larger values are false.
        Ok(Self {
            temperature: wire.temp.unwrap_or_default(),
            thermostat_mode,
            fan_mode,
            override_active: wire.override_flag == Some(1),
            hold: wire.hold == Some(1),
        })
    }
}

/// Decode a raw `/tstat` response body.
///
/// Only the first JSON value in the body is read. Keys are case-folded before
/// decoding; when two keys fold together, the later one in the body wins.
pub fn parse_status(body: &[u8]) -> Result<ThermostatStatus, ThermostatError> {
    let object = serde_json::Deserializer::from_slice(body)
        .into_iter::<Map<String, Value>>()
        .next()
        .ok_or_else(|| ThermostatError::Format("empty status body".to_owned()))?
        .map_err(format_error)?;

    let folded: Map<String, Value> = object
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect();

    let wire =
        serde_json::from_value::<StatusWire>(Value::Object(folded)).map_err(format_error)?;
    ThermostatStatus::try_from(wire)
}

fn format_error(e: serde_json::Error) -> ThermostatError {
    ThermostatError::Format(e.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
