// ── Command dispatch ──
//
// All write operations flow through a unified `Command` enum. Values
// are validated locally first -- an unsupported value never reaches
// the network. Each accepted command issues exactly one connection-
// scoped remote call; the caller is responsible for requesting a
// coordinator refresh afterwards.

use std::ops::RangeInclusive;
use std::sync::Arc;

use amitherm_api::{ApiClient, HeatingMode, Season, VentilationMode};
use tracing::debug;

use crate::error::CoreError;

/// Accepted range for the supply-air temperature setpoint (°C).
pub const AIR_TEMP_SETPOINT_RANGE: RangeInclusive<f64> = 15.0..=25.0;
/// Accepted range for the CO2 setpoint (ppm).
pub const CO2_SETPOINT_RANGE: RangeInclusive<f64> = 0.0..=1500.0;
/// The PLC only accepts CO2 setpoints on this grid.
pub const CO2_SETPOINT_STEP: f64 = 100.0;

/// All write operations against the PLC.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Heating ──────────────────────────────────────────────────────
    SetHeatingMode(HeatingMode),
    /// Comfort temperature setpoint (°C).
    SetTemperature(f64),
    /// Frost-protection minimal setpoint (°C).
    SetMinimalTemperature(f64),
    SetSeason(Season),

    // ── Ventilation ──────────────────────────────────────────────────
    SetVentilation(VentilationMode),
    /// Supply-air temperature setpoint (°C).
    SetTargetAirTemperature(f64),
    /// CO2 setpoint (ppm) for automatic mode.
    SetTargetCo2(f64),
}

impl Command {
    /// Local validation, performed before any network call.
    pub fn validate(&self) -> Result<(), CoreError> {
        match *self {
            Self::SetTemperature(v) => require_finite("temperature", v),
            Self::SetMinimalTemperature(v) => require_finite("minimal_temperature", v),
            Self::SetTargetAirTemperature(v) => {
                require_in_range("target_air_temperature", v, &AIR_TEMP_SETPOINT_RANGE)
            }
            Self::SetTargetCo2(v) => {
                require_in_range("target_co2", v, &CO2_SETPOINT_RANGE)?;
                if v % CO2_SETPOINT_STEP != 0.0 {
                    return Err(CoreError::UnsupportedValue {
                        field: "target_co2",
                        reason: format!("{v} is not a multiple of {CO2_SETPOINT_STEP} ppm"),
                    });
                }
                Ok(())
            }
            Self::SetHeatingMode(_) | Self::SetSeason(_) | Self::SetVentilation(_) => Ok(()),
        }
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::UnsupportedValue {
            field,
            reason: format!("{value} is not a finite number"),
        })
    }
}

fn require_in_range(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), CoreError> {
    require_finite(field, value)?;
    if range.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::UnsupportedValue {
            field,
            reason: format!(
                "{value} is outside the accepted range {}..={}",
                range.start(),
                range.end()
            ),
        })
    }
}

/// Routes validated commands to the client facade.
///
/// Cheaply cloneable; every entity holds one.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<ApiClient>,
}

impl Dispatcher {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Validate and execute one command.
    pub async fn execute(&self, command: Command) -> Result<(), CoreError> {
        command.validate()?;
        debug!(?command, "dispatching command");

        match command {
            Command::SetHeatingMode(mode) => self.client.set_heating_mode(mode).await?,
            Command::SetTemperature(value) => self.client.set_temperature(value).await?,
            Command::SetMinimalTemperature(value) => {
                self.client.set_minimal_temperature(value).await?;
            }
            Command::SetSeason(season) => self.client.set_season(season).await?,
            Command::SetVentilation(mode) => self.client.set_ventilation(mode).await?,
            Command::SetTargetAirTemperature(value) => {
                self.client.set_target_air_temperature(value).await?;
            }
            Command::SetTargetCo2(value) => self.client.set_target_co2(value).await?,
        }
        Ok(())
    }
}
