// ── Wire models for the PLC web service ──
//
// Explicit tagged records per polled data group. The PLC reports a
// zero reading for sensors that are not installed; those fields are
// optional here and the entity layer decides what "absent" means.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Heating season selected on the PLC. Drives which circuits run and
/// whether the ventilation unit pre-heats intake air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Season {
    Winter,
    Summer,
}

/// Heating regime of the PLC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HeatingMode {
    /// Frost-protection floor; the building idles at the minimal setpoint.
    Minimal,
    /// Hold the comfort setpoint.
    Comfort,
    /// Follow the weekly schedule programmed on the PLC.
    Scheduled,
}

/// Ventilation unit mode. `Auto` lets the PLC pick a speed from the
/// CO2 reading; the other variants force a fixed speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VentilationMode {
    Off,
    Low,
    Medium,
    High,
    Auto,
}

impl VentilationMode {
    /// The fixed speed this mode forces, or `None` for `Auto`.
    pub fn as_speed(self) -> Option<FanSpeed> {
        match self {
            Self::Off => Some(FanSpeed::Off),
            Self::Low => Some(FanSpeed::Low),
            Self::Medium => Some(FanSpeed::Medium),
            Self::High => Some(FanSpeed::High),
            Self::Auto => None,
        }
    }
}

/// Actual fan speed. Unlike [`VentilationMode`] this is never `Auto`:
/// in automatic mode the PLC still reports the speed it settled on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FanSpeed {
    Off,
    Low,
    Medium,
    High,
}

impl From<FanSpeed> for VentilationMode {
    fn from(speed: FanSpeed) -> Self {
        match speed {
            FanSpeed::Off => Self::Off,
            FanSpeed::Low => Self::Low,
            FanSpeed::Medium => Self::Medium,
            FanSpeed::High => Self::High,
        }
    }
}

/// Snapshot of the building overview page: ambient sensors plus the
/// active season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewResult {
    /// Reference room temperature (°C). `None`/zero if no sensor.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Supply-air temperature at the ventilation unit (°C).
    #[serde(default)]
    pub air_temperature: Option<f64>,
    /// CO2 concentration (ppm).
    #[serde(default)]
    pub co2: Option<f64>,
    pub season: Season,
}

/// Snapshot of the heating circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingResult {
    #[serde(rename = "mode")]
    pub heating_mode: HeatingMode,
    pub actual_temperature: f64,
    pub set_temperature: f64,
}

/// Snapshot of the ventilation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentilationResult {
    #[serde(rename = "mode")]
    pub ventilation_mode: VentilationMode,
    #[serde(rename = "speed")]
    pub ventilation_speed: FanSpeed,
    pub air_temp_current: f64,
    pub air_temp_setpoint: f64,
    pub co2_setpoint: f64,
    /// Whether the unit is currently heating the intake air.
    #[serde(rename = "heating")]
    pub is_heating: bool,
}
