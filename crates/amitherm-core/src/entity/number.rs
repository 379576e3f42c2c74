// ── Setpoint numbers ──
//
// Adjustable ventilation setpoints, description-table driven like the
// sensors. `set_value` validates locally, dispatches, and requests a
// confirming refresh; there is no optimistic overlay.

use std::ops::RangeInclusive;

use crate::command::{
    Command, AIR_TEMP_SETPOINT_RANGE, CO2_SETPOINT_RANGE, CO2_SETPOINT_STEP, Dispatcher,
};
use crate::device::DeviceKind;
use crate::error::CoreError;
use crate::source::{VentilationCoordinator, VentilationSnapshot};

/// Static description of one adjustable setpoint.
pub struct NumberDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub device: DeviceKind,
    pub range: RangeInclusive<f64>,
    pub step: f64,
    pub value_fn: fn(&VentilationSnapshot) -> f64,
    pub command_fn: fn(f64) -> Command,
}

pub const NUMBERS: &[NumberDescription] = &[
    NumberDescription {
        key: "target_air_temperature",
        name: "Target air temperature",
        unit: "°C",
        device: DeviceKind::Ventilation,
        range: AIR_TEMP_SETPOINT_RANGE,
        step: 0.5,
        value_fn: |data| data.ventilation.air_temp_setpoint,
        command_fn: Command::SetTargetAirTemperature,
    },
    NumberDescription {
        key: "target_co2",
        name: "Target CO2",
        unit: "ppm",
        device: DeviceKind::Ventilation,
        range: CO2_SETPOINT_RANGE,
        step: CO2_SETPOINT_STEP,
        value_fn: |data| data.ventilation.co2_setpoint,
        command_fn: Command::SetTargetCo2,
    },
];

pub struct Number {
    coordinator: VentilationCoordinator,
    dispatcher: Dispatcher,
    description: &'static NumberDescription,
}

impl Number {
    pub fn new(
        coordinator: VentilationCoordinator,
        dispatcher: Dispatcher,
        description: &'static NumberDescription,
    ) -> Self {
        Self {
            coordinator,
            dispatcher,
            description,
        }
    }

    pub fn description(&self) -> &'static NumberDescription {
        self.description
    }

    pub fn value(&self) -> Option<f64> {
        self.coordinator
            .snapshot()
            .data
            .as_deref()
            .map(self.description.value_fn)
    }

    pub fn available(&self) -> bool {
        self.coordinator.snapshot().available
    }

    /// Validate and apply a new setpoint. An out-of-range or off-grid
    /// value is rejected before any network call.
    pub async fn set_value(&self, value: f64) -> Result<(), CoreError> {
        self.dispatcher
            .execute((self.description.command_fn)(value))
            .await?;
        let _ = self.coordinator.request_refresh().await;
        Ok(())
    }
}
