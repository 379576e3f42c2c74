// ── Climate entities ──
//
// Two thermostats over two coordinators. Neither carries an optimistic
// overlay: climate state always mirrors the last completed refresh, and
// commands simply request a fresh poll afterwards.

use std::sync::{Arc, RwLock};

use amitherm_api::{HeatingResult, VentilationMode};

use crate::command::{Command, Dispatcher};
use crate::convert::{
    heating_to_hvac_mode, hvac_mode_to_season, hvac_to_heating_mode, season_to_hvac_mode, HvacMode,
};
use crate::coordinator::{Snapshot, SubscriptionHandle};
use crate::error::CoreError;
use crate::source::{
    HeatingCoordinator, VentilationCoordinator, VentilationSnapshot,
};

// ── Heating circuit ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HeatingClimateState {
    pub hvac_mode: HvacMode,
    pub current_temperature: f64,
    pub target_temperature: f64,
    pub available: bool,
}

impl HeatingClimateState {
    fn unknown() -> Self {
        Self {
            hvac_mode: HvacMode::Off,
            current_temperature: 0.0,
            target_temperature: 0.0,
            available: false,
        }
    }
}

struct HeatingInner {
    state: RwLock<HeatingClimateState>,
}

impl HeatingInner {
    fn apply_snapshot(&self, snapshot: &Snapshot<HeatingResult>) {
        let mut state = self.state.write().expect("climate state lock poisoned");
        if !snapshot.available {
            state.available = false;
            return;
        }
        let Some(data) = snapshot.data.as_deref() else {
            state.available = false;
            return;
        };
        *state = HeatingClimateState {
            hvac_mode: heating_to_hvac_mode(data.heating_mode),
            current_temperature: data.actual_temperature,
            target_temperature: data.set_temperature,
            available: true,
        };
    }
}

/// Thermostat for the heating circuit.
pub struct HeatingClimate {
    inner: Arc<HeatingInner>,
    coordinator: HeatingCoordinator,
    dispatcher: Dispatcher,
    subscription: SubscriptionHandle,
}

impl HeatingClimate {
    pub fn new(coordinator: HeatingCoordinator, dispatcher: Dispatcher) -> Self {
        let inner = Arc::new(HeatingInner {
            state: RwLock::new(HeatingClimateState::unknown()),
        });
        inner.apply_snapshot(&coordinator.snapshot());
        let subscription = {
            let inner = Arc::clone(&inner);
            coordinator.register(move |snapshot| inner.apply_snapshot(snapshot))
        };
        Self {
            inner,
            coordinator,
            dispatcher,
            subscription,
        }
    }

    pub fn state(&self) -> HeatingClimateState {
        self.inner
            .state
            .read()
            .expect("climate state lock poisoned")
            .clone()
    }

    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), CoreError> {
        self.dispatcher
            .execute(Command::SetHeatingMode(hvac_to_heating_mode(mode)))
            .await?;
        let _ = self.coordinator.request_refresh().await;
        Ok(())
    }

    /// Set the temperature for the active mode: the frost-protection
    /// minimal setpoint while off, the comfort setpoint otherwise.
    pub async fn set_temperature(&self, value: f64) -> Result<(), CoreError> {
        let command = if self.state().hvac_mode == HvacMode::Off {
            Command::SetMinimalTemperature(value)
        } else {
            Command::SetTemperature(value)
        };
        self.dispatcher.execute(command).await?;
        let _ = self.coordinator.request_refresh().await;
        Ok(())
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.set_hvac_mode(HvacMode::Heat).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.set_hvac_mode(HvacMode::Off).await
    }
}

impl Drop for HeatingClimate {
    fn drop(&mut self) {
        self.coordinator.unregister(&self.subscription);
    }
}

// ── Ventilation unit ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct VentilationClimateState {
    /// Heat iff the plant is in its winter season.
    pub hvac_mode: HvacMode,
    pub fan_mode: VentilationMode,
    pub current_temperature: f64,
    pub target_temperature: f64,
    /// Whether the unit is actively heating intake air right now.
    pub is_heating: bool,
    pub available: bool,
}

impl VentilationClimateState {
    fn unknown() -> Self {
        Self {
            hvac_mode: HvacMode::Off,
            fan_mode: VentilationMode::Off,
            current_temperature: 0.0,
            target_temperature: 0.0,
            is_heating: false,
            available: false,
        }
    }
}

struct VentilationInner {
    state: RwLock<VentilationClimateState>,
}

impl VentilationInner {
    fn apply_snapshot(&self, snapshot: &Snapshot<VentilationSnapshot>) {
        let mut state = self.state.write().expect("climate state lock poisoned");
        if !snapshot.available {
            state.available = false;
            return;
        }
        let Some(data) = snapshot.data.as_deref() else {
            state.available = false;
            return;
        };
        *state = VentilationClimateState {
            hvac_mode: season_to_hvac_mode(data.overview.season),
            fan_mode: data.ventilation.ventilation_mode,
            current_temperature: data.ventilation.air_temp_current,
            target_temperature: data.ventilation.air_temp_setpoint,
            is_heating: data.ventilation.is_heating,
            available: true,
        };
    }
}

/// Thermostat for the air handling unit. The mode is season-driven:
/// switching to Heat selects the winter season on the PLC.
pub struct VentilationClimate {
    inner: Arc<VentilationInner>,
    coordinator: VentilationCoordinator,
    dispatcher: Dispatcher,
    subscription: SubscriptionHandle,
}

impl VentilationClimate {
    pub fn new(coordinator: VentilationCoordinator, dispatcher: Dispatcher) -> Self {
        let inner = Arc::new(VentilationInner {
            state: RwLock::new(VentilationClimateState::unknown()),
        });
        inner.apply_snapshot(&coordinator.snapshot());
        let subscription = {
            let inner = Arc::clone(&inner);
            coordinator.register(move |snapshot| inner.apply_snapshot(snapshot))
        };
        Self {
            inner,
            coordinator,
            dispatcher,
            subscription,
        }
    }

    pub fn state(&self) -> VentilationClimateState {
        self.inner
            .state
            .read()
            .expect("climate state lock poisoned")
            .clone()
    }

    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), CoreError> {
        self.dispatcher
            .execute(Command::SetSeason(hvac_mode_to_season(mode)))
            .await?;
        let _ = self.coordinator.request_refresh().await;
        Ok(())
    }

    pub async fn set_fan_mode(&self, mode: VentilationMode) -> Result<(), CoreError> {
        self.dispatcher.execute(Command::SetVentilation(mode)).await?;
        let _ = self.coordinator.request_refresh().await;
        Ok(())
    }

    pub async fn set_temperature(&self, value: f64) -> Result<(), CoreError> {
        self.dispatcher
            .execute(Command::SetTargetAirTemperature(value))
            .await?;
        let _ = self.coordinator.request_refresh().await;
        Ok(())
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.set_hvac_mode(HvacMode::Heat).await
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.set_hvac_mode(HvacMode::Off).await
    }
}

impl Drop for VentilationClimate {
    fn drop(&mut self) {
        self.coordinator.unregister(&self.subscription);
    }
}
