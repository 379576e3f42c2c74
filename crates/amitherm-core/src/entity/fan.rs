// ── Ventilation fan ──
//
// Presents the ventilation unit as a speed-controlled fan. The PLC
// confirms commands only through the next poll, so every accepted
// command overlays the presented state optimistically and marks it
// `assumed`. The overlay is cleared only when a successful refresh
// delivers authoritative data; a failed refresh flips `available` off
// and leaves the overlay in place. There is no rollback path: the next
// good poll wins, whatever it says.

use std::sync::{Arc, RwLock};

use amitherm_api::{FanSpeed, VentilationMode};
use strum::{Display, EnumString};
use tracing::debug;

use crate::command::{Command, Dispatcher};
use crate::convert::{percentage_to_speed, speed_to_percentage};
use crate::coordinator::{Snapshot, SubscriptionHandle};
use crate::error::CoreError;
use crate::source::{VentilationCoordinator, VentilationSnapshot};

/// Presets beyond the plain speed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FanPreset {
    /// CO2-driven automatic speed control.
    Auto,
}

/// Presented fan state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanState {
    pub is_on: bool,
    pub speed: FanSpeed,
    pub percentage: u8,
    pub preset: Option<FanPreset>,
    pub available: bool,
    /// `true` while the state reflects an unconfirmed command rather
    /// than a device reading.
    pub assumed: bool,
}

impl FanState {
    fn unknown() -> Self {
        Self {
            is_on: false,
            speed: FanSpeed::Off,
            percentage: 0,
            preset: None,
            available: false,
            assumed: false,
        }
    }
}

struct FanInner {
    state: RwLock<FanState>,
}

impl FanInner {
    /// Authoritative data replaces everything, including any overlay.
    fn apply_snapshot(&self, snapshot: &Snapshot<VentilationSnapshot>) {
        let mut state = self.state.write().expect("fan state lock poisoned");
        if !snapshot.available {
            state.available = false;
            return;
        }
        let Some(data) = snapshot.data.as_deref() else {
            state.available = false;
            return;
        };
        let speed = data.ventilation.ventilation_speed;
        // A mode that forces no fixed speed is the automation preset.
        let preset = match data.ventilation.ventilation_mode.as_speed() {
            Some(_) => None,
            None => Some(FanPreset::Auto),
        };
        *state = FanState {
            is_on: preset.is_some() || speed != FanSpeed::Off,
            speed,
            percentage: speed_to_percentage(speed),
            preset,
            available: true,
            assumed: false,
        };
    }
}

/// The ventilation unit as a fan entity.
pub struct VentilationFan {
    inner: Arc<FanInner>,
    coordinator: VentilationCoordinator,
    dispatcher: Dispatcher,
    subscription: SubscriptionHandle,
}

impl VentilationFan {
    pub fn new(coordinator: VentilationCoordinator, dispatcher: Dispatcher) -> Self {
        let inner = Arc::new(FanInner {
            state: RwLock::new(FanState::unknown()),
        });
        // Seed from whatever the coordinator already holds, then track
        // every completed refresh.
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

    pub fn state(&self) -> FanState {
        self.inner
            .state
            .read()
            .expect("fan state lock poisoned")
            .clone()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the speed by percentage; 0 turns the fan off.
    pub async fn set_percentage(&self, percentage: u8) -> Result<(), CoreError> {
        let speed = percentage_to_speed(percentage)?;
        self.set_speed(speed).await
    }

    pub async fn set_speed(&self, speed: FanSpeed) -> Result<(), CoreError> {
        // Overlay first: the presented state reflects intent without
        // waiting for the command round-trip. A failed command
        // propagates its error but the overlay stands until the next
        // good poll says otherwise.
        self.overlay(|state| {
            state.is_on = speed != FanSpeed::Off;
            state.speed = speed;
            state.percentage = speed_to_percentage(speed);
            state.preset = None;
        });
        self.dispatcher
            .execute(Command::SetVentilation(speed.into()))
            .await?;
        self.confirm_later().await;
        Ok(())
    }

    pub async fn set_preset(&self, preset: FanPreset) -> Result<(), CoreError> {
        let mode = match preset {
            FanPreset::Auto => VentilationMode::Auto,
        };
        self.overlay(|state| {
            state.is_on = true;
            state.preset = Some(preset);
        });
        self.dispatcher.execute(Command::SetVentilation(mode)).await?;
        self.confirm_later().await;
        Ok(())
    }

    /// Turn the fan on: an explicit preset wins over a percentage;
    /// with neither, fall back to the lowest speed.
    pub async fn turn_on(
        &self,
        percentage: Option<u8>,
        preset: Option<FanPreset>,
    ) -> Result<(), CoreError> {
        if let Some(preset) = preset {
            return self.set_preset(preset).await;
        }
        match percentage {
            Some(p) if p > 0 => self.set_percentage(p).await,
            _ => self.set_speed(FanSpeed::Low).await,
        }
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.set_speed(FanSpeed::Off).await
    }

    // ── Internals ────────────────────────────────────────────────────

    fn overlay(&self, apply: impl FnOnce(&mut FanState)) {
        let mut state = self.inner.state.write().expect("fan state lock poisoned");
        apply(&mut state);
        state.assumed = true;
        debug!(state = ?*state, "fan state assumed");
    }

    /// Ask the coordinator to confirm the overlay. A failed refresh is
    /// already reflected through the listener, so the outcome here is
    /// deliberately ignored.
    async fn confirm_later(&self) {
        let _ = self.coordinator.request_refresh().await;
    }
}

impl Drop for VentilationFan {
    fn drop(&mut self) {
        self.coordinator.unregister(&self.subscription);
    }
}
