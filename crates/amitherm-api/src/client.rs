// ── Remote client facade ──
//
// One inherent method per PLC operation. Each method opens its own
// `Session`, performs a single exchange, and closes the session
// whether the exchange succeeded or not.

use serde_json::json;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::Error;
use crate::models::{
    HeatingMode, HeatingResult, OverviewResult, Season, VentilationMode, VentilationResult,
};
use crate::session::Session;

/// Facade over the PLC web service.
///
/// Holds only configuration; every call is connection-scoped (see
/// [`Session`]). Cloneable and cheap to share.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Fetch the building overview (ambient sensors + season).
    pub async fn fetch_overview(&self) -> Result<OverviewResult, Error> {
        let session = Session::open(&self.config).await?;
        let result = session.get("api/overview").await;
        session.close().await;
        result
    }

    /// Fetch the heating circuit state.
    pub async fn fetch_heating(&self) -> Result<HeatingResult, Error> {
        let session = Session::open(&self.config).await?;
        let result = session.get("api/heating").await;
        session.close().await;
        result
    }

    /// Fetch the ventilation unit state.
    pub async fn fetch_ventilation(&self) -> Result<VentilationResult, Error> {
        let session = Session::open(&self.config).await?;
        let result = session.get("api/ventilation").await;
        session.close().await;
        result
    }

    // ── Heating commands ─────────────────────────────────────────────

    pub async fn set_heating_mode(&self, mode: HeatingMode) -> Result<(), Error> {
        debug!(%mode, "set heating mode");
        self.post("api/heating/mode", &json!({ "mode": mode })).await
    }

    /// Set the comfort temperature setpoint (°C).
    pub async fn set_temperature(&self, value: f64) -> Result<(), Error> {
        debug!(value, "set comfort temperature");
        self.post("api/heating/temperature", &json!({ "value": value }))
            .await
    }

    /// Set the frost-protection minimal setpoint (°C).
    pub async fn set_minimal_temperature(&self, value: f64) -> Result<(), Error> {
        debug!(value, "set minimal temperature");
        self.post("api/heating/minimal-temperature", &json!({ "value": value }))
            .await
    }

    pub async fn set_season(&self, season: Season) -> Result<(), Error> {
        debug!(%season, "set season");
        self.post("api/season", &json!({ "season": season })).await
    }

    // ── Ventilation commands ─────────────────────────────────────────

    pub async fn set_ventilation(&self, mode: VentilationMode) -> Result<(), Error> {
        debug!(%mode, "set ventilation mode");
        self.post("api/ventilation/mode", &json!({ "mode": mode }))
            .await
    }

    /// Set the supply-air temperature setpoint (°C).
    pub async fn set_target_air_temperature(&self, value: f64) -> Result<(), Error> {
        debug!(value, "set target air temperature");
        self.post("api/ventilation/air-temperature", &json!({ "value": value }))
            .await
    }

    /// Set the CO2 setpoint (ppm) used by automatic mode.
    pub async fn set_target_co2(&self, value: f64) -> Result<(), Error> {
        debug!(value, "set target CO2");
        self.post("api/ventilation/co2", &json!({ "value": value }))
            .await
    }

    // ── Setup validation ─────────────────────────────────────────────

    /// Probe whether the configured credentials are accepted.
    ///
    /// Returns `Ok(false)` on rejected credentials; connectivity
    /// failures propagate so setup can distinguish "wrong password"
    /// from "PLC unreachable".
    pub async fn check_auth(&self) -> Result<bool, Error> {
        match Session::open(&self.config).await {
            Ok(session) => {
                session.close().await;
                Ok(true)
            }
            Err(e) if e.is_auth() => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    async fn post<B: serde::Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let session = Session::open(&self.config).await?;
        let result = session.post(path, body).await;
        session.close().await;
        result
    }
}
