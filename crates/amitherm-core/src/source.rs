// ── Update sources ──
//
// One `UpdateSource` per polled data group, each wrapping the
// connection-scoped client facade.

use std::sync::Arc;

use amitherm_api::{ApiClient, HeatingResult, OverviewResult, VentilationResult};

use crate::coordinator::{Coordinator, UpdateSource};
use crate::error::CoreError;

/// Building overview (ambient sensors + season).
pub struct OverviewSource {
    client: Arc<ApiClient>,
}

impl OverviewSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl UpdateSource for OverviewSource {
    type Data = OverviewResult;

    async fn fetch(&self) -> Result<OverviewResult, CoreError> {
        Ok(self.client.fetch_overview().await?)
    }
}

/// Heating circuit state.
pub struct HeatingSource {
    client: Arc<ApiClient>,
}

impl HeatingSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl UpdateSource for HeatingSource {
    type Data = HeatingResult;

    async fn fetch(&self) -> Result<HeatingResult, CoreError> {
        Ok(self.client.fetch_heating().await?)
    }
}

/// Compound snapshot for the ventilation group.
///
/// Ventilation mode decisions depend on the season (is the unit in
/// heating mode?), so both are fetched on the same tick and cached as
/// one unit -- dependent projections never see a ventilation reading
/// paired with a stale season.
#[derive(Debug, Clone, PartialEq)]
pub struct VentilationSnapshot {
    pub ventilation: VentilationResult,
    pub overview: OverviewResult,
}

pub struct VentilationSource {
    client: Arc<ApiClient>,
}

impl VentilationSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl UpdateSource for VentilationSource {
    type Data = VentilationSnapshot;

    async fn fetch(&self) -> Result<VentilationSnapshot, CoreError> {
        // Back-to-back rather than parallel: the PLC firmware only
        // allows a handful of concurrent sessions.
        let ventilation = self.client.fetch_ventilation().await?;
        let overview = self.client.fetch_overview().await?;
        Ok(VentilationSnapshot {
            ventilation,
            overview,
        })
    }
}

// ── Coordinator aliases ──────────────────────────────────────────────

pub type OverviewCoordinator = Coordinator<OverviewSource>;
pub type HeatingCoordinator = Coordinator<HeatingSource>;
pub type VentilationCoordinator = Coordinator<VentilationSource>;
