// ── Hub ──
//
// The explicit context object: owns the client facade, the command
// dispatcher, and one lazily-created coordinator per polled sub-system.
// Consumers thread a `Hub` through instead of reaching into any global
// registry.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use amitherm_api::{ApiClient, ApiConfig};
use tracing::info;

use crate::command::Dispatcher;
use crate::error::CoreError;
use crate::source::{
    HeatingCoordinator, HeatingSource, OverviewCoordinator, OverviewSource,
    VentilationCoordinator, VentilationSource,
};

/// Default polling cadence for every coordinator.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(30);

pub struct Hub {
    client: Arc<ApiClient>,
    dispatcher: Dispatcher,
    update_interval: Duration,
    overview: OnceLock<OverviewCoordinator>,
    heating: OnceLock<HeatingCoordinator>,
    ventilation: OnceLock<VentilationCoordinator>,
}

impl Hub {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_update_interval(config, DEFAULT_UPDATE_INTERVAL)
    }

    pub fn with_update_interval(config: ApiConfig, update_interval: Duration) -> Self {
        let client = Arc::new(ApiClient::new(config));
        let dispatcher = Dispatcher::new(Arc::clone(&client));
        Self {
            client,
            dispatcher,
            update_interval,
            overview: OnceLock::new(),
            heating: OnceLock::new(),
            ventilation: OnceLock::new(),
        }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Setup-time connectivity validation. Both a rejected login and an
    /// unreachable PLC are fatal here: there is no cache to fall back on.
    pub async fn validate_auth(&self) -> Result<(), CoreError> {
        if self.client.check_auth().await? {
            info!("PLC credentials validated");
            Ok(())
        } else {
            Err(CoreError::AuthenticationFailed {
                message: "the PLC rejected the configured credentials".into(),
            })
        }
    }

    // ── Coordinators (created on first use) ──────────────────────────

    pub fn overview_coordinator(&self) -> &OverviewCoordinator {
        self.overview.get_or_init(|| {
            OverviewCoordinator::new(
                "overview",
                OverviewSource::new(Arc::clone(&self.client)),
                self.update_interval,
            )
        })
    }

    pub fn heating_coordinator(&self) -> &HeatingCoordinator {
        self.heating.get_or_init(|| {
            HeatingCoordinator::new(
                "heating",
                HeatingSource::new(Arc::clone(&self.client)),
                self.update_interval,
            )
        })
    }

    pub fn ventilation_coordinator(&self) -> &VentilationCoordinator {
        self.ventilation.get_or_init(|| {
            VentilationCoordinator::new(
                "ventilation",
                VentilationSource::new(Arc::clone(&self.client)),
                self.update_interval,
            )
        })
    }
}
