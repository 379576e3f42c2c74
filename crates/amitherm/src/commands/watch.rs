//! `watch` -- subscribe to a coordinator and print every refresh.

use amitherm_core::coordinator::{Coordinator, UpdateSource};
use amitherm_core::{CoreError, Hub, VentilationSnapshot};
use amitherm_api::{HeatingResult, OverviewResult};

use crate::cli::{WatchArgs, WatchGroup};
use crate::error::CliError;

pub async fn handle(hub: &Hub, args: WatchArgs) -> Result<(), CliError> {
    match args.group {
        WatchGroup::Overview => {
            watch(hub.overview_coordinator(), |d: &OverviewResult| {
                format!(
                    "temperature={} air_temperature={} co2={} season={}",
                    opt(d.temperature),
                    opt(d.air_temperature),
                    opt(d.co2),
                    d.season
                )
            })
            .await
        }
        WatchGroup::Heating => {
            watch(hub.heating_coordinator(), |d: &HeatingResult| {
                format!(
                    "mode={} current={} target={}",
                    d.heating_mode, d.actual_temperature, d.set_temperature
                )
            })
            .await
        }
        WatchGroup::Ventilation => {
            watch(hub.ventilation_coordinator(), |d: &VentilationSnapshot| {
                format!(
                    "mode={} speed={} air_temp={} co2_setpoint={} season={}",
                    d.ventilation.ventilation_mode,
                    d.ventilation.ventilation_speed,
                    d.ventilation.air_temp_current,
                    d.ventilation.co2_setpoint,
                    d.overview.season
                )
            })
            .await
        }
    }
}

/// Register a printing listener, keep polling until Ctrl-C.
async fn watch<S: UpdateSource>(
    coordinator: &Coordinator<S>,
    line: impl Fn(&S::Data) -> String + Send + Sync + 'static,
) -> Result<(), CliError> {
    let handle = coordinator.register(move |snapshot| {
        let stamp = snapshot
            .last_updated
            .map_or_else(|| "--:--:--".into(), |t| t.format("%H:%M:%S").to_string());
        match snapshot.data.as_deref() {
            Some(data) if snapshot.available => println!("[{stamp}] {}", line(data)),
            Some(data) => println!("[{stamp}] (stale) {}", line(data)),
            None => println!("[{stamp}] unavailable"),
        }
    });

    let result = coordinator.first_refresh().await;
    if let Err(e) = result {
        coordinator.unregister(&handle);
        return Err(e.into());
    }

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| CoreError::Internal(format!("failed to wait for Ctrl-C: {e}")))?;
    coordinator.unregister(&handle);
    Ok(())
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}
