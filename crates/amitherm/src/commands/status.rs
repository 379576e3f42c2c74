//! `status` -- building overview.

use amitherm_core::entity::{SENSORS, Sensor};
use amitherm_core::{DeviceInfo, DeviceKind, Hub};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Device")]
    device: &'static str,
    #[tabled(rename = "Reading")]
    reading: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub async fn handle(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = hub.overview_coordinator();
    let overview = coordinator.first_refresh().await?;

    let mut rows = Vec::new();
    for desc in SENSORS {
        // Uninstalled sensors stay off the report entirely.
        if let Some(sensor) = Sensor::try_new(coordinator, desc)? {
            rows.push(StatusRow {
                device: DeviceInfo::for_kind(desc.device).name,
                reading: desc.name,
                value: match sensor.value() {
                    Some(v) => format!("{v} {}", desc.unit),
                    None => "-".into(),
                },
            });
        }
    }
    rows.push(StatusRow {
        device: DeviceInfo::for_kind(DeviceKind::Plc).name,
        reading: "Season",
        value: overview.season.to_string(),
    });

    let out = output::render(&global.output, overview.as_ref(), rows, |data| {
        let mut lines = Vec::new();
        if let Some(v) = data.temperature {
            lines.push(format!("temperature={v}"));
        }
        if let Some(v) = data.air_temperature {
            lines.push(format!("air_temperature={v}"));
        }
        if let Some(v) = data.co2 {
            lines.push(format!("co2={v}"));
        }
        lines.push(format!("season={}", data.season));
        lines.join("\n")
    });
    output::print_output(&out);
    Ok(())
}
