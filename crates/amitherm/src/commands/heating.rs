//! `heating` -- heating circuit handlers.

use amitherm_core::Hub;
use amitherm_core::entity::HeatingClimate;
use tabled::Tabled;

use crate::cli::{GlobalOpts, HeatingArgs, HeatingCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct HeatingRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Target")]
    target: String,
}

pub async fn handle(hub: &Hub, args: HeatingArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = hub.heating_coordinator().clone();
    let data = coordinator.first_refresh().await?;
    let climate = HeatingClimate::new(coordinator, hub.dispatcher().clone());

    match args.command {
        HeatingCommand::Show => {
            let state = climate.state();
            let rows = vec![HeatingRow {
                mode: state.hvac_mode.to_string(),
                current: format!("{} °C", state.current_temperature),
                target: format!("{} °C", state.target_temperature),
            }];
            let out = output::render(&global.output, data.as_ref(), rows, |d| {
                format!(
                    "mode={}\ncurrent={}\ntarget={}",
                    d.heating_mode, d.actual_temperature, d.set_temperature
                )
            });
            output::print_output(&out);
        }

        HeatingCommand::SetMode { mode } => {
            climate.set_hvac_mode(mode.into()).await?;
            eprintln!("Heating mode set to {}", climate.state().hvac_mode);
        }

        HeatingCommand::SetTemp { value } => {
            climate.set_temperature(value).await?;
            eprintln!("Heating setpoint set to {value} °C");
        }
    }
    Ok(())
}
