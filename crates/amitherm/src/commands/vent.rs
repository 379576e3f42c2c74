//! `vent` -- ventilation unit handlers.

use amitherm_api::Season;
use amitherm_core::entity::{FanPreset, NUMBERS, Number, VentilationClimate, VentilationFan};
use amitherm_core::{Command as CoreCommand, Hub};
use serde_json::json;
use tabled::Tabled;

use crate::cli::{GlobalOpts, SeasonArg, VentArgs, VentCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct VentRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub async fn handle(hub: &Hub, args: VentArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let coordinator = hub.ventilation_coordinator().clone();

    match args.command {
        VentCommand::Show => {
            let data = coordinator.first_refresh().await?;
            let fan = VentilationFan::new(coordinator.clone(), hub.dispatcher().clone());
            let climate = VentilationClimate::new(coordinator, hub.dispatcher().clone());
            let fan_state = fan.state();
            let climate_state = climate.state();

            let rows = vec![
                VentRow {
                    field: "Mode",
                    value: data.ventilation.ventilation_mode.to_string(),
                },
                VentRow {
                    field: "Speed",
                    value: format!("{} ({}%)", fan_state.speed, fan_state.percentage),
                },
                VentRow {
                    field: "Air temperature",
                    value: format!(
                        "{} °C (target {} °C)",
                        climate_state.current_temperature, climate_state.target_temperature
                    ),
                },
                VentRow {
                    field: "CO2 setpoint",
                    value: format!("{} ppm", data.ventilation.co2_setpoint),
                },
                VentRow {
                    field: "Season",
                    value: data.overview.season.to_string(),
                },
                VentRow {
                    field: "Heating intake air",
                    value: climate_state.is_heating.to_string(),
                },
            ];
            let payload = json!({
                "ventilation": &data.ventilation,
                "overview": &data.overview,
            });
            let out = output::render(&global.output, &payload, rows, |_| {
                format!(
                    "mode={}\nspeed={}\nair_temp={}\nair_temp_setpoint={}\nco2_setpoint={}\nseason={}",
                    data.ventilation.ventilation_mode,
                    data.ventilation.ventilation_speed,
                    data.ventilation.air_temp_current,
                    data.ventilation.air_temp_setpoint,
                    data.ventilation.co2_setpoint,
                    data.overview.season,
                )
            });
            output::print_output(&out);
        }

        VentCommand::SetSpeed { percentage } => {
            coordinator.first_refresh().await?;
            let fan = VentilationFan::new(coordinator, hub.dispatcher().clone());
            fan.set_percentage(percentage).await?;
            eprintln!("Fan speed set to {percentage}%");
        }

        VentCommand::SetAuto => {
            coordinator.first_refresh().await?;
            let fan = VentilationFan::new(coordinator, hub.dispatcher().clone());
            fan.set_preset(FanPreset::Auto).await?;
            eprintln!("Fan handed to CO2 automation");
        }

        VentCommand::SetTemp { value } => {
            let number = Number::new(coordinator, hub.dispatcher().clone(), &NUMBERS[0]);
            number.set_value(value).await?;
            eprintln!("Supply-air setpoint set to {value} °C");
        }

        VentCommand::SetCo2 { value } => {
            let number = Number::new(coordinator, hub.dispatcher().clone(), &NUMBERS[1]);
            number.set_value(value).await?;
            eprintln!("CO2 setpoint set to {value} ppm");
        }

        VentCommand::SetSeason { season } => {
            let season = match season {
                SeasonArg::Winter => Season::Winter,
                SeasonArg::Summer => Season::Summer,
            };
            hub.dispatcher()
                .execute(CoreCommand::SetSeason(season))
                .await?;
            eprintln!("Season set to {season}");
        }
    }
    Ok(())
}
