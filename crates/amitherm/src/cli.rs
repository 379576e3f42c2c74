//! Clap derive structures for the `amitherm` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use amitherm_core::HvacMode;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// amitherm -- control an AMiT HVAC PLC from the command line
#[derive(Debug, Parser)]
#[command(
    name = "amitherm",
    version,
    about = "Inspect and control an AMiT AMiNi4W2 HVAC installation",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// PLC host name or base URL
    #[arg(long, short = 'H', env = "AMITHERM_HOST", global = true)]
    pub host: Option<String>,

    /// Login user name
    #[arg(
        long,
        short = 'u',
        env = "AMITHERM_USERNAME",
        default_value = "admin",
        global = true
    )]
    pub username: String,

    /// Login password
    #[arg(long, env = "AMITHERM_PASSWORD", hide_env = true, global = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "AMITHERM_TIMEOUT", default_value = "10", global = true)]
    pub timeout: u64,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the building overview (sensors and season)
    #[command(alias = "st")]
    Status,

    /// Inspect and control the heating circuit
    #[command(alias = "heat")]
    Heating(HeatingArgs),

    /// Inspect and control the ventilation unit
    Vent(VentArgs),

    /// Poll a data group and print every refresh until Ctrl-C
    Watch(WatchArgs),

    /// Validate connectivity and credentials
    Check,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HEATING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HeatingArgs {
    #[command(subcommand)]
    pub command: HeatingCommand,
}

#[derive(Debug, Subcommand)]
pub enum HeatingCommand {
    /// Show the heating circuit state
    Show,

    /// Set the operating mode
    SetMode {
        /// Mode: off, heat, or auto (weekly schedule)
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Set the temperature setpoint (minimal setpoint while off)
    SetTemp {
        /// Temperature in °C
        value: f64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Off,
    Heat,
    Auto,
}

impl From<ModeArg> for HvacMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Off => HvacMode::Off,
            ModeArg::Heat => HvacMode::Heat,
            ModeArg::Auto => HvacMode::Auto,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VENTILATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VentArgs {
    #[command(subcommand)]
    pub command: VentCommand,
}

#[derive(Debug, Subcommand)]
pub enum VentCommand {
    /// Show the ventilation unit state
    Show,

    /// Set the fan speed by percentage (0 turns it off)
    SetSpeed {
        /// Speed percentage, 0-100
        percentage: u8,
    },

    /// Hand speed control to the PLC's CO2 automation
    SetAuto,

    /// Set the supply-air temperature setpoint
    SetTemp {
        /// Temperature in °C (15-25)
        value: f64,
    },

    /// Set the CO2 setpoint for automatic mode
    SetCo2 {
        /// CO2 concentration in ppm (0-1500, steps of 100)
        value: f64,
    },

    /// Select the season (winter enables intake-air heating)
    SetSeason {
        #[arg(value_enum)]
        season: SeasonArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeasonArg {
    Winter,
    Summer,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Data group to watch
    #[arg(value_enum, default_value = "overview")]
    pub group: WatchGroup,

    /// Polling interval in seconds
    #[arg(long, short = 'i', default_value = "30")]
    pub interval: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WatchGroup {
    Overview,
    Heating,
    Ventilation,
}
