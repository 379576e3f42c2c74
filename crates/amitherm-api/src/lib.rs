// amitherm-api: HTTP client for the AMiT HVAC PLC web service.
//
// The PLC exposes a small JSON-over-HTTP surface with cookie-session
// auth. Every call is connection-scoped: a `Session` is opened, used
// for exactly one exchange, and released -- the PLC firmware handles
// at most a handful of concurrent sessions, so nothing here pools or
// shares connections.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::Error;
pub use models::{
    FanSpeed, HeatingMode, HeatingResult, OverviewResult, Season, VentilationMode,
    VentilationResult,
};
pub use session::Session;
