//! Subcommand handlers.

pub mod check;
pub mod heating;
pub mod status;
pub mod vent;
pub mod watch;
