//! `check` -- setup-time connectivity and credential validation.

use amitherm_core::Hub;

use crate::error::CliError;

pub async fn handle(hub: &Hub) -> Result<(), CliError> {
    hub.validate_auth().await?;
    eprintln!("PLC reachable, credentials accepted");
    Ok(())
}
