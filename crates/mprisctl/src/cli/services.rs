use anyhow::Result;
use mprisctl_core::Player;

use super::print_service_detail;
use crate::gateway::DbusGateway;

/// List discovered services, one `index: name` line each; verbose mode opens
/// every service and dumps its optional-interface support and base
/// properties.
pub async fn run(gateway: &DbusGateway, services: &[String], verbose: bool) -> Result<()> {
    if services.is_empty() {
        println!("No MPRIS2 services found.");
        return Ok(());
    }
    for (index, name) in services.iter().enumerate() {
        println!("{index}: {name}");
        if verbose {
            let player = Player::open(gateway, name).await?;
            print_service_detail(&player, "  ").await?;
        }
    }
    Ok(())
}
