mod open;
mod services;
mod status;

use anyhow::Result;
use mprisctl_core::{discover, resolve, Command, Player};

use crate::gateway::DbusGateway;
use crate::{Cli, Commands};

/// Run one command: connect, discover, resolve the selector, dispatch.
pub async fn run(cli: Cli) -> Result<()> {
    let gateway = DbusGateway::session().await?;
    let services = discover(&gateway).await?;

    let command = cli.command.unwrap_or(Commands::Status);

    if let Commands::Services = command {
        return services::run(&gateway, &services, cli.verbose).await;
    }

    let player = resolve(&gateway, &services, &cli.service).await?;

    if cli.verbose {
        println!("selected service {}", player.name());
        print_service_detail(&player, "  ").await?;
        println!("player properties:");
        for (name, value) in sorted(player.player_properties().await?) {
            if name == "Metadata" {
                println!("  current track metadata:");
                if let Some(map) = value.as_map() {
                    for (key, value) in sorted(map.clone()) {
                        println!("    {key}\t= {value}");
                    }
                }
            } else {
                println!("  {name}\t= {value}");
            }
        }
    }

    match command {
        Commands::Status => status::run(&player).await,
        Commands::Toggle => control(&player, Command::Toggle).await,
        Commands::Stop => control(&player, Command::Stop).await,
        Commands::Play => control(&player, Command::Play).await,
        Commands::Pause => control(&player, Command::Pause).await,
        Commands::Next => control(&player, Command::Next).await,
        Commands::Prev => control(&player, Command::Previous).await,
        Commands::Open { uri } => open::run(&player, &uri).await,
        Commands::Services => unreachable!("services handled before resolution"),
    }
}

async fn control(player: &Player<'_, DbusGateway>, command: Command) -> Result<()> {
    player.control(command).await?;
    Ok(())
}

/// Optional-interface support plus the base property dump, one line each.
async fn print_service_detail(
    player: &Player<'_, DbusGateway>,
    indent: &str,
) -> Result<()> {
    println!("{indent}playlists support:\t{}", player.has_playlists());
    println!("{indent}tracklist support:\t{}", player.has_track_list());
    for (name, value) in sorted(player.base_properties().await?) {
        println!("{indent}{name}\t= {value}");
    }
    Ok(())
}

/// Property maps come back in hash order; sort for stable output.
fn sorted(map: mprisctl_core::PropMap) -> Vec<(String, mprisctl_core::PropValue)> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries
}
