mod cli;
mod gateway;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mprisctl",
    about = "Manage an MPRIS2 compatible media player",
    version
)]
struct Cli {
    /// Player to access, either by number as printed by the "services"
    /// command, or by name. Names are matched from the end, so the last
    /// part is enough.
    #[arg(short, long, global = true, default_value = "0")]
    service: String,

    /// Enable extra output, useful for debugging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        env = "MPRISCTL_LOG_LEVEL",
        default_value = "warn",
        global = true
    )]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show player status (the default when no command is given)
    Status,
    /// Toggle play/pause state
    Toggle,
    /// Stop playback
    Stop,
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Play next track
    Next,
    /// Play previous track
    #[command(alias = "previous")]
    Prev,
    /// Open media from a URI or local path and start playback
    Open {
        /// URI to open; a local path is resolved to a file:// URI
        uri: String,
    },
    /// List available players
    Services,
}

fn main() {
    let cli = Cli::parse();

    // -v forces debug traces; otherwise --log-level / MPRISCTL_LOG_LEVEL wins
    let level = if cli.verbose { "debug" } else { &cli.log_level };
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // One discovery, one command, one exit: a current-thread runtime is all
    // the bus round-trips need.
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime")
        .block_on(cli::run(cli));

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

/// Unsupported operations exit with 2 so scripts can tell "this player can't"
/// from "something went wrong"; everything else exits with 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<mprisctl_core::Error>()
        .map_or(1, mprisctl_core::Error::exit_code)
}
