//! Core logic for controlling MPRIS2 media players.
//!
//! Everything here is transport-agnostic: the D-Bus session bus is reached
//! through the [`bus::BusGateway`] trait, so discovery, selector resolution
//! and capability-gated command dispatch can be tested against a fake bus.

pub mod bus;
pub mod directory;
pub mod error;
pub mod format;
pub mod metadata;
pub mod player;

#[cfg(test)]
mod test_gateway;

pub use bus::{BusGateway, Fault, FaultKind, PropMap, PropValue};
pub use directory::{discover, resolve};
pub use error::Error;
pub use metadata::TrackMetadata;
pub use player::{Command, Player, PlayerStatus, Position};

/// Root namespace shared by every MPRIS2 bus name and interface.
pub const MPRIS_BASE: &str = "org.mpris.MediaPlayer2";
/// The playback control interface.
pub const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";
/// Optional track list interface.
pub const TRACKLIST_INTERFACE: &str = "org.mpris.MediaPlayer2.TrackList";
/// Optional playlists interface.
pub const PLAYLISTS_INTERFACE: &str = "org.mpris.MediaPlayer2.Playlists";
/// Object path at which every MPRIS2 player exposes its interfaces.
pub const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
