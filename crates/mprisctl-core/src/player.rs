use std::fmt;

use tracing::debug;

use crate::bus::{BusGateway, FaultKind, PropMap, PropValue};
use crate::error::Error;
use crate::metadata::TrackMetadata;
use crate::{PLAYER_INTERFACE, PLAYLISTS_INTERFACE, TRACKLIST_INTERFACE};

/// A transport control command with a boolean capability gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Stop,
    Play,
    Pause,
    Next,
    Previous,
}

impl Command {
    /// MPRIS D-Bus method name for this command.
    #[must_use]
    pub fn method_name(self) -> &'static str {
        match self {
            Command::Toggle => "PlayPause",
            Command::Stop => "Stop",
            Command::Play => "Play",
            Command::Pause => "Pause",
            Command::Next => "Next",
            Command::Previous => "Previous",
        }
    }

    /// Capability property gating this command. `Stop` has none; the
    /// protocol defines no `CanStop`, so it is covered by `CanControl` alone.
    #[must_use]
    pub fn capability(self) -> Option<&'static str> {
        match self {
            Command::Toggle | Command::Pause => Some("CanPause"),
            Command::Play => Some("CanPlay"),
            Command::Next => Some("CanGoNext"),
            Command::Previous => Some("CanGoPrevious"),
            Command::Stop => None,
        }
    }

    /// User-facing command name, as spelled on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Command::Toggle => "toggle",
            Command::Stop => "stop",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Next => "next",
            Command::Previous => "previous",
        }
    }
}

/// Playback position, distinguishing the expected "player does not report
/// positions" condition from an actual reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Known(i64),
    Unavailable,
}

/// Result of a status query.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    /// Raw `PlaybackStatus` string ("Playing", "Paused", "Stopped", ...).
    pub playback: String,
    /// Current track; only read while playing or paused.
    pub track: Option<TrackMetadata>,
    /// Playback position; only read while playing or paused.
    pub position: Position,
}

/// One resolved MPRIS2 endpoint.
///
/// Optional-interface support is probed once at [`Player::open`] and fixed
/// for the handle's lifetime. Everything else (properties, capability flags)
/// is read fresh from the bus on every access, since player state changes
/// behind our back.
pub struct Player<'a, G: BusGateway> {
    gateway: &'a G,
    name: String,
    has_track_list: bool,
    has_playlists: bool,
}

// Manual impl: the gateway itself has no useful representation
impl<G: BusGateway> fmt::Debug for Player<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name)
            .field("has_track_list", &self.has_track_list)
            .field("has_playlists", &self.has_playlists)
            .finish_non_exhaustive()
    }
}

impl<'a, G: BusGateway> Player<'a, G> {
    /// Bind a handle to a bus name, probing the optional Playlists and
    /// TrackList interfaces with one cheap property read each.
    ///
    /// # Errors
    ///
    /// `EndpointUnreachable` if the name has no live owner; any fault other
    /// than "interface/property not supported" propagates.
    pub async fn open(gateway: &'a G, name: &str) -> Result<Self, Error> {
        let has_playlists =
            probe(gateway, name, PLAYLISTS_INTERFACE, "PlaylistCount").await?;
        let has_track_list =
            probe(gateway, name, TRACKLIST_INTERFACE, "CanEditTracks").await?;
        debug!(
            player = name,
            has_playlists, has_track_list, "opened MPRIS player"
        );
        Ok(Player {
            gateway,
            name: name.to_string(),
            has_track_list,
            has_playlists,
        })
    }

    /// Bus name this handle is bound to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the optional TrackList interface was present at open time.
    #[must_use]
    pub fn has_track_list(&self) -> bool {
        self.has_track_list
    }

    /// Whether the optional Playlists interface was present at open time.
    #[must_use]
    pub fn has_playlists(&self) -> bool {
        self.has_playlists
    }

    /// All properties of the base interface, fetched fresh.
    ///
    /// # Errors
    ///
    /// Propagates any transport fault.
    pub async fn base_properties(&self) -> Result<PropMap, Error> {
        Ok(self
            .gateway
            .get_all_properties(&self.name, crate::MPRIS_BASE)
            .await?)
    }

    /// All properties of the player interface, fetched fresh.
    ///
    /// # Errors
    ///
    /// Propagates any transport fault.
    pub async fn player_properties(&self) -> Result<PropMap, Error> {
        Ok(self
            .gateway
            .get_all_properties(&self.name, PLAYER_INTERFACE)
            .await?)
    }

    /// Read one boolean capability flag from the player interface.
    ///
    /// # Errors
    ///
    /// Propagates any transport fault.
    pub async fn capability(&self, flag: &str) -> Result<bool, Error> {
        let value = self
            .gateway
            .get_property(&self.name, PLAYER_INTERFACE, flag)
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Run a transport control command through both capability gates.
    ///
    /// Gate order is fixed: `CanControl` first (failure aborts before the
    /// per-command flag is ever read), then the command's own flag.
    ///
    /// # Errors
    ///
    /// `ControlDenied` if the player refuses control, `OperationUnsupported`
    /// if the per-command capability is false, otherwise any transport fault.
    pub async fn control(&self, command: Command) -> Result<(), Error> {
        self.ensure_can_control().await?;
        if let Some(flag) = command.capability() {
            if !self.capability(flag).await? {
                return Err(Error::OperationUnsupported {
                    player: self.name.clone(),
                    operation: command.name().to_string(),
                });
            }
        }
        debug!(player = %self.name, method = command.method_name(), "sending MPRIS command");
        self.gateway
            .call(&self.name, PLAYER_INTERFACE, command.method_name(), None)
            .await?;
        Ok(())
    }

    /// Open a URI on the player.
    ///
    /// There is no `CanOpenUri` flag; support is discovered reactively. An
    /// "unknown method" fault from the call means the player does not
    /// implement `OpenUri` and becomes `OperationUnsupported`.
    ///
    /// # Errors
    ///
    /// `ControlDenied`, `OperationUnsupported`, or any transport fault.
    pub async fn open_uri(&self, uri: &str) -> Result<(), Error> {
        self.ensure_can_control().await?;
        debug!(player = %self.name, uri, "sending OpenUri");
        match self
            .gateway
            .call(&self.name, PLAYER_INTERFACE, "OpenUri", Some(uri))
            .await
        {
            Ok(()) => Ok(()),
            Err(fault) if fault.kind == FaultKind::UnknownMethod => {
                Err(Error::OperationUnsupported {
                    player: self.name.clone(),
                    operation: "open".to_string(),
                })
            }
            Err(fault) => Err(Error::Transport(fault)),
        }
    }

    /// Query playback status. Read-only; bypasses both capability gates.
    ///
    /// Track metadata and position are only read while the player is playing
    /// or paused. A "not supported" fault on `Position` is an expected
    /// condition and yields [`Position::Unavailable`].
    ///
    /// # Errors
    ///
    /// Propagates any other transport fault.
    pub async fn status(&self) -> Result<PlayerStatus, Error> {
        let playback = self
            .gateway
            .get_property(&self.name, PLAYER_INTERFACE, "PlaybackStatus")
            .await?;
        let playback = playback.as_str().unwrap_or_default().to_string();

        if playback != "Playing" && playback != "Paused" {
            return Ok(PlayerStatus {
                playback,
                track: None,
                position: Position::Unavailable,
            });
        }

        let metadata = self
            .gateway
            .get_property(&self.name, PLAYER_INTERFACE, "Metadata")
            .await?;
        let track = match metadata {
            PropValue::Map(ref map) => TrackMetadata::from(map),
            _ => TrackMetadata::default(),
        };

        let position = match self
            .gateway
            .get_property(&self.name, PLAYER_INTERFACE, "Position")
            .await
        {
            Ok(value) => value.as_i64().map_or(Position::Unavailable, Position::Known),
            Err(fault) if fault.kind.means_unsupported() => Position::Unavailable,
            Err(fault) => return Err(Error::Transport(fault)),
        };

        Ok(PlayerStatus {
            playback,
            track: Some(track),
            position,
        })
    }

    async fn ensure_can_control(&self) -> Result<(), Error> {
        if self.capability("CanControl").await? {
            Ok(())
        } else {
            Err(Error::ControlDenied(self.name.clone()))
        }
    }
}

/// Probe one optional interface by reading a cheap property. A fault meaning
/// "not supported" demotes the capability; an unknown bus name means the
/// endpoint itself is gone; anything else is a real error.
async fn probe<G: BusGateway>(
    gateway: &G,
    endpoint: &str,
    interface: &str,
    property: &str,
) -> Result<bool, Error> {
    match gateway.get_property(endpoint, interface, property).await {
        Ok(_) => Ok(true),
        Err(fault) if fault.kind.means_unsupported() => Ok(false),
        Err(fault) if fault.kind == FaultKind::UnknownName => {
            Err(Error::EndpointUnreachable(endpoint.to_string()))
        }
        Err(fault) => Err(Error::Transport(fault)),
    }
}
