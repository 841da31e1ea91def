use anyhow::Result;
use mprisctl_core::format::track_length_string;
use mprisctl_core::{Player, PlayerStatus, Position};

use crate::gateway::DbusGateway;

pub async fn run(player: &Player<'_, DbusGateway>) -> Result<()> {
    let status = player.status().await?;
    println!("{}", render(&status));
    Ok(())
}

/// One status line: `Playing: "Title" by Artist (position/length)`.
///
/// The position/length pair is only shown when the track has a known length;
/// a player that cannot report positions renders the position as `?`.
fn render(status: &PlayerStatus) -> String {
    let track = match &status.track {
        Some(track) => track,
        None => return status.playback.clone(),
    };

    let timing = match track.length {
        Some(length) => {
            let position = match status.position {
                Position::Known(position) => track_length_string(position),
                Position::Unavailable => "?".to_string(),
            };
            format!(" ({position}/{})", track_length_string(length))
        }
        None => String::new(),
    };

    format!(
        "{}: \"{}\" by {}{timing}",
        status.playback,
        track.display_title(),
        track.display_artist()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mprisctl_core::TrackMetadata;

    #[test]
    fn stopped_player_renders_raw_status() {
        let status = PlayerStatus {
            playback: "Stopped".into(),
            track: None,
            position: Position::Unavailable,
        };
        assert_eq!(render(&status), "Stopped");
    }

    #[test]
    fn playing_track_renders_title_artist_and_timing() {
        let status = PlayerStatus {
            playback: "Playing".into(),
            track: Some(TrackMetadata {
                title: Some("Song".into()),
                url: None,
                artists: vec!["X".into(), "Y".into()],
                length: Some(125_000_000),
            }),
            position: Position::Known(60_000_000),
        };
        assert_eq!(render(&status), "Playing: \"Song\" by X, Y (1:00/2:05)");
    }

    #[test]
    fn live_stream_has_no_timing_pair() {
        let status = PlayerStatus {
            playback: "Playing".into(),
            track: Some(TrackMetadata {
                title: None,
                url: Some("http://radio.example/stream".into()),
                artists: Vec::new(),
                length: None,
            }),
            position: Position::Known(12_000_000),
        };
        assert_eq!(
            render(&status),
            "Playing: \"http://radio.example/stream\" by [Unknown]"
        );
    }

    #[test]
    fn unknown_position_with_known_length() {
        let status = PlayerStatus {
            playback: "Paused".into(),
            track: Some(TrackMetadata {
                title: Some("Song".into()),
                url: None,
                artists: vec!["X".into()],
                length: Some(125_000_000),
            }),
            position: Position::Unavailable,
        };
        assert_eq!(render(&status), "Paused: \"Song\" by X (?/2:05)");
    }
}
