use crate::bus::PropMap;

/// Marker used when a track has neither title nor URL, or no artist entries.
const UNKNOWN: &str = "[Unknown]";

/// The slice of MPRIS track metadata this tool cares about.
///
/// Every field is optional on the wire; the `display_*` accessors apply the
/// documented fallbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    /// `xesam:title`
    pub title: Option<String>,
    /// `xesam:url`
    pub url: Option<String>,
    /// `xesam:artist`; the wire type is a list of strings
    pub artists: Vec<String>,
    /// `mpris:length` in microseconds; absent for live streams
    pub length: Option<i64>,
}

impl TrackMetadata {
    /// Title to show: the track title, else its URL, else a literal marker.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or(UNKNOWN)
    }

    /// Artist line to show: all artists joined with `", "`, else a marker.
    #[must_use]
    pub fn display_artist(&self) -> String {
        if self.artists.is_empty() {
            UNKNOWN.to_string()
        } else {
            self.artists.join(", ")
        }
    }
}

impl From<&PropMap> for TrackMetadata {
    fn from(map: &PropMap) -> Self {
        let mut track = TrackMetadata::default();

        if let Some(title) = map.get("xesam:title").and_then(|v| v.as_str()) {
            if !title.is_empty() {
                track.title = Some(title.to_string());
            }
        }

        if let Some(url) = map.get("xesam:url").and_then(|v| v.as_str()) {
            if !url.is_empty() {
                track.url = Some(url.to_string());
            }
        }

        if let Some(artists) = map.get("xesam:artist").and_then(|v| v.as_str_list()) {
            track.artists = artists
                .iter()
                .filter(|a| !a.is_empty())
                .cloned()
                .collect();
        }

        if let Some(length) = map.get("mpris:length").and_then(|v| v.as_i64()) {
            if length > 0 {
                track.length = Some(length);
            }
        }

        track
    }
}
