//! Human-readable rendering of track lengths and playback positions.

/// Convert a track length in microseconds into `m:ss`, extended with
/// fractional digits only when they are nonzero: `m:ss.mmm` at millisecond
/// precision, `m:ss.mmmuuu` at microsecond precision. Lossless at
/// microsecond granularity.
#[must_use]
pub fn track_length_string(micros: i64) -> String {
    let micros = micros.max(0);
    let us = micros % 1000;
    let ms = (micros / 1000) % 1000;
    let total_secs = micros / 1_000_000;
    let minutes = total_secs / 60;
    let secs = total_secs % 60;
    if us != 0 {
        format!("{minutes}:{secs:02}.{ms:03}{us:03}")
    } else if ms != 0 {
        format!("{minutes}:{secs:02}.{ms:03}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Parse a string produced by [`track_length_string`] back into microseconds.
///
/// Accepts `m:ss`, `m:ss.mmm` and `m:ss.mmmuuu`.
#[must_use]
pub fn parse_track_length(text: &str) -> Option<i64> {
    let (minutes, rest) = text.split_once(':')?;
    let minutes: i64 = minutes.parse().ok()?;
    let (secs, frac) = match rest.split_once('.') {
        Some((secs, frac)) => (secs, Some(frac)),
        None => (rest, None),
    };
    if secs.len() != 2 {
        return None;
    }
    let secs: i64 = secs.parse().ok()?;
    if secs >= 60 || minutes < 0 {
        return None;
    }
    let sub_micros = match frac {
        None => 0,
        Some(f) if f.len() == 3 => f.parse::<i64>().ok()? * 1000,
        Some(f) if f.len() == 6 => f.parse::<i64>().ok()?,
        Some(_) => return None,
    };
    Some((minutes * 60 + secs) * 1_000_000 + sub_micros)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_seconds() {
        assert_eq!(track_length_string(60_000_000), "1:00");
        assert_eq!(track_length_string(125_000_000), "2:05");
        assert_eq!(track_length_string(0), "0:00");
    }

    #[test]
    fn millisecond_remainder() {
        assert_eq!(track_length_string(125_042_000), "2:05.042");
    }

    #[test]
    fn microsecond_remainder() {
        assert_eq!(track_length_string(125_042_007), "2:05.042007");
        // zero milliseconds but nonzero microseconds still needs six digits
        assert_eq!(track_length_string(125_000_007), "2:05.000007");
    }

    #[test]
    fn hour_long_tracks_roll_into_minutes() {
        assert_eq!(track_length_string(3_600_000_000), "60:00");
    }

    #[test]
    fn round_trip_is_lossless_at_microsecond_granularity() {
        let lengths = [
            0,
            1,
            999,
            1_000,
            999_999,
            1_000_000,
            60_000_000,
            125_000_000,
            125_042_007,
            3_600_000_001,
        ];
        for length in lengths {
            let rendered = track_length_string(length);
            assert_eq!(
                parse_track_length(&rendered),
                Some(length),
                "round trip failed for {length} (rendered {rendered})"
            );
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_track_length("2:65"), None);
        assert_eq!(parse_track_length("2:5"), None);
        assert_eq!(parse_track_length("2:05.12"), None);
        assert_eq!(parse_track_length("abc"), None);
        assert_eq!(parse_track_length(""), None);
    }
}
