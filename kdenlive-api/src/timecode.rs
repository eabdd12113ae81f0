//! Frame and timecode arithmetic.

use crate::error::{BusError, Result};

/// Frame rate assumed when a project does not report one.
pub const DEFAULT_FPS: f64 = 25.0;
pub const DEFAULT_WIDTH: i64 = 1536;
pub const DEFAULT_HEIGHT: i64 = 864;

/// Format a frame count as `HH:MM:SS:FF`.
pub fn frames_to_timecode(frames: i64, fps: f64) -> String {
    let total_seconds = frames as f64 / fps;
    let hours = (total_seconds / 3600.0).floor() as i64;
    let minutes = ((total_seconds % 3600.0) / 60.0).floor() as i64;
    let seconds = (total_seconds % 60.0).floor() as i64;
    let remaining = (frames as f64 % fps).floor() as i64;
    format!("{hours:02}:{minutes:02}:{seconds:02}:{remaining:02}")
}

/// Parse `HH:MM:SS:FF` or `HH:MM:SS` into a frame count.
pub fn timecode_to_frames(timecode: &str, fps: f64) -> Result<i64> {
    let parts = timecode
        .split(':')
        .map(|part| part.trim().parse::<i64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| BusError::InvalidArgument(format!("invalid timecode: {timecode}")))?;
    let (h, m, s, f) = match parts.as_slice() {
        [h, m, s, f] => (*h, *m, *s, *f),
        [h, m, s] => (*h, *m, *s, 0),
        _ => {
            return Err(BusError::InvalidArgument(format!(
                "invalid timecode: {timecode}"
            )))
        }
    };
    Ok(((h * 3600 + m * 60 + s) as f64 * fps) as i64 + f)
}

pub fn seconds_to_frames(seconds: f64, fps: f64) -> i64 {
    (seconds * fps).round() as i64
}

pub fn frames_to_seconds(frames: i64, fps: f64) -> f64 {
    frames as f64 / fps
}
