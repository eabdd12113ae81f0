//! Monitor playback and timeline navigation.

use crate::args;
use crate::bus::BusClient;
use crate::error::Result;

impl BusClient {
    pub fn seek(&self, frame: i64) -> Result<()> {
        self.invoke("scriptSeek", &args![frame])?;
        Ok(())
    }

    /// Playhead position in frames.
    pub fn get_position(&self) -> Result<i64> {
        self.call_i64("scriptGetPosition", &[], 0)
    }

    pub fn play(&self) -> Result<()> {
        self.invoke("scriptPlay", &[])?;
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        self.invoke("scriptPause", &[])?;
        Ok(())
    }

    pub fn set_playback_speed(&self, speed: f64) -> Result<bool> {
        self.call_bool("scriptSetPlaybackSpeed", &args![speed])
    }

    pub fn get_playback_speed(&self) -> Result<f64> {
        self.call_f64("scriptGetPlaybackSpeed", &[], 0.0)
    }

    /// Jump to the next guide. Returns the new position.
    pub fn go_to_next_marker(&self) -> Result<i64> {
        self.call_i64("scriptGoToNextMarker", &[], 0)
    }

    pub fn go_to_previous_marker(&self) -> Result<i64> {
        self.call_i64("scriptGoToPreviousMarker", &[], 0)
    }

    /// Jump to the next cut point. Returns the new position.
    pub fn go_to_next_edit(&self) -> Result<i64> {
        self.call_i64("scriptGoToNextEdit", &[], 0)
    }

    pub fn go_to_previous_edit(&self) -> Result<i64> {
        self.call_i64("scriptGoToPreviousEdit", &[], 0)
    }
}
