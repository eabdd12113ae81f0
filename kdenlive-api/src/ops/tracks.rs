//! Track listing, creation and per-track state.

use crate::args;
use crate::bus::{BusClient, Record};
use crate::error::Result;

/// Kind of track, as the scripting interface names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
        }
    }
}

impl BusClient {
    pub fn get_track_count(&self, kind: TrackKind) -> Result<i64> {
        self.call_i64("scriptGetTrackCount", &args![kind.as_str()], 0)
    }

    /// Info for the track at `track_index` (0-based, top to bottom).
    pub fn get_track_info(&self, track_index: i64) -> Result<Record> {
        self.call_record("scriptGetTrackInfo", &args![track_index])
    }

    /// Every track: `id`, `name`, `audio`, and state flags.
    pub fn get_all_tracks_info(&self) -> Result<Vec<Record>> {
        self.call_records("scriptGetAllTracksInfo", &[])
    }

    /// Add a track. Returns the new track id.
    pub fn add_track(&self, name: &str, audio_track: bool) -> Result<i64> {
        self.call_i64("scriptAddTrack", &args![name, audio_track], -1)
    }

    pub fn delete_track(&self, track_id: i64) -> Result<bool> {
        self.call_bool("scriptDeleteTrack", &args![track_id])
    }

    pub fn insert_space(
        &self,
        track_id: i64,
        position: i64,
        duration: i64,
        all_tracks: bool,
    ) -> Result<bool> {
        self.call_bool(
            "scriptInsertSpace",
            &args![track_id, position, duration, all_tracks],
        )
    }

    pub fn remove_space(&self, track_id: i64, position: i64, all_tracks: bool) -> Result<bool> {
        self.call_bool("scriptRemoveSpace", &args![track_id, position, all_tracks])
    }

    pub fn set_track_mute(&self, track_id: i64, mute: bool) -> Result<bool> {
        self.call_bool("scriptSetTrackMute", &args![track_id, mute])
    }

    pub fn get_track_mute(&self, track_id: i64) -> Result<bool> {
        self.call_bool("scriptGetTrackMute", &args![track_id])
    }

    pub fn set_track_locked(&self, track_id: i64, locked: bool) -> Result<bool> {
        self.call_bool("scriptSetTrackLocked", &args![track_id, locked])
    }

    pub fn get_track_locked(&self, track_id: i64) -> Result<bool> {
        self.call_bool("scriptGetTrackLocked", &args![track_id])
    }

    pub fn set_track_hidden(&self, track_id: i64, hidden: bool) -> Result<bool> {
        self.call_bool("scriptSetTrackHidden", &args![track_id, hidden])
    }

    pub fn get_track_hidden(&self, track_id: i64) -> Result<bool> {
        self.call_bool("scriptGetTrackHidden", &args![track_id])
    }

    pub fn get_track_name(&self, track_id: i64) -> Result<String> {
        self.call_text("scriptGetTrackName", &args![track_id])
    }

    pub fn set_track_name(&self, track_id: i64, name: &str) -> Result<bool> {
        self.call_bool("scriptSetTrackName", &args![track_id, name])
    }

    /// Track colour as an integer, or -1 when none is set.
    pub fn get_track_color(&self, track_id: i64) -> Result<i64> {
        self.call_i64("scriptGetTrackColor", &args![track_id], -1)
    }

    pub fn set_track_color(&self, track_id: i64, color: i64) -> Result<bool> {
        self.call_bool("scriptSetTrackColor", &args![track_id, color])
    }

    pub fn get_track_solo(&self, track_id: i64) -> Result<bool> {
        self.call_bool("scriptGetTrackSolo", &args![track_id])
    }

    pub fn set_track_solo(&self, track_id: i64, solo: bool) -> Result<bool> {
        self.call_bool("scriptSetTrackSolo", &args![track_id, solo])
    }
}
