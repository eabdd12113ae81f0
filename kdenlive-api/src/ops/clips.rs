//! Timeline clips: placement, trimming, per-clip properties and audio.
//!
//! Kdenlive crashes when asked to place or list clips on a track that does not exist, so the
//! track-taking operations here check the id against a fresh track listing first and answer
//! with a sentinel instead of forwarding the call:
//!
//! | operation                     | unknown track                     |
//! |-------------------------------|-----------------------------------|
//! | [`BusClient::insert_clip`]    | `-1`                              |
//! | [`BusClient::move_clip`]      | `false`                           |
//! | [`BusClient::get_clips_on_track`] | empty list                    |
//! | [`BusClient::insert_clips_sequentially`] | [`BusError::InvalidArgument`] |

use crate::args;
use crate::bus::{Arg, BusClient, Record, RemoteValue};
use crate::error::{BusError, Result};

impl BusClient {
    /// Place a bin clip on a track. Returns the new timeline clip id, or -1.
    pub fn insert_clip(&self, bin_clip_id: &str, track_id: i64, position: i64) -> Result<i64> {
        if !self.track_accepted(track_id)? {
            return Ok(-1);
        }
        self.call_i64(
            "scriptInsertClip",
            &args![bin_clip_id, track_id, position],
            -1,
        )
    }

    /// Place bin clips back to back starting at `start_position`. Returns the new clip ids.
    pub fn insert_clips_sequentially<S: AsRef<str>>(
        &self,
        bin_clip_ids: &[S],
        track_id: i64,
        start_position: i64,
    ) -> Result<Vec<i64>> {
        let valid = self.valid_track_ids()?;
        if !valid.is_empty() && !valid.contains(&track_id) {
            return Err(BusError::InvalidArgument(format!(
                "track {track_id} does not exist, valid tracks are {valid:?}"
            )));
        }
        let ids = Arg::strings(bin_clip_ids.iter().map(|id| id.as_ref().to_string()));
        Ok(self
            .invoke(
                "scriptInsertClipsSequentially",
                &[ids, Arg::Int(track_id), Arg::Int(start_position)],
            )?
            .into_i64_list())
    }

    pub fn move_clip(&self, clip_id: i64, track_id: i64, position: i64) -> Result<bool> {
        if !self.track_accepted(track_id)? {
            return Ok(false);
        }
        self.call_bool("scriptMoveClip", &args![clip_id, track_id, position])
    }

    /// Resize a clip. Returns the resulting duration, or -1.
    pub fn resize_clip(&self, clip_id: i64, new_duration: i64, from_right: bool) -> Result<i64> {
        self.call_i64(
            "scriptResizeClip",
            &args![clip_id, new_duration, from_right],
            -1,
        )
    }

    pub fn delete_timeline_clip(&self, clip_id: i64) -> Result<bool> {
        self.call_bool("scriptDeleteTimelineClip", &args![clip_id])
    }

    /// Clips on a track, each with `id`, `binId`, `position`, `duration`, `name`, ...
    pub fn get_clips_on_track(&self, track_id: i64) -> Result<Vec<Record>> {
        if !self.track_accepted(track_id)? {
            return Ok(Vec::new());
        }
        self.call_records("scriptGetClipsOnTrack", &args![track_id])
    }

    pub fn get_timeline_clip_info(&self, clip_id: i64) -> Result<Record> {
        self.call_record("scriptGetTimelineClipInfo", &args![clip_id])
    }

    /// Split a clip at `position`.
    pub fn cut_clip(&self, clip_id: i64, position: i64) -> Result<bool> {
        self.call_bool("scriptCutClip", &args![clip_id, position])
    }

    /// Shift the source window of a clip by `offset` frames, keeping its timeline placement.
    pub fn slip_clip(&self, clip_id: i64, offset: i64) -> Result<bool> {
        self.call_bool("scriptSlipClip", &args![clip_id, offset])
    }

    /// Delete a clip and close the gap.
    pub fn ripple_delete(&self, clip_id: i64) -> Result<bool> {
        self.call_bool("scriptRippleDelete", &args![clip_id])
    }

    /// Trim a clip and shift what follows. Positive deltas extend.
    pub fn ripple_trim(&self, clip_id: i64, delta: i64, from_right: bool) -> Result<bool> {
        self.call_bool("scriptRippleTrim", &args![clip_id, delta, from_right])
    }

    /// Move the cut point between a clip and its neighbour.
    pub fn roll_edit(&self, clip_id: i64, delta: i64) -> Result<bool> {
        self.call_bool("scriptRollEdit", &args![clip_id, delta])
    }

    /// Move a clip while its neighbours absorb the change.
    pub fn slide_edit(&self, clip_id: i64, delta: i64) -> Result<bool> {
        self.call_bool("scriptSlideEdit", &args![clip_id, delta])
    }

    /// Speed as a percentage: 100 is normal, 50 half, 200 double.
    pub fn set_clip_speed(&self, clip_id: i64, speed: f64, pitch_compensate: bool) -> Result<bool> {
        self.call_bool("scriptSetClipSpeed", &args![clip_id, speed, pitch_compensate])
    }

    /// Transform keyframes (position, size, opacity) of the clip's transform effect.
    pub fn get_clip_transform_keyframes(&self, clip_id: i64) -> Result<Vec<Record>> {
        self.call_records("scriptGetClipTransformKeyframes", &args![clip_id])
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_clip_transform(
        &self,
        clip_id: i64,
        frame: i64,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        opacity: f64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptSetClipTransform",
            &args![clip_id, frame, x, y, width, height, opacity],
        )
    }

    pub fn remove_clip_transform_keyframe(&self, clip_id: i64, frame: i64) -> Result<bool> {
        self.call_bool("scriptRemoveClipTransformKeyframe", &args![clip_id, frame])
    }

    /// Opacity between 0 and 1, or -1 when unavailable.
    pub fn get_clip_opacity(&self, clip_id: i64) -> Result<f64> {
        self.call_f64("scriptGetClipOpacity", &args![clip_id], -1.0)
    }

    pub fn set_clip_opacity(&self, clip_id: i64, opacity: f64) -> Result<bool> {
        self.call_bool("scriptSetClipOpacity", &args![clip_id, opacity])
    }

    pub fn is_clip_enabled(&self, clip_id: i64) -> Result<bool> {
        self.call_bool("scriptIsClipEnabled", &args![clip_id])
    }

    pub fn set_clip_enabled(&self, clip_id: i64, enabled: bool) -> Result<bool> {
        self.call_bool("scriptSetClipEnabled", &args![clip_id, enabled])
    }

    /// Colour tags, semicolon separated (`#ff0000;#00ff00`).
    pub fn get_clip_color(&self, clip_id: i64) -> Result<String> {
        self.call_text("scriptGetClipColor", &args![clip_id])
    }

    pub fn set_clip_color(&self, clip_id: i64, color_tag: &str) -> Result<bool> {
        self.call_bool("scriptSetClipColor", &args![clip_id, color_tag])
    }

    pub fn enable_time_remap(&self, clip_id: i64, enable: bool) -> Result<bool> {
        self.call_bool("scriptEnableTimeRemap", &args![clip_id, enable])
    }

    /// Time remap state: `enabled`, `time_map` (`timecode=seconds;...`), `pitch`, `image_mode`.
    pub fn get_time_remap(&self, clip_id: i64) -> Result<Record> {
        self.call_record("scriptGetTimeRemap", &args![clip_id])
    }

    pub fn set_time_remap(
        &self,
        clip_id: i64,
        time_map: &str,
        pitch: bool,
        image_mode: &str,
    ) -> Result<bool> {
        self.call_bool(
            "scriptSetTimeRemap",
            &args![clip_id, time_map, pitch, image_mode],
        )
    }

    /// Split the audio of an A/V clip onto its own track.
    pub fn split_audio(&self, clip_id: i64) -> Result<bool> {
        self.call_bool("scriptSplitAudio", &args![clip_id])
    }

    pub fn set_clip_volume(&self, clip_id: i64, db: f64) -> Result<bool> {
        self.call_bool("scriptSetClipVolume", &args![clip_id, db])
    }

    pub fn get_clip_volume(&self, clip_id: i64) -> Result<f64> {
        self.call_f64("scriptGetClipVolume", &args![clip_id], 0.0)
    }

    pub fn set_audio_fade(
        &self,
        clip_id: i64,
        fade_in_frames: i64,
        fade_out_frames: i64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptSetAudioFade",
            &args![clip_id, fade_in_frames, fade_out_frames],
        )
    }

    pub fn set_clip_pan(&self, clip_id: i64, pan: f64) -> Result<bool> {
        self.call_bool("scriptSetClipPan", &args![clip_id, pan])
    }

    pub fn get_clip_pan(&self, clip_id: i64) -> Result<f64> {
        self.call_f64("scriptGetClipPan", &args![clip_id], 0.0)
    }

    /// Scale the clip to fill the frame.
    pub fn fill_frame(&self, clip_id: i64) -> Result<bool> {
        self.call_bool("scriptFillFrame", &args![clip_id])
    }
}

/// `binId` of a timeline clip record, whichever form it was sent in.
pub fn bin_id_of(record: &Record) -> Option<String> {
    record
        .get("binId")
        .filter(|value| !value.is_void())
        .map(RemoteValue::to_text)
}
