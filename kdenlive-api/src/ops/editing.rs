//! Groups, zones, sequences, selection and the clipboard.

use super::ROOT_FOLDER_ID;
use crate::args;
use crate::bus::{Arg, BusClient, Record};
use crate::error::Result;

impl BusClient {
    /// Group timeline items (at least two). Returns the group id, or -1.
    pub fn group_clips(&self, item_ids: &[i64]) -> Result<i64> {
        self.call_i64(
            "scriptGroupClips",
            &[Arg::ints(item_ids.iter().copied())],
            -1,
        )
    }

    pub fn ungroup_clips(&self, item_id: i64) -> Result<bool> {
        self.call_bool("scriptUngroupClips", &args![item_id])
    }

    /// Group membership: `isInGroup`, `isGroup`, `rootId`, `groupType`, `members`.
    pub fn get_group_info(&self, item_id: i64) -> Result<Record> {
        self.call_record("scriptGetGroupInfo", &args![item_id])
    }

    pub fn remove_from_group(&self, item_id: i64) -> Result<bool> {
        self.call_bool("scriptRemoveFromGroup", &args![item_id])
    }

    /// Timeline zone as `in` and `out`.
    pub fn get_zone(&self) -> Result<Record> {
        self.call_record("scriptGetZone", &[])
    }

    pub fn set_zone(&self, in_frame: i64, out_frame: i64) -> Result<bool> {
        self.call_bool("scriptSetZone", &args![in_frame, out_frame])
    }

    pub fn set_zone_in(&self, in_frame: i64) -> Result<bool> {
        self.call_bool("scriptSetZoneIn", &args![in_frame])
    }

    pub fn set_zone_out(&self, out_frame: i64) -> Result<bool> {
        self.call_bool("scriptSetZoneOut", &args![out_frame])
    }

    /// Remove the zone's content. With `lift_only` the gap stays.
    pub fn extract_zone(&self, in_frame: i64, out_frame: i64, lift_only: bool) -> Result<bool> {
        self.call_bool("scriptExtractZone", &args![in_frame, out_frame, lift_only])
    }

    /// Create a sequence. Track counts of -1 use the project defaults. Returns its uuid, or `"-1"`.
    pub fn create_sequence(
        &self,
        name: &str,
        audio_tracks: i64,
        video_tracks: i64,
        parent_folder: &str,
    ) -> Result<String> {
        let folder = if parent_folder.is_empty() {
            ROOT_FOLDER_ID
        } else {
            parent_folder
        };
        let uuid = self.call_text(
            "scriptCreateSequence",
            &args![name, audio_tracks, video_tracks, folder],
        )?;
        Ok(if uuid.is_empty() { "-1".to_string() } else { uuid })
    }

    pub fn get_sequences(&self) -> Result<Vec<Record>> {
        self.call_records("scriptGetSequences", &[])
    }

    pub fn get_active_sequence(&self) -> Result<Record> {
        self.call_record("scriptGetActiveSequence", &[])
    }

    /// Switch the timeline to the sequence with `uuid` (no braces).
    pub fn set_active_sequence(&self, uuid: &str) -> Result<bool> {
        self.call_bool("scriptSetActiveSequence", &args![uuid])
    }

    /// Ids of the selected timeline items.
    pub fn get_selection(&self) -> Result<Vec<i64>> {
        Ok(self.invoke("scriptGetSelection", &[])?.into_i64_list())
    }

    /// Replace the selection. An empty list clears it.
    pub fn set_selection(&self, ids: &[i64]) -> Result<bool> {
        if ids.is_empty() {
            return self.clear_selection();
        }
        self.call_bool("scriptSetSelection", &[Arg::ints(ids.iter().copied())])
    }

    pub fn add_to_selection(&self, item_id: i64, clear: bool) -> Result<bool> {
        self.call_bool("scriptAddToSelection", &args![item_id, clear])
    }

    pub fn clear_selection(&self) -> Result<bool> {
        self.call_bool("scriptClearSelection", &[])
    }

    pub fn select_all(&self) -> Result<bool> {
        self.call_bool("scriptSelectAll", &[])
    }

    pub fn select_current_track(&self) -> Result<bool> {
        self.call_bool("scriptSelectCurrentTrack", &[])
    }

    /// Select everything on `track_ids` between the two frames.
    pub fn select_items_in_range(
        &self,
        track_ids: &[i64],
        start_frame: i64,
        end_frame: i64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptSelectItems",
            &[
                Arg::ints(track_ids.iter().copied()),
                Arg::Int(start_frame),
                Arg::Int(end_frame),
            ],
        )
    }

    /// Copy the selection. Returns the number of copied items.
    pub fn copy_clips(&self) -> Result<i64> {
        self.call_i64("scriptCopyClips", &[], 0)
    }

    pub fn cut_clips(&self) -> Result<bool> {
        self.call_bool("scriptCutClips", &[])
    }

    /// Paste the clipboard. -1 for either argument means the playhead / active track.
    pub fn paste_clips(&self, position: i64, track_id: i64) -> Result<bool> {
        self.call_bool("scriptPasteClips", &args![position, track_id])
    }
}
