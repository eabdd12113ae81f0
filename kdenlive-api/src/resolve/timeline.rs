use super::media_pool::guide_comment;
use super::{marker_category, marker_color, MediaPoolItem, TrackType, MARKER_PURPLE};
use crate::bus::{BusClient, Record, RecordExt};
use crate::error::Result;
use crate::ops::clips::bin_id_of;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::rc::Rc;

/// Marker colour given either as a Resolve colour name or a Kdenlive guide category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor<'a> {
    Name(&'a str),
    Category(i64),
}

impl<'a> From<&'a str> for MarkerColor<'a> {
    fn from(name: &'a str) -> Self {
        MarkerColor::Name(name)
    }
}

impl From<i64> for MarkerColor<'_> {
    fn from(category: i64) -> Self {
        MarkerColor::Category(category)
    }
}

/// A guide, in the shape Resolve returns timeline markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMarker {
    pub color: String,
    pub duration: i64,
    pub note: String,
    pub name: String,
    pub custom_data: String,
    /// Kdenlive's own fields
    pub comment: String,
    pub category: i64,
}

/// The active Kdenlive sequence.
#[derive(Debug, Clone)]
pub struct Timeline {
    client: Rc<BusClient>,
}

impl Timeline {
    pub(crate) fn new(client: Rc<BusClient>) -> Self {
        Self { client }
    }

    /// The project name; there is one timeline per project here.
    pub fn get_name(&self) -> Result<String> {
        self.client.get_project_name()
    }

    pub fn set_name(&self, _name: &str) -> bool {
        true
    }

    pub fn get_track_count(&self, track_type: TrackType) -> Result<i64> {
        match track_type.kind() {
            Some(kind) => self.client.get_track_count(kind),
            None => Ok(0),
        }
    }

    pub fn get_track_info(&self, track_index: i64) -> Result<Record> {
        self.client.get_track_info(track_index)
    }

    pub fn get_all_tracks_info(&self) -> Result<Vec<Record>> {
        self.client.get_all_tracks_info()
    }

    /// Add a track and return its id.
    pub fn add_track(&self, name: &str, audio: bool) -> Result<i64> {
        self.client.add_track(name, audio)
    }

    pub fn delete_track(&self, track_id: i64) -> Result<bool> {
        self.client.delete_track(track_id)
    }

    /// Place a bin clip. `None` when Kdenlive refused or the track does not exist.
    pub fn insert_clip(
        &self,
        bin_clip_id: &str,
        track_id: i64,
        position: i64,
    ) -> Result<Option<TimelineItem>> {
        let clip_id = self.client.insert_clip(bin_clip_id, track_id, position)?;
        Ok((clip_id >= 0).then(|| TimelineItem::new(self.client.clone(), clip_id, None)))
    }

    /// Place a pool item on the `track_index`-th (0-based) track of `track_type`.
    pub fn insert_clip_at(
        &self,
        track_type: TrackType,
        track_index: usize,
        item: &MediaPoolItem,
        position: i64,
    ) -> Result<Option<TimelineItem>> {
        let tracks = self.tracks_of(track_type)?;
        match tracks.get(track_index) {
            Some(track) => self.insert_clip(item.bin_id(), track.int("id").unwrap_or(0), position),
            None => Ok(None),
        }
    }

    /// Place bin clips back to back. Fails with an invalid-argument error on unknown tracks.
    pub fn insert_clips_sequentially<S: AsRef<str>>(
        &self,
        bin_clip_ids: &[S],
        track_id: i64,
        start_position: i64,
    ) -> Result<Vec<TimelineItem>> {
        Ok(self
            .client
            .insert_clips_sequentially(bin_clip_ids, track_id, start_position)?
            .into_iter()
            .filter(|id| *id >= 0)
            .map(|id| TimelineItem::new(self.client.clone(), id, None))
            .collect())
    }

    /// Clips on a track given by type and index.
    ///
    /// Indices are 1-based as in Resolve, with 0 also accepted for the first track.
    pub fn get_item_list_in_track(
        &self,
        track_type: TrackType,
        track_index: usize,
    ) -> Result<Vec<TimelineItem>> {
        if track_type == TrackType::Subtitle {
            return Ok(Vec::new());
        }
        let tracks = self.tracks_of(track_type)?;
        let Some(track) = tracks.get(track_index.saturating_sub(1)) else {
            return Ok(Vec::new());
        };
        let clips = self.client.get_clips_on_track(track.int("id").unwrap_or(0))?;
        Ok(clips
            .into_iter()
            .filter_map(|clip| {
                let id = clip.int("id")?;
                Some(TimelineItem::new(self.client.clone(), id, Some(clip)))
            })
            .collect())
    }

    fn tracks_of(&self, track_type: TrackType) -> Result<Vec<Record>> {
        let audio = track_type == TrackType::Audio;
        Ok(self
            .client
            .get_all_tracks_info()?
            .into_iter()
            .filter(|track| track.flag("audio") == audio)
            .collect())
    }

    /// Mix two adjacent clips on the same track.
    pub fn add_transition(&self, a: &TimelineItem, b: &TimelineItem, duration: i64) -> Result<bool> {
        self.client.add_mix(a.clip_id(), b.clip_id(), duration)
    }

    /// Add a cross-track composition. Returns its id, or -1.
    pub fn add_composition(
        &self,
        transition_id: &str,
        track_id: i64,
        position: i64,
        duration: i64,
    ) -> Result<i64> {
        self.client
            .add_composition(transition_id, track_id, position, duration)
    }

    pub fn remove_mix(&self, item: &TimelineItem) -> Result<bool> {
        self.client.remove_mix(item.clip_id())
    }

    /// Add a guide. Unknown colour names fall back to purple.
    pub fn add_marker<'a>(
        &self,
        frame: i64,
        color: impl Into<MarkerColor<'a>>,
        name: &str,
        note: &str,
    ) -> Result<bool> {
        let category = match color.into() {
            MarkerColor::Name(name) => marker_category(name).unwrap_or(MARKER_PURPLE),
            MarkerColor::Category(category) => category,
        };
        self.client
            .add_guide(frame, &guide_comment(name, note), category)
    }

    /// Guides keyed by frame.
    pub fn get_markers(&self) -> Result<BTreeMap<i64, TimelineMarker>> {
        Ok(self
            .client
            .get_guides()?
            .iter()
            .map(|guide| {
                let category = guide.int("category").unwrap_or(MARKER_PURPLE);
                let comment = guide.text("comment");
                let marker = TimelineMarker {
                    color: marker_color(category).to_string(),
                    duration: 1,
                    note: comment.clone(),
                    name: comment.clone(),
                    custom_data: String::new(),
                    comment,
                    category,
                };
                (guide.int("frame").unwrap_or(0), marker)
            })
            .collect())
    }

    pub fn delete_marker(&self, frame: i64) -> Result<bool> {
        self.client.delete_guide(frame)
    }

    pub fn delete_marker_at_frame(&self, frame: i64) -> Result<bool> {
        self.client.delete_guide(frame)
    }

    /// Delete every guide of a colour. An unknown colour name deletes nothing.
    pub fn delete_markers_by_color<'a>(&self, color: impl Into<MarkerColor<'a>>) -> Result<bool> {
        let category = match color.into() {
            MarkerColor::Name(name) => match marker_category(name) {
                Some(category) => category,
                None => return Ok(false),
            },
            MarkerColor::Category(category) => category,
        };
        self.client.delete_guides_by_category(category)
    }

    pub fn seek(&self, frame: i64) -> Result<()> {
        self.client.seek(frame)
    }

    pub fn get_position(&self) -> Result<i64> {
        self.client.get_position()
    }

    pub fn play(&self) -> Result<()> {
        self.client.play()
    }

    pub fn pause(&self) -> Result<()> {
        self.client.pause()
    }

    pub fn apply_grade_from_drx(&self, _path: &str, _grade_mode: i64) -> bool {
        log::warn!("ApplyGradeFromDRX is a Resolve-only feature");
        true
    }

    pub fn get_current_clip_thumbnail_image(&self) -> Option<Record> {
        None
    }

    pub fn export(&self, file_path: &str, _export_type: i64, _export_sub_type: Option<i64>) -> bool {
        log::warn!("timeline export to {file_path} has limited support in Kdenlive");
        true
    }

    pub fn get_start_frame(&self) -> i64 {
        0
    }

    pub fn get_end_frame(&self) -> Result<i64> {
        self.get_total_duration()
    }

    /// End of the last clip across all tracks, in frames.
    pub fn get_total_duration(&self) -> Result<i64> {
        let mut end = 0;
        for track in self.get_all_tracks_info()? {
            for clip in self.client.get_clips_on_track(track.int("id").unwrap_or(0))? {
                end = end.max(clip.int("position").unwrap_or(0) + clip.int("duration").unwrap_or(0));
            }
        }
        Ok(end)
    }

    /// Human-readable listing of tracks and their clips.
    pub fn summary(&self) -> Result<String> {
        let tracks = self.get_all_tracks_info()?;
        let mut out = String::new();
        let _ = writeln!(out, "Timeline: {} tracks", tracks.len());
        for track in &tracks {
            let track_id = track.int("id").unwrap_or(0);
            let kind = if track.flag("audio") { "Audio" } else { "Video" };
            let name = match track.get("name") {
                Some(name) => name.to_text(),
                None => format!("Track {track_id}"),
            };
            let clips = self.client.get_clips_on_track(track_id)?;
            let _ = writeln!(out, "  [{kind}] {name}: {} clips", clips.len());
            for clip in &clips {
                let name = match clip.get("name") {
                    Some(name) => name.to_text(),
                    None => "?".to_string(),
                };
                let _ = writeln!(
                    out,
                    "    {name} @ {} ({} frames)",
                    clip.int("position").unwrap_or(0),
                    clip.int("duration").unwrap_or(0)
                );
            }
        }
        Ok(out)
    }
}

/// A clip placed on the timeline.
///
/// Clip info is fetched on first use (or taken from the listing that produced the item) and
/// dropped after every call that changes the clip.
pub struct TimelineItem {
    client: Rc<BusClient>,
    clip_id: i64,
    info: RefCell<Option<Record>>,
}

impl TimelineItem {
    pub(crate) fn new(client: Rc<BusClient>, clip_id: i64, info: Option<Record>) -> Self {
        Self {
            client,
            clip_id,
            info: RefCell::new(info),
        }
    }

    pub fn clip_id(&self) -> i64 {
        self.clip_id
    }

    fn with_info<T>(&self, read: impl FnOnce(&Record) -> T) -> Result<T> {
        let mut cache = self.info.borrow_mut();
        let info = match cache.take() {
            Some(info) => info,
            None => self.client.get_timeline_clip_info(self.clip_id)?,
        };
        let value = read(&info);
        *cache = Some(info);
        Ok(value)
    }

    pub fn get_name(&self) -> Result<String> {
        self.with_info(|info| info.text("name"))
    }

    pub fn get_duration(&self) -> Result<i64> {
        self.with_info(|info| info.int("duration").unwrap_or(0))
    }

    /// Timeline position of the first frame.
    pub fn get_start(&self) -> Result<i64> {
        self.with_info(|info| info.int("position").unwrap_or(0))
    }

    pub fn get_end(&self) -> Result<i64> {
        Ok(self.get_start()? + self.get_duration()?)
    }

    pub fn get_track_id(&self) -> Result<i64> {
        self.with_info(|info| info.int("trackId").unwrap_or(-1))
    }

    /// The bin clip this item was placed from.
    pub fn get_media_pool_item(&self) -> Result<Option<MediaPoolItem>> {
        Ok(self
            .with_info(bin_id_of)?
            .filter(|bin_id| !bin_id.is_empty())
            .map(|bin_id| MediaPoolItem::new(self.client.clone(), bin_id)))
    }

    /// Resize to `frames`. Returns the duration Kdenlive settled on.
    pub fn set_duration(&self, frames: i64, from_right: bool) -> Result<i64> {
        let duration = self.client.resize_clip(self.clip_id, frames, from_right);
        self.info.replace(None);
        duration
    }

    pub fn move_to(&self, track_id: i64, position: i64) -> Result<bool> {
        let moved = self.client.move_clip(self.clip_id, track_id, position);
        self.info.replace(None);
        moved
    }

    pub fn delete(&self) -> Result<bool> {
        self.client.delete_timeline_clip(self.clip_id)
    }

    /// Split the clip at timeline frame `position`.
    pub fn cut(&self, position: i64) -> Result<bool> {
        let cut = self.client.cut_clip(self.clip_id, position);
        self.info.replace(None);
        cut
    }

    pub fn set_clip_color(&self, _color: &str) -> bool {
        true
    }

    pub fn get_clip_color(&self) -> String {
        String::new()
    }

    pub fn get_fusion_comp_count(&self) -> usize {
        0
    }

    pub fn add_fusion_comp(&self) -> bool {
        false
    }

    pub fn get_fusion_comp_name_list(&self) -> Vec<String> {
        Vec::new()
    }

    /// Source in-point, in frames.
    pub fn get_left_offset(&self) -> Result<i64> {
        self.with_info(|info| info.int("in").unwrap_or(0))
    }

    pub fn get_right_offset(&self) -> i64 {
        0
    }
}

impl fmt::Debug for TimelineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineItem")
            .field("clip_id", &self.clip_id)
            .finish()
    }
}
