use super::{marker_category, Timeline, MARKER_PURPLE};
use crate::bus::{BusClient, Record, RecordExt, RemoteValue};
use crate::error::Result;
use crate::ops::ROOT_FOLDER_ID;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A marker kept on a [`MediaPoolItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipMarker {
    pub color: String,
    pub name: String,
    pub note: String,
    pub duration: i64,
    pub custom_data: String,
}

impl ClipMarker {
    pub fn new(color: &str, name: &str) -> Self {
        Self {
            color: color.to_string(),
            name: name.to_string(),
            note: String::new(),
            duration: 1,
            custom_data: String::new(),
        }
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = note.to_string();
        self
    }

    pub fn with_custom_data(mut self, custom_data: &str) -> Self {
        self.custom_data = custom_data.to_string();
        self
    }

    /// Guide comment text: `name: note`, or whichever of the two is set.
    pub(crate) fn comment(&self) -> String {
        guide_comment(&self.name, &self.note)
    }
}

pub(crate) fn guide_comment(name: &str, note: &str) -> String {
    match (name.is_empty(), note.is_empty()) {
        (_, true) => name.to_string(),
        (true, false) => note.to_string(),
        (false, false) => format!("{name}: {note}"),
    }
}

/// A clip in the project bin.
///
/// Properties are fetched on first use and cached on the handle. Markers live on the handle
/// too; Kdenlive only sees them as mirrored timeline guides.
pub struct MediaPoolItem {
    client: Rc<BusClient>,
    bin_id: String,
    properties: RefCell<Option<Record>>,
    markers: RefCell<BTreeMap<i64, ClipMarker>>,
}

impl MediaPoolItem {
    pub(crate) fn new(client: Rc<BusClient>, bin_id: impl Into<String>) -> Self {
        Self {
            client,
            bin_id: bin_id.into(),
            properties: RefCell::new(None),
            markers: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn bin_id(&self) -> &str {
        &self.bin_id
    }

    fn with_properties<T>(&self, read: impl FnOnce(&Record) -> T) -> T {
        let mut cache = self.properties.borrow_mut();
        let properties = match cache.take() {
            Some(properties) => properties,
            None => self.client.get_clip_properties(&self.bin_id),
        };
        let value = read(&properties);
        *cache = Some(properties);
        value
    }

    pub fn get_name(&self) -> String {
        self.with_properties(|props| props.text("name"))
    }

    /// One property as text, empty when absent.
    pub fn get_clip_property(&self, key: &str) -> String {
        self.with_properties(|props| props.text(key))
    }

    /// All properties, plus the Resolve names `File Name`, `File Path`, `Frames` and
    /// `Video Codec` where Kdenlive has an equivalent.
    pub fn get_clip_properties(&self) -> Record {
        let mut props = self.with_properties(Record::clone);
        if let Some(name) = props.get("name").cloned() {
            props.entry("File Name".to_string()).or_insert(name);
        }
        for source in ["path", "url"] {
            if let Some(path) = props.get(source).cloned() {
                props.entry("File Path".to_string()).or_insert(path);
            }
        }
        if let Some(duration) = props.get("duration").map(RemoteValue::to_text) {
            props
                .entry("Frames".to_string())
                .or_insert(RemoteValue::Str(duration));
        }
        if let Some(kind) = props.get("type").map(|kind| kind.as_i64().unwrap_or(0)) {
            let codec = match kind {
                0 | 2 => "Video",
                1 => "Audio",
                _ => "",
            };
            props
                .entry("Video Codec".to_string())
                .or_insert(RemoteValue::from(codec));
        }
        props
    }

    pub fn get_media_id(&self) -> &str {
        &self.bin_id
    }

    /// Duration in frames.
    pub fn get_duration(&self) -> i64 {
        self.with_properties(|props| props.int("duration").unwrap_or(0))
    }

    /// Remove the clip from the bin.
    pub fn delete(&self) -> Result<bool> {
        self.properties.replace(None);
        self.client.delete_bin_clip(&self.bin_id)
    }

    /// Add a marker at `frame` (relative to the clip start). A timeline guide with the same
    /// colour and text is added too; when that fails the marker is still kept here.
    pub fn add_marker(&self, frame: i64, marker: ClipMarker) -> bool {
        let category = marker_category(&marker.color).unwrap_or(MARKER_PURPLE);
        if let Err(err) = self.client.add_guide(frame, &marker.comment(), category) {
            log::debug!("guide for clip {} marker at {frame} not added: {err}", self.bin_id);
        }
        self.markers.borrow_mut().insert(frame, marker);
        true
    }

    pub fn get_markers(&self) -> BTreeMap<i64, ClipMarker> {
        self.markers.borrow().clone()
    }

    /// The first marker (by frame) carrying `custom_data`, with its frame.
    pub fn get_marker_by_custom_data(&self, custom_data: &str) -> Option<(i64, ClipMarker)> {
        self.markers
            .borrow()
            .iter()
            .find(|(_, marker)| marker.custom_data == custom_data)
            .map(|(frame, marker)| (*frame, marker.clone()))
    }

    pub fn update_marker_custom_data(&self, frame: i64, custom_data: &str) -> bool {
        match self.markers.borrow_mut().get_mut(&frame) {
            Some(marker) => {
                marker.custom_data = custom_data.to_string();
                true
            }
            None => false,
        }
    }

    pub fn get_marker_custom_data(&self, frame: i64) -> String {
        self.markers
            .borrow()
            .get(&frame)
            .map(|marker| marker.custom_data.clone())
            .unwrap_or_default()
    }

    pub fn delete_marker_at_frame(&self, frame: i64) -> bool {
        self.markers.borrow_mut().remove(&frame).is_some()
    }

    /// True when at least one marker was removed.
    pub fn delete_markers_by_color(&self, color: &str) -> bool {
        self.delete_markers_where(|marker| marker.color == color)
    }

    pub fn delete_marker_by_custom_data(&self, custom_data: &str) -> bool {
        self.delete_markers_where(|marker| marker.custom_data == custom_data)
    }

    fn delete_markers_where(&self, doomed: impl Fn(&ClipMarker) -> bool) -> bool {
        let mut markers = self.markers.borrow_mut();
        let before = markers.len();
        markers.retain(|_, marker| !doomed(marker));
        markers.len() < before
    }

    /// Scene cut timestamps (seconds) found by Kdenlive's FFmpeg scene detection.
    pub fn detect_scenes(&self, threshold: f64, min_duration: i64) -> Result<Vec<f64>> {
        self.client
            .detect_scenes(&self.bin_id, threshold, min_duration)
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

    pub fn set_clip_color(&self, _color: &str) -> bool {
        true
    }

    pub fn get_clip_color(&self) -> String {
        String::new()
    }
}

impl Clone for MediaPoolItem {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            bin_id: self.bin_id.clone(),
            properties: RefCell::new(self.properties.borrow().clone()),
            markers: RefCell::new(self.markers.borrow().clone()),
        }
    }
}

impl fmt::Debug for MediaPoolItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPoolItem")
            .field("bin_id", &self.bin_id)
            .finish()
    }
}

/// A bin folder. The root folder has id `-1`.
#[derive(Clone)]
pub struct Folder {
    client: Rc<BusClient>,
    folder_id: String,
    name: String,
}

impl Folder {
    pub(crate) fn new(client: Rc<BusClient>, folder_id: &str, name: &str) -> Self {
        Self {
            client,
            folder_id: folder_id.to_string(),
            name: name.to_string(),
        }
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_clip_list(&self) -> Result<Vec<MediaPoolItem>> {
        Ok(self
            .client
            .get_folder_clip_ids(&self.folder_id)?
            .into_iter()
            .map(|id| MediaPoolItem::new(self.client.clone(), id))
            .collect())
    }

    /// The scripting interface does not enumerate sub-folders.
    pub fn get_sub_folder_list(&self) -> Vec<Folder> {
        Vec::new()
    }

    pub fn get_is_folder_stale(&self) -> bool {
        false
    }
}

impl fmt::Debug for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Folder")
            .field("folder_id", &self.folder_id)
            .field("name", &self.name)
            .finish()
    }
}

/// What [`MediaPool::append_to_timeline`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum AppendSource {
    /// A clip already in the bin
    BinId(String),
    /// Resolve's sub-clip form. A `media` path is imported first. The frame range is carried
    /// for Resolve compatibility; the whole clip is placed.
    SubClip {
        bin_id: Option<String>,
        media: Option<PathBuf>,
        start_frame: i64,
        end_frame: i64,
    },
}

impl From<&MediaPoolItem> for AppendSource {
    fn from(item: &MediaPoolItem) -> Self {
        AppendSource::BinId(item.bin_id.clone())
    }
}

impl From<&str> for AppendSource {
    fn from(bin_id: &str) -> Self {
        AppendSource::BinId(bin_id.to_string())
    }
}

/// The project bin.
pub struct MediaPool {
    client: Rc<BusClient>,
    current_folder: RefCell<Option<Folder>>,
}

impl MediaPool {
    pub(crate) fn new(client: Rc<BusClient>) -> Self {
        Self {
            client,
            current_folder: RefCell::new(None),
        }
    }

    pub fn get_root_folder(&self) -> Folder {
        Folder::new(self.client.clone(), ROOT_FOLDER_ID, "Root")
    }

    /// Create a folder under `parent` (the root when `None`).
    pub fn add_sub_folder(&self, parent: Option<&Folder>, name: &str) -> Result<Option<Folder>> {
        let parent_id = parent.map_or(ROOT_FOLDER_ID, Folder::folder_id);
        let folder_id = self.client.create_folder(name, parent_id)?;
        Ok((!folder_id.is_empty()).then(|| Folder::new(self.client.clone(), &folder_id, name)))
    }

    pub fn set_current_folder(&self, folder: &Folder) -> bool {
        self.current_folder.replace(Some(folder.clone()));
        true
    }

    /// The folder set with [`set_current_folder`](Self::set_current_folder), else the root.
    pub fn get_current_folder(&self) -> Folder {
        self.current_folder
            .borrow()
            .clone()
            .unwrap_or_else(|| self.get_root_folder())
    }

    /// Import files into `folder` (the root when `None`). Relative paths are made absolute.
    /// Files that Kdenlive did not take are left out.
    pub fn import_media<P: AsRef<Path>>(
        &self,
        file_paths: &[P],
        folder: Option<&Folder>,
    ) -> Result<Vec<MediaPoolItem>> {
        Ok(self
            .import_media_each(file_paths, folder)?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Like [`import_media`](Self::import_media), but with one entry per input path, `None`
    /// where the import produced no clip.
    pub fn import_media_each<P: AsRef<Path>>(
        &self,
        file_paths: &[P],
        folder: Option<&Folder>,
    ) -> Result<Vec<Option<MediaPoolItem>>> {
        let folder_id = folder.map_or(ROOT_FOLDER_ID, Folder::folder_id);
        let paths: Vec<String> = file_paths
            .iter()
            .map(|path| absolute(path.as_ref()).to_string_lossy().into_owned())
            .collect();
        Ok(self
            .client
            .import_media_each(&paths, folder_id)?
            .into_iter()
            .map(|id| id.map(|id| MediaPoolItem::new(self.client.clone(), id)))
            .collect())
    }

    /// Import every file in `dir` whose name matches the glob `pattern`, in sorted order.
    pub fn import_media_from_folder(
        &self,
        dir: &Path,
        pattern: &str,
        folder: Option<&Folder>,
    ) -> Result<Vec<MediaPoolItem>> {
        let full = Path::new(&glob::Pattern::escape(&absolute(dir).to_string_lossy())).join(pattern);
        let mut files: Vec<PathBuf> = match glob::glob(&full.to_string_lossy()) {
            Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
            Err(err) => {
                log::warn!("bad import pattern {pattern}: {err}");
                Vec::new()
            }
        };
        if files.is_empty() {
            return Ok(Vec::new());
        }
        files.sort();
        self.import_media(&files, folder)
    }

    /// Create a title clip from kdenlivetitle XML.
    pub fn create_title_clip(
        &self,
        title_xml: &str,
        duration: i64,
        name: &str,
        folder_id: &str,
    ) -> Result<Option<MediaPoolItem>> {
        let bin_id = self
            .client
            .create_title_clip(title_xml, duration, name, folder_id)?;
        Ok((!bin_id.is_empty() && bin_id != "-1")
            .then(|| MediaPoolItem::new(self.client.clone(), bin_id)))
    }

    pub fn get_all_clips(&self) -> Result<Vec<MediaPoolItem>> {
        Ok(self
            .client
            .get_all_clip_ids()?
            .into_iter()
            .map(|id| MediaPoolItem::new(self.client.clone(), id))
            .collect())
    }

    pub fn get_clip_by_id(&self, bin_id: &str) -> MediaPoolItem {
        MediaPoolItem::new(self.client.clone(), bin_id)
    }

    /// The active timeline always exists, so this hands it back.
    pub fn create_empty_timeline(&self, _name: &str) -> Timeline {
        Timeline::new(self.client.clone())
    }

    /// Place clips back to back on `track_id`, starting at `start_position`.
    ///
    /// Without a track id the first video track is used (track 0 when there is none).
    /// Returns the new timeline clip ids; empty when nothing could be resolved to a bin clip.
    pub fn append_to_timeline(
        &self,
        sources: &[AppendSource],
        track_id: Option<i64>,
        start_position: i64,
    ) -> Result<Vec<i64>> {
        let mut bin_ids = Vec::new();
        for source in sources {
            match source {
                AppendSource::BinId(id) => bin_ids.push(id.clone()),
                AppendSource::SubClip {
                    bin_id: Some(id), ..
                } => bin_ids.push(id.clone()),
                AppendSource::SubClip {
                    bin_id: None,
                    media: Some(media),
                    start_frame,
                    end_frame,
                } => {
                    log::debug!(
                        "importing {} for sub-clip {start_frame}..{end_frame}",
                        media.display()
                    );
                    let path = absolute(media).to_string_lossy().into_owned();
                    bin_ids.extend(self.client.import_media([path], ROOT_FOLDER_ID)?);
                }
                AppendSource::SubClip { .. } => {}
            }
        }
        if bin_ids.is_empty() {
            return Ok(Vec::new());
        }

        let track_id = match track_id {
            Some(id) => id,
            None => self.first_video_track()?,
        };
        self.client
            .insert_clips_sequentially(&bin_ids, track_id, start_position)
    }

    fn first_video_track(&self) -> Result<i64> {
        Ok(self
            .client
            .get_all_tracks_info()?
            .iter()
            .find(|track| !track.get("audio").map_or(true, RemoteValue::as_bool))
            .and_then(|track| track.int("id"))
            .unwrap_or(0))
    }

    /// Delete clips from the bin. True only if every deletion succeeded.
    pub fn delete_clips(&self, clips: &[MediaPoolItem]) -> Result<bool> {
        let mut all = true;
        for clip in clips {
            all &= clip.delete()?;
        }
        Ok(all)
    }

    /// Move clips into `target`. True only if every move succeeded.
    pub fn move_clips(&self, clips: &[MediaPoolItem], target: &Folder) -> Result<bool> {
        let mut all = true;
        for clip in clips {
            all &= self.client.move_bin_clip(clip.bin_id(), target.folder_id())?;
        }
        Ok(all)
    }
}

impl fmt::Debug for MediaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPool")
            .field("current_folder", &*self.current_folder.borrow())
            .finish()
    }
}

pub(crate) fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
