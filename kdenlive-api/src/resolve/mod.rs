//! Resolve-shaped handles over a shared [`BusClient`].
//!
//! Scripts written against DaVinci Resolve walk `Resolve -> ProjectManager -> Project ->
//! MediaPool / Timeline`. The handles here mirror that tree. None of them own remote state: each
//! holds an `Rc<BusClient>` and forwards to the [`ops`](crate::ops) layer, so handles are cheap to
//! create and any number of them may point at the same project.
//!
//! Kdenlive has no counterpart for some Resolve features (Fusion, pages, layout presets, the
//! project database, render queues). Those calls are answered locally with fixed values.

mod media_pool;
mod media_storage;
mod project;
mod project_manager;
mod timeline;

pub use media_pool::{AppendSource, ClipMarker, Folder, MediaPool, MediaPoolItem};
pub use media_storage::{MediaStorage, StorageItem, MEDIA_EXTENSIONS};
pub use project::Project;
pub use project_manager::ProjectManager;
pub use timeline::{MarkerColor, Timeline, TimelineItem, TimelineMarker};

use crate::bus::{BusClient, BusSettings};
use crate::ops::tracks::TrackKind;
use std::rc::Rc;

pub const EXPORT_AAF: i64 = 0;
pub const EXPORT_DRT: i64 = 1;
pub const EXPORT_EDL: i64 = 2;
pub const EXPORT_FCP_7_XML: i64 = 3;
pub const EXPORT_FCPXML_1_3: i64 = 4;
pub const EXPORT_FCPXML_1_4: i64 = 5;
pub const EXPORT_FCPXML_1_5: i64 = 6;
pub const EXPORT_FCPXML_1_6: i64 = 7;
pub const EXPORT_FCPXML_1_7: i64 = 8;
pub const EXPORT_FCPXML_1_8: i64 = 9;
pub const EXPORT_FCPXML_1_9: i64 = 10;
pub const EXPORT_FCPXML_1_10: i64 = 11;
pub const EXPORT_HDL: i64 = 12;
pub const EXPORT_TEXT_CSV: i64 = 13;
pub const EXPORT_TEXT_TAB: i64 = 14;
pub const EXPORT_DOLBY_VISION_VER_2_9: i64 = 15;
pub const EXPORT_DOLBY_VISION_VER_4_0: i64 = 16;
pub const EXPORT_OTIO: i64 = 17;

// AAF export sub-types
pub const EXPORT_AAF_NEW: i64 = 0;
pub const EXPORT_AAF_EXISTING: i64 = 1;

// EDL export sub-types
pub const EXPORT_CDL: i64 = 0;
pub const EXPORT_SDL: i64 = 1;
pub const EXPORT_MISSING_CLIPS: i64 = 2;

/// Guide categories of Kdenlive's default palette.
pub const MARKER_PURPLE: i64 = 0;
pub const MARKER_BLUE: i64 = 1;
pub const MARKER_GREEN: i64 = 2;
pub const MARKER_YELLOW: i64 = 3;
pub const MARKER_ORANGE: i64 = 4;
pub const MARKER_RED: i64 = 5;

/// Default scene length, 5 s at 25 fps.
pub const SCENE_DURATION_FRAMES: i64 = 125;
/// Default mix length, about half a second at 25 fps.
pub const DEFAULT_MIX_DURATION: i64 = 13;

/// Guide category for a Resolve marker colour. Resolve-only colours map to the nearest one.
pub fn marker_category(color: &str) -> Option<i64> {
    let category = match color {
        "Purple" | "Fuchsia" | "Lavender" => MARKER_PURPLE,
        "Blue" | "Cyan" | "Sky" => MARKER_BLUE,
        "Green" | "Mint" => MARKER_GREEN,
        "Yellow" | "Lemon" | "Cream" => MARKER_YELLOW,
        "Orange" | "Sand" | "Cocoa" => MARKER_ORANGE,
        "Red" | "Rose" => MARKER_RED,
        _ => return None,
    };
    Some(category)
}

/// Resolve colour name for a guide category. Unknown categories read as purple.
pub fn marker_color(category: i64) -> &'static str {
    match category {
        MARKER_BLUE => "Blue",
        MARKER_GREEN => "Green",
        MARKER_YELLOW => "Yellow",
        MARKER_ORANGE => "Orange",
        MARKER_RED => "Red",
        _ => "Purple",
    }
}

/// Track types in Resolve's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackType {
    Video,
    Audio,
    /// Kdenlive keeps subtitles outside the track list; such queries come back empty.
    Subtitle,
}

impl TrackType {
    pub(crate) fn kind(self) -> Option<TrackKind> {
        match self {
            TrackType::Video => Some(TrackKind::Video),
            TrackType::Audio => Some(TrackKind::Audio),
            TrackType::Subtitle => None,
        }
    }
}

/// Fusion has no Kdenlive counterpart, so no value of this type exists.
#[derive(Debug)]
pub enum Fusion {}

/// Entry point, mirroring Resolve's `Resolve` object.
#[derive(Debug, Clone)]
pub struct Resolve {
    client: Rc<BusClient>,
}

impl Resolve {
    /// Connect with the transports compiled into this build.
    pub fn connect(settings: BusSettings) -> Self {
        Self::from_client(BusClient::connect(settings))
    }

    pub fn from_client(client: BusClient) -> Self {
        Self {
            client: Rc::new(client),
        }
    }

    /// The shared client, for calls the Resolve vocabulary has no word for.
    pub fn client(&self) -> &Rc<BusClient> {
        &self.client
    }

    pub fn get_project_manager(&self) -> ProjectManager {
        ProjectManager::new(self.client.clone())
    }

    pub fn get_media_storage(&self) -> MediaStorage {
        MediaStorage::new(self.client.clone())
    }

    pub fn fusion(&self) -> Option<Fusion> {
        log::warn!("Fusion is a Resolve-only feature, returning nothing");
        None
    }

    /// Kdenlive has a single editing page; switching always succeeds.
    pub fn open_page(&self, _page_name: &str) -> bool {
        true
    }

    pub fn get_current_page(&self) -> &'static str {
        "edit"
    }

    pub fn get_product_name(&self) -> &'static str {
        "Kdenlive"
    }

    /// `[major, minor, patch, build]` plus a suffix, as Resolve reports it.
    pub fn get_version(&self) -> ([u32; 4], &'static str) {
        ([25, 0, 0, 0], "")
    }

    pub fn get_version_string(&self) -> &'static str {
        "25.0.0"
    }

    pub fn get_current_layout_preset(&self) -> &'static str {
        ""
    }

    pub fn load_layout_preset(&self, _preset_name: &str) -> bool {
        true
    }

    pub fn update_layout_preset(&self, _preset_name: &str) -> bool {
        true
    }

    pub fn export_layout_preset(&self, _preset_name: &str, _path: &str) -> bool {
        true
    }

    pub fn delete_layout_preset(&self, _preset_name: &str) -> bool {
        true
    }

    pub fn save_layout_preset(&self, _preset_name: &str) -> bool {
        true
    }

    pub fn import_layout_preset(&self, _path: &str, _preset_name: &str) -> bool {
        true
    }

    /// Quit Kdenlive.
    pub fn quit(&self) -> crate::Result<()> {
        self.client.exit_app()
    }
}
