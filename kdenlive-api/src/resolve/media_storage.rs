use super::media_pool::absolute;
use super::MediaPoolItem;
use crate::bus::BusClient;
use crate::error::Result;
use crate::ops::ROOT_FOLDER_ID;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Extensions (lowercase, without the dot) picked up when a whole folder is imported.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "mxf", "webm", "mp3", "wav", "flac", "aac", "ogg", "png", "jpg",
    "jpeg", "tiff", "bmp", "exr",
];

/// What [`MediaStorage::add_item_list_to_media_pool`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageItem {
    /// A file, or a folder whose media files are all imported
    Path(PathBuf),
    /// Resolve's sub-clip form; the whole file is imported.
    SubClip {
        media: PathBuf,
        start_frame: i64,
        end_frame: i64,
    },
    /// A clip that is already in the bin; nothing to import.
    PoolItem(String),
}

impl From<&str> for StorageItem {
    fn from(path: &str) -> Self {
        StorageItem::Path(PathBuf::from(path))
    }
}

impl From<PathBuf> for StorageItem {
    fn from(path: PathBuf) -> Self {
        StorageItem::Path(path)
    }
}

/// File system access and bulk import into the bin.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    client: Rc<BusClient>,
}

impl MediaStorage {
    pub(crate) fn new(client: Rc<BusClient>) -> Self {
        Self { client }
    }

    /// Usual mount roots on this platform. On Windows, the drive letters that exist.
    pub fn get_mounted_volume_list(&self) -> Vec<PathBuf> {
        if cfg!(windows) {
            ('A'..='Z')
                .map(|drive| PathBuf::from(format!("{drive}:\\")))
                .filter(|root| root.exists())
                .collect()
        } else if cfg!(target_os = "macos") {
            vec![PathBuf::from("/Volumes")]
        } else {
            ["/", "/media", "/mnt"].into_iter().map(PathBuf::from).collect()
        }
    }

    /// Sub-directories of `folder`, sorted. Empty when `folder` is not a directory.
    pub fn get_sub_folder_list(&self, folder: &Path) -> Vec<PathBuf> {
        sorted_entries(folder, |path| path.is_dir())
    }

    /// Files in `folder`, sorted.
    pub fn get_file_list(&self, folder: &Path) -> Vec<PathBuf> {
        sorted_entries(folder, |path| path.is_file())
    }

    /// Import files into the root bin folder.
    ///
    /// Folders expand to the media files they contain (by extension, see [`MEDIA_EXTENSIONS`]).
    /// Paths that do not exist are dropped.
    pub fn add_item_list_to_media_pool(&self, items: &[StorageItem]) -> Result<Vec<MediaPoolItem>> {
        let mut paths = Vec::new();
        for item in items {
            match item {
                StorageItem::Path(path) if path.is_dir() => paths.extend(media_files(path)),
                StorageItem::Path(path) => paths.push(path.clone()),
                StorageItem::SubClip { media, .. } => paths.push(media.clone()),
                StorageItem::PoolItem(_) => {}
            }
        }

        let paths: Vec<String> = paths
            .into_iter()
            .filter(|path| {
                let exists = path.exists();
                if !exists {
                    log::debug!("skipping missing media {}", path.display());
                }
                exists
            })
            .map(|path| absolute(&path).to_string_lossy().into_owned())
            .collect();
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .client
            .import_media(&paths, ROOT_FOLDER_ID)?
            .into_iter()
            .map(|id| MediaPoolItem::new(self.client.clone(), id))
            .collect())
    }

    pub fn reveal_in_storage(&self, _path: &Path) -> bool {
        true
    }
}

fn sorted_entries(folder: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(folder) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| keep(path))
        .collect();
    paths.sort();
    paths
}

fn media_files(folder: &Path) -> Vec<PathBuf> {
    sorted_entries(folder, |path| {
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| MEDIA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    })
}
