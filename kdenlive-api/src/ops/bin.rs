//! Project bin: importing media, folders, clip properties, titles, proxies and analysis.

use super::ROOT_FOLDER_ID;
use crate::args;
use crate::bus::{BusClient, Record, RemoteValue};
use crate::error::Result;
use std::collections::HashSet;

impl BusClient {
    /// Import files into the bin, returning the new bin ids in input order. Files that
    /// produce no new id are left out; see [`import_media_each`](Self::import_media_each) to
    /// keep the result aligned with the input.
    pub fn import_media<I, S>(&self, file_paths: I, folder_id: &str) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self
            .import_media_each(file_paths, folder_id)?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Import files into the bin, one result per input path: the new bin id, or `None` when
    /// no new clip appeared for that file.
    ///
    /// `addProjectClip` does not report the id it creates, so the bin's id list is read
    /// before and after each file. When several ids appear, the numerically smallest one is
    /// taken.
    pub fn import_media_each<I, S>(
        &self,
        file_paths: I,
        folder_id: &str,
    ) -> Result<Vec<Option<String>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut imported = Vec::new();
        for path in file_paths {
            let path = path.as_ref();
            let before: HashSet<String> = self.get_all_clip_ids()?.into_iter().collect();

            if !folder_id.is_empty() && folder_id != ROOT_FOLDER_ID {
                self.invoke("addProjectClip", &args![path, folder_id])?;
            } else {
                self.invoke("addProjectClip", &args![path])?;
            }
            self.sleep_for(self.settings().import_settle);

            let newest = self
                .get_all_clip_ids()?
                .into_iter()
                .filter(|id| !before.contains(id))
                .min_by_key(|id| id.parse::<i64>().unwrap_or(i64::MAX));
            match &newest {
                Some(id) => log::debug!("imported {path} as bin clip {id}"),
                None => log::warn!("no new bin clip appeared after importing {path}"),
            }
            imported.push(newest);
        }
        Ok(imported)
    }

    /// Create a bin folder. Returns the new folder id.
    pub fn create_folder(&self, name: &str, parent_id: &str) -> Result<String> {
        self.call_text("scriptCreateFolder", &args![name, parent_id])
    }

    pub fn get_all_clip_ids(&self) -> Result<Vec<String>> {
        Ok(self.invoke("scriptGetAllClipIds", &[])?.into_string_list())
    }

    pub fn get_folder_clip_ids(&self, folder_id: &str) -> Result<Vec<String>> {
        Ok(self
            .invoke("scriptGetFolderClipIds", &args![folder_id])?
            .into_string_list())
    }

    /// Clip properties (name, duration, type, url, ...).
    ///
    /// Lookup failures are not errors: an unknown or unreachable clip yields a record that only
    /// carries its `id`.
    pub fn get_clip_properties(&self, bin_id: &str) -> Record {
        let record = match self.invoke("scriptGetClipProperties", &args![bin_id]) {
            Ok(value) => value.into_map(),
            Err(err) => {
                log::debug!("clip properties for {bin_id} unavailable: {err}");
                Record::new()
            }
        };
        if record.is_empty() {
            let mut fallback = Record::new();
            fallback.insert("id".to_string(), RemoteValue::from(bin_id));
            fallback
        } else {
            record
        }
    }

    pub fn rename_bin_clip(&self, bin_id: &str, new_name: &str) -> Result<bool> {
        self.call_bool("scriptRenameBinClip", &args![bin_id, new_name])
    }

    pub fn move_bin_clip(&self, bin_id: &str, target_folder_id: &str) -> Result<bool> {
        self.call_bool("scriptMoveBinClip", &args![bin_id, target_folder_id])
    }

    pub fn get_clip_metadata(&self, bin_id: &str) -> Result<Record> {
        self.call_record("scriptGetClipMetadata", &args![bin_id])
    }

    pub fn delete_bin_clip(&self, bin_id: &str) -> Result<bool> {
        self.call_bool("scriptDeleteBinClip", &args![bin_id])
    }

    pub fn relink_bin_clip(&self, bin_id: &str, new_file_path: &str) -> Result<bool> {
        self.call_bool("scriptRelinkBinClip", &args![bin_id, new_file_path])
    }

    /// Create a title clip from kdenlivetitle XML. Returns the bin id, or `"-1"`.
    pub fn create_title_clip(
        &self,
        title_xml: &str,
        duration_frames: i64,
        clip_name: &str,
        folder_id: &str,
    ) -> Result<String> {
        let id = self.call_text(
            "scriptCreateTitleClip",
            &args![title_xml, duration_frames, clip_name, folder_id],
        )?;
        Ok(if id.is_empty() { "-1".to_string() } else { id })
    }

    pub fn get_title_xml(&self, bin_id: &str) -> Result<String> {
        self.call_text("scriptGetTitleXml", &args![bin_id])
    }

    pub fn set_title_xml(&self, bin_id: &str, new_xml: &str) -> Result<bool> {
        self.call_bool("scriptSetTitleXml", &args![bin_id, new_xml])
    }

    /// Proxy state: `supportsProxy`, `hasProxy`, `proxyPath`, `originalUrl`, `isGenerating`.
    pub fn get_clip_proxy_status(&self, bin_id: &str) -> Result<Record> {
        self.call_record("scriptGetClipProxyStatus", &args![bin_id])
    }

    pub fn set_clip_proxy(&self, bin_id: &str, enabled: bool) -> Result<bool> {
        self.call_bool("scriptSetClipProxy", &args![bin_id, enabled])
    }

    pub fn delete_clip_proxy(&self, bin_id: &str) -> Result<bool> {
        self.call_bool("scriptDeleteClipProxy", &args![bin_id])
    }

    pub fn rebuild_clip_proxy(&self, bin_id: &str) -> Result<bool> {
        self.call_bool("scriptRebuildClipProxy", &args![bin_id])
    }

    /// Audio level samples for one stream of a bin clip.
    pub fn get_audio_levels(
        &self,
        bin_id: &str,
        stream: i64,
        downsample: i64,
        mode: i64,
    ) -> Result<Vec<f64>> {
        let value = self.invoke(
            "scriptGetAudioLevels",
            &args![bin_id, stream, downsample, mode],
        )?;
        Ok(match value {
            RemoteValue::List(items) => items.iter().filter_map(RemoteValue::as_f64).collect(),
            _ => Vec::new(),
        })
    }

    /// Scene cut timestamps in seconds. Lower thresholds find more cuts; `min_duration` is the
    /// minimum number of frames between cuts.
    pub fn detect_scenes(
        &self,
        bin_clip_id: &str,
        threshold: f64,
        min_duration: i64,
    ) -> Result<Vec<f64>> {
        Ok(self
            .invoke(
                "scriptDetectScenes",
                &args![bin_clip_id, threshold, min_duration],
            )?
            .into_list()
            .iter()
            .filter_map(RemoteValue::as_f64)
            .collect())
    }

    /// Render one frame of a bin clip to an image. Returns the written path.
    pub fn render_bin_frame(
        &self,
        bin_id: &str,
        frame: i64,
        width: i64,
        height: i64,
        output_path: &str,
    ) -> Result<String> {
        self.call_text(
            "scriptRenderBinFrame",
            &args![bin_id, frame, width, height, output_path],
        )
    }
}
