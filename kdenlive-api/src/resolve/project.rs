use super::{MediaPool, Timeline, TimelineItem};
use crate::bus::{BusClient, Record, RemoteValue};
use crate::error::Result;
use crate::ops::tracks::TrackKind;
use std::rc::Rc;

/// The currently open project.
///
/// Resolve projects hold several timelines; here the active Kdenlive sequence is the one and
/// only timeline.
#[derive(Debug, Clone)]
pub struct Project {
    client: Rc<BusClient>,
}

impl Project {
    pub(crate) fn new(client: Rc<BusClient>) -> Self {
        Self { client }
    }

    pub fn get_name(&self) -> Result<String> {
        self.client.get_project_name()
    }

    pub fn set_name(&self, name: &str) -> Result<bool> {
        self.client.set_project_property("projectName", name)
    }

    pub fn get_media_pool(&self) -> MediaPool {
        MediaPool::new(self.client.clone())
    }

    pub fn get_current_timeline(&self) -> Timeline {
        Timeline::new(self.client.clone())
    }

    /// Read a project property. The Resolve keys `timelineFrameRate`,
    /// `timelineResolutionWidth` and `timelineResolutionHeight` read the profile instead.
    pub fn get_setting(&self, key: &str) -> Result<String> {
        match key {
            "timelineFrameRate" => Ok(format!("{:?}", self.client.get_project_fps()?)),
            "timelineResolutionWidth" => Ok(self.client.get_project_resolution_width()?.to_string()),
            "timelineResolutionHeight" => {
                Ok(self.client.get_project_resolution_height()?.to_string())
            }
            _ => self.client.get_project_property(key),
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<bool> {
        self.client.set_project_property(key, value)
    }

    pub fn get_fps(&self) -> Result<f64> {
        self.client.get_project_fps()
    }

    /// `(width, height)` in pixels.
    pub fn get_resolution(&self) -> Result<(i64, i64)> {
        Ok((
            self.client.get_project_resolution_width()?,
            self.client.get_project_resolution_height()?,
        ))
    }

    pub fn get_resolution_width(&self) -> Result<i64> {
        self.client.get_project_resolution_width()
    }

    pub fn get_resolution_height(&self) -> Result<i64> {
        self.client.get_project_resolution_height()
    }

    pub fn save(&self) -> Result<bool> {
        self.client.save_project()
    }

    pub fn save_as(&self, file_path: &str) -> Result<bool> {
        self.client.save_project_as(file_path)
    }

    pub fn get_project_path(&self) -> Result<String> {
        self.client.get_project_path()
    }

    /// 1 while the timeline has a video track, else 0. A failed lookup counts as 1.
    pub fn get_timeline_count(&self) -> usize {
        match self.client.get_track_count(TrackKind::Video) {
            Ok(count) => usize::from(count > 0),
            Err(err) => {
                log::debug!("track count unavailable: {err}");
                1
            }
        }
    }

    /// The timeline at 1-based `index`; only index 1 exists.
    pub fn get_timeline_by_index(&self, index: usize) -> Option<Timeline> {
        (index == 1).then(|| self.get_current_timeline())
    }

    pub fn set_current_timeline(&self, _timeline: &Timeline) -> bool {
        true
    }

    pub fn get_current_video_item(&self) -> Option<TimelineItem> {
        None
    }

    /// Kdenlive renders from profiles, so preset names are accepted and ignored.
    pub fn load_render_preset(&self, preset_name: &str) -> bool {
        log::warn!("render preset '{preset_name}' ignored, Kdenlive uses render profiles");
        true
    }

    /// Stored as the `renderFormat` and `renderCodec` project properties.
    pub fn set_current_render_format_and_codec(&self, format: &str, codec: &str) -> Result<bool> {
        self.client.set_project_property("renderFormat", format)?;
        self.client.set_project_property("renderCodec", codec)?;
        Ok(true)
    }

    /// Each setting is stored as a `render_<key>` project property.
    pub fn set_render_settings(&self, settings: &Record) -> Result<bool> {
        for (key, value) in settings {
            self.client
                .set_project_property(&format!("render_{key}"), &value.to_text())?;
        }
        Ok(true)
    }

    pub fn get_render_settings(&self) -> Record {
        Record::new()
    }

    pub fn add_render_job(&self) -> String {
        "job_1".to_string()
    }

    /// Render with the project's current render settings.
    pub fn start_rendering(&self) -> Result<bool> {
        self.client.render("")?;
        Ok(true)
    }

    pub fn is_rendering_in_progress(&self) -> bool {
        false
    }

    pub fn get_render_job_list(&self) -> Vec<Record> {
        Vec::new()
    }

    pub fn get_render_job_status(&self, _job_id: &str) -> Record {
        let mut status = Record::new();
        status.insert("JobStatus".to_string(), RemoteValue::from("Complete"));
        status
    }

    pub fn delete_all_render_jobs(&self) -> bool {
        true
    }

    pub fn delete_render_job(&self, _job_id: &str) -> bool {
        true
    }
}
