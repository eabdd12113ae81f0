//! Project level operations: lifecycle, properties, profile and undo history.

use crate::args;
use crate::bus::BusClient;
use crate::error::Result;
use indexmap::IndexMap;

impl BusClient {
    pub fn new_project(&self, name: &str) -> Result<String> {
        self.call_text("scriptNewProject", &args![name])
    }

    /// Open a project file, retrying with backoff while Kdenlive is still starting up.
    ///
    /// The last failure is returned once the attempts in the client's
    /// [`RetryPolicy`](crate::bus::RetryPolicy) are used up.
    pub fn open_project(&self, file_path: &str) -> Result<bool> {
        let mut delays = self.retry_policy().delays().into_iter();
        loop {
            match self.call_bool("scriptOpenProject", &args![file_path]) {
                Ok(opened) => return Ok(opened),
                Err(err) => match delays.next() {
                    Some(delay) => {
                        log::warn!("opening {file_path} failed ({err}), retrying in {delay:?}");
                        self.sleep_for(delay);
                    }
                    None => return Err(err),
                },
            }
        }
    }

    pub fn save_project(&self) -> Result<bool> {
        self.call_bool("scriptSaveProject", &[])
    }

    pub fn save_project_as(&self, file_path: &str) -> Result<bool> {
        self.call_bool("scriptSaveProjectAs", &args![file_path])
    }

    pub fn get_project_name(&self) -> Result<String> {
        self.call_text("scriptGetProjectName", &[])
    }

    pub fn get_project_path(&self) -> Result<String> {
        self.call_text("scriptGetProjectPath", &[])
    }

    pub fn get_project_fps(&self) -> Result<f64> {
        self.call_f64("scriptGetProjectFps", &[], 0.0)
    }

    pub fn get_project_resolution_width(&self) -> Result<i64> {
        self.call_i64("scriptGetProjectResolutionWidth", &[], 0)
    }

    pub fn get_project_resolution_height(&self) -> Result<i64> {
        self.call_i64("scriptGetProjectResolutionHeight", &[], 0)
    }

    pub fn get_project_property(&self, key: &str) -> Result<String> {
        self.call_text("scriptGetProjectProperty", &args![key])
    }

    pub fn set_project_property(&self, key: &str, value: &str) -> Result<bool> {
        self.call_bool("scriptSetProjectProperty", &args![key, value])
    }

    /// Total timeline duration in frames.
    pub fn get_project_duration(&self) -> Result<i64> {
        self.call_i64("scriptGetProjectDuration", &[], 0)
    }

    /// Colour space identifier, e.g. `709` or `2020`.
    pub fn get_project_color_space(&self) -> Result<String> {
        self.call_text("scriptGetProjectColorSpace", &[])
    }

    pub fn set_project_color_space(&self, color_space: &str) -> Result<bool> {
        self.call_bool("scriptSetProjectColorSpace", &args![color_space])
    }

    pub fn get_project_audio_sample_rate(&self) -> Result<i64> {
        self.call_i64("scriptGetProjectAudioSampleRate", &[], 0)
    }

    /// Change the project profile. The frame rate is given as a fraction, e.g. 30000/1001.
    pub fn set_project_profile(
        &self,
        width: i64,
        height: i64,
        fps_num: i64,
        fps_den: i64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptSetProjectProfile",
            &args![width, height, fps_num, fps_den],
        )
    }

    /// Undo up to `steps` operations. True if at least one was undone.
    pub fn undo(&self, steps: i64) -> Result<bool> {
        self.call_bool("scriptUndo", &args![steps])
    }

    pub fn redo(&self, steps: i64) -> Result<bool> {
        self.call_bool("scriptRedo", &args![steps])
    }

    /// Undo stack state (`can_undo`, `can_redo`, `undo_text`, `redo_text`, `index`, `count`).
    pub fn undo_status(&self) -> Result<IndexMap<String, String>> {
        Ok(parse_pairs(&self.call_text("scriptUndoStatus", &[])?))
    }

    pub fn exit_app(&self) -> Result<()> {
        self.invoke("exitApp", &[])?;
        Ok(())
    }
}

/// Parse `k=v;k=v`. Pieces without `=` are ignored; values may contain `=`.
pub fn parse_pairs(text: &str) -> IndexMap<String, String> {
    text.split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
