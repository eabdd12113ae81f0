//! Subtitle track items and subtitle styles.

use crate::args;
use crate::bus::{Arg, BusClient, Record};
use crate::error::Result;

impl BusClient {
    /// Subtitles, each with `id`, `startFrame`, `endFrame`, `text`, `layer`.
    pub fn get_subtitles(&self) -> Result<Vec<Record>> {
        self.call_records("scriptGetSubtitles", &[])
    }

    /// Add a subtitle. Returns its id, or -1.
    pub fn add_subtitle(&self, start_frame: i64, end_frame: i64, text: &str, layer: i64) -> Result<i64> {
        self.call_i64(
            "scriptAddSubtitle",
            &args![start_frame, end_frame, text, layer],
            -1,
        )
    }

    pub fn edit_subtitle(&self, subtitle_id: i64, new_text: &str) -> Result<bool> {
        self.call_bool("scriptEditSubtitle", &args![subtitle_id, new_text])
    }

    pub fn move_subtitle(&self, subtitle_id: i64, new_start_frame: i64) -> Result<bool> {
        self.call_bool("scriptMoveSubtitle", &args![subtitle_id, new_start_frame])
    }

    pub fn resize_subtitle(&self, subtitle_id: i64, new_duration: i64, from_right: bool) -> Result<bool> {
        self.call_bool(
            "scriptResizeSubtitle",
            &args![subtitle_id, new_duration, from_right],
        )
    }

    pub fn delete_subtitle(&self, subtitle_id: i64) -> Result<bool> {
        self.call_bool("scriptDeleteSubtitle", &args![subtitle_id])
    }

    /// Import a subtitle file, shifting it by `offset` frames.
    pub fn import_subtitle(&self, file_path: &str, offset: i64, encoding: &str) -> Result<bool> {
        self.call_bool("scriptImportSubtitle", &args![file_path, offset, encoding])
    }

    pub fn export_subtitles(&self, file_path: &str) -> Result<bool> {
        self.call_bool("scriptExportSubtitles", &args![file_path])
    }

    /// Start Kdenlive's speech-to-text on the current timeline.
    pub fn speech_recognition(&self) -> Result<bool> {
        self.call_bool("scriptSpeechRecognition", &[])
    }

    /// Project styles, or the global ones when `global_styles` is set.
    pub fn get_subtitle_styles(&self, global_styles: bool) -> Result<Vec<Record>> {
        self.call_records("scriptGetSubtitleStyles", &args![global_styles])
    }

    /// Create or update a style. Keys are the style property names (`fontSize`, `primaryColour`, ...).
    pub fn set_subtitle_style(
        &self,
        name: &str,
        params: &[(String, String)],
        global_style: bool,
    ) -> Result<bool> {
        let keys = Arg::strings(params.iter().map(|(key, _)| key.clone()));
        let values = Arg::strings(params.iter().map(|(_, value)| value.clone()));
        self.call_bool(
            "scriptSetSubtitleStyle",
            &[Arg::from(name), keys, values, Arg::Bool(global_style)],
        )
    }

    pub fn delete_subtitle_style(&self, name: &str, global_style: bool) -> Result<bool> {
        self.call_bool("scriptDeleteSubtitleStyle", &args![name, global_style])
    }

    /// Apply a named style to one subtitle.
    pub fn set_subtitle_style_name(&self, subtitle_id: i64, style_name: &str) -> Result<bool> {
        self.call_bool("scriptSetSubtitleStyleName", &args![subtitle_id, style_name])
    }
}
