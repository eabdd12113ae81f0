//! Rendering, frame grabs and window introspection.

use crate::args;
use crate::bus::{Arg, BusClient, Record, RemoteValue};
use crate::error::Result;

impl BusClient {
    /// Render the project to `url` with the current render settings.
    pub fn render(&self, url: &str) -> Result<()> {
        self.invoke("scriptRender", &args![url])?;
        Ok(())
    }

    /// Render with an explicit preset and range. -1 for a frame bound means the project edge.
    /// `params` are per-job encoder overrides such as `crf`.
    pub fn render_with_params(
        &self,
        output_file: &str,
        preset_name: &str,
        in_frame: i64,
        out_frame: i64,
        params: &[(String, String)],
    ) -> Result<bool> {
        let keys = Arg::strings(params.iter().map(|(key, _)| key.clone()));
        let values = Arg::strings(params.iter().map(|(_, value)| value.clone()));
        self.call_bool(
            "scriptRenderWithParams",
            &[
                Arg::from(output_file),
                Arg::from(preset_name),
                Arg::Int(in_frame),
                Arg::Int(out_frame),
                keys,
                values,
            ],
        )
    }

    pub fn get_render_presets(&self) -> Result<Vec<String>> {
        Ok(self.invoke("scriptGetRenderPresets", &[])?.into_string_list())
    }

    pub fn get_render_jobs(&self) -> Result<Vec<Record>> {
        Ok(self
            .invoke("scriptGetRenderJobs", &[])?
            .into_list()
            .into_iter()
            .filter_map(|job| match job {
                RemoteValue::Map(map) => Some(map),
                _ => None,
            })
            .collect())
    }

    pub fn abort_render_job(&self, output_path: &str) -> Result<bool> {
        self.call_bool("scriptAbortRenderJob", &args![output_path])
    }

    /// Render one timeline frame to an image. Returns the written path.
    pub fn render_timeline_frame(
        &self,
        frame: i64,
        width: i64,
        height: i64,
        output_path: &str,
    ) -> Result<String> {
        self.call_text(
            "scriptRenderTimelineFrame",
            &args![frame, width, height, output_path],
        )
    }

    /// Screenshot of the main window, scaled to at most `max_size` pixels.
    pub fn capture_window(&self, max_size: i64, output_path: &str) -> Result<String> {
        self.call_text("scriptCaptureWindow", &args![max_size, output_path])
    }

    /// Geometry of every dock panel, decoded from the JSON document Kdenlive returns.
    /// A reply that is not a JSON array yields an empty list.
    pub fn get_panel_geometries(&self) -> Result<Vec<serde_json::Value>> {
        let text = self.call_text("scriptGetPanelGeometries", &[])?;
        Ok(decode_panel_geometries(&text))
    }
}

fn decode_panel_geometries(text: &str) -> Vec<serde_json::Value> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<serde_json::Value>>(text) {
        Ok(panels) => panels,
        Err(err) => {
            log::debug!("panel geometry reply is not a JSON array: {err}");
            Vec::new()
        }
    }
}
