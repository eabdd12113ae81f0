//! Timeline guides and bin clip markers.

use crate::args;
use crate::bus::{BusClient, Record};
use crate::error::Result;

impl BusClient {
    /// Add a timeline guide. `category` selects the guide colour.
    pub fn add_guide(&self, frame: i64, comment: &str, category: i64) -> Result<bool> {
        self.call_bool("scriptAddGuide", &args![frame, comment, category])
    }

    /// Guides, each with `frame`, `comment` and `category`.
    pub fn get_guides(&self) -> Result<Vec<Record>> {
        self.call_records("scriptGetGuides", &[])
    }

    pub fn delete_guide(&self, frame: i64) -> Result<bool> {
        self.call_bool("scriptDeleteGuide", &args![frame])
    }

    pub fn delete_guides_by_category(&self, category: i64) -> Result<bool> {
        self.call_bool("scriptDeleteGuidesByCategory", &args![category])
    }

    pub fn add_clip_marker(
        &self,
        bin_id: &str,
        frame: i64,
        comment: &str,
        category: i64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptAddClipMarker",
            &args![bin_id, frame, comment, category],
        )
    }

    pub fn get_clip_markers(&self, bin_id: &str) -> Result<Vec<Record>> {
        self.call_records("scriptGetClipMarkers", &args![bin_id])
    }

    pub fn delete_clip_marker(&self, bin_id: &str, frame: i64) -> Result<bool> {
        self.call_bool("scriptDeleteClipMarker", &args![bin_id, frame])
    }

    pub fn delete_clip_markers_by_category(&self, bin_id: &str, category: i64) -> Result<bool> {
        self.call_bool(
            "scriptDeleteClipMarkersByCategory",
            &args![bin_id, category],
        )
    }
}
