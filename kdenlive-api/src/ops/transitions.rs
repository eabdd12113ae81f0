//! Same-track mixes and cross-track compositions.

use crate::args;
use crate::bus::{BusClient, Record};
use crate::error::Result;

impl BusClient {
    /// Mix two adjacent clips on the same track.
    pub fn add_mix(&self, clip_id_a: i64, clip_id_b: i64, duration_frames: i64) -> Result<bool> {
        self.call_bool("scriptAddMix", &args![clip_id_a, clip_id_b, duration_frames])
    }

    pub fn remove_mix(&self, clip_id: i64) -> Result<bool> {
        self.call_bool("scriptRemoveMix", &args![clip_id])
    }

    /// Available transition and mix types, each with `id` and `name`.
    pub fn get_available_transitions(&self) -> Result<Vec<Record>> {
        self.call_records("scriptGetAvailableTransitions", &[])
    }

    pub fn get_mix_params(&self, clip_id: i64) -> Result<Record> {
        self.call_record("scriptGetMixParams", &args![clip_id])
    }

    pub fn set_mix_duration(&self, clip_id: i64, new_duration: i64) -> Result<bool> {
        self.call_bool("scriptSetMixDuration", &args![clip_id, new_duration])
    }

    /// Add a composition. Returns its id, or -1.
    pub fn add_composition(
        &self,
        transition_id: &str,
        track_id: i64,
        position: i64,
        duration: i64,
    ) -> Result<i64> {
        self.call_i64(
            "scriptAddComposition",
            &args![transition_id, track_id, position, duration],
            -1,
        )
    }

    pub fn get_compositions(&self) -> Result<Vec<Record>> {
        self.call_records("scriptGetCompositions", &[])
    }

    pub fn get_composition_info(&self, compo_id: i64) -> Result<Record> {
        self.call_record("scriptGetCompositionInfo", &args![compo_id])
    }

    pub fn move_composition(&self, compo_id: i64, track_id: i64, position: i64) -> Result<bool> {
        self.call_bool("scriptMoveComposition", &args![compo_id, track_id, position])
    }

    pub fn resize_composition(
        &self,
        compo_id: i64,
        new_duration: i64,
        from_right: bool,
    ) -> Result<i64> {
        self.call_i64(
            "scriptResizeComposition",
            &args![compo_id, new_duration, from_right],
            -1,
        )
    }

    pub fn delete_composition(&self, compo_id: i64) -> Result<bool> {
        self.call_bool("scriptDeleteComposition", &args![compo_id])
    }

    pub fn get_composition_types(&self) -> Result<Vec<Record>> {
        self.call_records("scriptGetCompositionTypes", &[])
    }

    pub fn set_composition_param(&self, compo_id: i64, param_name: &str, value: &str) -> Result<bool> {
        self.call_bool(
            "scriptSetCompositionParam",
            &args![compo_id, param_name, value],
        )
    }

    pub fn get_composition_param(&self, compo_id: i64, param_name: &str) -> Result<String> {
        self.call_text("scriptGetCompositionParam", &args![compo_id, param_name])
    }
}
