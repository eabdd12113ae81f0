//! Clip effects, their parameters, expressions and keyframes.
//!
//! Keyframes can be addressed two ways: by the effect's 0-based index in the clip's stack
//! (values normalised to 0..1), or by effect id and parameter name (values in the effect's own
//! text format).

use crate::args;
use crate::bus::{Arg, BusClient, Record};
use crate::error::Result;

/// Keyframe interpolation code meaning "let Kdenlive pick".
pub const DEFAULT_KEYFRAME_TYPE: i64 = -1;

/// Split ordered parameters into the parallel key and value lists the interface expects.
fn split_params(params: &[(String, String)]) -> (Arg, Arg) {
    let keys = Arg::strings(params.iter().map(|(key, _)| key.clone()));
    let values = Arg::strings(params.iter().map(|(_, value)| value.clone()));
    (keys, values)
}

impl BusClient {
    /// Installed effects, each with `id`, `name` and `type` (audio or video).
    pub fn get_available_effects(&self) -> Result<Vec<Record>> {
        self.call_records("scriptGetAvailableEffects", &[])
    }

    /// Add an effect to a timeline clip, optionally setting parameters.
    pub fn add_clip_effect(
        &self,
        clip_id: i64,
        effect_id: &str,
        params: &[(String, String)],
    ) -> Result<bool> {
        let (keys, values) = split_params(params);
        self.call_bool(
            "scriptAddClipEffect",
            &[Arg::Int(clip_id), Arg::from(effect_id), keys, values],
        )
    }

    pub fn remove_clip_effect(&self, clip_id: i64, effect_id: &str) -> Result<bool> {
        self.call_bool("scriptRemoveClipEffect", &args![clip_id, effect_id])
    }

    /// Comma separated names of the effects on a clip.
    pub fn get_clip_effects(&self, clip_id: i64) -> Result<String> {
        self.call_text("scriptGetClipEffects", &args![clip_id])
    }

    pub fn set_effect_param(
        &self,
        clip_id: i64,
        effect_id: &str,
        param_name: &str,
        value: &str,
    ) -> Result<bool> {
        self.call_bool(
            "scriptSetEffectParam",
            &args![clip_id, effect_id, param_name, value],
        )
    }

    pub fn get_effect_param(&self, clip_id: i64, effect_id: &str, param_name: &str) -> Result<String> {
        self.call_text("scriptGetEffectParam", &args![clip_id, effect_id, param_name])
    }

    /// Drive a parameter with a JavaScript expression evaluated around `base_value`.
    pub fn set_effect_expression(
        &self,
        clip_id: i64,
        effect_id: &str,
        param_name: &str,
        expression: &str,
        base_value: f64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptSetEffectExpression",
            &args![clip_id, effect_id, param_name, expression, base_value],
        )
    }

    pub fn clear_effect_expression(
        &self,
        clip_id: i64,
        effect_id: &str,
        param_name: &str,
    ) -> Result<bool> {
        self.call_bool(
            "scriptClearEffectExpression",
            &args![clip_id, effect_id, param_name],
        )
    }

    /// The clip's effect stack as XML, for [`paste_clip_effects`](Self::paste_clip_effects).
    pub fn copy_clip_effects(&self, clip_id: i64) -> Result<String> {
        self.call_text("scriptCopyClipEffects", &args![clip_id])
    }

    pub fn paste_clip_effects(&self, target_clip_id: i64, effects_xml: &str) -> Result<bool> {
        self.call_bool("scriptPasteClipEffects", &args![target_clip_id, effects_xml])
    }

    /// Keyframes (`frame`, `type`, `value`) of the effect at `effect_index`.
    pub fn get_effect_keyframes(&self, clip_id: i64, effect_index: i64) -> Result<Vec<Record>> {
        self.call_records("scriptGetEffectKeyframes", &args![clip_id, effect_index])
    }

    /// Add a keyframe. `frame` is relative to the clip start, `value` normalised to 0..1.
    pub fn add_effect_keyframe(
        &self,
        clip_id: i64,
        effect_index: i64,
        frame: i64,
        value: f64,
        keyframe_type: i64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptAddEffectKeyframe",
            &args![clip_id, effect_index, frame, value, keyframe_type],
        )
    }

    pub fn remove_effect_keyframe(&self, clip_id: i64, effect_index: i64, frame: i64) -> Result<bool> {
        self.call_bool(
            "scriptRemoveEffectKeyframe",
            &args![clip_id, effect_index, frame],
        )
    }

    /// Move a keyframe and/or change its value. A `value` of -1 keeps the current one.
    pub fn update_effect_keyframe(
        &self,
        clip_id: i64,
        effect_index: i64,
        old_frame: i64,
        new_frame: i64,
        value: f64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptUpdateEffectKeyframe",
            &args![clip_id, effect_index, old_frame, new_frame, value],
        )
    }

    /// Keyframes of one named parameter. An empty `param_name` selects the primary parameter.
    pub fn get_effect_keyframes_by_param(
        &self,
        clip_id: i64,
        effect_id: &str,
        param_name: &str,
    ) -> Result<Vec<Record>> {
        self.call_records(
            "scriptGetEffectKeyframesByParam",
            &args![clip_id, effect_id, param_name],
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_effect_keyframe_by_param(
        &self,
        clip_id: i64,
        effect_id: &str,
        param_name: &str,
        frame: i64,
        value: &str,
        keyframe_type: i64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptAddEffectKeyframeByParam",
            &args![clip_id, effect_id, param_name, frame, value, keyframe_type],
        )
    }

    pub fn remove_effect_keyframe_by_param(
        &self,
        clip_id: i64,
        effect_id: &str,
        param_name: &str,
        frame: i64,
    ) -> Result<bool> {
        self.call_bool(
            "scriptRemoveEffectKeyframeByParam",
            &args![clip_id, effect_id, param_name, frame],
        )
    }
}
