//! Scene metadata scripts and scene video lookup.
//!
//! A scene script is markdown laid out as:
//!
//! ```text
//! ## INTRO
//! ### Scene 1 — Title
//! **Framing:** wide shot
//! **Ambient motion:** drifting fog
//! ```
//!
//! `##` lines set the section for the scenes that follow, `###` lines open a scene, and
//! `**Field:** value` lines fill that scene's fields through a field map. Rendered scene videos
//! are named `sceneNN-<variant>...mp4`.

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCENE_HEADING: &str = r"^###\s+Scene\s+(\d+)\s*[—–-]\s*(.+)$";
const SECTION_HEADING: &str = r"^##\s+(.+?)(?:\s*[—–-]|$)";
const FIELD_LINE: &str = r"^\*\*(.+?):\*\*\s*(.+)$";

/// One scene parsed from a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scene {
    /// 1-based scene number from the heading
    pub number: u32,
    pub title: String,
    /// Last `##` heading seen before the scene, e.g. `VERSE 1`
    pub section: String,
    pub framing: String,
    pub pose: String,
    pub mood: String,
    pub ambient: String,
    pub camera: String,
}

impl Scene {
    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "framing" => Some(&mut self.framing),
            "pose" => Some(&mut self.pose),
            "mood" => Some(&mut self.mood),
            "ambient" => Some(&mut self.ambient),
            "camera" => Some(&mut self.camera),
            _ => None,
        }
    }
}

/// Markdown field names (lowercase) mapped to [`Scene`] fields.
pub fn default_field_map() -> IndexMap<String, String> {
    [
        ("framing", "framing"),
        ("pose", "pose"),
        ("mood", "mood"),
        ("ambient motion", "ambient"),
        ("camera", "camera"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

pub struct SceneParser {
    heading: Regex,
    section: Regex,
    field: Regex,
    field_map: IndexMap<String, String>,
}

impl SceneParser {
    /// `heading_pattern` needs two groups: the scene number and the title.
    pub fn new(heading_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            heading: Regex::new(heading_pattern)?,
            section: Regex::new(SECTION_HEADING)?,
            field: Regex::new(FIELD_LINE)?,
            field_map: default_field_map(),
        })
    }

    pub fn with_field_map(mut self, field_map: IndexMap<String, String>) -> Self {
        self.field_map = field_map;
        self
    }

    pub fn parse(&self, text: &str) -> Vec<Scene> {
        let mut scenes = Vec::new();
        let mut section = String::new();
        let mut current: Option<Scene> = None;

        for line in text.lines().map(str::trim) {
            if let Some(caps) = self.section.captures(line) {
                section = caps[1].trim().to_string();
                continue;
            }
            if let Some(caps) = self.heading.captures(line) {
                let Ok(number) = caps[1].parse::<u32>() else {
                    continue;
                };
                if let Some(done) = current.take() {
                    scenes.push(done);
                }
                current = Some(Scene {
                    number,
                    title: caps[2].trim().to_string(),
                    section: section.clone(),
                    ..Scene::default()
                });
                continue;
            }
            let Some(scene) = current.as_mut() else {
                continue;
            };
            if let Some(caps) = self.field.captures(line) {
                let key = caps[1].trim().to_lowercase();
                if let Some(slot) = self
                    .field_map
                    .get(&key)
                    .and_then(|target| scene.field_mut(target))
                {
                    *slot = caps[2].trim().to_string();
                }
            }
        }
        scenes.extend(current);
        scenes
    }
}

/// Read and parse a scene script with the default heading pattern and field map.
pub fn parse_script_scenes(path: &Path) -> io::Result<Vec<Scene>> {
    let text = fs::read_to_string(path)?;
    let parser = SceneParser::new(DEFAULT_SCENE_HEADING)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    Ok(parser.parse(&text))
}

/// First file (in sorted order) matching `sceneNN-<variant>*.mp4` in `dir`.
pub fn find_scene_video(dir: &Path, scene_number: u32, variant: &str) -> Option<PathBuf> {
    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join(format!(
        "scene{scene_number:02}-{}*.mp4",
        glob::Pattern::escape(variant)
    ));
    let mut matches: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .ok()?
        .filter_map(|entry| entry.ok())
        .collect();
    matches.sort();
    matches.into_iter().next()
}

/// Scene videos for scenes `1..=count`; missing scenes are `None`.
pub fn collect_scene_videos(dir: &Path, count: u32, variant: &str) -> Vec<Option<PathBuf>> {
    (1..=count)
        .map(|number| find_scene_video(dir, number, variant))
        .collect()
}
