//! Assemble a music video timeline from numbered scene renders.
//!
//! Scene files are looked up as `sceneNN-<variant>*.mp4`. Present scenes are imported into a
//! bin folder and placed back to back on the first video track; a missing scene (or a refused
//! insert) leaves a gap of one nominal scene length so later scenes keep their slots. An
//! optional music file goes on the first audio track at frame 0. Each scene slot gets a guide
//! coloured by the script section it belongs to.

use crate::{Result, WorkflowError};
use kdenlive_api::resolve::{MARKER_BLUE, MARKER_GREEN, MARKER_PURPLE};
use kdenlive_api::scenes::{self, Scene};
use kdenlive_api::timecode::frames_to_timecode;
use kdenlive_api::{RecordExt, Resolve};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub video_dir: PathBuf,
    pub audio: Option<PathBuf>,
    pub variant: String,
    /// Mix length between consecutive scenes; 0 disables mixes.
    pub transition_frames: i64,
    pub script: Option<PathBuf>,
    pub scene_count: u32,
    /// Gap left for a scene that could not be placed.
    pub scene_duration: i64,
}

/// Everything the build needs from the file system, gathered before connecting.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub options: BuildOptions,
    pub scenes: Vec<Scene>,
    /// Index `i` holds the file for scene `i + 1`.
    pub videos: Vec<Option<PathBuf>>,
}

impl BuildPlan {
    pub fn available(&self) -> Vec<(usize, &Path)> {
        self.videos
            .iter()
            .enumerate()
            .filter_map(|(index, video)| video.as_deref().map(|path| (index, path)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGuide {
    pub frame: i64,
    pub label: String,
    pub category: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub imported: usize,
    pub placed: usize,
    /// 1-based numbers of scenes left as gaps.
    pub gaps: Vec<u32>,
    pub transitions: usize,
    pub guides: usize,
    pub end_frame: i64,
}

/// Scan the scene files and read the script. Fails when no scene file exists at all.
pub fn plan_build(options: BuildOptions) -> Result<BuildPlan> {
    let scenes = match options.script.as_deref() {
        Some(script) if script.exists() => match scenes::parse_script_scenes(script) {
            Ok(scenes) => scenes,
            Err(err) => {
                log::warn!("ignoring scene script {}: {err}", script.display());
                Vec::new()
            }
        },
        Some(script) => {
            log::debug!("no scene script at {}", script.display());
            Vec::new()
        }
        None => Vec::new(),
    };

    let videos = scenes::collect_scene_videos(&options.video_dir, options.scene_count, &options.variant);
    if videos.iter().all(Option::is_none) {
        return Err(WorkflowError::NoSceneVideos(options.video_dir.clone()));
    }

    Ok(BuildPlan {
        options,
        scenes,
        videos,
    })
}

/// Guide colour for a script section: intro blue, verse green, anything else purple.
pub fn section_category(section: &str) -> i64 {
    let section = section.to_uppercase();
    if section.contains("INTRO") {
        MARKER_BLUE
    } else if section.contains("VERSE") {
        MARKER_GREEN
    } else {
        MARKER_PURPLE
    }
}

pub fn scene_label(number: u32, scene: Option<&Scene>) -> String {
    match scene {
        Some(scene) if !scene.title.is_empty() => format!("Scene {number:02} - {}", scene.title),
        _ => format!("Scene {number:02}"),
    }
}

/// One guide per scene slot. `placed` maps a 0-based scene index to the length it took on the
/// timeline; every other slot advances by `gap`.
pub fn plan_guides(
    scene_count: u32,
    placed: &BTreeMap<usize, i64>,
    gap: i64,
    scenes: &[Scene],
) -> Vec<PlannedGuide> {
    let mut frame = 0;
    (0..scene_count as usize)
        .map(|index| {
            let number = index as u32 + 1;
            let scene = scenes.iter().find(|scene| scene.number == number);
            let guide = PlannedGuide {
                frame,
                label: scene_label(number, scene),
                category: scene.map_or(MARKER_PURPLE, |scene| section_category(&scene.section)),
            };
            frame += placed.get(&index).copied().unwrap_or(gap);
            guide
        })
        .collect()
}

/// Run the build against the open project, writing progress to `out`.
pub fn run_build(resolve: &Resolve, plan: &BuildPlan, out: &mut dyn Write) -> Result<BuildReport> {
    let options = &plan.options;
    let project = resolve.get_project_manager().get_current_project();
    let pool = project.get_media_pool();
    let timeline = project.get_current_timeline();

    let fps = project.get_fps()?;
    writeln!(out, "Connected to project: {} ({fps} fps)", project.get_name()?)?;

    let available = plan.available();
    writeln!(
        out,
        "Found {}/{} scene videos (variant {})",
        available.len(),
        options.scene_count,
        options.variant
    )?;

    let folder = pool.add_sub_folder(None, &format!("MV Scenes ({})", options.variant))?;
    if folder.is_none() {
        log::warn!("could not create a bin folder, importing into the root");
    }
    let paths: Vec<&Path> = available.iter().map(|(_, path)| *path).collect();
    let clips = pool.import_media_each(&paths, folder.as_ref())?;
    let scene_clips: BTreeMap<usize, String> = available
        .iter()
        .zip(&clips)
        .filter_map(|((index, _), clip)| Some((*index, clip.as_ref()?.bin_id().to_string())))
        .collect();
    writeln!(out, "Imported {} clips into bin", scene_clips.len())?;

    let mut report = BuildReport {
        imported: scene_clips.len(),
        ..BuildReport::default()
    };

    let audio_clip = match options.audio.as_deref() {
        Some(audio) if audio.exists() => {
            let imported = pool.import_media(&[audio], None)?;
            if !imported.is_empty() {
                writeln!(out, "Imported audio: {}", audio.display())?;
            }
            imported.into_iter().next()
        }
        Some(audio) => {
            log::warn!("audio file not found: {}", audio.display());
            writeln!(out, "WARNING: Audio file not found: {}", audio.display())?;
            None
        }
        None => None,
    };

    let mut tracks = timeline.get_all_tracks_info()?;
    if !tracks.iter().any(|track| !track.flag("audio")) {
        writeln!(out, "No video tracks found, adding one...")?;
        timeline.add_track("V1", false)?;
        tracks = timeline.get_all_tracks_info()?;
    }
    let video_track = tracks
        .iter()
        .find(|track| !track.flag("audio"))
        .and_then(|track| track.int("id"))
        .unwrap_or(0);
    let audio_track = tracks
        .iter()
        .find(|track| track.flag("audio"))
        .and_then(|track| track.int("id"));
    writeln!(out, "Using video track ID: {video_track}")?;

    let mut position = 0;
    let mut items = Vec::new();
    let mut placed = BTreeMap::new();
    for index in 0..options.scene_count as usize {
        let number = index as u32 + 1;
        let Some(bin_id) = scene_clips.get(&index) else {
            writeln!(out, "  Scene {number:02}: MISSING - skipping")?;
            report.gaps.push(number);
            position += options.scene_duration;
            continue;
        };
        match timeline.insert_clip(bin_id, video_track, position)? {
            Some(item) => {
                let duration = item.get_duration()?;
                writeln!(
                    out,
                    "  Scene {number:02}: inserted at {} ({duration} frames)",
                    frames_to_timecode(position, fps)
                )?;
                placed.insert(index, duration);
                items.push(item);
                position += duration;
            }
            None => {
                writeln!(out, "  Scene {number:02}: INSERT FAILED")?;
                report.gaps.push(number);
                position += options.scene_duration;
            }
        }
    }
    report.placed = items.len();
    report.end_frame = position;
    writeln!(out, "Total timeline duration: {}", frames_to_timecode(position, fps))?;

    if let (Some(clip), Some(track)) = (&audio_clip, audio_track) {
        if timeline.insert_clip(clip.bin_id(), track, 0)?.is_some() {
            writeln!(out, "Audio inserted on track {track}")?;
        }
    }

    if options.transition_frames > 0 && items.len() >= 2 {
        for pair in items.windows(2) {
            if timeline.add_transition(&pair[0], &pair[1], options.transition_frames)? {
                report.transitions += 1;
            }
        }
        writeln!(
            out,
            "Added {} transitions ({} frames each)",
            report.transitions, options.transition_frames
        )?;
    }

    for guide in plan_guides(options.scene_count, &placed, options.scene_duration, &plan.scenes) {
        if timeline.add_marker(guide.frame, guide.category, &guide.label, "")? {
            report.guides += 1;
        }
    }
    writeln!(out, "Added {} guide markers", report.guides)?;

    writeln!(out, "\nTimeline summary")?;
    writeln!(out, "{}", timeline.summary()?)?;
    Ok(report)
}
