//! Touch-ups on an assembled timeline: swap one scene, jump to a scene, re-apply mixes.
//!
//! Scenes are addressed by their 1-based order on a video track; `track` is the 0-based index
//! among video tracks.

use crate::{Result, WorkflowError};
use kdenlive_api::resolve::{TimelineItem, TrackType};
use kdenlive_api::timecode::frames_to_timecode;
use kdenlive_api::Resolve;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReplaceOptions {
    pub scene: usize,
    pub file: PathBuf,
    pub track: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    pub scene: Option<usize>,
    pub frame: Option<i64>,
    pub track: usize,
    pub play: bool,
}

#[derive(Debug, Clone)]
pub struct TransitionOptions {
    pub duration: i64,
    pub track: usize,
}

/// Counts from a transitions pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionReport {
    pub added: usize,
    pub failed: usize,
}

/// The replacement file must exist before anything on the timeline is touched.
pub fn check_replacement(file: &Path) -> Result<()> {
    if file.is_file() {
        Ok(())
    } else {
        Err(WorkflowError::MissingFile(file.to_path_buf()))
    }
}

fn video_items(resolve: &Resolve, track: usize) -> Result<Vec<TimelineItem>> {
    let timeline = resolve
        .get_project_manager()
        .get_current_project()
        .get_current_timeline();
    Ok(timeline.get_item_list_in_track(TrackType::Video, track + 1)?)
}

fn pick_scene(items: &[TimelineItem], scene: usize) -> Result<&TimelineItem> {
    scene
        .checked_sub(1)
        .and_then(|index| items.get(index))
        .ok_or(WorkflowError::SceneOutOfRange {
            scene,
            clips: items.len(),
        })
}

/// Put `file` where scene `scene` sits now, keeping its start and length.
pub fn replace_scene(resolve: &Resolve, options: &ReplaceOptions, out: &mut dyn Write) -> Result<()> {
    check_replacement(&options.file)?;
    let project = resolve.get_project_manager().get_current_project();
    let pool = project.get_media_pool();
    let timeline = project.get_current_timeline();

    let items = video_items(resolve, options.track)?;
    let target = pick_scene(&items, options.scene)?;
    let position = target.get_start()?;
    let duration = target.get_duration()?;
    let track = target.get_track_id()?;
    writeln!(
        out,
        "Replacing scene {}: pos={position}, dur={duration}, track={track}",
        options.scene
    )?;

    let imported = pool.import_media(&[options.file.as_path()], None)?;
    let Some(clip) = imported.into_iter().next() else {
        return Err(WorkflowError::ImportFailed(options.file.clone()));
    };
    writeln!(out, "Imported: {} (bin_id={})", clip.get_name(), clip.bin_id())?;

    if !target.delete()? {
        log::warn!("Kdenlive did not confirm removing the old clip");
    }
    writeln!(out, "Deleted old clip")?;

    let Some(item) = timeline.insert_clip(clip.bin_id(), track, position)? else {
        return Err(WorkflowError::InsertFailed(position));
    };
    let new_duration = item.get_duration()?;
    if new_duration != duration {
        let actual = item.set_duration(duration, true)?;
        writeln!(out, "Resized: {new_duration} -> {actual} frames")?;
    }
    writeln!(out, "Inserted new clip at position {position}")?;
    Ok(())
}

/// Seek to a scene start or a frame and optionally play. With neither, report the playhead.
/// Returns the frame the playhead ends on.
pub fn preview(resolve: &Resolve, options: &PreviewOptions, out: &mut dyn Write) -> Result<i64> {
    let project = resolve.get_project_manager().get_current_project();
    let timeline = project.get_current_timeline();
    let fps = project.get_fps()?;

    let mut frame = options.frame;
    if let Some(scene) = options.scene {
        let items = video_items(resolve, options.track)?;
        let target = pick_scene(&items, scene)?;
        let start = target.get_start()?;
        writeln!(
            out,
            "Scene {scene}: {} at {}",
            target.get_name()?,
            frames_to_timecode(start, fps)
        )?;
        frame = Some(start);
    }

    let Some(frame) = frame else {
        let position = timeline.get_position()?;
        writeln!(
            out,
            "Current position: frame {position} ({})",
            frames_to_timecode(position, fps)
        )?;
        return Ok(position);
    };

    timeline.seek(frame)?;
    writeln!(out, "Seeked to frame {frame} ({})", frames_to_timecode(frame, fps))?;
    if options.play {
        timeline.play()?;
        writeln!(out, "Playing...")?;
    }
    Ok(frame)
}

/// Mix every adjacent pair of clips on a video track.
pub fn add_transitions(
    resolve: &Resolve,
    options: &TransitionOptions,
    out: &mut dyn Write,
) -> Result<TransitionReport> {
    let timeline = resolve
        .get_project_manager()
        .get_current_project()
        .get_current_timeline();
    let items = video_items(resolve, options.track)?;
    writeln!(out, "Found {} clips on video track {}", items.len(), options.track)?;

    let mut report = TransitionReport::default();
    if items.len() < 2 {
        writeln!(out, "Need at least 2 clips for transitions")?;
        return Ok(report);
    }

    for (index, pair) in items.windows(2).enumerate() {
        if timeline.add_transition(&pair[0], &pair[1], options.duration)? {
            report.added += 1;
        } else {
            report.failed += 1;
            writeln!(
                out,
                "  FAILED: transition between clip {} and {}",
                index + 1,
                index + 2
            )?;
        }
    }
    writeln!(
        out,
        "Added {} transitions, {} failed ({} frames each)",
        report.added, report.failed, options.duration
    )?;
    Ok(report)
}
