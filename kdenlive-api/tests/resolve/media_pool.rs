use crate::common::{self, FakeKdenlive, CLIP_DURATION};
use kdenlive_api::resolve::{AppendSource, ClipMarker, MediaPool, StorageItem};
use kdenlive_api::{BusError, RecordExt};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

fn pool(fake: &FakeKdenlive) -> MediaPool {
    common::resolve(fake)
        .get_project_manager()
        .get_current_project()
        .get_media_pool()
}

fn bin_names(fake: &FakeKdenlive) -> Vec<String> {
    fake.state().bin.iter().map(|b| b.name.clone()).collect()
}

// ============================================================================
// IMPORT
// ============================================================================

#[test]
fn test_relative_imports_are_made_absolute() {
    let fake = FakeKdenlive::new();
    let items = pool(&fake).import_media(&["clips/a.mp4"], None).unwrap();

    assert_eq!(items.len(), 1);
    let url = fake.state().bin[0].url.clone();
    assert!(Path::new(&url).is_absolute());
    assert!(url.ends_with("a.mp4"));
}

#[test]
fn test_import_into_a_sub_folder() {
    let fake = FakeKdenlive::new();
    let pool = pool(&fake);

    let folder = pool.add_sub_folder(None, "Scenes").unwrap().unwrap();
    assert_eq!(folder.get_name(), "Scenes");
    pool.import_media(&["/media/a.mp4"], Some(&folder)).unwrap();
    pool.import_media(&["/media/b.mp4"], None).unwrap();

    assert_eq!(folder.get_clip_list().unwrap().len(), 1);
    assert_eq!(pool.get_root_folder().get_clip_list().unwrap().len(), 1);
    assert_eq!(pool.get_all_clips().unwrap().len(), 2);
}

#[test]
fn test_current_folder_defaults_to_root() {
    let fake = FakeKdenlive::new();
    let pool = pool(&fake);
    assert_eq!(pool.get_current_folder().folder_id(), "-1");

    let folder = pool.add_sub_folder(None, "Music").unwrap().unwrap();
    assert!(pool.set_current_folder(&folder));
    assert_eq!(pool.get_current_folder().get_name(), "Music");
}

#[test]
fn test_folder_import_matches_the_pattern_in_sorted_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["scene_02.mp4", "scene_01.mp4", "notes.txt", "other.mp4"] {
        File::create(dir.path().join(name)).unwrap();
    }
    let fake = FakeKdenlive::new();

    let items = pool(&fake)
        .import_media_from_folder(dir.path(), "scene_*.mp4", None)
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(bin_names(&fake), vec!["scene_01.mp4", "scene_02.mp4"]);
}

#[test]
fn test_folder_import_without_matches_calls_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeKdenlive::new();

    let items = pool(&fake)
        .import_media_from_folder(dir.path(), "*.mov", None)
        .unwrap();
    assert!(items.is_empty());
    assert_eq!(fake.count("addProjectClip"), 0);
}

#[test]
fn test_storage_expands_folders_and_drops_missing_paths() {
    let dir = tempfile::tempdir().unwrap();
    let footage = dir.path().join("footage");
    fs::create_dir(&footage).unwrap();
    for name in ["b.mov", "a.mp4", "readme.md"] {
        File::create(footage.join(name)).unwrap();
    }
    let single = dir.path().join("voice.wav");
    File::create(&single).unwrap();

    let fake = FakeKdenlive::new();
    let storage = common::resolve(&fake).get_media_storage();
    let items = storage
        .add_item_list_to_media_pool(&[
            StorageItem::from(footage.clone()),
            StorageItem::from(single),
            StorageItem::from(dir.path().join("gone.mp4")),
            StorageItem::PoolItem("7".into()),
        ])
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(bin_names(&fake), vec!["a.mp4", "b.mov", "voice.wav"]);
    assert_eq!(storage.get_file_list(&footage).len(), 3);
    assert!(storage.get_sub_folder_list(&footage).is_empty());
}

// ============================================================================
// APPEND
// ============================================================================

#[test]
fn test_append_uses_the_first_video_track() {
    let fake = FakeKdenlive::new();
    let a = fake.add_bin_clip("a.mp4");
    let b = fake.add_bin_clip("b.mp4");
    fake.state_mut().tracks.rotate_right(1); // A1 first
    let pool = pool(&fake);

    let ids = pool
        .append_to_timeline(&[AppendSource::from(a.as_str()), b.as_str().into()], None, 0)
        .unwrap();
    assert_eq!(ids.len(), 2);

    let state = fake.state();
    let placed: Vec<_> = ids.iter().map(|id| &state.clips[id]).collect();
    assert!(placed.iter().all(|clip| clip.track_id == 0));
    assert_eq!(placed[1].position, CLIP_DURATION);
}

#[test]
fn test_append_imports_sub_clip_media() {
    let fake = FakeKdenlive::new();
    let pool = pool(&fake);

    let ids = pool
        .append_to_timeline(
            &[AppendSource::SubClip {
                bin_id: None,
                media: Some(PathBuf::from("/media/take3.mp4")),
                start_frame: 10,
                end_frame: 60,
            }],
            Some(1),
            250,
        )
        .unwrap();

    assert_eq!(ids.len(), 1);
    assert_eq!(bin_names(&fake), vec!["take3.mp4"]);
    let state = fake.state();
    assert_eq!(state.clips[&ids[0]].track_id, 1);
    assert_eq!(state.clips[&ids[0]].position, 250);
}

#[test]
fn test_append_with_nothing_resolvable_is_empty() {
    let fake = FakeKdenlive::new();
    let ids = pool(&fake)
        .append_to_timeline(
            &[AppendSource::SubClip {
                bin_id: None,
                media: None,
                start_frame: 0,
                end_frame: 10,
            }],
            None,
            0,
        )
        .unwrap();
    assert!(ids.is_empty());
    assert_eq!(fake.count("scriptInsertClipsSequentially"), 0);
}

#[test]
fn test_append_to_unknown_track_fails() {
    let fake = FakeKdenlive::new();
    let a = fake.add_bin_clip("a.mp4");

    let err = pool(&fake)
        .append_to_timeline(&[a.as_str().into()], Some(99), 0)
        .unwrap_err();
    assert!(matches!(err, BusError::InvalidArgument(_)));
}

// ============================================================================
// POOL ITEMS
// ============================================================================

#[test]
fn test_clip_properties_are_cached_and_aliased() {
    let fake = FakeKdenlive::new();
    let id = fake.add_bin_clip("interview.mov");
    let item = pool(&fake).get_clip_by_id(&id);

    assert_eq!(item.get_name(), "interview.mov");
    assert_eq!(item.get_duration(), CLIP_DURATION);
    let props = item.get_clip_properties();
    assert_eq!(props.text("File Path"), "/media/interview.mov");
    assert_eq!(props.text("File Name"), "interview.mov");
    assert_eq!(props.text("Frames"), CLIP_DURATION.to_string());
    assert_eq!(props.text("Video Codec"), "Video");
    assert_eq!(fake.count("scriptGetClipProperties"), 1);
}

#[test]
fn test_unknown_clip_properties_carry_only_the_id() {
    let fake = FakeKdenlive::new();
    let item = pool(&fake).get_clip_by_id("404");

    let props = item.get_clip_properties();
    assert_eq!(props.text("id"), "404");
    assert_eq!(item.get_name(), "");
}

#[test]
fn test_clip_markers_mirror_guides_and_keep_custom_data() {
    let fake = FakeKdenlive::new();
    let id = fake.add_bin_clip("song.wav");
    let item = pool(&fake).get_clip_by_id(&id);

    assert!(item.add_marker(12, ClipMarker::new("Green", "Beat").with_custom_data("beat-1")));
    assert!(item.add_marker(48, ClipMarker::new("Red", "Drop").with_note("loud")));
    assert_eq!(
        fake.state().guides,
        vec![(12, "Beat".to_string(), 2), (48, "Drop: loud".to_string(), 5)]
    );

    let (frame, marker) = item.get_marker_by_custom_data("beat-1").unwrap();
    assert_eq!(frame, 12);
    assert_eq!(marker.name, "Beat");

    assert!(item.update_marker_custom_data(48, "drop-1"));
    assert_eq!(item.get_marker_custom_data(48), "drop-1");
    assert!(!item.update_marker_custom_data(99, "nothing"));

    assert!(item.delete_marker_by_custom_data("beat-1"));
    assert!(!item.delete_markers_by_color("Green"));
    assert!(item.delete_markers_by_color("Red"));
    assert!(item.get_markers().is_empty());
}

#[test]
fn test_move_and_delete_clips() {
    let fake = FakeKdenlive::new();
    let a = fake.add_bin_clip("a.mp4");
    let b = fake.add_bin_clip("b.mp4");
    let pool = pool(&fake);
    let folder = pool.add_sub_folder(None, "Archive").unwrap().unwrap();
    let clips = vec![pool.get_clip_by_id(&a), pool.get_clip_by_id(&b)];

    assert!(pool.move_clips(&clips, &folder).unwrap());
    assert_eq!(folder.get_clip_list().unwrap().len(), 2);

    assert!(pool.delete_clips(&clips[..1]).unwrap());
    assert!(!pool.delete_clips(&clips[..1]).unwrap());
    assert_eq!(pool.get_all_clips().unwrap().len(), 1);
}
