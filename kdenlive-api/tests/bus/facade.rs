//! The `BusClient` facade against a fake Kdenlive: discovery, track validation and retries.

use crate::common::{self, FakeKdenlive, CLIP_DURATION};
use kdenlive_api::ops::tracks::TrackKind;
use kdenlive_api::{BusError, RecordExt, RetryPolicy};
use std::time::Duration;

// ============================================================================
// DISCOVERY
// ============================================================================

#[test]
fn test_discovery_picks_the_pid_suffixed_instance() {
    let fake = FakeKdenlive::new();
    let client = common::client(&fake);
    assert_eq!(client.service().as_str(), "org.kde.kdenlive-4242");
}

#[test]
fn test_discovery_falls_back_to_the_generic_name() {
    let fake = FakeKdenlive::new();
    fake.state_mut().bus_names = vec![
        "org.freedesktop.DBus".to_string(),
        "org.kde.kdenlive-beta".to_string(),
    ];
    let client = common::client(&fake);
    assert_eq!(client.service().as_str(), "org.kde.kdenlive");
}

// ============================================================================
// TRACK VALIDATION
// ============================================================================

#[test]
fn test_insert_clip_on_existing_track() {
    let fake = FakeKdenlive::new();
    let bin_id = fake.add_bin_clip("intro.mp4");
    let client = common::client(&fake);

    let clip_id = client.insert_clip(&bin_id, 0, 50).unwrap();
    assert!(clip_id >= 0);

    let info = client.get_timeline_clip_info(clip_id).unwrap();
    assert_eq!(info.int("position"), Some(50));
    assert_eq!(info.int("trackId"), Some(0));
    assert_eq!(info.text("binId"), bin_id);
}

#[test]
fn test_insert_clip_on_the_audio_track_of_a_two_track_project() {
    let fake = FakeKdenlive::new();
    fake.state_mut().tracks = vec![
        common::FakeTrack { id: 0, name: "V1".into(), audio: false },
        common::FakeTrack { id: 1, name: "A1".into(), audio: true },
    ];
    let bin_id = fake.add_bin_clip("song.wav");
    let client = common::client(&fake);

    let clip_id = client.insert_clip(&bin_id, 1, 50).unwrap();
    assert!(clip_id >= 0);

    let state = fake.state();
    let clip = &state.clips[&clip_id];
    assert_eq!(clip.track_id, 1);
    assert_eq!(clip.position, 50);
    assert_eq!(clip.bin_id, bin_id);
}

#[test]
fn test_insert_clip_on_unknown_track_never_reaches_kdenlive() {
    let fake = FakeKdenlive::new();
    let bin_id = fake.add_bin_clip("intro.mp4");
    let client = common::client(&fake);

    assert_eq!(client.insert_clip(&bin_id, 99, 0).unwrap(), -1);
    assert_eq!(fake.count("scriptInsertClip"), 0);
    assert!(fake.state().clips.is_empty());
}

#[test]
fn test_other_track_operations_answer_with_sentinels() {
    let fake = FakeKdenlive::new();
    let bin_id = fake.add_bin_clip("intro.mp4");
    let clip_id = fake.place_clip(&bin_id, 0, 0);
    let client = common::client(&fake);

    assert!(!client.move_clip(clip_id, 42, 10).unwrap());
    assert!(client.get_clips_on_track(42).unwrap().is_empty());
    assert_eq!(fake.count("scriptMoveClip"), 0);
    assert_eq!(fake.count("scriptGetClipsOnTrack"), 0);

    let err = client
        .insert_clips_sequentially(&[bin_id.as_str()], 42, 0)
        .unwrap_err();
    assert!(matches!(err, BusError::InvalidArgument(ref msg) if msg.contains("42")));
    assert_eq!(fake.count("scriptInsertClipsSequentially"), 0);
}

#[test]
fn test_rejected_sequential_insert_reads_the_tracks_once() {
    let fake = FakeKdenlive::new();
    let bin_id = fake.add_bin_clip("intro.mp4");
    let client = common::client(&fake);

    let err = client
        .insert_clips_sequentially(&[bin_id.as_str()], 9, 0)
        .unwrap_err();
    assert!(matches!(err, BusError::InvalidArgument(ref msg) if msg.contains("{0, 1, 2}")));
    assert_eq!(fake.count("scriptGetAllTracksInfo"), 1);
}

#[test]
fn test_empty_track_listing_accepts_any_track() {
    let fake = FakeKdenlive::new();
    let bin_id = fake.add_bin_clip("intro.mp4");
    fake.state_mut().tracks.clear();
    let client = common::client(&fake);

    assert!(client.insert_clip(&bin_id, 7, 0).unwrap() >= 0);
    assert_eq!(fake.count("scriptInsertClip"), 1);
}

#[test]
fn test_track_ids_are_fetched_fresh() {
    let fake = FakeKdenlive::new();
    let client = common::client(&fake);

    assert!(!client.valid_track_ids().unwrap().contains(&3));
    fake.state_mut().tracks.push(common::FakeTrack {
        id: 3,
        name: "V3".into(),
        audio: false,
    });
    assert!(client.valid_track_ids().unwrap().contains(&3));
}

#[test]
fn test_sequential_insert_places_clips_back_to_back() {
    let fake = FakeKdenlive::new();
    let a = fake.add_bin_clip("a.mp4");
    let b = fake.add_bin_clip("b.mp4");
    let client = common::client(&fake);

    let ids = client.insert_clips_sequentially(&[a, b], 1, 25).unwrap();
    assert_eq!(ids.len(), 2);

    let clips = client.get_clips_on_track(1).unwrap();
    let positions: Vec<_> = clips.iter().filter_map(|c| c.int("position")).collect();
    assert_eq!(positions, vec![25, 25 + CLIP_DURATION]);
}

// ============================================================================
// REPLY COERCION
// ============================================================================

#[test]
fn test_typed_replies_reach_callers_as_rust_types() {
    let fake = FakeKdenlive::new();
    let client = common::client(&fake);

    assert_eq!(client.get_project_fps().unwrap(), 25.0);
    assert_eq!(client.get_project_resolution_width().unwrap(), 1920);
    assert_eq!(client.get_track_count(TrackKind::Video).unwrap(), 2);
    assert_eq!(client.get_track_count(TrackKind::Audio).unwrap(), 1);

    let tracks = client.get_all_tracks_info().unwrap();
    assert_eq!(tracks.len(), 3);
    assert!(tracks[2].flag("audio"));
    assert_eq!(tracks[2].text("name"), "A1");
}

#[test]
fn test_void_replies_fall_back() {
    let fake = FakeKdenlive::new();
    let client = common::client(&fake);

    // Not answered by the fake at all.
    assert_eq!(client.get_clip_opacity(100).unwrap(), -1.0);
    assert_eq!(client.add_subtitle(0, 25, "hello", 0).unwrap(), -1);
    assert!(!client.set_clip_enabled(100, true).unwrap());
    assert!(client.get_timeline_clip_info(12345).unwrap().is_empty());
}

// ============================================================================
// IMPORT
// ============================================================================

#[test]
fn test_import_reports_new_bin_ids_in_order() {
    let fake = FakeKdenlive::new();
    let existing = fake.add_bin_clip("old.mp4");
    let client = common::client(&fake);

    let ids = client
        .import_media(["/media/a.mp4", "/media/b.mp4"], "-1")
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&existing));
    assert_eq!(fake.count("addProjectClip"), 2);

    let state = fake.state();
    let urls: Vec<_> = ids
        .iter()
        .map(|id| state.bin.iter().find(|b| &b.id == id).unwrap().url.clone())
        .collect();
    assert_eq!(urls, vec!["/media/a.mp4", "/media/b.mp4"]);
}

#[test]
fn test_import_each_keeps_a_slot_for_files_that_did_not_load() {
    let fake = FakeKdenlive::new();
    fake.state_mut().unreadable.push("/media/b.mp4".into());
    let client = common::client(&fake);

    let ids = client
        .import_media_each(["/media/a.mp4", "/media/b.mp4", "/media/c.mp4"], "-1")
        .unwrap();
    assert_eq!(ids.len(), 3);
    assert!(ids[0].is_some());
    assert_eq!(ids[1], None);
    assert!(ids[2].is_some());

    let flat = client.import_media(["/media/d.mp4", "/media/b.mp4"], "-1").unwrap();
    assert_eq!(flat.len(), 1);
}

#[test]
fn test_import_into_folder_passes_the_folder() {
    let fake = FakeKdenlive::new();
    let client = common::client(&fake);

    let ids = client.import_media(["/media/a.mp4"], "10").unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(fake.state().bin[0].folder, "10");
    assert_eq!(client.get_folder_clip_ids("10").unwrap(), ids);
}

// ============================================================================
// RETRY
// ============================================================================

#[test]
fn test_open_project_rides_out_a_slow_start() {
    let fake = FakeKdenlive::new();
    fake.state_mut().open_failures = 9;
    let (client, slept) = common::recording_client(&fake, RetryPolicy::default());

    assert!(client.open_project("/tmp/film.kdenlive").unwrap());
    assert_eq!(fake.count("scriptOpenProject"), 10);

    let slept = slept.borrow();
    assert_eq!(*slept, RetryPolicy::default().delays());
    assert!(slept.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(slept.iter().all(|delay| *delay <= Duration::from_secs(3)));
}

#[test]
fn test_open_project_gives_up_after_the_last_attempt() {
    let fake = FakeKdenlive::new();
    fake.state_mut().open_failures = 100;
    let policy = RetryPolicy {
        attempts: 3,
        ..RetryPolicy::default()
    };
    let (client, slept) = common::recording_client(&fake, policy);

    let err = client.open_project("/tmp/film.kdenlive").unwrap_err();
    assert!(matches!(err, BusError::ToolFailed { .. }));
    assert_eq!(fake.count("scriptOpenProject"), 3);
    assert_eq!(slept.borrow().len(), 2);
}

#[test]
fn test_open_project_without_failures_never_sleeps() {
    let fake = FakeKdenlive::new();
    let (client, slept) = common::recording_client(&fake, RetryPolicy::default());

    assert!(client.open_project("/tmp/film.kdenlive").unwrap());
    assert!(slept.borrow().is_empty());
}
