use crate::common::{self, FakeKdenlive, CLIP_DURATION};
use kdenlive_api::resolve::{TrackType, MARKER_BLUE, MARKER_PURPLE, MARKER_RED};

fn timeline(fake: &FakeKdenlive) -> kdenlive_api::resolve::Timeline {
    common::resolve(fake)
        .get_project_manager()
        .get_current_project()
        .get_current_timeline()
}

// ============================================================================
// MARKERS
// ============================================================================

#[test]
fn test_markers_round_trip_through_guides() {
    let fake = FakeKdenlive::new();
    let timeline = timeline(&fake);

    assert!(timeline.add_marker(10, "Red", "Intro", "fade in").unwrap());
    assert!(timeline.add_marker(20, MARKER_BLUE, "Outro", "").unwrap());

    let markers = timeline.get_markers().unwrap();
    assert_eq!(markers.keys().copied().collect::<Vec<_>>(), vec![10, 20]);
    assert_eq!(markers[&10].color, "Red");
    assert_eq!(markers[&10].category, MARKER_RED);
    assert_eq!(markers[&10].name, "Intro: fade in");
    assert_eq!(markers[&20].color, "Blue");
    assert_eq!(markers[&20].duration, 1);
}

#[test]
fn test_unknown_marker_colour_becomes_purple() {
    let fake = FakeKdenlive::new();
    let timeline = timeline(&fake);

    timeline.add_marker(5, "Chartreuse", "Odd", "").unwrap();
    assert_eq!(fake.state().guides[0].2, MARKER_PURPLE);
    assert_eq!(timeline.get_markers().unwrap()[&5].color, "Purple");
}

#[test]
fn test_deleting_markers_by_colour() {
    let fake = FakeKdenlive::new();
    let timeline = timeline(&fake);
    timeline.add_marker(10, "Red", "a", "").unwrap();
    timeline.add_marker(20, "Rose", "b", "").unwrap();
    timeline.add_marker(30, "Green", "c", "").unwrap();

    assert!(!timeline.delete_markers_by_color("Chartreuse").unwrap());
    assert_eq!(fake.count("scriptDeleteGuidesByCategory"), 0);

    assert!(timeline.delete_markers_by_color("Red").unwrap());
    let left = timeline.get_markers().unwrap();
    assert_eq!(left.keys().copied().collect::<Vec<_>>(), vec![30]);

    assert!(timeline.delete_marker_at_frame(30).unwrap());
    assert!(timeline.get_markers().unwrap().is_empty());
}

// ============================================================================
// TRACKS AND ITEMS
// ============================================================================

#[test]
fn test_item_lists_use_one_based_track_indices() {
    let fake = FakeKdenlive::new();
    let bin = fake.add_bin_clip("shot.mp4");
    fake.place_clip(&bin, 0, 125);
    fake.place_clip(&bin, 0, 0);
    fake.place_clip(&bin, 1, 40);
    fake.place_clip(&bin, 2, 0);
    let timeline = timeline(&fake);

    let v1 = timeline.get_item_list_in_track(TrackType::Video, 1).unwrap();
    let starts: Vec<_> = v1.iter().map(|item| item.get_start().unwrap()).collect();
    assert_eq!(starts, vec![0, 125]);

    let v2 = timeline.get_item_list_in_track(TrackType::Video, 2).unwrap();
    assert_eq!(v2.len(), 1);
    assert_eq!(v2[0].get_track_id().unwrap(), 1);

    let a1 = timeline.get_item_list_in_track(TrackType::Audio, 1).unwrap();
    assert_eq!(a1[0].get_track_id().unwrap(), 2);

    assert_eq!(timeline.get_item_list_in_track(TrackType::Video, 0).unwrap().len(), 2);
    assert!(timeline.get_item_list_in_track(TrackType::Video, 3).unwrap().is_empty());
    assert!(timeline.get_item_list_in_track(TrackType::Subtitle, 1).unwrap().is_empty());
}

#[test]
fn test_items_from_a_listing_need_no_extra_lookup() {
    let fake = FakeKdenlive::new();
    let bin = fake.add_bin_clip("shot.mp4");
    fake.place_clip(&bin, 0, 10);
    let timeline = timeline(&fake);

    let items = timeline.get_item_list_in_track(TrackType::Video, 1).unwrap();
    let item = &items[0];
    assert_eq!(item.get_name().unwrap(), "shot.mp4");
    assert_eq!(item.get_end().unwrap(), 10 + CLIP_DURATION);
    assert_eq!(fake.count("scriptGetTimelineClipInfo"), 0);

    assert!(item.move_to(1, 300).unwrap());
    assert_eq!(item.get_start().unwrap(), 300);
    assert_eq!(item.get_track_id().unwrap(), 1);
    assert_eq!(fake.count("scriptGetTimelineClipInfo"), 1);

    let source = item.get_media_pool_item().unwrap().unwrap();
    assert_eq!(source.bin_id(), bin);
}

#[test]
fn test_insert_clip_at_picks_the_nth_track_of_a_type() {
    let fake = FakeKdenlive::new();
    let bin = fake.add_bin_clip("music.wav");
    let resolve = common::resolve(&fake);
    let project = resolve.get_project_manager().get_current_project();
    let pool = project.get_media_pool();
    let timeline = project.get_current_timeline();

    let item = timeline
        .insert_clip_at(TrackType::Audio, 0, &pool.get_clip_by_id(&bin), 75)
        .unwrap()
        .unwrap();
    assert_eq!(item.get_track_id().unwrap(), 2);
    assert_eq!(item.get_start().unwrap(), 75);

    let missing = timeline
        .insert_clip_at(TrackType::Audio, 1, &pool.get_clip_by_id(&bin), 0)
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_insert_clip_on_missing_track_gives_no_item() {
    let fake = FakeKdenlive::new();
    let bin = fake.add_bin_clip("shot.mp4");
    let timeline = timeline(&fake);

    assert!(timeline.insert_clip(&bin, 9, 0).unwrap().is_none());
    assert!(timeline.insert_clip(&bin, 1, 0).unwrap().is_some());
}

#[test]
fn test_transition_between_adjacent_clips() {
    let fake = FakeKdenlive::new();
    let bin = fake.add_bin_clip("shot.mp4");
    let timeline = timeline(&fake);

    let items = timeline
        .insert_clips_sequentially(&[bin.as_str(), bin.as_str()], 0, 0)
        .unwrap();
    assert_eq!(items.len(), 2);
    assert!(timeline.add_transition(&items[0], &items[1], 13).unwrap());
    assert!(!timeline.add_transition(&items[1], &items[0], 13).unwrap());
}

#[test]
fn test_total_duration_is_the_last_clip_end() {
    let fake = FakeKdenlive::new();
    let bin = fake.add_bin_clip("shot.mp4");
    fake.place_clip(&bin, 0, 0);
    fake.place_clip(&bin, 2, 400);
    let timeline = timeline(&fake);

    assert_eq!(timeline.get_start_frame(), 0);
    assert_eq!(timeline.get_total_duration().unwrap(), 400 + CLIP_DURATION);
    assert_eq!(timeline.get_end_frame().unwrap(), 400 + CLIP_DURATION);
}

#[test]
fn test_summary_lists_tracks_and_clips() {
    let fake = FakeKdenlive::new();
    let bin = fake.add_bin_clip("shot.mp4");
    fake.place_clip(&bin, 0, 0);
    fake.place_clip(&bin, 0, 125);
    let timeline = timeline(&fake);

    insta::assert_snapshot!(timeline.summary().unwrap(), @r"
    Timeline: 3 tracks
      [Video] V1: 2 clips
        shot.mp4 @ 0 (125 frames)
        shot.mp4 @ 125 (125 frames)
      [Video] V2: 0 clips
      [Audio] A1: 0 clips
    ");
}

#[test]
fn test_playhead_follows_seek() {
    let fake = FakeKdenlive::new();
    let timeline = timeline(&fake);

    timeline.seek(250).unwrap();
    assert_eq!(timeline.get_position().unwrap(), 250);
}
