use crate::common::{self, FakeKdenlive};
use kdenlive_api::{Record, RemoteValue};

#[test]
fn test_load_project_waits_for_kdenlive() {
    let fake = FakeKdenlive::new();
    fake.state_mut().open_failures = 2;
    let manager = common::resolve(&fake).get_project_manager();

    let project = manager.load_project("/tmp/film.kdenlive").unwrap();
    assert!(project.is_some());
    assert_eq!(fake.count("scriptOpenProject"), 3);
}

#[test]
fn test_create_project_names_it() {
    let fake = FakeKdenlive::new();
    let manager = common::resolve(&fake).get_project_manager();

    let project = manager.create_project("Trailer").unwrap().unwrap();
    assert_eq!(project.get_name().unwrap(), "Trailer");
    assert_eq!(
        manager.get_project_list_in_current_folder().unwrap(),
        vec!["Trailer"]
    );
}

#[test]
fn test_resolve_setting_keys_read_the_profile() {
    let fake = FakeKdenlive::new();
    let project = common::resolve(&fake)
        .get_project_manager()
        .get_current_project();

    assert_eq!(project.get_setting("timelineFrameRate").unwrap(), "25.0");
    assert_eq!(project.get_setting("timelineResolutionWidth").unwrap(), "1920");
    assert_eq!(project.get_setting("timelineResolutionHeight").unwrap(), "1080");
    assert_eq!(project.get_resolution().unwrap(), (1920, 1080));

    assert!(project.set_setting("author", "studio").unwrap());
    assert_eq!(project.get_setting("author").unwrap(), "studio");
}

#[test]
fn test_render_settings_become_project_properties() {
    let fake = FakeKdenlive::new();
    let project = common::resolve(&fake)
        .get_project_manager()
        .get_current_project();

    let mut settings = Record::new();
    settings.insert("TargetDir".into(), RemoteValue::from("/renders"));
    settings.insert("FrameRate".into(), RemoteValue::Float(25.0));
    assert!(project.set_render_settings(&settings).unwrap());
    assert!(project
        .set_current_render_format_and_codec("mp4", "H264")
        .unwrap());

    let state = fake.state();
    assert_eq!(state.properties["render_TargetDir"], "/renders");
    assert_eq!(state.properties["renderFormat"], "mp4");
    assert_eq!(state.properties["renderCodec"], "H264");
}

#[test]
fn test_one_timeline_while_video_tracks_exist() {
    let fake = FakeKdenlive::new();
    let project = common::resolve(&fake)
        .get_project_manager()
        .get_current_project();

    assert_eq!(project.get_timeline_count(), 1);
    assert!(project.get_timeline_by_index(1).is_some());
    assert!(project.get_timeline_by_index(2).is_none());

    fake.state_mut().tracks.retain(|track| track.audio);
    assert_eq!(project.get_timeline_count(), 0);
}

#[test]
fn test_render_job_stubs() {
    let fake = FakeKdenlive::new();
    let project = common::resolve(&fake)
        .get_project_manager()
        .get_current_project();

    let job = project.add_render_job();
    assert_eq!(project.get_render_job_status(&job)["JobStatus"], RemoteValue::from("Complete"));
    assert!(!project.is_rendering_in_progress());
    assert!(project.get_render_job_list().is_empty());
}
