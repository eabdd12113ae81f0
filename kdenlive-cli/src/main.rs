// Command-line interface for the Kdenlive timeline workflows
//
// The binary talks to a running Kdenlive over the session bus. It does not start Kdenlive and
// never edits project files directly.
//
// Usage:
//  kdenlive build [--video-dir <dir>] [--audio <file>] [--variant A] [--transition-frames 13]
//                 [--script <md>] [--scenes 38]
//  kdenlive replace --scene <n> --file <video> [--track 0]
//  kdenlive preview [--scene <n> | --frame <f>] [--track 0] [--no-play]
//  kdenlive transitions [--duration 13] [--track 0]
//
// Defaults for the workflow knobs come from kdenlive.toml in the working directory (or the file
// given with --config), layered over the built-in defaults.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, ValueHint};
use kdenlive_api::{BusClient, BusSettings, Resolve, RetryPolicy};
use kdenlive_cli::adjust::{self, PreviewOptions, ReplaceOptions, TransitionOptions};
use kdenlive_cli::assemble::{self, BuildOptions};
use kdenlive_config::{KdenliveConfig, Loader, LOCAL_CONFIG_FILE};
use std::io;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("kdenlive")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Assemble and adjust music video timelines in a running Kdenlive")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a kdenlive.toml configuration file")
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (repeat for more)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Build the full timeline from numbered scene videos")
                .arg(
                    Arg::new("video-dir")
                        .long("video-dir")
                        .value_name("DIR")
                        .help("Directory containing the sceneNN-<variant> videos")
                        .value_parser(value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("audio")
                        .long("audio")
                        .value_name("FILE")
                        .help("Music file to place on the first audio track")
                        .value_parser(value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("variant")
                        .long("variant")
                        .help("Scene variant to use (A or B)"),
                )
                .arg(
                    Arg::new("transition-frames")
                        .long("transition-frames")
                        .value_name("FRAMES")
                        .help("Mix length between scenes (0 = no transitions)")
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("script")
                        .long("script")
                        .value_name("FILE")
                        .help("Scene script used to label the guides")
                        .value_parser(value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("scenes")
                        .long("scenes")
                        .value_name("N")
                        .help("Number of scene slots on the timeline")
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("replace")
                .about("Replace one scene with a new video file")
                .arg(
                    Arg::new("scene")
                        .long("scene")
                        .help("Scene number, counted from 1")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("file")
                        .long("file")
                        .help("Path to the new video file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(track_arg()),
        )
        .subcommand(
            Command::new("preview")
                .about("Seek to a scene or frame and play")
                .arg(
                    Arg::new("scene")
                        .long("scene")
                        .help("Scene number, counted from 1")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("frame")
                        .long("frame")
                        .help("Frame number")
                        .value_parser(value_parser!(i64)),
                )
                .arg(track_arg())
                .arg(
                    Arg::new("no-play")
                        .long("no-play")
                        .help("Seek without starting playback")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("transitions")
                .about("Add mixes between all adjacent clips on a video track")
                .arg(
                    Arg::new("duration")
                        .long("duration")
                        .value_name("FRAMES")
                        .help("Mix length in frames")
                        .value_parser(value_parser!(i64)),
                )
                .arg(track_arg()),
        )
}

fn track_arg() -> Arg {
    Arg::new("track")
        .long("track")
        .help("Video track index, counted from 0")
        .default_value("0")
        .value_parser(value_parser!(usize))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_cli_config(explicit_path: Option<&PathBuf>) -> KdenliveConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn connect(config: &KdenliveConfig) -> Resolve {
    let client = BusClient::connect(BusSettings::from(&config.bus))
        .with_retry_policy(RetryPolicy::from(&config.retry));
    log::info!("using {:?} transport for {}", client.mode(), client.service());
    Resolve::from_client(client)
}

fn handle_build_command(matches: &ArgMatches, config: &KdenliveConfig) -> kdenlive_cli::Result<()> {
    let workflow = &config.workflow;
    let options = BuildOptions {
        video_dir: matches
            .get_one::<PathBuf>("video-dir")
            .cloned()
            .unwrap_or_else(|| workflow.video_dir.clone()),
        audio: matches.get_one::<PathBuf>("audio").cloned(),
        variant: matches
            .get_one::<String>("variant")
            .cloned()
            .unwrap_or_else(|| workflow.variant.clone()),
        transition_frames: matches
            .get_one::<i64>("transition-frames")
            .copied()
            .unwrap_or(workflow.mix_duration_frames),
        script: Some(
            matches
                .get_one::<PathBuf>("script")
                .cloned()
                .unwrap_or_else(|| workflow.script.clone()),
        ),
        scene_count: matches
            .get_one::<u32>("scenes")
            .copied()
            .unwrap_or(workflow.scene_count),
        scene_duration: workflow.scene_duration_frames,
    };

    let plan = assemble::plan_build(options)?;
    let resolve = connect(config);
    let mut out = io::stdout().lock();
    let report = assemble::run_build(&resolve, &plan, &mut out)?;
    log::info!(
        "placed {} scenes, {} gaps, {} transitions",
        report.placed,
        report.gaps.len(),
        report.transitions
    );
    println!("Done!");
    Ok(())
}

fn handle_replace_command(matches: &ArgMatches, config: &KdenliveConfig) -> kdenlive_cli::Result<()> {
    let options = ReplaceOptions {
        scene: *matches.get_one::<usize>("scene").expect("scene is required"),
        file: matches
            .get_one::<PathBuf>("file")
            .expect("file is required")
            .clone(),
        track: matches.get_one::<usize>("track").copied().unwrap_or(0),
    };
    adjust::check_replacement(&options.file)?;

    let resolve = connect(config);
    adjust::replace_scene(&resolve, &options, &mut io::stdout().lock())?;
    println!("Done!");
    Ok(())
}

fn handle_preview_command(matches: &ArgMatches, config: &KdenliveConfig) -> kdenlive_cli::Result<()> {
    let scene = matches.get_one::<usize>("scene").copied();
    let frame = matches.get_one::<i64>("frame").copied();
    let options = PreviewOptions {
        scene,
        frame,
        track: matches.get_one::<usize>("track").copied().unwrap_or(0),
        play: (scene.is_some() || frame.is_some()) && !matches.get_flag("no-play"),
    };

    let resolve = connect(config);
    adjust::preview(&resolve, &options, &mut io::stdout().lock())?;
    Ok(())
}

fn handle_transitions_command(
    matches: &ArgMatches,
    config: &KdenliveConfig,
) -> kdenlive_cli::Result<()> {
    let options = TransitionOptions {
        duration: matches
            .get_one::<i64>("duration")
            .copied()
            .unwrap_or(config.workflow.mix_duration_frames),
        track: matches.get_one::<usize>("track").copied().unwrap_or(0),
    };

    let resolve = connect(config);
    adjust::add_transitions(&resolve, &options, &mut io::stdout().lock())?;
    Ok(())
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));
    let config = load_cli_config(matches.get_one::<PathBuf>("config"));

    let result = match matches.subcommand() {
        Some(("build", sub_matches)) => handle_build_command(sub_matches, &config),
        Some(("replace", sub_matches)) => handle_replace_command(sub_matches, &config),
        Some(("preview", sub_matches)) => handle_preview_command(sub_matches, &config),
        Some(("transitions", sub_matches)) => handle_transitions_command(sub_matches, &config),
        _ => unreachable!("a subcommand is required"),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
