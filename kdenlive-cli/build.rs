use clap::{value_parser, Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;
use std::path::PathBuf;

// Mirror of build_cli() in src/main.rs; build scripts can't reach src/ modules

fn track_arg() -> Arg {
    Arg::new("track")
        .long("track")
        .help("Video track index, counted from 0")
        .default_value("0")
        .value_parser(value_parser!(usize))
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("kdenlive")
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
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("audio")
                        .long("audio")
                        .value_name("FILE")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("variant").long("variant"))
                .arg(Arg::new("transition-frames").long("transition-frames"))
                .arg(
                    Arg::new("script")
                        .long("script")
                        .value_name("FILE")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("scenes").long("scenes").value_name("N")),
        )
        .subcommand(
            Command::new("replace")
                .about("Replace one scene with a new video file")
                .arg(Arg::new("scene").long("scene").required(true))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(track_arg()),
        )
        .subcommand(
            Command::new("preview")
                .about("Seek to a scene or frame and play")
                .arg(Arg::new("scene").long("scene"))
                .arg(Arg::new("frame").long("frame"))
                .arg(track_arg())
                .arg(
                    Arg::new("no-play")
                        .long("no-play")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("transitions")
                .about("Add mixes between all adjacent clips on a video track")
                .arg(Arg::new("duration").long("duration"))
                .arg(track_arg()),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "kdenlive", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "kdenlive", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "kdenlive", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
