//! Timeline workflows behind the `kdenlive` binary.
//!
//! Each workflow takes a connected [`Resolve`](kdenlive_api::Resolve), an options struct and a
//! writer for the progress report, so the binary stays a thin layer of argument parsing.
//!
//! - [`assemble`]: build a music video timeline from numbered scene files.
//! - [`adjust`]: replace one scene, preview a scene or frame, re-apply transitions.
//!
//! Checks that need only the file system (scene files present, replacement file exists) are
//! separate functions so they can run before anything talks to Kdenlive.

pub mod adjust;
pub mod assemble;

use std::path::PathBuf;
use thiserror::Error;

/// Why a workflow stopped.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Bus(#[from] kdenlive_api::BusError),

    #[error("could not write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("no scene videos found in {}", .0.display())]
    NoSceneVideos(PathBuf),

    #[error("scene {scene} not found (track has {clips} clips)")]
    SceneOutOfRange { scene: usize, clips: usize },

    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to import {}", .0.display())]
    ImportFailed(PathBuf),

    #[error("failed to insert the new clip at frame {0}")]
    InsertFailed(i64),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
