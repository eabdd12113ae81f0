//! Remote operations, one [`BusClient`](crate::bus::BusClient) method per scripting call.
//!
//! Each file adds an `impl BusClient` block for one area of the scripting interface. The
//! methods all follow the same shape: forward to a fixed remote method name, then coerce the
//! reply into the Rust type the caller expects. Boolean replies go through
//! [`RemoteValue::as_bool`](crate::bus::RemoteValue::as_bool) so that `"true"`/`"false"` text
//! from the plain-text tools is accepted.
//!
//! Operations that take a track id validate it against a fresh track listing first, because
//! Kdenlive crashes on unknown tracks. See [`tracks`] and [`clips`].

pub mod bin;
pub mod clips;
pub mod editing;
pub mod effects;
pub mod markers;
pub mod playback;
pub mod project;
pub mod render;
pub mod subtitles;
pub mod tracks;
pub mod transitions;

/// Bin folder id of the root folder.
pub const ROOT_FOLDER_ID: &str = "-1";
