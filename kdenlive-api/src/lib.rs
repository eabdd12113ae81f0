//! Scripting Kdenlive through a DaVinci Resolve shaped API
//!
//!     Kdenlive exposes its scripting surface on the session bus as the `org.kde.kdenlive.MainWindow`
//!     interface of a PID-suffixed service. This crate drives that surface and presents it with the
//!     project / media pool / timeline vocabulary Resolve scripts are written against.
//!
//! Architecture
//!
//!     Calls flow top down and replies flow back up:
//!
//!     resolve::*  ->  ops (impl BusClient)  ->  bus::client  ->  bus::transport  ->  Kdenlive
//!
//!     - bus: the remote-call core. Finding the service, choosing a transport (a native binding
//!       when compiled in, otherwise the `dbus-send` / `qdbus` / `gdbus` tools), encoding arguments
//!       and parsing the `dbus-send --print-reply` dump into [`RemoteValue`].
//!     - ops: one method on [`BusClient`] per remote scripting call, grouped by area.
//!     - resolve: thin handles (Resolve, Project, MediaPool, Timeline, ...) that share one client
//!       through `Rc` and reshape replies.
//!     - timecode, scenes: helpers used by the workflow tools.
//!
//!     No editing happens locally. The only state kept on this side is handle-level caches and the
//!     resolved service name.
//!
//!     The file structure:
//!     .
//!     ├── error.rs
//!     ├── bus
//!     │   ├── value.rs        # RemoteValue, Arg
//!     │   ├── reply.rs        # reply dump parser
//!     │   ├── tools.rs        # CLI tool lookup, argv encoding, timed runner
//!     │   ├── locator.rs      # service discovery
//!     │   ├── transport.rs    # Transport trait, probes, subprocess transport
//!     │   ├── native.rs       # zbus binding (feature `native-bus`)
//!     │   └── client.rs       # BusClient
//!     ├── ops                 # remote method surface
//!     ├── resolve             # Resolve-shaped wrappers
//!     ├── scenes.rs
//!     └── timecode.rs
//!
//! Testing
//!
//!     Unit tests live next to the code. The integration tests under tests/ run the wrappers and
//!     the facade against an in-memory fake of Kdenlive's scripting interface (tests/common).

pub mod bus;
pub mod error;
pub mod ops;
pub mod resolve;
pub mod scenes;
pub mod timecode;

pub use bus::{Arg, BusClient, BusSettings, Record, RecordExt, RemoteValue, RetryPolicy};
pub use error::{BusError, Result};
pub use resolve::Resolve;
