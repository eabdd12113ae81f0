//! CLI bus tools: lookup, argument encoding and bounded execution.
//!
//! Three tools can carry a call, tried in this order:
//!
//! - `dbus-send`: typed arguments (`int32:5`, `array:string:a,b`), reply printed in the
//!   `--print-reply` dump that [`reply::parse`](super::reply::parse) understands.
//! - `qdbus`: bare positional arguments, sequences expanded into one argument per element,
//!   plain text reply.
//! - `gdbus`: bare positional arguments for scalars, GVariant text for sequences, plain text
//!   reply.
//!
//! Tools are looked up under `<craft root>/bin` first (KDE Craft installs on Windows), then on
//! `PATH`.

use super::value::{int32, Arg};
use crate::error::BusError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The CLI tools that can carry a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    DbusSend,
    Qdbus,
    Gdbus,
}

impl Tool {
    /// Fallback order for method calls.
    pub const ORDER: [Tool; 3] = [Tool::DbusSend, Tool::Qdbus, Tool::Gdbus];

    pub fn binary_name(self) -> &'static str {
        match self {
            Tool::DbusSend => "dbus-send",
            Tool::Qdbus => "qdbus",
            Tool::Gdbus => "gdbus",
        }
    }

    /// Whether the tool prints the typed reply dump rather than plain text.
    pub fn prints_typed_reply(self) -> bool {
        matches!(self, Tool::DbusSend)
    }
}

/// Where a call goes.
#[derive(Debug, Clone, Copy)]
pub struct CallTarget<'a> {
    pub service: &'a str,
    pub path: &'a str,
    pub interface: &'a str,
    pub method: &'a str,
}

impl CallTarget<'_> {
    fn qualified_method(&self) -> String {
        format!("{}.{}", self.interface, self.method)
    }
}

/// Find a tool binary. `<craft_root>/bin/<name>.exe` and `<craft_root>/bin/<name>` are checked
/// before falling back to a `PATH` search.
pub fn locate_tool(name: &str, craft_root: &Path) -> Option<PathBuf> {
    let bin = craft_root.join("bin");
    for candidate in [bin.join(format!("{name}.exe")), bin.join(name)] {
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    #[cfg(feature = "cli-tools")]
    {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    None
}

/// Argument vector for a `dbus-send` method call (program name excluded).
pub fn dbus_send_argv(target: &CallTarget<'_>, args: &[Arg]) -> Result<Vec<String>, BusError> {
    let mut argv = vec![
        "--session".to_string(),
        "--print-reply".to_string(),
        format!("--dest={}", target.service),
        target.path.to_string(),
        target.qualified_method(),
    ];
    for arg in args {
        argv.push(encode_dbus_send(arg)?);
    }
    Ok(argv)
}

/// Argument vector for a `qdbus` method call (program name excluded).
pub fn qdbus_argv(target: &CallTarget<'_>, args: &[Arg]) -> Vec<String> {
    let mut argv = vec![
        target.service.to_string(),
        target.path.to_string(),
        target.qualified_method(),
    ];
    for arg in args {
        match arg {
            Arg::List(items) => argv.extend(items.iter().map(ToString::to_string)),
            other => argv.push(other.to_string()),
        }
    }
    argv
}

/// Argument vector for a `gdbus call` (program name excluded).
pub fn gdbus_argv(target: &CallTarget<'_>, args: &[Arg]) -> Vec<String> {
    let mut argv = vec![
        "call".to_string(),
        "--session".to_string(),
        "--dest".to_string(),
        target.service.to_string(),
        "--object-path".to_string(),
        target.path.to_string(),
        "--method".to_string(),
        target.qualified_method(),
    ];
    argv.extend(args.iter().map(encode_gvariant));
    argv
}

/// Argument vector for listing the session bus names via `dbus-send`.
pub fn list_names_argv() -> Vec<String> {
    vec![
        "--session".to_string(),
        "--dest=org.freedesktop.DBus".to_string(),
        "--print-reply".to_string(),
        "/org/freedesktop/DBus".to_string(),
        "org.freedesktop.DBus.ListNames".to_string(),
    ]
}

/// Typed `dbus-send` token for one argument.
///
/// Sequences of plain integers become `array:int32:`; every other sequence is sent as a string
/// array with each element stringified. An empty sequence is still sent, as `array:string:`.
/// Integers outside the `int32` range are rejected.
pub fn encode_dbus_send(arg: &Arg) -> Result<String, BusError> {
    Ok(match arg {
        Arg::Bool(b) => format!("boolean:{b}"),
        Arg::Int(n) => format!("int32:{}", int32(*n)?),
        Arg::Float(x) => format!("double:{}", format_double(*x)),
        Arg::Str(s) => format!("string:{s}"),
        Arg::List(items) if items.is_empty() => "array:string:".to_string(),
        Arg::List(items) if items.iter().all(Arg::is_plain_int) => {
            arg.check_int32()?;
            format!("array:int32:{}", join(items))
        }
        Arg::List(items) => format!("array:string:{}", join(items)),
    })
}

/// GVariant text for one argument, as accepted by `gdbus call`.
pub fn encode_gvariant(arg: &Arg) -> String {
    match arg {
        Arg::List(items) if items.is_empty() => "@as []".to_string(),
        Arg::List(items) if items.iter().all(Arg::is_plain_int) => {
            let body: Vec<String> = items.iter().map(ToString::to_string).collect();
            format!("[{}]", body.join(", "))
        }
        Arg::List(items) => {
            let body: Vec<String> = items
                .iter()
                .map(|item| format!("'{}'", item.to_string().replace('\'', "\\'")))
                .collect();
            format!("[{}]", body.join(", "))
        }
        other => other.to_string(),
    }
}

fn join(items: &[Arg]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Doubles always carry a decimal point so `dbus-send` does not reject `double:25`.
fn format_double(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

/// Run `program` with `argv`, returning its trimmed stdout.
///
/// The child is killed once `timeout` elapses. A non-zero exit status is an error carrying
/// the child's stderr.
pub fn run_tool(program: &Path, argv: &[String], timeout: Duration) -> Result<String, BusError> {
    let tool = program
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());

    log::debug!("running {} {}", program.display(), argv.join(" "));

    let mut child = Command::new(program)
        .args(argv)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => BusError::ToolMissing(tool.clone()),
            _ => BusError::Spawn {
                tool: tool.clone(),
                source,
            },
        })?;

    // Drain both pipes off-thread so a large reply cannot fill the pipe and stall the child.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(BusError::Timeout { tool, timeout });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => return Err(BusError::Spawn { tool, source }),
        }
    };

    let stdout = collect(stdout);
    let stderr = collect(stderr);

    if !status.success() {
        return Err(BusError::ToolFailed {
            tool,
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(stdout.trim().to_string())
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
