//! Transports and transport selection.
//!
//! A [`Transport`] carries one method call to a named service and brings back a
//! [`RemoteValue`]. Two kinds exist:
//!
//! - a native binding that holds a live bus connection ([`TransportMode::Native`]), available
//!   with the `native-bus` feature;
//! - [`ProcessTransport`], which shells out to the CLI tools for every call
//!   ([`TransportMode::Subprocess`]).
//!
//! [`select_transport`] walks a list of [`BindingProbe`]s in priority order and takes the first
//! binding that is present, offers blocking calls, supports method calls and connects.
//! Anything else falls through, and subprocess mode is always there at the end.

use super::reply;
use super::tools::{self, CallTarget, Tool};
use super::value::{Arg, RemoteValue};
use super::BusSettings;
use crate::error::BusError;

/// Carries method calls to the remote application.
pub trait Transport {
    /// Invoke `method` on `service` with `args`.
    fn call(&self, service: &str, method: &str, args: &[Arg]) -> Result<RemoteValue, BusError>;

    /// Names currently registered on the session bus.
    fn list_names(&self) -> Result<Vec<String>, BusError>;
}

/// Which kind of transport a client ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Native,
    Subprocess,
}

/// What a bus binding can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Calls can be made synchronously, without an async runtime.
    pub blocking_calls: bool,
    /// The binding can invoke methods on remote objects, not just listen.
    pub method_calls: bool,
}

/// A candidate bus binding, checked at client construction.
pub trait BindingProbe {
    fn name(&self) -> &str;

    /// `None` when the binding is not available in this build or on this machine.
    fn capabilities(&self) -> Option<Capabilities>;

    /// Open a connection.
    fn connect(&self, settings: &BusSettings) -> Result<Box<dyn Transport>, BusError>;
}

/// The bindings compiled into this build, in priority order.
pub fn default_probes() -> Vec<Box<dyn BindingProbe>> {
    #[allow(unused_mut)]
    let mut probes: Vec<Box<dyn BindingProbe>> = Vec::new();
    #[cfg(feature = "native-bus")]
    probes.push(Box::new(super::native::ZbusProbe));
    probes
}

/// Pick a transport. Only a usable native binding yields [`TransportMode::Native`].
pub fn select_transport(
    probes: &[Box<dyn BindingProbe>],
    settings: &BusSettings,
) -> (TransportMode, Box<dyn Transport>) {
    for probe in probes {
        let Some(caps) = probe.capabilities() else {
            log::debug!("bus binding {} is not available", probe.name());
            continue;
        };
        if !caps.blocking_calls {
            log::debug!("bus binding {} only offers async calls, skipping", probe.name());
            continue;
        }
        if !caps.method_calls {
            log::debug!("bus binding {} cannot call methods, skipping", probe.name());
            continue;
        }
        match probe.connect(settings) {
            Ok(transport) => {
                log::debug!("using native bus binding {}", probe.name());
                return (TransportMode::Native, transport);
            }
            Err(err) => log::debug!("bus binding {} failed to connect: {err}", probe.name()),
        }
    }

    log::debug!("using CLI bus tools");
    (
        TransportMode::Subprocess,
        Box::new(ProcessTransport::new(settings.clone())),
    )
}

/// Shells out to `dbus-send`, `qdbus` and `gdbus`, in that order, for every call.
#[derive(Debug, Clone)]
pub struct ProcessTransport {
    settings: BusSettings,
}

impl ProcessTransport {
    pub fn new(settings: BusSettings) -> Self {
        Self { settings }
    }

    fn call_with(
        &self,
        tool: Tool,
        target: &CallTarget<'_>,
        args: &[Arg],
    ) -> Result<RemoteValue, BusError> {
        let program = tools::locate_tool(tool.binary_name(), &self.settings.craft_root)
            .ok_or_else(|| BusError::ToolMissing(tool.binary_name().to_string()))?;

        let argv = match tool {
            Tool::DbusSend => tools::dbus_send_argv(target, args)?,
            Tool::Qdbus => tools::qdbus_argv(target, args),
            Tool::Gdbus => tools::gdbus_argv(target, args),
        };

        let output = tools::run_tool(&program, &argv, self.settings.call_timeout)?;

        if tool.prints_typed_reply() {
            Ok(reply::parse(&output))
        } else if output.is_empty() {
            Ok(RemoteValue::Void)
        } else {
            Ok(RemoteValue::Str(output))
        }
    }
}

impl Transport for ProcessTransport {
    fn call(&self, service: &str, method: &str, args: &[Arg]) -> Result<RemoteValue, BusError> {
        // qdbus and gdbus take bare text, so range-check before any tool sees the arguments
        args.iter().try_for_each(Arg::check_int32)?;

        let target = CallTarget {
            service,
            path: &self.settings.object_path,
            interface: &self.settings.interface,
            method,
        };

        let mut last = None;
        for tool in Tool::ORDER {
            match self.call_with(tool, &target, args) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    log::debug!("{} could not call {method}: {err}", tool.binary_name());
                    last = Some(err);
                }
            }
        }

        let last = last.unwrap_or_else(|| BusError::ToolMissing("dbus-send".to_string()));
        Err(BusError::Exhausted {
            method: method.to_string(),
            last: Box::new(last),
        })
    }

    fn list_names(&self) -> Result<Vec<String>, BusError> {
        let tool = Tool::DbusSend.binary_name();
        let program = tools::locate_tool(tool, &self.settings.craft_root)
            .ok_or_else(|| BusError::ToolMissing(tool.to_string()))?;
        let output = tools::run_tool(
            &program,
            &tools::list_names_argv(),
            self.settings.discovery_timeout,
        )?;
        Ok(reply::parse(&output).into_string_list())
    }
}
