//! Service discovery.
//!
//! A running Kdenlive registers `org.kde.kdenlive-<pid>` on the session bus. Discovery lists
//! the bus names and picks the first one of that shape. Every failure along the way (tool
//! missing, timeout, odd reply) lands on the generic name instead of an error.

use super::transport::Transport;
use std::fmt;

/// Resolved bus name of the Kdenlive instance. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceAddress(String);

impl ServiceAddress {
    /// Wrap a bus name. An empty name falls back to `fallback`.
    pub fn new(name: impl Into<String>, fallback: &str) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self(fallback.to_string())
        } else {
            Self(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `name` is `<prefix>-<ascii digits>`.
pub fn is_instance_name(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|pid| !pid.is_empty() && pid.bytes().all(|b| b.is_ascii_digit()))
}

/// First instance name in `names`, in listing order.
pub fn pick_instance<'a>(names: &'a [String], prefix: &str) -> Option<&'a str> {
    names
        .iter()
        .map(String::as_str)
        .find(|name| is_instance_name(name, prefix))
}

/// Resolve the service address. Falls back to `prefix` itself when no instance is listed or
/// the listing fails.
pub fn discover(transport: &dyn Transport, prefix: &str) -> ServiceAddress {
    match transport.list_names() {
        Ok(names) => match pick_instance(&names, prefix) {
            Some(name) => {
                log::debug!("discovered kdenlive instance {name}");
                ServiceAddress::new(name, prefix)
            }
            None => {
                log::debug!("no {prefix}-<pid> on the bus, using {prefix}");
                ServiceAddress::new(prefix, prefix)
            }
        },
        Err(err) => {
            log::debug!("bus name listing failed ({err}), using {prefix}");
            ServiceAddress::new(prefix, prefix)
        }
    }
}
