//! The remote call facade.
//!
//! [`BusClient`] owns the transport chosen at construction, the resolved service address and
//! the timing knobs. Every remote operation in [`crate::ops`] funnels through
//! [`BusClient::invoke`], which adds one piece of recovery on top of the transport: when a call
//! fails, the service is rediscovered, and if Kdenlive has come back under a different PID the
//! call is retried exactly once against the new name.
//!
//! Domain wrappers share one client through `Rc<BusClient>`; the address lives in a `RefCell`
//! because rediscovery happens behind `&self`.

use super::locator::{discover, ServiceAddress};
use super::transport::{default_probes, select_transport, BindingProbe, Transport, TransportMode};
use super::value::{Arg, Record, RemoteValue};
use super::{BusSettings, RetryPolicy};
use crate::error::Result;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

pub struct BusClient {
    transport: Box<dyn Transport>,
    mode: TransportMode,
    address: RefCell<ServiceAddress>,
    settings: BusSettings,
    retry: RetryPolicy,
    sleeper: Box<dyn Fn(Duration)>,
}

impl BusClient {
    /// Select a transport from the bindings compiled into this build and discover the service.
    pub fn connect(settings: BusSettings) -> Self {
        Self::with_probes(settings, &default_probes())
    }

    pub fn with_probes(settings: BusSettings, probes: &[Box<dyn BindingProbe>]) -> Self {
        let (mode, transport) = select_transport(probes, &settings);
        Self::from_transport(transport, mode, settings)
    }

    /// Build a client around an existing transport. Discovery runs immediately.
    pub fn from_transport(
        transport: Box<dyn Transport>,
        mode: TransportMode,
        settings: BusSettings,
    ) -> Self {
        let address = discover(transport.as_ref(), &settings.service_prefix);
        Self {
            transport,
            mode,
            address: RefCell::new(address),
            settings,
            retry: RetryPolicy::default(),
            sleeper: Box::new(std::thread::sleep),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the sleeping primitive used for backoff and settle delays.
    pub fn with_sleeper(mut self, sleeper: impl Fn(Duration) + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// The bus name calls are currently sent to.
    pub fn service(&self) -> ServiceAddress {
        self.address.borrow().clone()
    }

    pub fn settings(&self) -> &BusSettings {
        &self.settings
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Run discovery again. Returns whether the address changed.
    pub fn rediscover(&self) -> bool {
        let fresh = discover(self.transport.as_ref(), &self.settings.service_prefix);
        let changed = fresh != *self.address.borrow();
        if changed {
            log::info!("kdenlive service moved to {fresh}");
            self.address.replace(fresh);
        }
        changed
    }

    /// Call `method` on the scripting interface.
    pub fn invoke(&self, method: &str, args: &[Arg]) -> Result<RemoteValue> {
        let service = self.service();
        match self.transport.call(service.as_str(), method, args) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::debug!("{method} failed on {service}: {err}");
                if self.rediscover() {
                    let service = self.service();
                    log::debug!("retrying {method} on {service}");
                    self.transport.call(service.as_str(), method, args)
                } else {
                    Err(err)
                }
            }
        }
    }

    pub(crate) fn sleep_for(&self, duration: Duration) {
        if !duration.is_zero() {
            (self.sleeper)(duration);
        }
    }

    pub(crate) fn call_bool(&self, method: &str, args: &[Arg]) -> Result<bool> {
        Ok(self.invoke(method, args)?.as_bool())
    }

    pub(crate) fn call_i64(&self, method: &str, args: &[Arg], fallback: i64) -> Result<i64> {
        Ok(self.invoke(method, args)?.i64_or(fallback))
    }

    pub(crate) fn call_f64(&self, method: &str, args: &[Arg], fallback: f64) -> Result<f64> {
        Ok(self.invoke(method, args)?.f64_or(fallback))
    }

    pub(crate) fn call_text(&self, method: &str, args: &[Arg]) -> Result<String> {
        Ok(self.invoke(method, args)?.to_text())
    }

    pub(crate) fn call_record(&self, method: &str, args: &[Arg]) -> Result<Record> {
        Ok(self.invoke(method, args)?.into_map())
    }

    pub(crate) fn call_records(&self, method: &str, args: &[Arg]) -> Result<Vec<Record>> {
        Ok(self.invoke(method, args)?.into_records())
    }

    /// Track ids of the current project, fetched fresh on every call.
    pub fn valid_track_ids(&self) -> Result<BTreeSet<i64>> {
        Ok(self
            .get_all_tracks_info()?
            .iter()
            .filter_map(|track| track.get("id").and_then(RemoteValue::as_i64))
            .collect())
    }

    /// Whether `track_id` can be sent to Kdenlive. An empty track listing accepts anything.
    pub(crate) fn track_accepted(&self, track_id: i64) -> Result<bool> {
        let valid = self.valid_track_ids()?;
        if valid.is_empty() || valid.contains(&track_id) {
            Ok(true)
        } else {
            log::warn!("track {track_id} does not exist (valid: {valid:?})");
            Ok(false)
        }
    }
}

impl fmt::Debug for BusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusClient")
            .field("mode", &self.mode)
            .field("service", &*self.address.borrow())
            .field("settings", &self.settings)
            .finish()
    }
}
