//! Fake lookups for exercising endpoint resolution without a network.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::net::IpAddr;
use tracing_subscriber::EnvFilter;
use wg_endpoint::error::{ErrorKind, NameResolutionError};
use wg_endpoint::lookup::{
    AddressCandidate, HostLookup, ServiceRecord, SrvLookup,
};

/// Setup logging of events reported by the resolver.
///
/// Use the RUST_LOG environment variable to override the defaults, e.g.,
/// `RUST_LOG=wg_endpoint=TRACE`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

//------------ FakeHosts -----------------------------------------------------

/// A system resolver with a fixed set of answers.
///
/// Names without an entry are not found. Every lookup is recorded.
#[derive(Debug, Default)]
pub struct FakeHosts {
    answers: HashMap<String, Result<Vec<AddressCandidate>, ErrorKind>>,
    calls: RefCell<Vec<String>>,
}

impl FakeHosts {
    pub fn new() -> Self {
        Default::default()
    }

    /// Lets `name` resolve to `addrs`, in this order.
    pub fn answer(mut self, name: &str, addrs: &[&str]) -> Self {
        let addrs = addrs
            .iter()
            .map(|addr| addr.parse::<IpAddr>().unwrap().into())
            .collect();
        self.answers.insert(name.into(), Ok(addrs));
        self
    }

    /// Lets every lookup of `name` fail with `kind`.
    pub fn fail(mut self, name: &str, kind: ErrorKind) -> Self {
        self.answers.insert(name.into(), Err(kind));
        self
    }

    /// Returns how often `name` was looked up.
    pub fn calls(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|item| *item == name).count()
    }

    /// Returns the total number of lookups.
    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl HostLookup for FakeHosts {
    fn lookup_host(
        &self,
        name: &str,
    ) -> Result<Vec<AddressCandidate>, NameResolutionError> {
        self.calls.borrow_mut().push(name.into());
        match self.answers.get(name) {
            Some(Ok(addrs)) => Ok(addrs.clone()),
            Some(Err(kind)) => Err(NameResolutionError::new(name, *kind)),
            None => Err(NameResolutionError::not_found(name)),
        }
    }
}

//------------ FakeZone ------------------------------------------------------

/// A DNS zone with SRV records and addresses.
#[derive(Debug, Default)]
pub struct FakeZone {
    srv: HashMap<(String, String, String), Vec<ServiceRecord>>,
    addrs: HashMap<String, Vec<IpAddr>>,
    failing: bool,
}

impl FakeZone {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds an SRV record for `_service._proto.domain`.
    pub fn srv(
        mut self,
        service: &str,
        proto: &str,
        domain: &str,
        record: ServiceRecord,
    ) -> Self {
        self.srv
            .entry((service.into(), proto.into(), domain.into()))
            .or_default()
            .push(record);
        self
    }

    /// Adds an address for `host`.
    pub fn addr(mut self, host: &str, addr: &str) -> Self {
        self.addrs
            .entry(host.into())
            .or_default()
            .push(addr.parse().unwrap());
        self
    }

    /// Lets all SRV lookups fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl SrvLookup for FakeZone {
    fn lookup_srv(
        &self,
        service: &str,
        proto: &str,
        domain: &str,
    ) -> Result<Vec<ServiceRecord>, io::Error> {
        if self.failing {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"));
        }
        let key: (String, String, String) =
            (service.into(), proto.into(), domain.into());
        Ok(self.srv.get(&key).cloned().unwrap_or_default())
    }

    fn lookup_addrs(&self, host: &str) -> Vec<IpAddr> {
        self.addrs.get(host).cloned().unwrap_or_default()
    }
}
