//! Resolving plain host names.
//!
//! Host names are resolved through the system resolver with a fixed retry
//! policy. Temporary failures are always retried. A name that was not found
//! is only retried if the process was started while the machine was
//! booting: the network may simply not be up yet, so a negative answer
//! isn’t trusted until the last try.

use crate::conf::ResolveConfig;
use crate::error::{ErrorKind, NameResolutionError};
use crate::lookup::{AddressCandidate, HostLookup};
use crate::sleep::Sleep;
use std::net::{IpAddr, Ipv6Addr};
use tracing::{debug, warn};

//------------ HostnameResolver ----------------------------------------------

/// Resolves a host name into a single address.
#[derive(Clone, Debug)]
pub struct HostnameResolver<L, S> {
    /// The system resolver.
    lookup: L,

    /// Used for the pause between tries.
    sleep: S,

    /// Retry configuration.
    conf: ResolveConfig,
}

impl<L: HostLookup, S: Sleep> HostnameResolver<L, S> {
    /// Creates a new resolver.
    pub fn new(lookup: L, sleep: S, conf: ResolveConfig) -> Self {
        HostnameResolver { lookup, sleep, conf }
    }

    /// Returns the configuration.
    pub fn conf(&self) -> &ResolveConfig {
        &self.conf
    }

    /// Resolves `name` into an address.
    ///
    /// An IPv4 address is preferred over an IPv6 address regardless of the
    /// order they were returned in.
    ///
    /// Up to [`ResolveConfig::effective_tries`] attempts are made, with
    /// a pause of [`ResolveConfig::retry_interval`] before each but the
    /// first. If all of them fail, the error of the last one is returned.
    pub fn resolve(&self, name: &str) -> Result<IpAddr, NameResolutionError> {
        let at_boot = self.conf.started_at_boot();
        let max_tries = self.conf.effective_tries();
        let mut try_no = 0;
        loop {
            if try_no > 0 {
                self.sleep.sleep(self.conf.retry_interval());
            }
            try_no += 1;
            let err = match self.resolve_once(name) {
                Ok(addr) => {
                    debug!(name, %addr, tries = try_no, "resolved host name");
                    return Ok(addr);
                }
                Err(err) => err,
            };
            if try_no >= max_tries {
                return Err(err);
            }
            match err.kind() {
                ErrorKind::TemporaryFailure => {
                    warn!(
                        name,
                        "temporary DNS error, retrying in {:?}",
                        self.conf.retry_interval()
                    );
                }
                ErrorKind::NotFound if at_boot => {
                    warn!(
                        name,
                        "host not found at boot time, retrying in {:?}",
                        self.conf.retry_interval()
                    );
                }
                _ => return Err(err),
            }
        }
    }

    /// Makes a single attempt at resolving `name`.
    fn resolve_once(&self, name: &str) -> Result<IpAddr, NameResolutionError> {
        let candidates = self.lookup.lookup_host(name)?;
        select_address(&candidates)
            .ok_or_else(|| NameResolutionError::not_found(name))
    }
}

/// Picks the address to use from a list of candidates.
///
/// This is the first IPv4 address or, if there is none, the first IPv6
/// address. Candidates of other families are ignored.
pub fn select_address(candidates: &[AddressCandidate]) -> Option<IpAddr> {
    let mut v6: Option<Ipv6Addr> = None;
    for candidate in candidates {
        match *candidate {
            AddressCandidate::V4(addr) => return Some(addr.into()),
            AddressCandidate::V6(addr) if v6.is_none() => v6 = Some(addr),
            _ => {}
        }
    }
    v6.map(Into::into)
}

//============ Testing =======================================================
