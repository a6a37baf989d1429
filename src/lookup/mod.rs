//! The lookups performed during endpoint resolution.
//!
//! Resolution relies on two external services: the system’s name
//! resolution for plain host names and a DNS resolver for SRV records and
//! the addresses of SRV targets. Both are modelled as traits so that they
//! can be replaced, most importantly in tests.
//!
//! [`HostLookup`] is implemented by [`SystemHostLookup`] via
//! `getaddrinfo(3)`. [`SrvLookup`] is implemented by [`StubSrvLookup`]
//! atop the stub resolver of the `domain` crate.

use crate::error::NameResolutionError;
use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub use self::stub::StubSrvLookup;
pub use self::system::SystemHostLookup;

mod stub;
mod system;

//------------ AddressCandidate ----------------------------------------------

/// A single address returned by the system resolver.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AddressCandidate {
    /// An IPv4 address.
    V4(Ipv4Addr),

    /// An IPv6 address.
    V6(Ipv6Addr),

    /// An address of some other family, given by its raw family number.
    ///
    /// These are skipped when picking an address.
    Unsupported(i32),
}

impl AddressCandidate {
    /// Returns the IP address if this is one.
    pub fn ip(&self) -> Option<IpAddr> {
        match *self {
            AddressCandidate::V4(addr) => Some(addr.into()),
            AddressCandidate::V6(addr) => Some(addr.into()),
            AddressCandidate::Unsupported(_) => None,
        }
    }
}

impl From<IpAddr> for AddressCandidate {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(addr) => AddressCandidate::V4(addr),
            IpAddr::V6(addr) => AddressCandidate::V6(addr),
        }
    }
}

impl fmt::Display for AddressCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressCandidate::V4(addr) => fmt::Display::fmt(addr, f),
            AddressCandidate::V6(addr) => fmt::Display::fmt(addr, f),
            AddressCandidate::Unsupported(family) => {
                write!(f, "<address family {}>", family)
            }
        }
    }
}

//------------ ServiceRecord -------------------------------------------------

/// The data of a single SRV record.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ServiceRecord {
    /// The host providing the service.
    pub target: String,

    /// The port the service is provided on.
    pub port: u16,

    /// The priority of the record. Lower is preferred.
    pub priority: u16,

    /// The relative weight among records of the same priority.
    pub weight: u16,
}

impl ServiceRecord {
    /// Creates a new record.
    pub fn new(
        target: impl Into<String>,
        port: u16,
        priority: u16,
        weight: u16,
    ) -> Self {
        ServiceRecord {
            target: target.into(),
            port,
            priority,
            weight,
        }
    }
}

//------------ HostLookup ----------------------------------------------------

/// Resolving host names via the system resolver.
pub trait HostLookup {
    /// Performs a single lookup of `name` for any address family.
    ///
    /// The candidates are returned in the order the system provided them.
    /// An empty list is allowed and treated as not found by the caller.
    fn lookup_host(
        &self,
        name: &str,
    ) -> Result<Vec<AddressCandidate>, NameResolutionError>;
}

impl<T: HostLookup + ?Sized> HostLookup for &T {
    fn lookup_host(
        &self,
        name: &str,
    ) -> Result<Vec<AddressCandidate>, NameResolutionError> {
        (**self).lookup_host(name)
    }
}

//------------ SrvLookup -----------------------------------------------------

/// Looking up SRV records and the addresses of their targets.
pub trait SrvLookup {
    /// Looks up the SRV records for `_service._proto.domain`.
    ///
    /// The records are returned in the order they appeared in the answer.
    fn lookup_srv(
        &self,
        service: &str,
        proto: &str,
        domain: &str,
    ) -> Result<Vec<ServiceRecord>, io::Error>;

    /// Looks up the addresses of `host`.
    ///
    /// IPv6 addresses are listed before IPv4 addresses. Any failure
    /// results in an empty list.
    fn lookup_addrs(&self, host: &str) -> Vec<IpAddr>;
}

impl<T: SrvLookup + ?Sized> SrvLookup for &T {
    fn lookup_srv(
        &self,
        service: &str,
        proto: &str,
        domain: &str,
    ) -> Result<Vec<ServiceRecord>, io::Error> {
        (**self).lookup_srv(service, proto, domain)
    }

    fn lookup_addrs(&self, host: &str) -> Vec<IpAddr> {
        (**self).lookup_addrs(host)
    }
}
