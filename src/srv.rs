//! Resolving SRV pseudo-hostnames.
//!
//! An endpoint host of the form `_service._proto.domain` without a port is
//! taken to name an SRV record. Its target provides the host and port of
//! the endpoint.
//!
//! Resolution never fails. Anything going wrong results in the unspecified
//! address `0.0.0.0` with port zero, and the peer simply won’t be
//! reachable.

use crate::conf::SrvSelection;
use crate::lookup::{ServiceRecord, SrvLookup};
use std::cmp::Reverse;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::{debug, warn};

/// The address returned if an SRV name can’t be resolved.
pub const UNRESOLVED: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);

//------------ SrvName -------------------------------------------------------

/// An SRV pseudo-hostname split into its parts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SrvName<'a> {
    /// The service without its leading underscore.
    pub service: &'a str,

    /// The protocol without its leading underscore.
    pub proto: &'a str,

    /// The domain the service is provided for.
    pub domain: &'a str,
}

impl<'a> SrvName<'a> {
    /// Splits a name into service, protocol, and domain.
    ///
    /// The first label is the service, the second label the protocol. A
    /// leading underscore is removed from both. Everything after the second
    /// label is the domain. Returns `None` if any of the three is empty.
    pub fn parse(name: &'a str) -> Option<Self> {
        let mut labels = name.splitn(3, '.');
        let service = labels.next()?;
        let proto = labels.next()?;
        let domain = labels.next()?;
        let service = service.strip_prefix('_').unwrap_or(service);
        let proto = proto.strip_prefix('_').unwrap_or(proto);
        if service.is_empty() || proto.is_empty() || domain.is_empty() {
            return None;
        }
        Some(SrvName {
            service,
            proto,
            domain,
        })
    }
}

//------------ SrvResolver ---------------------------------------------------

/// Resolves an SRV pseudo-hostname into an address and port.
#[derive(Clone, Debug)]
pub struct SrvResolver<L> {
    /// Performs the actual lookups.
    lookup: L,

    /// How to pick a record and an address.
    selection: SrvSelection,
}

impl<L: SrvLookup> SrvResolver<L> {
    /// Creates a new resolver.
    pub fn new(lookup: L, selection: SrvSelection) -> Self {
        SrvResolver { lookup, selection }
    }

    /// Resolves `name`.
    ///
    /// Returns [`UNRESOLVED`] if the name is malformed, the SRV lookup
    /// fails or has no records, or the selected target has no addresses.
    pub fn resolve(&self, name: &str) -> SocketAddr {
        let parsed = match SrvName::parse(name) {
            Some(parsed) => parsed,
            None => {
                warn!(name, "malformed SRV name");
                return UNRESOLVED;
            }
        };
        debug!(
            name,
            service = parsed.service,
            proto = parsed.proto,
            domain = parsed.domain,
            "looking up SRV record"
        );
        let records = match self.lookup.lookup_srv(
            parsed.service,
            parsed.proto,
            parsed.domain,
        ) {
            Ok(records) => records,
            Err(err) => {
                warn!(name, %err, "SRV lookup failed");
                return UNRESOLVED;
            }
        };
        let record = match self.select_record(&records) {
            Some(record) => record,
            None => {
                warn!(name, "no SRV records found");
                return UNRESOLVED;
            }
        };
        let addrs = self.lookup.lookup_addrs(&record.target);
        let addr = match self.select_addr(&addrs) {
            Some(addr) => addr,
            None => {
                warn!(name, target = %record.target, "SRV target has no addresses");
                return UNRESOLVED;
            }
        };
        let res = SocketAddr::new(addr, record.port);
        debug!(name, target = %record.target, %res, "resolved SRV record");
        res
    }

    /// Picks the record to use.
    fn select_record<'a>(
        &self,
        records: &'a [ServiceRecord],
    ) -> Option<&'a ServiceRecord> {
        match self.selection {
            SrvSelection::Last => records.last(),
            SrvSelection::Priority => records
                .iter()
                .enumerate()
                .min_by_key(|(idx, record)| {
                    (record.priority, Reverse(record.weight), *idx)
                })
                .map(|(_, record)| record),
        }
    }

    /// Picks the address to use.
    ///
    /// Lookups list IPv6 addresses before IPv4 addresses, so either way an
    /// IPv4 address is picked if the target has one.
    fn select_addr(&self, addrs: &[IpAddr]) -> Option<IpAddr> {
        match self.selection {
            SrvSelection::Last => addrs.last().copied(),
            SrvSelection::Priority => addrs
                .iter()
                .find(|addr| addr.is_ipv4())
                .or_else(|| addrs.first())
                .copied(),
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::io;

    struct Zone {
        records: Result<Vec<ServiceRecord>, io::ErrorKind>,
        addrs: Vec<(&'static str, IpAddr)>,
    }

    impl SrvLookup for Zone {
        fn lookup_srv(
            &self,
            service: &str,
            proto: &str,
            domain: &str,
        ) -> Result<Vec<ServiceRecord>, io::Error> {
            assert_eq!((service, proto, domain), ("wg", "udp", "example.com"));
            self.records.clone().map_err(io::Error::from)
        }

        fn lookup_addrs(&self, host: &str) -> Vec<IpAddr> {
            self.addrs
                .iter()
                .filter(|(name, _)| *name == host)
                .map(|(_, addr)| *addr)
                .collect()
        }
    }

    fn zone() -> Zone {
        Zone {
            records: Ok(vec![
                ServiceRecord::new("a.example.com", 51820, 10, 5),
                ServiceRecord::new("b.example.com", 51821, 10, 50),
                ServiceRecord::new("c.example.com", 51822, 20, 100),
            ]),
            addrs: vec![
                ("a.example.com", [192, 0, 2, 1].into()),
                ("b.example.com", [192, 0, 2, 2].into()),
                ("b.example.com", [192, 0, 2, 3].into()),
                ("c.example.com", [192, 0, 2, 4].into()),
                ("c.example.com", [192, 0, 2, 5].into()),
            ],
        }
    }

    #[test]
    fn parse_name() {
        assert_eq!(
            SrvName::parse("_wg._udp.example.com"),
            Some(SrvName {
                service: "wg",
                proto: "udp",
                domain: "example.com"
            })
        );
        assert_eq!(SrvName::parse("_wg._udp"), None);
        assert_eq!(SrvName::parse("_wg._udp."), None);
        assert_eq!(SrvName::parse("_._udp.example.com"), None);
    }

    #[test]
    fn last_record_and_address_win() {
        let resolver = SrvResolver::new(zone(), SrvSelection::Last);
        assert_eq!(
            resolver.resolve("_wg._udp.example.com"),
            "192.0.2.5:51822".parse().unwrap()
        );
    }

    #[test]
    fn priority_selection() {
        let resolver = SrvResolver::new(zone(), SrvSelection::Priority);
        assert_eq!(
            resolver.resolve("_wg._udp.example.com"),
            "192.0.2.2:51821".parse().unwrap()
        );
    }

    #[test]
    fn dual_stack_target_resolves_to_ipv4() {
        let mut zone = zone();
        zone.addrs = vec![
            ("b.example.com", "2001:db8::2".parse().unwrap()),
            ("b.example.com", [192, 0, 2, 2].into()),
            ("c.example.com", "2001:db8::5".parse().unwrap()),
            ("c.example.com", [192, 0, 2, 5].into()),
        ];
        let last = SrvResolver::new(&zone, SrvSelection::Last);
        assert_eq!(
            last.resolve("_wg._udp.example.com"),
            "192.0.2.5:51822".parse().unwrap()
        );
        let priority = SrvResolver::new(&zone, SrvSelection::Priority);
        assert_eq!(
            priority.resolve("_wg._udp.example.com"),
            "192.0.2.2:51821".parse().unwrap()
        );

        zone.addrs.retain(|(_, addr)| addr.is_ipv6());
        let priority = SrvResolver::new(&zone, SrvSelection::Priority);
        assert_eq!(
            priority.resolve("_wg._udp.example.com"),
            "[2001:db8::2]:51821".parse().unwrap()
        );
    }

    #[test]
    fn no_records_is_unresolved() {
        let mut zone = zone();
        zone.records = Ok(Vec::new());
        let resolver = SrvResolver::new(zone, SrvSelection::Last);
        assert_eq!(resolver.resolve("_wg._udp.example.com"), UNRESOLVED);
    }

    #[test]
    fn lookup_failure_is_unresolved() {
        let mut zone = zone();
        zone.records = Err(io::ErrorKind::TimedOut);
        let resolver = SrvResolver::new(zone, SrvSelection::Last);
        assert_eq!(resolver.resolve("_wg._udp.example.com"), UNRESOLVED);
    }

    #[test]
    fn target_without_addresses_is_unresolved() {
        let mut zone = zone();
        zone.addrs.retain(|(name, _)| *name != "c.example.com");
        let resolver = SrvResolver::new(zone, SrvSelection::Last);
        assert_eq!(resolver.resolve("_wg._udp.example.com"), UNRESOLVED);
        assert_eq!(UNRESOLVED.to_string(), "0.0.0.0:0");
    }
}
