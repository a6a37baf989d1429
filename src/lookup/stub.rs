//! SRV and address lookups via the stub resolver of the `domain` crate.

use super::{ServiceRecord, SrvLookup};
use bytes::Bytes;
use domain::base::name::{Name, ParsedName};
use domain::base::Rtype;
use domain::rdata::{Aaaa, Srv, A};
use domain::resolv::stub::conf::ResolvConf;
use domain::resolv::StubResolver;
use std::io;
use std::net::IpAddr;
use std::str::FromStr;
use tracing::{debug, trace};

//------------ StubSrvLookup -------------------------------------------------

/// Looks up SRV records and target addresses using a DNS stub resolver.
///
/// Each lookup runs synchronously on a fresh single-threaded runtime, so
/// this type can be used from plain blocking code.
///
/// Records are returned in the order they appear in the answer section.
/// In particular, SRV records are not reordered by priority and weight.
/// Choosing among them is left to the caller. Target addresses are
/// returned with all IPv6 addresses before all IPv4 addresses.
///
/// Every lookup builds and blocks on its own runtime. It must therefore
/// be called from blocking context. Calling it from within an async task
/// panics; use something like `tokio::task::spawn_blocking` there.
#[derive(Clone, Debug)]
pub struct StubSrvLookup {
    /// The configuration for the stub resolvers we create.
    conf: ResolvConf,
}

impl StubSrvLookup {
    /// Creates a new lookup using the system’s resolver configuration.
    pub fn new() -> Self {
        Self::from_conf(ResolvConf::default())
    }

    /// Creates a new lookup using the given resolver configuration.
    pub fn from_conf(conf: ResolvConf) -> Self {
        StubSrvLookup { conf }
    }

    /// Queries the addresses of `name` in the given record type.
    fn query_addrs(
        &self,
        name: Name<Vec<u8>>,
        rtype: Rtype,
    ) -> Result<Vec<IpAddr>, io::Error> {
        StubResolver::run_with_conf(self.conf.clone(), move |stub| async move {
            let answer = stub.query((name, rtype)).await?;
            let mut addrs = Vec::new();
            let section = answer.answer().map_err(parse_error)?;
            if rtype == Rtype::A {
                for record in section.limit_to::<A>() {
                    let record = record.map_err(parse_error)?;
                    addrs.push(IpAddr::V4(record.data().addr()));
                }
            } else {
                for record in section.limit_to::<Aaaa>() {
                    let record = record.map_err(parse_error)?;
                    addrs.push(IpAddr::V6(record.data().addr()));
                }
            }
            Ok::<_, io::Error>(addrs)
        })
    }
}

impl Default for StubSrvLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl SrvLookup for StubSrvLookup {
    fn lookup_srv(
        &self,
        service: &str,
        proto: &str,
        domain: &str,
    ) -> Result<Vec<ServiceRecord>, io::Error> {
        let qname = format!("_{}._{}.{}", service, proto, domain);
        let qname = Name::<Vec<u8>>::from_str(&qname).map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid SRV name '{}': {}", qname, err),
            )
        })?;
        let records = StubResolver::run_with_conf(
            self.conf.clone(),
            move |stub| async move {
                let answer = stub.query((qname, Rtype::SRV)).await?;
                let mut records = Vec::new();
                for record in answer
                    .answer()
                    .map_err(parse_error)?
                    .limit_to::<Srv<ParsedName<Bytes>>>()
                {
                    let record = record.map_err(parse_error)?;
                    let srv = record.data();
                    records.push(ServiceRecord::new(
                        srv.target().to_string(),
                        srv.port(),
                        srv.priority(),
                        srv.weight(),
                    ));
                }
                Ok::<_, io::Error>(records)
            },
        )?;
        trace!(service, proto, domain, ?records, "SRV lookup");
        Ok(records)
    }

    fn lookup_addrs(&self, host: &str) -> Vec<IpAddr> {
        let name = match Name::<Vec<u8>>::from_str(host) {
            Ok(name) => name,
            Err(err) => {
                debug!(host, %err, "not a valid domain name");
                return Vec::new();
            }
        };
        let mut addrs = Vec::new();
        for rtype in [Rtype::AAAA, Rtype::A] {
            match self.query_addrs(name.clone(), rtype) {
                Ok(found) => addrs.extend(found),
                Err(err) => debug!(host, %rtype, %err, "address lookup failed"),
            }
        }
        let addrs = order_addrs(addrs);
        trace!(host, ?addrs, "address lookup");
        addrs
    }
}

/// Orders target addresses with IPv6 before IPv4.
///
/// This is the order a system resolver commonly returns them in, so
/// picking the last address picks an IPv4 address if there is one. The
/// order within each family is kept.
fn order_addrs(mut addrs: Vec<IpAddr>) -> Vec<IpAddr> {
    addrs.sort_by_key(IpAddr::is_ipv4);
    addrs
}

/// Converts a message parse error into an IO error.
fn parse_error(err: domain::base::wire::ParseError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err.to_string())
}

//============ Testing =======================================================
