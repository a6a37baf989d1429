//! Resolving the endpoints of all peers.

use crate::classify::{classify, is_ip4p, Resolution};
use crate::conf::ResolveConfig;
use crate::endpoint::{Config, Endpoint};
use crate::error::Error;
use crate::hostname::HostnameResolver;
use crate::ip4p;
use crate::lookup::{HostLookup, SrvLookup, StubSrvLookup, SystemHostLookup};
use crate::sleep::{Sleep, SystemSleep};
use crate::srv::SrvResolver;
use tracing::{debug, debug_span};

//------------ EndpointResolver ----------------------------------------------

/// Resolves peer endpoints into literal addresses.
///
/// The resolver combines the [`HostnameResolver`] and [`SrvResolver`] and
/// applies ip4p decoding where necessary. Use [`system`][Self::system] for
/// a resolver backed by the operating system and DNS, or
/// [`new`][Self::new] to provide your own lookups.
#[derive(Clone, Debug)]
pub struct EndpointResolver<H, S, T> {
    /// Resolves plain host names.
    hostname: HostnameResolver<H, T>,

    /// Resolves SRV pseudo-hostnames.
    srv: SrvResolver<S>,
}

impl EndpointResolver<SystemHostLookup, StubSrvLookup, SystemSleep> {
    /// Creates a resolver using the system resolver and DNS.
    ///
    /// All lookups block the calling thread. SRV lookups additionally run
    /// on a runtime of their own, so the resolver must not be used from
    /// within an async task. Move it to a blocking thread instead, e.g.,
    /// via `tokio::task::spawn_blocking`.
    pub fn system(conf: ResolveConfig) -> Self {
        Self::new(SystemHostLookup::new(), StubSrvLookup::new(), SystemSleep, conf)
    }
}

impl<H, S, T> EndpointResolver<H, S, T>
where
    H: HostLookup,
    S: SrvLookup,
    T: Sleep,
{
    /// Creates a resolver from its parts.
    pub fn new(
        host_lookup: H,
        srv_lookup: S,
        sleep: T,
        conf: ResolveConfig,
    ) -> Self {
        let srv = SrvResolver::new(srv_lookup, conf.srv_selection());
        EndpointResolver {
            hostname: HostnameResolver::new(host_lookup, sleep, conf),
            srv,
        }
    }

    /// Returns the configuration.
    pub fn conf(&self) -> &ResolveConfig {
        self.hostname.conf()
    }

    /// Resolves the endpoints of all peers in `config`.
    ///
    /// Peers are processed in order and their endpoints are replaced with
    /// the resolved address and port. Peers without an endpoint are
    /// skipped.
    ///
    /// Resolution stops at the first peer whose host name can’t be
    /// resolved or resolves to an invalid ip4p address, and that error is
    /// returned. Peers before it keep their resolved endpoints. The failing
    /// peer keeps the endpoint it had, host name and port included, and
    /// so do all peers after it. SRV names never cause an error.
    ///
    /// The configuration is borrowed exclusively for the whole call, so no
    /// one else can observe a partially resolved peer list.
    pub fn resolve_endpoints(&self, config: &mut Config) -> Result<(), Error> {
        for (idx, peer) in config.peers.iter_mut().enumerate() {
            if peer.endpoint.is_empty() {
                continue;
            }
            let span = debug_span!(
                "peer",
                tunnel = %config.name,
                idx,
                endpoint = %peer.endpoint,
                key = peer.public_key.as_deref(),
            );
            let _enter = span.enter();
            self.resolve_endpoint(&mut peer.endpoint)?;
        }
        Ok(())
    }

    /// Resolves a single endpoint in place.
    ///
    /// The endpoint is only changed if resolution succeeds. Empty endpoints
    /// are left alone.
    pub fn resolve_endpoint(&self, endpoint: &mut Endpoint) -> Result<(), Error> {
        if endpoint.is_empty() {
            return Ok(());
        }
        let path = classify(&endpoint.host, endpoint.port);
        debug!(?path, "classified endpoint");
        let resolved = match path {
            Resolution::Srv => {
                let addr = self.srv.resolve(&endpoint.host);
                Endpoint::new(addr.ip().to_string(), addr.port())
            }
            Resolution::Hostname => {
                let addr = self.hostname.resolve(&endpoint.host)?.to_string();
                if is_ip4p(&addr, endpoint.port) {
                    let (addr, port) = ip4p::decode(&addr)?;
                    debug!(%addr, port, "decoded ip4p address");
                    Endpoint::new(addr.to_string(), port)
                } else {
                    Endpoint::new(addr, endpoint.port)
                }
            }
        };
        *endpoint = resolved;
        Ok(())
    }
}
