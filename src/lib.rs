//! Peer endpoint resolution for tunnel clients.
//!
//! A tunnel configuration names the endpoint of each peer as a host and a
//! port. Before a connection can be established, that host needs to become
//! a literal IP address. This crate does exactly that, and nothing else.
//!
//! Three kinds of host are understood:
//!
//! * a plain hostname, resolved via the system resolver with a retry
//!   policy tuned for machines that have only just booted,
//! * an SRV pseudo-hostname such as `_wireguard._udp.example.com` (only
//!   when no port is configured) whose SRV record provides both the target
//!   host and the port, and
//! * a hostname resolving to an “ip4p” address, an IPv6-shaped address of
//!   the form `2001::PPPP:AABB:CCDD` that carries an IPv4 address and a
//!   port (again only when no port is configured).
//!
//! # Modules
//!
//! * [resolver] contains [`EndpointResolver`], the entry point that walks
//!   the peers of a [`Config`] and rewrites their endpoints,
//! * [hostname] and [srv] contain the two resolution paths,
//! * [ip4p] contains the codec for ip4p addresses,
//! * [classify] decides which path an endpoint takes,
//! * [lookup] defines the traits through which the actual DNS lookups are
//!   performed together with their system implementations,
//! * [conf] provides the resolver configuration, and
//! * [sleep] abstracts the pause between retries so it can be faked during
//!   testing.
//!
//! # Example
//!
//! ```no_run
//! use wg_endpoint::conf::ResolveConfig;
//! use wg_endpoint::endpoint::{Config, Endpoint, Peer};
//! use wg_endpoint::resolver::EndpointResolver;
//!
//! let mut config = Config::new("wg0");
//! config.peers.push(Peer::new(
//!     "vpn.example.com:51820".parse::<Endpoint>().unwrap(),
//! ));
//!
//! let resolver = EndpointResolver::system(ResolveConfig::new());
//! resolver.resolve_endpoints(&mut config).unwrap();
//! println!("{}", config.peers[0].endpoint);
//! ```
//!
//! # Reference of Feature Flags
//!
//! * `serde`: derives `Serialize` and `Deserialize` for the configuration
//!   and endpoint types.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use self::endpoint::{Config, Endpoint, Peer};
pub use self::error::{Error, ErrorKind, NameResolutionError};
pub use self::resolver::EndpointResolver;

pub mod classify;
pub mod conf;
pub mod endpoint;
pub mod error;
pub mod hostname;
pub mod ip4p;
pub mod lookup;
pub mod resolver;
pub mod sleep;
pub mod srv;
