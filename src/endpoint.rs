//! Peers and their endpoints.
//!
//! These types contain only the part of a tunnel configuration that is
//! relevant for resolving endpoints.

use std::error;
use std::fmt;
use std::str::FromStr;

//------------ Endpoint ------------------------------------------------------

/// The host and port a peer is reached at.
///
/// Before resolution, the host may be a host name, an SRV pseudo-hostname,
/// or anything else the system resolver understands. Afterwards it holds a
/// literal IP address.
///
/// The textual form is `host:port`, with IPv6 addresses enclosed in
/// brackets. The port may be left out, in which case it is zero. A zero
/// port asks for the port to be discovered via SRV or ip4p.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    /// The host name or address.
    pub host: String,

    /// The port. Zero if not configured.
    pub port: u16,
}

impl Endpoint {
    /// Creates a new endpoint from a host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Endpoint {
            host: host.into(),
            port,
        }
    }

    /// Returns whether no endpoint is configured.
    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Endpoint::default());
        }
        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            let (host, rest) =
                rest.split_once(']').ok_or(EndpointError::UnclosedBracket)?;
            match rest.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None if rest.is_empty() => (host, None),
                None => return Err(EndpointError::TrailingData),
            }
        } else {
            match s.split_once(':') {
                Some((_, port)) if port.contains(':') => {
                    return Err(EndpointError::UnbracketedIpv6)
                }
                Some((host, port)) => (host, Some(port)),
                None => (s, None),
            }
        };
        if host.is_empty() {
            return Err(EndpointError::EmptyHost);
        }
        let port = match port {
            Some(port) => port
                .parse()
                .map_err(|_| EndpointError::InvalidPort(port.into()))?,
            None => 0,
        };
        Ok(Endpoint::new(host, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

//------------ Peer ----------------------------------------------------------

/// A peer of the tunnel.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Peer {
    /// The peer’s public key, if known. Only used for diagnostics.
    #[cfg_attr(feature = "serde", serde(default))]
    pub public_key: Option<String>,

    /// Where to reach the peer.
    pub endpoint: Endpoint,
}

impl Peer {
    /// Creates a peer with the given endpoint.
    pub fn new(endpoint: Endpoint) -> Self {
        Peer {
            public_key: None,
            endpoint,
        }
    }

    /// Sets the peer’s public key.
    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }
}

//------------ Config --------------------------------------------------------

/// A tunnel configuration.
///
/// Resolution rewrites the endpoints of [`peers`][Self::peers] in place.
/// The caller keeps ownership and lends the configuration out mutably for
/// the duration of [`EndpointResolver::resolve_endpoints`].
///
/// [`EndpointResolver::resolve_endpoints`]: crate::resolver::EndpointResolver::resolve_endpoints
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// The name of the tunnel.
    pub name: String,

    /// The peers in configuration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub peers: Vec<Peer>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Config {
            name: name.into(),
            peers: Vec::new(),
        }
    }
}

//============ Error Types ===================================================

//------------ EndpointError -------------------------------------------------

/// An endpoint could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EndpointError {
    /// An opening bracket was not closed.
    UnclosedBracket,

    /// Something other than a port followed the closing bracket.
    TrailingData,

    /// An IPv6 address was not enclosed in brackets.
    UnbracketedIpv6,

    /// The host part was empty.
    EmptyHost,

    /// The port was not a number between 0 and 65535.
    InvalidPort(String),
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::UnclosedBracket => {
                f.write_str("missing closing bracket")
            }
            EndpointError::TrailingData => {
                f.write_str("unexpected data after closing bracket")
            }
            EndpointError::UnbracketedIpv6 => {
                f.write_str("IPv6 addresses must be enclosed in brackets")
            }
            EndpointError::EmptyHost => f.write_str("empty host"),
            EndpointError::InvalidPort(port) => {
                write!(f, "invalid port '{}'", port)
            }
        }
    }
}

impl error::Error for EndpointError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_host_and_port() {
        assert_eq!(
            "peer.example.com:51820".parse(),
            Ok(Endpoint::new("peer.example.com", 51820))
        );
        assert_eq!(
            "[2001:db8::1]:51820".parse(),
            Ok(Endpoint::new("2001:db8::1", 51820))
        );
    }

    #[test]
    fn parse_without_port() {
        assert_eq!(
            "_wireguard._udp.example.com".parse(),
            Ok(Endpoint::new("_wireguard._udp.example.com", 0))
        );
        assert_eq!(
            "[2001:db8::1]".parse(),
            Ok(Endpoint::new("2001:db8::1", 0))
        );
        assert!("".parse::<Endpoint>().unwrap().is_empty());
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "[2001:db8::1:51820".parse::<Endpoint>(),
            Err(EndpointError::UnclosedBracket)
        );
        assert_eq!(
            "[2001:db8::1]x".parse::<Endpoint>(),
            Err(EndpointError::TrailingData)
        );
        assert_eq!(
            "2001:db8::1".parse::<Endpoint>(),
            Err(EndpointError::UnbracketedIpv6)
        );
        assert_eq!(
            ":51820".parse::<Endpoint>(),
            Err(EndpointError::EmptyHost)
        );
        assert_eq!(
            "host:65536".parse::<Endpoint>(),
            Err(EndpointError::InvalidPort("65536".into()))
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            Endpoint::new("10.0.0.1", 51820).to_string(),
            "10.0.0.1:51820"
        );
        assert_eq!(Endpoint::new("::1", 53).to_string(), "[::1]:53");
    }
}
