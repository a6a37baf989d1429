//! Deciding how an endpoint is resolved.

//------------ Resolution ----------------------------------------------------

/// The resolution path an endpoint takes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// The host is an SRV pseudo-hostname, e.g. `_wg._udp.example.com`.
    Srv,

    /// The host is resolved via the system resolver.
    ///
    /// If the result is an IPv6 address and no port was configured, the
    /// address is decoded as ip4p afterwards. See [`is_ip4p`].
    Hostname,
}

/// The labels marking the protocol part of an SRV name.
const SRV_MARKERS: [&str; 2] = ["._tcp.", "._udp."];

/// Classifies an endpoint.
///
/// An endpoint goes down the SRV path only if no port is configured and the
/// host contains a `_tcp` or `_udp` label followed by at least one more
/// label.
pub fn classify(host: &str, port: u16) -> Resolution {
    if port == 0 && SRV_MARKERS.iter().any(|marker| host.contains(marker)) {
        Resolution::Srv
    } else {
        Resolution::Hostname
    }
}

/// Returns whether a resolved address has to be decoded as ip4p.
///
/// This is the case if the configured port was zero and the address text
/// contains a colon, i.e., the host name resolved to an IPv6 address.
pub fn is_ip4p(resolved: &str, configured_port: u16) -> bool {
    configured_port == 0 && resolved.contains(':')
}

//============ Testing =======================================================
