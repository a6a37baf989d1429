//! Host name lookups via the system resolver.

use super::{AddressCandidate, HostLookup};
use crate::error::NameResolutionError;
use tracing::trace;

//------------ SystemHostLookup ----------------------------------------------

/// Looks up host names through the operating system.
///
/// On Unix systems this calls `getaddrinfo(3)` asking for any address
/// family with a datagram socket type, so every address is returned once.
/// The error codes are mapped as follows: `EAI_AGAIN` is a temporary
/// failure, `EAI_NONAME` (and `EAI_NODATA` where it exists) means not
/// found, and everything else is some other error.
///
/// Elsewhere, the standard library’s socket address resolution is used.
/// Its errors can’t be told apart and are always reported as other errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHostLookup;

impl SystemHostLookup {
    /// Creates a new system lookup.
    pub fn new() -> Self {
        SystemHostLookup
    }
}

impl HostLookup for SystemHostLookup {
    fn lookup_host(
        &self,
        name: &str,
    ) -> Result<Vec<AddressCandidate>, NameResolutionError> {
        let res = sys::getaddrinfo(name);
        trace!(host = name, result = ?res, "getaddrinfo");
        res
    }
}

//------------ sys -----------------------------------------------------------

#[cfg(unix)]
mod sys {
    use crate::error::{ErrorKind, NameResolutionError};
    use crate::lookup::AddressCandidate;
    use std::ffi::{CStr, CString};
    use std::io;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::{mem, ptr};

    pub fn getaddrinfo(
        name: &str,
    ) -> Result<Vec<AddressCandidate>, NameResolutionError> {
        let c_name = CString::new(name).map_err(|_| {
            NameResolutionError::with_source(
                name,
                ErrorKind::Other,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "host name contains a NUL byte",
                ),
            )
        })?;

        // SAFETY: addrinfo is a plain C struct for which all zeroes is the
        // documented way to start a hints value.
        let mut hints: libc::addrinfo = unsafe { mem::zeroed() };
        hints.ai_family = libc::AF_UNSPEC;
        hints.ai_socktype = libc::SOCK_DGRAM;
        hints.ai_protocol = libc::IPPROTO_IP;

        let mut res: *mut libc::addrinfo = ptr::null_mut();
        // SAFETY: all pointers are valid for the duration of the call.
        let rc = unsafe {
            libc::getaddrinfo(c_name.as_ptr(), ptr::null(), &hints, &mut res)
        };
        if rc != 0 {
            return Err(gai_error(name, rc));
        }
        let list = AddrInfoList(res);

        let mut candidates = Vec::new();
        let mut cur = list.0;
        while !cur.is_null() {
            // SAFETY: cur is an element of the list returned by
            // getaddrinfo which stays alive until `list` is dropped.
            let info = unsafe { &*cur };
            candidates.push(unsafe { candidate(info) });
            cur = info.ai_next;
        }
        Ok(candidates)
    }

    /// Converts a single list element into a candidate.
    ///
    /// # Safety
    ///
    /// `info.ai_addr` must be null or point to a socket address matching
    /// `info.ai_family`.
    unsafe fn candidate(info: &libc::addrinfo) -> AddressCandidate {
        if info.ai_addr.is_null() {
            return AddressCandidate::Unsupported(info.ai_family);
        }
        match info.ai_family {
            libc::AF_INET => {
                let sin = &*(info.ai_addr as *const libc::sockaddr_in);
                AddressCandidate::V4(Ipv4Addr::from(u32::from_be(
                    sin.sin_addr.s_addr,
                )))
            }
            libc::AF_INET6 => {
                let sin6 = &*(info.ai_addr as *const libc::sockaddr_in6);
                AddressCandidate::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr))
            }
            family => AddressCandidate::Unsupported(family),
        }
    }

    /// Translates a getaddrinfo return code into an error.
    fn gai_error(name: &str, rc: libc::c_int) -> NameResolutionError {
        let kind = match rc {
            libc::EAI_AGAIN => ErrorKind::TemporaryFailure,
            libc::EAI_NONAME => ErrorKind::NotFound,
            #[cfg(all(target_os = "linux", target_env = "gnu"))]
            libc::EAI_NODATA => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        };
        let source = if rc == libc::EAI_SYSTEM {
            io::Error::last_os_error()
        } else {
            // SAFETY: gai_strerror returns a pointer to a static string.
            let msg = unsafe { CStr::from_ptr(libc::gai_strerror(rc)) };
            io::Error::new(
                io::ErrorKind::Other,
                msg.to_string_lossy().into_owned(),
            )
        };
        NameResolutionError::with_source(name, kind, source)
    }

    /// Owns the list returned by getaddrinfo and frees it when dropped.
    struct AddrInfoList(*mut libc::addrinfo);

    impl Drop for AddrInfoList {
        fn drop(&mut self) {
            if !self.0.is_null() {
                // SAFETY: the pointer came from a successful getaddrinfo
                // and is freed exactly once.
                unsafe { libc::freeaddrinfo(self.0) }
            }
        }
    }

}

#[cfg(not(unix))]
mod sys {
    use crate::error::{ErrorKind, NameResolutionError};
    use crate::lookup::AddressCandidate;
    use std::net::ToSocketAddrs;

    pub fn getaddrinfo(
        name: &str,
    ) -> Result<Vec<AddressCandidate>, NameResolutionError> {
        (name, 0)
            .to_socket_addrs()
            .map(|addrs| addrs.map(|addr| addr.ip().into()).collect())
            .map_err(|err| {
                NameResolutionError::with_source(name, ErrorKind::Other, err)
            })
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn literal_addresses_resolve_to_themselves() {
        let lookup = SystemHostLookup::new();
        let v4 = lookup.lookup_host("127.0.0.1").unwrap();
        assert!(v4.contains(&AddressCandidate::V4([127, 0, 0, 1].into())));
        let v6 = lookup.lookup_host("::1").unwrap();
        assert!(v6.contains(&AddressCandidate::V6(
            std::net::Ipv6Addr::LOCALHOST
        )));
    }

    #[cfg(unix)]
    #[test]
    fn nul_byte_is_rejected() {
        let err = SystemHostLookup.lookup_host("bad\0name").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Other);
    }
}
