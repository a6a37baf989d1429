//! Error types for endpoint resolution.

use crate::ip4p;
use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

//------------ ErrorKind -----------------------------------------------------

/// The kind of a failed name resolution.
///
/// Platform specific error codes are mapped onto these three kinds by the
/// lookup implementations. The retry policy of the
/// [`HostnameResolver`][crate::hostname::HostnameResolver] only ever looks
/// at the kind.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The name server could not be reached right now.
    TemporaryFailure,

    /// The name does not exist or has no usable addresses.
    NotFound,

    /// Any other failure.
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::TemporaryFailure => {
                f.write_str("temporary failure in name resolution")
            }
            ErrorKind::NotFound => f.write_str("host not found"),
            ErrorKind::Other => f.write_str("name resolution failed"),
        }
    }
}

//------------ NameResolutionError -------------------------------------------

/// Resolving a host name failed.
#[derive(Clone, Debug)]
pub struct NameResolutionError {
    /// The name that failed to resolve.
    name: String,

    /// What went wrong.
    kind: ErrorKind,

    /// The underlying error, if the lookup provided one.
    source: Option<Arc<io::Error>>,
}

impl NameResolutionError {
    /// Creates a new error for `name`.
    pub fn new(name: impl Into<String>, kind: ErrorKind) -> Self {
        NameResolutionError {
            name: name.into(),
            kind,
            source: None,
        }
    }

    /// Creates a new error for `name` wrapping an underlying error.
    pub fn with_source(
        name: impl Into<String>,
        kind: ErrorKind,
        source: io::Error,
    ) -> Self {
        NameResolutionError {
            name: name.into(),
            kind,
            source: Some(Arc::new(source)),
        }
    }

    /// Returns a shorthand for a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::new(name, ErrorKind::NotFound)
    }

    /// Returns the name that failed to resolve.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for NameResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to resolve '{}': {}", self.name, self.kind)?;
        if let Some(source) = self.source.as_ref() {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl error::Error for NameResolutionError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err.as_ref() as &(dyn error::Error + 'static))
    }
}

//------------ Error ---------------------------------------------------------

/// The error returned when resolving the endpoints of a configuration.
///
/// Either variant aborts resolution of the remaining peers.
#[derive(Clone, Debug)]
pub enum Error {
    /// A host name could not be resolved.
    Resolve(NameResolutionError),

    /// A host name resolved to an address that is not valid ip4p.
    Ip4p(ip4p::ParseError),
}

impl Error {
    /// Returns the name resolution error if this is one.
    pub fn as_resolve(&self) -> Option<&NameResolutionError> {
        match self {
            Error::Resolve(err) => Some(err),
            Error::Ip4p(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Resolve(err) => fmt::Display::fmt(err, f),
            Error::Ip4p(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Resolve(err) => Some(err),
            Error::Ip4p(err) => Some(err),
        }
    }
}

impl From<NameResolutionError> for Error {
    fn from(err: NameResolutionError) -> Self {
        Error::Resolve(err)
    }
}

impl From<ip4p::ParseError> for Error {
    fn from(err: ip4p::ParseError) -> Self {
        Error::Ip4p(err)
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_includes_name_and_kind() {
        let err = NameResolutionError::not_found("peer.example.com");
        assert_eq!(
            err.to_string(),
            "unable to resolve 'peer.example.com': host not found"
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn source_is_exposed() {
        use std::error::Error as _;

        let err = NameResolutionError::with_source(
            "peer.example.com",
            ErrorKind::Other,
            io::Error::new(io::ErrorKind::Other, "bad flags"),
        );
        assert!(err.source().is_some());
        assert!(err.to_string().ends_with("(bad flags)"));

        let err = Error::from(err);
        assert!(err.as_resolve().is_some());
        assert!(err.source().is_some());
    }
}
