//! The ip4p address encoding.
//!
//! An ip4p address packs an IPv4 address and a port into an IPv6 address
//! of the form `2001::PPPP:AABB:CCDD`. Publishing such an address in an
//! AAAA record allows a peer behind NAT to announce both its public
//! address and its mapped port through plain DNS.
//!
//! Decoding only looks at the textual form: the address is split at its
//! colons and the third, fourth, and fifth field are read as hexadecimal
//! numbers giving the port and the two halves of the IPv4 address. The
//! first two fields are not checked. Their only purpose is to make the
//! resolved address look like IPv6, which is what triggers decoding in the
//! first place.

use std::error;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

//------------ Constants -----------------------------------------------------

/// The number of colon separated fields needed to decode an address.
const MIN_FIELDS: usize = 5;

/// The first segment of the address produced by [`encode`].
const PREFIX: u16 = 0x2001;

//------------ decode --------------------------------------------------------

/// Decodes an ip4p address into an IPv4 address and a port.
///
/// Any input with at least five fields is accepted, fields beyond the
/// fifth are ignored. An error is returned if there are fewer fields or if
/// any of the three relevant fields isn’t a hexadecimal number of at most
/// 16 bits.
pub fn decode(text: &str) -> Result<(Ipv4Addr, u16), ParseError> {
    let fields: Vec<&str> = text.split(':').collect();
    if fields.len() < MIN_FIELDS {
        return Err(ParseError::new(
            text,
            ParseErrorKind::TooFewFields(fields.len()),
        ));
    }
    let port = hex_field(text, fields[2])?;
    let ipab = hex_field(text, fields[3])?;
    let ipcd = hex_field(text, fields[4])?;
    let addr = Ipv4Addr::new(
        (ipab >> 8) as u8,
        (ipab & 0xff) as u8,
        (ipcd >> 8) as u8,
        (ipcd & 0xff) as u8,
    );
    Ok((addr, port))
}

/// Parses a single field as a 16 bit hex number.
fn hex_field(text: &str, field: &str) -> Result<u16, ParseError> {
    if field.is_empty() {
        return Err(ParseError::new(text, ParseErrorKind::EmptyField));
    }
    // from_str_radix would accept a leading sign.
    if !field.bytes().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(ParseError::new(
            text,
            ParseErrorKind::InvalidHex(field.into()),
        ));
    }
    u16::from_str_radix(field, 16).map_err(|_| {
        ParseError::new(text, ParseErrorKind::Overflow(field.into()))
    })
}

//------------ encode --------------------------------------------------------

/// Encodes an IPv4 address and a port as an ip4p address.
///
/// The result uses the conventional `2001::` prefix, so that
/// `decode(&encode(addr, port).to_string())` gives back `(addr, port)`.
pub fn encode(addr: Ipv4Addr, port: u16) -> Ipv6Addr {
    let [a, b, c, d] = addr.octets();
    Ipv6Addr::new(
        PREFIX,
        0,
        0,
        0,
        0,
        port,
        u16::from_be_bytes([a, b]),
        u16::from_be_bytes([c, d]),
    )
}

//============ Error Types ===================================================

//------------ ParseError ----------------------------------------------------

/// A resolved address could not be decoded as ip4p.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    /// The complete input.
    input: String,

    /// What was wrong with it.
    kind: ParseErrorKind,
}

/// The reason an ip4p address could not be decoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// The address had fewer than five fields. Contains the actual number.
    TooFewFields(usize),

    /// One of the port or address fields was empty.
    EmptyField,

    /// A field contained something other than hex digits.
    InvalidHex(String),

    /// A field did not fit into 16 bits.
    Overflow(String),
}

impl ParseError {
    fn new(input: &str, kind: ParseErrorKind) -> Self {
        ParseError {
            input: input.into(),
            kind,
        }
    }

    /// Returns the input that failed to decode.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the reason decoding failed.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid ip4p address '{}': ", self.input)?;
        match &self.kind {
            ParseErrorKind::TooFewFields(n) => {
                write!(f, "expected at least {} fields, found {}", MIN_FIELDS, n)
            }
            ParseErrorKind::EmptyField => f.write_str("empty field"),
            ParseErrorKind::InvalidHex(field) => {
                write!(f, "'{}' is not a hex number", field)
            }
            ParseErrorKind::Overflow(field) => {
                write!(f, "'{}' does not fit into 16 bits", field)
            }
        }
    }
}

impl error::Error for ParseError {}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2001:0:0050:c0a8:0101", [192, 168, 1, 1], 80)]
    #[case("2001:0:1f90:c0a8:0101", [192, 168, 1, 1], 8080)]
    #[case("2001::4443:7416:cf3", [116, 22, 12, 243], 17475)]
    #[case("2001::ca6c:a00:1", [10, 0, 0, 1], 51820)]
    #[case("2001::0:0:0", [0, 0, 0, 0], 0)]
    #[case("2001::FFFF:FFFF:FFFF", [255, 255, 255, 255], 65535)]
    fn decode_well_formed(
        #[case] text: &str,
        #[case] addr: [u8; 4],
        #[case] port: u16,
    ) {
        assert_eq!(decode(text), Ok((Ipv4Addr::from(addr), port)));
    }

    #[test]
    fn decode_ignores_extra_fields() {
        assert_eq!(
            decode("2001:0:50:c0a8:101:dead"),
            Ok((Ipv4Addr::new(192, 168, 1, 1), 80))
        );
    }

    #[rstest]
    #[case("", ParseErrorKind::TooFewFields(1))]
    #[case("10.0.0.1", ParseErrorKind::TooFewFields(1))]
    #[case("2001:db8::1", ParseErrorKind::TooFewFields(4))]
    #[case("2001:0::c0a8:101", ParseErrorKind::EmptyField)]
    #[case("2001:0:50:zz:101", ParseErrorKind::InvalidHex("zz".into()))]
    #[case("2001:0:+50:c0a8:101", ParseErrorKind::InvalidHex("+50".into()))]
    #[case("2001:0:10000:c0a8:101", ParseErrorKind::Overflow("10000".into()))]
    fn decode_malformed(#[case] text: &str, #[case] kind: ParseErrorKind) {
        let err = decode(text).unwrap_err();
        assert_eq!(err.kind(), &kind);
        assert_eq!(err.input(), text);
    }

    #[test]
    fn encode_uses_canonical_form() {
        let addr = encode(Ipv4Addr::new(192, 168, 1, 1), 8080);
        assert_eq!(addr.to_string(), "2001::1f90:c0a8:101");
        assert_eq!(
            decode(&addr.to_string()),
            Ok((Ipv4Addr::new(192, 168, 1, 1), 8080))
        );
    }
}
