//! Read Ethernet II frames.
//!
//! ## Standards conformance
//!
//! This implementation reads the Ethernet II header layout of the [2022 IEEE
//! Standard for Ethernet](https://standards.ieee.org/ieee/802.3/10422/). The
//! preamble, start frame delimiter and frame check sequence are not available
//! on a packet socket, so the frame starts at the destination address and ends
//! at the last byte of client data.
use byteorder::{ByteOrder, NetworkEndian};

use crate::{Error, Result};
use std::fmt::{self, Debug, Display};

/// An Ethernet frame.
///
/// This struct wraps a byte buffer directly. Nothing is parsed until the field
/// accessor methods (e.g. [`Frame::dest`]) are called. Header values are
/// returned as copies because they're small, but the payload is always
/// returned by reference into the underlying buffer.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Frame<B: AsRef<[u8]>> {
    buf: B,
}

impl<B: AsRef<[u8]>> Frame<B> {
    /// Create a new Ethernet frame.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::FrameTooShort`] when the buffer is shorter than
    /// [`HEADER_LEN`] bytes, but does no other validation.
    ///
    /// The field accessors index directly into the buffer, so this length
    /// precondition is what keeps them from panicking.
    #[inline]
    #[must_use]
    pub fn new(buf: B) -> Result<Self> {
        let len = buf.as_ref().len();
        if len >= HEADER_LEN {
            Ok(Self { buf })
        } else {
            Err(Error::FrameTooShort(len))
        }
    }

    /// Extract the destination MAC address.
    #[inline]
    #[must_use]
    pub fn dest(&self) -> MacAddr {
        MacAddr::from_slice(&self.buf.as_ref()[offsets::DEST])
    }

    /// Extract the source MAC address.
    #[inline]
    #[must_use]
    pub fn source(&self) -> MacAddr {
        MacAddr::from_slice(&self.buf.as_ref()[offsets::SOURCE])
    }

    /// Extract the `EtherType` selector.
    #[inline]
    #[must_use]
    pub fn ethertype(&self) -> EtherType {
        let data = self.buf.as_ref();
        NetworkEndian::read_u16(&data[offsets::ETHERTYPE]).into()
    }

    /// Extract the client data, everything after the 14 byte header.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf.as_ref()[offsets::PAYLOAD]
    }

    /// Total length of the frame.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.as_ref().len()
    }

    /// The whole frame, header included.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Give back the underlying buffer.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Human-readable dump of the header fields.
    #[must_use]
    pub fn info(&self) -> String {
        let ethertype = self.ethertype();
        format!(
            "Ethernet Frame\n\nDestination MAC: {}\nSource MAC: {}\nEtherType: 0x{:04X} ({})",
            self.dest(),
            self.source(),
            u16::from(ethertype),
            ethertype.name()
        )
    }
}

mod offsets {
    use std::ops::{Range, RangeFrom};
    pub(crate) const DEST: Range<usize> = 0..6;
    pub(crate) const SOURCE: Range<usize> = 6..12;
    pub(crate) const ETHERTYPE: Range<usize> = 12..14;
    pub(crate) const PAYLOAD: RangeFrom<usize> = 14..;
}

/// See the [IANA list of EtherType
/// values](https://www.iana.org/assignments/ieee-802-numbers/ieee-802-numbers.xhtml#ieee-802-numbers-1).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EtherType {
    Ipv4,
    Arp,
    WakeOnLan,
    Rarp,
    Ipv6,
    FlowControl,
    Unknown(u16),
}

impl EtherType {
    /// Display name, empty when the value is not in the table.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EtherType::Ipv4 => "IPv4",
            EtherType::Arp => "ARP",
            EtherType::WakeOnLan => "Wake-on-LAN",
            EtherType::Rarp => "RARP",
            EtherType::Ipv6 => "IPv6",
            EtherType::FlowControl => "Ethernet flow control",
            EtherType::Unknown(_) => "",
        }
    }
}

impl From<EtherType> for u16 {
    fn from(value: EtherType) -> Self {
        match value {
            EtherType::Ipv4 => ETHERTYPE_IPV4,
            EtherType::Arp => ETHERTYPE_ARP,
            EtherType::WakeOnLan => ETHERTYPE_WAKE_ON_LAN,
            EtherType::Rarp => ETHERTYPE_RARP,
            EtherType::Ipv6 => ETHERTYPE_IPV6,
            EtherType::FlowControl => ETHERTYPE_FLOW_CONTROL,
            EtherType::Unknown(typ) => typ,
        }
    }
}

impl From<u16> for EtherType {
    fn from(value: u16) -> Self {
        match value {
            ETHERTYPE_IPV4 => EtherType::Ipv4,
            ETHERTYPE_ARP => EtherType::Arp,
            ETHERTYPE_WAKE_ON_LAN => EtherType::WakeOnLan,
            ETHERTYPE_RARP => EtherType::Rarp,
            ETHERTYPE_IPV6 => EtherType::Ipv6,
            ETHERTYPE_FLOW_CONTROL => EtherType::FlowControl,
            _ => EtherType::Unknown(value),
        }
    }
}

/// A 48-bit hardware address.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct MacAddr {
    octets: [u8; 6],
}

impl MacAddr {
    /// Create a new [`MacAddr`] instance.
    #[inline]
    #[must_use]
    pub fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> Self {
        Self {
            octets: [a, b, c, d, e, f],
        }
    }

    /// The six octets of the address.
    #[inline]
    #[must_use]
    pub fn octets(&self) -> [u8; 6] {
        self.octets
    }

    // Callers always pass a 6 byte range out of a length-checked buffer.
    pub(crate) fn from_slice(bytes: &[u8]) -> Self {
        let mut octets = [0; 6];
        octets.copy_from_slice(&bytes[..6]);
        Self { octets }
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        MacAddr { octets }
    }
}

impl Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.octets;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Size of the Ethernet header.
pub const HEADER_LEN: usize = 14;

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_ARP: u16 = 0x0806;
const ETHERTYPE_WAKE_ON_LAN: u16 = 0x0842;
const ETHERTYPE_RARP: u16 = 0x8035;
const ETHERTYPE_IPV6: u16 = 0x86DD;
const ETHERTYPE_FLOW_CONTROL: u16 = 0x8808;

#[cfg(test)]
mod tests {
    use super::{EtherType, Frame, MacAddr, HEADER_LEN};
    use crate::testdata::ENET_IPV4_TCP;
    use crate::Error;
    use std::error::Error as StdError;

    #[test]
    fn frame_returns_err_when_byte_slice_too_short() {
        for len in 0..HEADER_LEN {
            let buf = vec![0; len];
            let frame = Frame::new(&buf[..]);
            assert!(matches!(frame, Err(Error::FrameTooShort(n)) if n == len));
        }
    }

    #[test]
    fn frame_accepts_bare_header() -> Result<(), Box<dyn StdError>> {
        let frame = Frame::new([0u8; HEADER_LEN])?;
        assert!(frame.payload().is_empty());
        Ok(())
    }

    #[test]
    fn frame_has_expected_dest_address() -> Result<(), Box<dyn StdError>> {
        let frame = Frame::new(ENET_IPV4_TCP)?;
        assert_eq!(frame.dest(), MacAddr::new(0x00, 0x1A, 0xA0, 0xBB, 0xCC, 0xDD));
        Ok(())
    }

    #[test]
    fn frame_has_expected_source_address() -> Result<(), Box<dyn StdError>> {
        let frame = Frame::new(ENET_IPV4_TCP)?;
        assert_eq!(frame.source(), MacAddr::new(0x00, 0x1A, 0xB0, 0xCC, 0xDD, 0xEE));
        Ok(())
    }

    #[test]
    fn frame_has_expected_ethertype() -> Result<(), Box<dyn StdError>> {
        let frame = Frame::new(ENET_IPV4_TCP)?;
        assert_eq!(frame.ethertype(), EtherType::Ipv4);
        Ok(())
    }

    #[test]
    fn frame_has_expected_payload() -> Result<(), Box<dyn StdError>> {
        let frame = Frame::new(ENET_IPV4_TCP)?;
        assert_eq!(frame.payload(), &ENET_IPV4_TCP[14..]);
        assert_eq!(frame.len(), ENET_IPV4_TCP.len());
        Ok(())
    }

    #[test]
    fn frame_info_names_the_ethertype() -> Result<(), Box<dyn StdError>> {
        let frame = Frame::new(ENET_IPV4_TCP)?;
        let info = frame.info();
        assert!(info.contains("Destination MAC: 00:1a:a0:bb:cc:dd"));
        assert!(info.contains("EtherType: 0x0800 (IPv4)"));
        Ok(())
    }

    #[test]
    fn ethertype_round_trips_known_values() {
        for value in [0x0800, 0x0806, 0x0842, 0x8035, 0x86DD, 0x8808] {
            assert_eq!(u16::from(EtherType::from(value)), value);
        }
    }

    #[test]
    fn ethertype_has_expected_value_when_unknown() {
        assert_eq!(EtherType::from(0x88CC), EtherType::Unknown(0x88CC));
        assert_eq!(EtherType::Unknown(0x88CC).name(), "");
    }

    #[test]
    fn macaddr_to_string_gives_expected_value() {
        let addr = MacAddr::new(0, 10, 20, 5, 40, 50);
        assert_eq!(addr.to_string(), "00:0a:14:05:28:32");
        assert_eq!(format!("{addr:?}"), "00:0a:14:05:28:32");
    }
}
