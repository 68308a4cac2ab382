//! Read IPv4 packets.
//!
//! ## Standards conformance
//!
//! This implementation follows the [RFC
//! 791](https://datatracker.ietf.org/doc/html/rfc791) format as refined by [RFC
//! 2474](https://datatracker.ietf.org/doc/html/rfc2474) and [RFC
//! 3168](https://datatracker.ietf.org/doc/html/rfc3168), i.e. the original
//! type-of-service byte is read as the DSCP and ECN fields.
//!
//! The header checksum is exposed as data and never verified.
use crate::enet;
use crate::ip::Protocol;
use crate::{bitset, Error, Result};
use byteorder::{ByteOrder, NetworkEndian};
use std::net::Ipv4Addr;

/// An IPv4 packet and the Ethernet frame carrying it.
///
/// The constructor validates the declared header length against the bytes
/// that are actually present, so [`Packet::options`] and [`Packet::payload`]
/// can slice without further checks.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Packet<B: AsRef<[u8]>> {
    frame: enet::Frame<B>,
}

impl<B: AsRef<[u8]>> Packet<B> {
    /// Decode an IPv4 packet from a whole Ethernet frame.
    ///
    /// # Errors
    ///
    /// See [`Packet::from_frame`].
    #[inline]
    #[must_use]
    pub fn new(buf: B) -> Result<Self> {
        Self::from_frame(enet::Frame::new(buf)?)
    }

    /// Decode an IPv4 packet from the client data of an Ethernet frame.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::HeaderTooShort`] when fewer than [`MIN_HEADER_LEN`]
    /// bytes are present or the IHL field declares less than that, and with
    /// [`Error::HeaderLengthMismatch`] when the IHL field declares more bytes
    /// than are present.
    #[must_use]
    pub fn from_frame(frame: enet::Frame<B>) -> Result<Self> {
        let data = frame.payload();
        if data.len() < MIN_HEADER_LEN {
            return Err(Error::HeaderTooShort(data.len()));
        }

        let declared = usize::from(data[0] & 0xF) * 4;
        if declared < MIN_HEADER_LEN {
            return Err(Error::HeaderTooShort(declared));
        }
        if data.len() < declared {
            return Err(Error::HeaderLengthMismatch {
                declared,
                available: data.len(),
            });
        }

        Ok(Self { frame })
    }

    /// The Ethernet frame carrying this packet.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> &enet::Frame<B> {
        &self.frame
    }

    /// Extract the version.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u8 {
        self.data()[0] >> 4
    }

    /// Extract the raw IHL field, the header length in 32-bit words.
    #[inline]
    #[must_use]
    pub fn ihl(&self) -> u8 {
        self.data()[0] & 0xF
    }

    /// Length of the header in bytes.
    #[inline]
    #[must_use]
    pub fn header_len(&self) -> usize {
        usize::from(self.ihl()) * 4
    }

    /// Extract the differentiated services code point (DSCP).
    #[inline]
    #[must_use]
    pub fn dscp(&self) -> u8 {
        self.data()[1] >> 2
    }

    /// Extract the explicit congestion notification field (ECN).
    #[inline]
    #[must_use]
    pub fn ecn(&self) -> u8 {
        self.data()[1] & 0b11
    }

    /// Extract the total length field.
    #[inline]
    #[must_use]
    pub fn total_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::TOTAL_LEN])
    }

    /// Extract the identification field.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::ID])
    }

    /// Extract the three control flags.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> Flags {
        // top 3 bits of a 16 bit word always fit in a u8
        #[allow(clippy::cast_possible_truncation)]
        let bits = (self.flags_and_offset() >> 13) as u8;
        Flags::new(bits)
    }

    /// Extract the fragment offset, in units of 8 bytes.
    #[inline]
    #[must_use]
    pub fn fragment_offset(&self) -> u16 {
        self.flags_and_offset() & 0x1FFF
    }

    /// Extract the time-to-live (TTL).
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> u8 {
        self.data()[offsets::TTL]
    }

    /// Extract the transport protocol selector.
    #[inline]
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.data()[offsets::PROTOCOL].into()
    }

    /// Extract the header checksum.
    #[inline]
    #[must_use]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::CHECKSUM])
    }

    /// Extract the source address.
    #[inline]
    #[must_use]
    pub fn source(&self) -> Ipv4Addr {
        Ipv4Addr::from(NetworkEndian::read_u32(&self.data()[offsets::SOURCE]))
    }

    /// Extract the destination address.
    #[inline]
    #[must_use]
    pub fn dest(&self) -> Ipv4Addr {
        Ipv4Addr::from(NetworkEndian::read_u32(&self.data()[offsets::DEST]))
    }

    /// Extract the options, present only when the header is longer than
    /// [`MIN_HEADER_LEN`]. You'll have to parse them yourself.
    #[inline]
    #[must_use]
    pub fn options(&self) -> Option<&[u8]> {
        let end = self.header_len();
        if end > MIN_HEADER_LEN {
            Some(&self.data()[MIN_HEADER_LEN..end])
        } else {
            None
        }
    }

    /// Extract the payload, everything after the declared header length.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data()[self.header_len()..]
    }

    fn flags_and_offset(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::FLAGS_AND_OFFSET])
    }

    fn data(&self) -> &[u8] {
        self.frame.payload()
    }
}

mod offsets {
    use std::ops::Range;
    pub(crate) const TOTAL_LEN: Range<usize> = 2..4;
    pub(crate) const ID: Range<usize> = 4..6;
    pub(crate) const FLAGS_AND_OFFSET: Range<usize> = 6..8;
    pub(crate) const TTL: usize = 8;
    pub(crate) const PROTOCOL: usize = 9;
    pub(crate) const CHECKSUM: Range<usize> = 10..12;
    pub(crate) const SOURCE: Range<usize> = 12..16;
    pub(crate) const DEST: Range<usize> = 16..20;
}

/// Strongly typed wrapper for the 3 bit "flags" field.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Flags {
    bits: u8,
}

impl Flags {
    /// Create a new [`Flags`] instance from the 3 flag bits.
    #[inline]
    #[must_use]
    pub fn new(bits: u8) -> Self {
        Self { bits: bits & 0b111 }
    }

    /// The raw flag bits.
    #[inline]
    #[must_use]
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// True when the sender asked for the packet not to be fragmented.
    #[inline]
    #[must_use]
    pub fn do_not_fragment(&self) -> bool {
        bitset(self.bits, 1)
    }

    /// True when more fragments follow this one.
    #[inline]
    #[must_use]
    pub fn more_fragments(&self) -> bool {
        bitset(self.bits, 0)
    }
}

/// Minimum length of an IPv4 header.
pub const MIN_HEADER_LEN: usize = 20;

#[cfg(test)]
mod tests {
    use super::{Flags, Packet};
    use crate::ip::Protocol;
    use crate::testdata::{ENET_IPV4_OPTS_UDP, ENET_IPV4_TCP};
    use crate::Error;
    use std::{error::Error as StdError, net::Ipv4Addr};

    #[test]
    fn packet_returns_err_when_header_too_short() {
        let packet = Packet::new(&ENET_IPV4_TCP[..14 + 19]);
        assert!(matches!(packet, Err(Error::HeaderTooShort(19))));
    }

    #[test]
    fn packet_returns_err_when_ihl_exceeds_available_bytes() {
        let mut buf = ENET_IPV4_TCP[..14 + 20].to_vec();
        buf[14] = 0x46;
        let packet = Packet::new(buf);
        assert!(matches!(
            packet,
            Err(Error::HeaderLengthMismatch {
                declared: 24,
                available: 20
            })
        ));
    }

    #[test]
    fn packet_returns_err_when_ihl_below_minimum() {
        let mut buf = ENET_IPV4_TCP.to_vec();
        buf[14] = 0x44;
        let packet = Packet::new(buf);
        assert!(matches!(packet, Err(Error::HeaderTooShort(16))));
    }

    #[test]
    fn packet_accepts_bare_minimum_header() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(&ENET_IPV4_TCP[..14 + 20])?;
        assert_eq!(packet.version(), 4);
        assert_eq!(packet.ihl(), 5);
        assert_eq!(packet.header_len(), 20);
        assert_eq!(packet.options(), None);
        assert!(packet.payload().is_empty());
        Ok(())
    }

    #[test]
    fn packet_has_expected_header_fields() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(ENET_IPV4_TCP)?;
        assert_eq!(packet.dscp(), 0);
        assert_eq!(packet.ecn(), 0);
        assert_eq!(packet.total_len(), 48);
        assert_eq!(packet.id(), 0x1C46);
        assert_eq!(packet.flags(), Flags::new(0b010));
        assert_eq!(packet.fragment_offset(), 0);
        assert_eq!(packet.ttl(), 64);
        assert_eq!(packet.protocol(), Protocol::Tcp);
        assert_eq!(packet.checksum(), 0xB1E6);
        Ok(())
    }

    #[test]
    fn packet_has_expected_addresses() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(ENET_IPV4_TCP)?;
        assert_eq!(packet.source(), Ipv4Addr::new(192, 168, 0, 104));
        assert_eq!(packet.dest(), Ipv4Addr::new(192, 168, 0, 1));
        Ok(())
    }

    #[test]
    fn packet_payload_starts_after_header() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(ENET_IPV4_TCP)?;
        assert_eq!(packet.payload(), &ENET_IPV4_TCP[34..]);
        Ok(())
    }

    #[test]
    fn packet_has_expected_options_when_options_exist() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(ENET_IPV4_OPTS_UDP)?;
        assert_eq!(packet.header_len(), 24);
        assert_eq!(packet.options(), Some([1, 1, 1, 0].as_slice()));
        assert_eq!(packet.payload(), &ENET_IPV4_OPTS_UDP[38..]);
        Ok(())
    }

    #[test]
    fn dscp_and_ecn_split_second_byte() -> Result<(), Box<dyn StdError>> {
        let mut buf = ENET_IPV4_TCP.to_vec();
        buf[15] = 0b1011_1010;
        let packet = Packet::new(buf)?;
        assert_eq!(packet.dscp(), 0b10_1110);
        assert_eq!(packet.ecn(), 0b10);
        Ok(())
    }

    #[test]
    fn flags_and_fragment_offset_split_word() -> Result<(), Box<dyn StdError>> {
        let mut buf = ENET_IPV4_TCP.to_vec();
        buf[20] = 0b0011_0101;
        buf[21] = 0x0F;
        let packet = Packet::new(buf)?;
        assert_eq!(packet.flags().bits(), 0b001);
        assert!(packet.flags().more_fragments());
        assert!(!packet.flags().do_not_fragment());
        assert_eq!(packet.fragment_offset(), 0x150F);
        Ok(())
    }

    #[test]
    fn flags_has_expected_do_not_fragment() {
        assert!(Flags::new(0b010).do_not_fragment());
        assert!(!Flags::new(0b001).do_not_fragment());
    }
}
