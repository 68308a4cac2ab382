//! Read IPv6 packets.
//!
//! Follows the fixed header layout of [RFC
//! 8200](https://datatracker.ietf.org/doc/html/rfc8200). Extension headers are
//! not walked: [`Packet::next_header`] is reported as-is and the payload starts
//! right after the fixed header.
use crate::enet;
use crate::ip::Protocol;
use crate::{Error, Result};
use byteorder::{ByteOrder, NetworkEndian};
use std::net::Ipv6Addr;

/// An IPv6 packet and the Ethernet frame carrying it.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Packet<B: AsRef<[u8]>> {
    frame: enet::Frame<B>,
}

impl<B: AsRef<[u8]>> Packet<B> {
    /// Decode an IPv6 packet from a whole Ethernet frame.
    ///
    /// # Errors
    ///
    /// See [`Packet::from_frame`].
    #[inline]
    #[must_use]
    pub fn new(buf: B) -> Result<Self> {
        Self::from_frame(enet::Frame::new(buf)?)
    }

    /// Decode an IPv6 packet from the client data of an Ethernet frame.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::HeaderTooShort`] when fewer than [`HEADER_LEN`]
    /// bytes are present.
    #[inline]
    #[must_use]
    pub fn from_frame(frame: enet::Frame<B>) -> Result<Self> {
        let len = frame.payload().len();
        if len >= HEADER_LEN {
            Ok(Self { frame })
        } else {
            Err(Error::HeaderTooShort(len))
        }
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

    /// Length of the header in bytes, always [`HEADER_LEN`].
    #[inline]
    #[must_use]
    pub fn header_len(&self) -> usize {
        HEADER_LEN
    }

    /// Extract the traffic class, which straddles the first two bytes.
    #[inline]
    #[must_use]
    pub fn traffic_class(&self) -> u8 {
        let data = self.data();
        (data[0] & 0x0F) << 4 | data[1] >> 4
    }

    /// Extract the 20 bit flow label.
    #[inline]
    #[must_use]
    pub fn flow_label(&self) -> u32 {
        NetworkEndian::read_u32(&self.data()[0..4]) & 0x000F_FFFF
    }

    /// Extract the payload length field.
    #[inline]
    #[must_use]
    pub fn payload_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::PAYLOAD_LEN])
    }

    /// Extract the next header selector.
    #[inline]
    #[must_use]
    pub fn next_header(&self) -> Protocol {
        self.data()[offsets::NEXT_HEADER].into()
    }

    /// Extract the hop limit.
    #[inline]
    #[must_use]
    pub fn hop_limit(&self) -> u8 {
        self.data()[offsets::HOP_LIMIT]
    }

    /// Extract the source address.
    #[inline]
    #[must_use]
    pub fn source(&self) -> Ipv6Addr {
        Ipv6Addr::from(NetworkEndian::read_u128(&self.data()[offsets::SOURCE]))
    }

    /// Extract the destination address.
    #[inline]
    #[must_use]
    pub fn dest(&self) -> Ipv6Addr {
        Ipv6Addr::from(NetworkEndian::read_u128(&self.data()[offsets::DEST]))
    }

    /// Extract the payload, everything after the fixed header.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data()[HEADER_LEN..]
    }

    fn data(&self) -> &[u8] {
        self.frame.payload()
    }
}

mod offsets {
    use std::ops::Range;
    pub(crate) const PAYLOAD_LEN: Range<usize> = 4..6;
    pub(crate) const NEXT_HEADER: usize = 6;
    pub(crate) const HOP_LIMIT: usize = 7;
    pub(crate) const SOURCE: Range<usize> = 8..24;
    pub(crate) const DEST: Range<usize> = 24..40;
}

/// Length of the fixed IPv6 header.
pub const HEADER_LEN: usize = 40;

#[cfg(test)]
mod tests {
    use super::Packet;
    use crate::ip::Protocol;
    use crate::testdata::ENET_IPV6_UDP;
    use crate::Error;
    use std::{error::Error as StdError, net::Ipv6Addr};

    #[test]
    fn packet_returns_err_when_header_too_short() {
        let packet = Packet::new(&ENET_IPV6_UDP[..14 + 39]);
        assert!(matches!(packet, Err(Error::HeaderTooShort(39))));
    }

    #[test]
    fn packet_has_zero_class_and_label() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(ENET_IPV6_UDP)?;
        assert_eq!(packet.version(), 6);
        assert_eq!(packet.traffic_class(), 0);
        assert_eq!(packet.flow_label(), 0);
        Ok(())
    }

    #[test]
    fn traffic_class_and_flow_label_straddle_bytes() -> Result<(), Box<dyn StdError>> {
        let mut buf = ENET_IPV6_UDP.to_vec();
        buf[14..18].copy_from_slice(&[0x6A, 0xB1, 0x23, 0x45]);
        let packet = Packet::new(buf)?;
        assert_eq!(packet.version(), 6);
        assert_eq!(packet.traffic_class(), 0xAB);
        assert_eq!(packet.flow_label(), 0x1_2345);
        Ok(())
    }

    #[test]
    fn packet_has_expected_header_fields() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(ENET_IPV6_UDP)?;
        assert_eq!(packet.header_len(), 40);
        assert_eq!(packet.payload_len(), 12);
        assert_eq!(packet.next_header(), Protocol::Udp);
        assert_eq!(packet.hop_limit(), 64);
        Ok(())
    }

    #[test]
    fn packet_has_expected_addresses() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(ENET_IPV6_UDP)?;
        let source: Ipv6Addr = "fe80::21c:7eff:fee4:2c00".parse()?;
        let dest: Ipv6Addr = "fe80::21c:7eff:fee4:2c01".parse()?;
        assert_eq!(packet.source(), source);
        assert_eq!(packet.dest(), dest);
        Ok(())
    }

    #[test]
    fn packet_payload_starts_after_fixed_header() -> Result<(), Box<dyn StdError>> {
        let packet = Packet::new(ENET_IPV6_UDP)?;
        assert_eq!(packet.payload(), &ENET_IPV6_UDP[54..]);
        Ok(())
    }
}
