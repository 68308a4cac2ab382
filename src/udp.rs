//! Read UDP datagrams.
//!
//! ## Standards conformance
//!
//! Follows [RFC 768](https://www.ietf.org/rfc/rfc768.txt). The length field is
//! reported as data only: captured frames routinely carry link-layer padding,
//! so it is not checked against the bytes that are actually present.
use crate::packet::Summary;
use crate::{ip, Error, Result};
use byteorder::{ByteOrder, NetworkEndian};

/// A UDP datagram and the IP packet carrying it.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Datagram<B: AsRef<[u8]>> {
    packet: ip::Packet<B>,
}

impl<B: AsRef<[u8]>> Datagram<B> {
    /// Decode a UDP datagram from the payload of an IP packet.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UdpHeaderTooShort`] when the payload is shorter
    /// than [`HEADER_LEN`] bytes.
    #[inline]
    #[must_use]
    pub fn new(packet: ip::Packet<B>) -> Result<Self> {
        let len = packet.payload().len();
        if len >= HEADER_LEN {
            Ok(Self { packet })
        } else {
            Err(Error::UdpHeaderTooShort(len))
        }
    }

    /// The IP packet carrying this datagram.
    #[inline]
    #[must_use]
    pub fn ip(&self) -> &ip::Packet<B> {
        &self.packet
    }

    /// Get the source port.
    #[inline]
    #[must_use]
    pub fn source_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::SOURCE])
    }

    /// Get the destination port.
    #[inline]
    #[must_use]
    pub fn dest_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::DEST])
    }

    /// Get the declared length of header and data.
    #[inline]
    #[must_use]
    pub fn len(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::LEN])
    }

    /// Get the checksum.
    #[inline]
    #[must_use]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::CHECKSUM])
    }

    /// Get the payload, every captured byte after the header.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data()[offsets::PAYLOAD]
    }

    fn data(&self) -> &[u8] {
        self.packet.payload()
    }
}

impl<B: AsRef<[u8]>> Summary for Datagram<B> {
    fn info(&self) -> String {
        format!(
            "{} - port {} to port {}",
            self.packet.info(),
            self.source_port(),
            self.dest_port()
        )
    }

    fn source(&self) -> String {
        format!("{}:{}", self.packet.source(), self.source_port())
    }

    fn destination(&self) -> String {
        format!("{}:{}", self.packet.dest(), self.dest_port())
    }
}

/// Length of the UDP header.
pub const HEADER_LEN: usize = 8;

mod offsets {
    use std::ops::{Range, RangeFrom};
    pub(crate) const SOURCE: Range<usize> = 0..2;
    pub(crate) const DEST: Range<usize> = 2..4;
    pub(crate) const LEN: Range<usize> = 4..6;
    pub(crate) const CHECKSUM: Range<usize> = 6..8;
    pub(crate) const PAYLOAD: RangeFrom<usize> = 8..;
}

#[cfg(test)]
mod tests {
    use super::Datagram;
    use crate::ip;
    use crate::packet::Summary;
    use crate::testdata::{ENET_IPV4_OPTS_UDP, ENET_IPV6_UDP};
    use crate::Error;
    use std::error::Error as StdError;

    fn datagram(buf: &[u8]) -> crate::Result<Datagram<&[u8]>> {
        Datagram::new(ip::Packet::new(buf)?)
    }

    #[test]
    fn datagram_returns_err_when_header_too_short() {
        let result = datagram(&ENET_IPV6_UDP[..54 + 7]);
        assert!(matches!(result, Err(Error::UdpHeaderTooShort(7))));
    }

    #[test]
    fn datagram_has_expected_fields() -> Result<(), Box<dyn StdError>> {
        let datagram = datagram(ENET_IPV6_UDP)?;
        assert_eq!(datagram.source_port(), 5353);
        assert_eq!(datagram.dest_port(), 5353);
        assert_eq!(datagram.len(), 12);
        assert_eq!(datagram.checksum(), 0xABCD);
        assert_eq!(datagram.payload(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        Ok(())
    }

    #[test]
    fn datagram_ignores_declared_length() -> Result<(), Box<dyn StdError>> {
        let mut buf = ENET_IPV6_UDP.to_vec();
        buf.extend_from_slice(&[0; 6]);
        let datagram = datagram(&buf)?;
        assert_eq!(datagram.len(), 12);
        assert_eq!(datagram.payload().len(), 10);

        let mut buf = ENET_IPV6_UDP.to_vec();
        buf[54 + 5] = 0xFF;
        assert_eq!(self::datagram(&buf)?.len(), 0x00FF);
        Ok(())
    }

    #[test]
    fn datagram_decodes_behind_ipv4_options() -> Result<(), Box<dyn StdError>> {
        let datagram = datagram(ENET_IPV4_OPTS_UDP)?;
        assert_eq!(datagram.source_port(), 1234);
        assert_eq!(datagram.dest_port(), 53);
        assert!(datagram.payload().is_empty());
        Ok(())
    }

    #[test]
    fn datagram_renders_endpoints() -> Result<(), Box<dyn StdError>> {
        let datagram = datagram(ENET_IPV4_OPTS_UDP)?;
        assert_eq!(datagram.source(), "10.0.0.1:1234");
        assert_eq!(datagram.destination(), "10.0.0.2:53");
        assert_eq!(
            datagram.info(),
            "udp IPv4 packet from IP 10.0.0.1 to IP 10.0.0.2 - port 1234 to port 53"
        );
        Ok(())
    }
}
