//! Version dispatch over IPv4 and IPv6.
//!
//! [`Packet`] is a tagged variant over the two header layouts. It exposes the
//! capabilities the transport decoders and the capture loop need (header
//! length, addresses, transport protocol, payload) by matching on the tag.
use crate::{enet, ipv4, ipv6, Error, Result};
use std::fmt::{self, Display};
use std::net::IpAddr;

/// An IPv4 or IPv6 packet.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Packet<B: AsRef<[u8]>> {
    V4(ipv4::Packet<B>),
    V6(ipv6::Packet<B>),
}

impl<B: AsRef<[u8]>> Packet<B> {
    /// Decode an IP packet from a whole Ethernet frame, picking the header
    /// layout from the version nibble of the first byte after the Ethernet
    /// header.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::PacketTooShort`] when the frame has no byte to read
    /// the version from and with [`Error::UnsupportedIpVersion`] when the
    /// version is neither 4 nor 6. Otherwise fails like
    /// [`ipv4::Packet::new`] or [`ipv6::Packet::new`].
    #[must_use]
    pub fn new(buf: B) -> Result<Self> {
        let data = buf.as_ref();
        if data.len() < MIN_PACKET_LEN {
            return Err(Error::PacketTooShort(data.len()));
        }

        let version = data[enet::HEADER_LEN] >> 4;
        match version {
            4 => Ok(Packet::V4(ipv4::Packet::new(buf)?)),
            6 => Ok(Packet::V6(ipv6::Packet::new(buf)?)),
            _ => Err(Error::UnsupportedIpVersion(version)),
        }
    }

    /// The IP version, 4 or 6.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u8 {
        match self {
            Packet::V4(p) => p.version(),
            Packet::V6(p) => p.version(),
        }
    }

    /// Length of the IP header in bytes.
    #[inline]
    #[must_use]
    pub fn header_len(&self) -> usize {
        match self {
            Packet::V4(p) => p.header_len(),
            Packet::V6(p) => p.header_len(),
        }
    }

    /// Extract the source address.
    #[inline]
    #[must_use]
    pub fn source(&self) -> IpAddr {
        match self {
            Packet::V4(p) => p.source().into(),
            Packet::V6(p) => p.source().into(),
        }
    }

    /// Extract the destination address.
    #[inline]
    #[must_use]
    pub fn dest(&self) -> IpAddr {
        match self {
            Packet::V4(p) => p.dest().into(),
            Packet::V6(p) => p.dest().into(),
        }
    }

    /// The transport protocol, from the IPv4 protocol field or the IPv6 next
    /// header field.
    #[inline]
    #[must_use]
    pub fn transport_protocol(&self) -> Protocol {
        match self {
            Packet::V4(p) => p.protocol(),
            Packet::V6(p) => p.next_header(),
        }
    }

    /// Everything after the IP header.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        match self {
            Packet::V4(p) => p.payload(),
            Packet::V6(p) => p.payload(),
        }
    }

    /// The Ethernet frame carrying this packet.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> &enet::Frame<B> {
        match self {
            Packet::V4(p) => p.frame(),
            Packet::V6(p) => p.frame(),
        }
    }

    /// One line summary, e.g. `tcp IPv4 packet from IP 10.0.0.1 to IP 10.0.0.2`.
    #[must_use]
    pub fn info(&self) -> String {
        format!(
            "{} IPv{} packet from IP {} to IP {}",
            self.transport_protocol(),
            self.version(),
            self.source(),
            self.dest()
        )
    }
}

/// Transport protocol numbers, see the [IANA
/// registry](https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Protocol {
    Icmp,
    Igmp,
    Tcp,
    Udp,
    Ipv6,
    Icmpv6,
    Ospf,
    Unknown(u8),
}

impl Protocol {
    /// Lowercase protocol name, empty when the number is not in the table.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Icmp => "icmp",
            Protocol::Igmp => "igmp",
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Ipv6 => "ipv6",
            Protocol::Icmpv6 => "icmpv6",
            Protocol::Ospf => "ospf",
            Protocol::Unknown(_) => "",
        }
    }
}

impl From<u8> for Protocol {
    fn from(value: u8) -> Self {
        match value {
            1 => Protocol::Icmp,
            2 => Protocol::Igmp,
            6 => Protocol::Tcp,
            17 => Protocol::Udp,
            41 => Protocol::Ipv6,
            58 => Protocol::Icmpv6,
            89 => Protocol::Ospf,
            _ => Protocol::Unknown(value),
        }
    }
}

impl From<Protocol> for u8 {
    fn from(value: Protocol) -> Self {
        match value {
            Protocol::Icmp => 1,
            Protocol::Igmp => 2,
            Protocol::Tcp => 6,
            Protocol::Udp => 17,
            Protocol::Ipv6 => 41,
            Protocol::Icmpv6 => 58,
            Protocol::Ospf => 89,
            Protocol::Unknown(value) => value,
        }
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Ethernet header plus the byte holding the version nibble.
const MIN_PACKET_LEN: usize = enet::HEADER_LEN + 1;
