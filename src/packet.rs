//! Fully decoded packets as delivered by the capture loop.
use crate::{arp, ip, tcp, udp};
use std::fmt::{self, Display};

/// Human-readable description of a decoded packet.
pub trait Summary {
    /// One line summary of every decoded layer.
    fn info(&self) -> String;

    /// The sending endpoint, `<ip>:<port>` or `<mac>|<ip>` for ARP.
    fn source(&self) -> String;

    /// The receiving endpoint, formatted like [`Summary::source`].
    fn destination(&self) -> String;
}

/// Any packet the capture loop can decode.
///
/// The transport variants carry either IP version; match on
/// [`tcp::Segment::ip`] or [`udp::Datagram::ip`] to tell them apart.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum NetworkPacket<B: AsRef<[u8]> = Vec<u8>> {
    Arp(arp::Packet<B>),
    Tcp(tcp::Segment<B>),
    Udp(udp::Datagram<B>),
}

impl<B: AsRef<[u8]>> NetworkPacket<B> {
    /// The IP packet under the transport layer, `None` for ARP.
    #[must_use]
    pub fn ip(&self) -> Option<&ip::Packet<B>> {
        match self {
            NetworkPacket::Arp(_) => None,
            NetworkPacket::Tcp(segment) => Some(segment.ip()),
            NetworkPacket::Udp(datagram) => Some(datagram.ip()),
        }
    }

    /// Short protocol label, e.g. `tcp6` for TCP over IPv6.
    #[must_use]
    pub fn protocol(&self) -> &'static str {
        match (self, self.ip().map(ip::Packet::version)) {
            (NetworkPacket::Arp(_), _) => "arp",
            (NetworkPacket::Tcp(_), Some(6)) => "tcp6",
            (NetworkPacket::Tcp(_), _) => "tcp",
            (NetworkPacket::Udp(_), Some(6)) => "udp6",
            (NetworkPacket::Udp(_), _) => "udp",
        }
    }

    /// Length of the whole captured frame.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            NetworkPacket::Arp(packet) => packet.frame().len(),
            NetworkPacket::Tcp(segment) => segment.ip().frame().len(),
            NetworkPacket::Udp(datagram) => datagram.ip().frame().len(),
        }
    }
}

impl<B: AsRef<[u8]>> Summary for NetworkPacket<B> {
    fn info(&self) -> String {
        match self {
            NetworkPacket::Arp(packet) => packet.info(),
            NetworkPacket::Tcp(segment) => segment.info(),
            NetworkPacket::Udp(datagram) => datagram.info(),
        }
    }

    fn source(&self) -> String {
        match self {
            NetworkPacket::Arp(packet) => packet.source(),
            NetworkPacket::Tcp(segment) => segment.source(),
            NetworkPacket::Udp(datagram) => datagram.source(),
        }
    }

    fn destination(&self) -> String {
        match self {
            NetworkPacket::Arp(packet) => packet.destination(),
            NetworkPacket::Tcp(segment) => segment.destination(),
            NetworkPacket::Udp(datagram) => datagram.destination(),
        }
    }
}

impl<B: AsRef<[u8]>> Display for NetworkPacket<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info())
    }
}

impl<B: AsRef<[u8]>> From<arp::Packet<B>> for NetworkPacket<B> {
    fn from(packet: arp::Packet<B>) -> Self {
        NetworkPacket::Arp(packet)
    }
}

impl<B: AsRef<[u8]>> From<tcp::Segment<B>> for NetworkPacket<B> {
    fn from(segment: tcp::Segment<B>) -> Self {
        NetworkPacket::Tcp(segment)
    }
}

impl<B: AsRef<[u8]>> From<udp::Datagram<B>> for NetworkPacket<B> {
    fn from(datagram: udp::Datagram<B>) -> Self {
        NetworkPacket::Udp(datagram)
    }
}
