//! Capture link-layer frames and decode them into layered protocol views.
//!
//! ## Decoding
//!
//! Every protocol layer is a thin, validated view over a byte buffer. The
//! constructor of each view (e.g. [`enet::Frame::new`]) performs all of the
//! length checks for that layer exactly once, and the field accessors then read
//! directly from the buffer in network byte order. Views are generic over
//! `B: AsRef<[u8]>`, so they work equally well over a borrowed slice or an
//! owned [`Vec<u8>`].
//!
//! Layers compose by ownership: a [`tcp::Segment`] owns the [`ip::Packet`] it
//! was decoded from, which in turn owns the [`enet::Frame`]. Addressing context
//! for the transport layer always comes from the packet that carries it.
//!
//! ```text
//! enet::Frame ──┬── arp::Packet
//!               └── ip::Packet (ipv4 | ipv6) ──┬── tcp::Segment
//!                                              └── udp::Datagram
//! ```
//!
//! ## Capturing
//!
//! [`capture::Capture`] owns a receive primitive (a Linux `AF_PACKET` socket by
//! default, see [`socket::RawSocket`]) and runs a blocking receive loop on a
//! dedicated thread. Each received frame is decoded according to the
//! configured [`filter::Filter`] and the result is delivered, in receive order,
//! on one of two channels: decoded [`packet::NetworkPacket`]s or [`Error`]s.
#![warn(clippy::pedantic)]
#![allow(clippy::double_must_use)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::module_name_repetitions)]

pub mod arp;
pub mod capture;
pub mod config;
pub mod enet;
pub mod filter;
pub mod ip;
pub mod ipv4;
pub mod ipv6;
pub mod packet;
pub mod socket;
pub mod tcp;
pub mod udp;

#[cfg(test)]
mod testdata;

pub use capture::{Capture, StopHandle};
pub use config::Config;
pub use filter::Filter;
pub use packet::{NetworkPacket, Summary};

/// Utility wrapper for decoding and capture results.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while capturing or decoding packets.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("ethernet frame must be at least 14 bytes, got {0}")]
    FrameTooShort(usize),
    #[error("ARP packet must be at least 28 bytes, got {0}")]
    ArpTooShort(usize),
    #[error("packet too short to carry an IP version, got {0} bytes")]
    PacketTooShort(usize),
    #[error("unsupported IP version {0} (not 4 or 6)")]
    UnsupportedIpVersion(u8),
    #[error("IP header too short: {0} bytes")]
    HeaderTooShort(usize),
    #[error("IP header declares {declared} bytes but only {available} are available")]
    HeaderLengthMismatch { declared: usize, available: usize },
    #[error("TCP header too short: {0} bytes")]
    TcpHeaderTooShort(usize),
    #[error("TCP header declares {declared} bytes but only {available} are available")]
    TcpHeaderLengthMismatch { declared: usize, available: usize },
    #[error("UDP header must be at least 8 bytes, got {0}")]
    UdpHeaderTooShort(usize),
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),
    #[error("network interface not found: {0}")]
    InterfaceNotFound(String),
    #[error("capture is not bound to an interface")]
    NotBound,
    #[error("capture is already closed")]
    Closed,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Check if the nth bit is set
#[inline]
#[must_use]
pub(crate) fn bitset(byte: u8, n: usize) -> bool {
    byte & (1 << n) != 0
}
