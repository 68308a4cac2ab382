//! Read ARP packets.
//!
//! # Standards conformance
//!
//! Follows [RFC 826](https://www.rfc-editor.org/rfc/rfc826.html) for Ethernet
//! hardware addresses and IPv4 protocol addresses. The address fields are read
//! at their fixed offsets for that combination; the length fields are reported
//! as data but not used to relocate the addresses.
use crate::enet::{self, EtherType, MacAddr};
use crate::packet::Summary;
use crate::{Error, Result};
use byteorder::{ByteOrder, NetworkEndian};
use std::net::Ipv4Addr;

/// An ARP packet and the Ethernet frame carrying it.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Packet<B: AsRef<[u8]>> {
    frame: enet::Frame<B>,
}

impl<B: AsRef<[u8]>> Packet<B> {
    /// Decode an ARP packet from a whole Ethernet frame.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::FrameTooShort`] when the Ethernet header is
    /// incomplete and with [`Error::ArpTooShort`] when the frame carries less
    /// than [`HEADER_LEN`] bytes of client data.
    #[inline]
    #[must_use]
    pub fn new(buf: B) -> Result<Self> {
        Self::from_frame(enet::Frame::new(buf)?)
    }

    /// Decode an ARP packet from an already decoded Ethernet frame.
    ///
    /// # Errors
    ///
    /// See [`Packet::new`].
    #[inline]
    #[must_use]
    pub fn from_frame(frame: enet::Frame<B>) -> Result<Self> {
        let len = frame.payload().len();
        if len >= HEADER_LEN {
            Ok(Self { frame })
        } else {
            Err(Error::ArpTooShort(len))
        }
    }

    /// The Ethernet frame carrying this packet.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> &enet::Frame<B> {
        &self.frame
    }

    /// Extract the hardware type.
    #[inline]
    #[must_use]
    pub fn hardware_type(&self) -> HardwareType {
        NetworkEndian::read_u16(&self.data()[offsets::HARDWARE_TYPE]).into()
    }

    /// Extract the protocol type.
    #[inline]
    #[must_use]
    pub fn protocol_type(&self) -> EtherType {
        NetworkEndian::read_u16(&self.data()[offsets::PROTOCOL_TYPE]).into()
    }

    /// Extract the hardware address length.
    #[inline]
    #[must_use]
    pub fn hardware_addr_len(&self) -> u8 {
        self.data()[offsets::HARDWARE_ADDR_LEN]
    }

    /// Extract the protocol address length.
    #[inline]
    #[must_use]
    pub fn protocol_addr_len(&self) -> u8 {
        self.data()[offsets::PROTOCOL_ADDR_LEN]
    }

    /// Extract the operation.
    #[inline]
    #[must_use]
    pub fn operation(&self) -> Operation {
        NetworkEndian::read_u16(&self.data()[offsets::OPERATION]).into()
    }

    /// Extract the sender's hardware address.
    #[inline]
    #[must_use]
    pub fn sender_hardware_addr(&self) -> MacAddr {
        MacAddr::from_slice(&self.data()[offsets::SENDER_HARDWARE_ADDR])
    }

    /// Extract the sender's protocol address.
    #[inline]
    #[must_use]
    pub fn sender_protocol_addr(&self) -> Ipv4Addr {
        ipv4_at(self.data(), offsets::SENDER_PROTOCOL_ADDR)
    }

    /// Extract the target's hardware address.
    #[inline]
    #[must_use]
    pub fn target_hardware_addr(&self) -> MacAddr {
        MacAddr::from_slice(&self.data()[offsets::TARGET_HARDWARE_ADDR])
    }

    /// Extract the target's protocol address.
    #[inline]
    #[must_use]
    pub fn target_protocol_addr(&self) -> Ipv4Addr {
        ipv4_at(self.data(), offsets::TARGET_PROTOCOL_ADDR)
    }

    fn data(&self) -> &[u8] {
        self.frame.payload()
    }
}

impl<B: AsRef<[u8]>> Summary for Packet<B> {
    fn info(&self) -> String {
        format!(
            "{} ARP packet from {} to {}",
            self.hardware_type().name(),
            self.source(),
            self.destination()
        )
    }

    fn source(&self) -> String {
        format!(
            "{}|{}",
            self.sender_hardware_addr(),
            self.sender_protocol_addr()
        )
    }

    fn destination(&self) -> String {
        format!(
            "{}|{}",
            self.target_hardware_addr(),
            self.target_protocol_addr()
        )
    }
}

fn ipv4_at(data: &[u8], range: std::ops::Range<usize>) -> Ipv4Addr {
    Ipv4Addr::from(NetworkEndian::read_u32(&data[range]))
}

mod offsets {
    use std::ops::Range;
    pub(crate) const HARDWARE_TYPE: Range<usize> = 0..2;
    pub(crate) const PROTOCOL_TYPE: Range<usize> = 2..4;
    pub(crate) const HARDWARE_ADDR_LEN: usize = 4;
    pub(crate) const PROTOCOL_ADDR_LEN: usize = 5;
    pub(crate) const OPERATION: Range<usize> = 6..8;
    pub(crate) const SENDER_HARDWARE_ADDR: Range<usize> = 8..14;
    pub(crate) const SENDER_PROTOCOL_ADDR: Range<usize> = 14..18;
    pub(crate) const TARGET_HARDWARE_ADDR: Range<usize> = 18..24;
    pub(crate) const TARGET_PROTOCOL_ADDR: Range<usize> = 24..28;
}

/// Link-layer hardware type, see the [IANA
/// registry](https://www.iana.org/assignments/arp-parameters/arp-parameters.xhtml#arp-parameters-2).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum HardwareType {
    Ethernet,
    Ieee802,
    Atm,
    Hdlc,
    Unknown(u16),
}

impl HardwareType {
    /// Display name, empty when the value is not in the table.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            HardwareType::Ethernet => "Ethernet",
            HardwareType::Ieee802 => "IEEE 802",
            HardwareType::Atm => "ATM",
            HardwareType::Hdlc => "HDLC",
            HardwareType::Unknown(_) => "",
        }
    }
}

impl From<u16> for HardwareType {
    fn from(value: u16) -> Self {
        match value {
            1 => HardwareType::Ethernet,
            6 => HardwareType::Ieee802,
            16 => HardwareType::Atm,
            17 => HardwareType::Hdlc,
            _ => HardwareType::Unknown(value),
        }
    }
}

impl From<HardwareType> for u16 {
    fn from(value: HardwareType) -> Self {
        match value {
            HardwareType::Ethernet => 1,
            HardwareType::Ieee802 => 6,
            HardwareType::Atm => 16,
            HardwareType::Hdlc => 17,
            HardwareType::Unknown(value) => value,
        }
    }
}

/// The ARP opcode.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Operation {
    Request,
    Reply,
    Unknown(u16),
}

impl From<u16> for Operation {
    fn from(value: u16) -> Self {
        match value {
            1 => Operation::Request,
            2 => Operation::Reply,
            _ => Operation::Unknown(value),
        }
    }
}

impl From<Operation> for u16 {
    fn from(value: Operation) -> Self {
        match value {
            Operation::Request => 1,
            Operation::Reply => 2,
            Operation::Unknown(op) => op,
        }
    }
}

/// Size of an ARP packet carrying Ethernet and IPv4 addresses.
pub const HEADER_LEN: usize = 28;
