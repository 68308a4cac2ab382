//! Read TCP segments.
//!
//! # Standards conformance
//!
//! Follows the header layout of [RFC
//! 9293](https://www.rfc-editor.org/rfc/rfc9293.html#name-header-format). The
//! checksum is exposed as data and never verified.
use crate::packet::Summary;
use crate::{bitset, ip, Error, Result};
use byteorder::{ByteOrder, NetworkEndian};

/// A TCP segment and the IP packet carrying it.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Segment<B: AsRef<[u8]>> {
    packet: ip::Packet<B>,
}

impl<B: AsRef<[u8]>> Segment<B> {
    /// Decode a TCP segment from the payload of an IP packet.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TcpHeaderTooShort`] when the payload is shorter
    /// than [`MIN_HEADER_LEN`] or the data offset declares less than that, and
    /// with [`Error::TcpHeaderLengthMismatch`] when the data offset declares
    /// more bytes than the payload holds.
    #[must_use]
    pub fn new(packet: ip::Packet<B>) -> Result<Self> {
        let data = packet.payload();
        if data.len() < MIN_HEADER_LEN {
            return Err(Error::TcpHeaderTooShort(data.len()));
        }

        let declared = usize::from(data[offsets::DATA_OFFSET] >> 4) * 4;
        if declared < MIN_HEADER_LEN {
            return Err(Error::TcpHeaderTooShort(declared));
        }
        if data.len() < declared {
            return Err(Error::TcpHeaderLengthMismatch {
                declared,
                available: data.len(),
            });
        }

        Ok(Self { packet })
    }

    /// The IP packet carrying this segment.
    #[inline]
    #[must_use]
    pub fn ip(&self) -> &ip::Packet<B> {
        &self.packet
    }

    /// Extract the source port.
    #[inline]
    #[must_use]
    pub fn source_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::SOURCE])
    }

    /// Extract the destination port.
    #[inline]
    #[must_use]
    pub fn dest_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::DEST])
    }

    /// Extract the sequence number.
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> u32 {
        NetworkEndian::read_u32(&self.data()[offsets::SEQUENCE])
    }

    /// Extract the acknowledgment number.
    #[inline]
    #[must_use]
    pub fn acked(&self) -> u32 {
        NetworkEndian::read_u32(&self.data()[offsets::ACKED])
    }

    /// Extract the data offset, the header length in 32-bit words.
    #[inline]
    #[must_use]
    pub fn data_offset(&self) -> u8 {
        self.data()[offsets::DATA_OFFSET] >> 4
    }

    /// Length of the header in bytes.
    #[inline]
    #[must_use]
    pub fn header_len(&self) -> usize {
        usize::from(self.data_offset()) * 4
    }

    /// Extract the control bit flags.
    #[inline]
    #[must_use]
    pub fn flags(&self) -> Flags {
        Flags::from(self.data()[offsets::FLAGS])
    }

    /// Extract the window size.
    #[inline]
    #[must_use]
    pub fn window(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::WINDOW])
    }

    /// Extract the segment checksum.
    #[inline]
    #[must_use]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::CHECKSUM])
    }

    /// Extract the urgent pointer.
    #[inline]
    #[must_use]
    pub fn urgent(&self) -> u16 {
        NetworkEndian::read_u16(&self.data()[offsets::URGENT])
    }

    /// Extract the options, present whenever the header is longer than
    /// [`MIN_HEADER_LEN`].
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

    /// Extract the segment data after the header.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.data()[self.header_len()..]
    }

    fn data(&self) -> &[u8] {
        self.packet.payload()
    }
}

impl<B: AsRef<[u8]>> Summary for Segment<B> {
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

mod offsets {
    use std::ops::Range;
    pub(crate) const SOURCE: Range<usize> = 0..2;
    pub(crate) const DEST: Range<usize> = 2..4;
    pub(crate) const SEQUENCE: Range<usize> = 4..8;
    pub(crate) const ACKED: Range<usize> = 8..12;
    pub(crate) const DATA_OFFSET: usize = 12;
    pub(crate) const FLAGS: usize = 13;
    pub(crate) const WINDOW: Range<usize> = 14..16;
    pub(crate) const CHECKSUM: Range<usize> = 16..18;
    pub(crate) const URGENT: Range<usize> = 18..20;
}

/// TCP control bit flags, the whole of byte 13.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Flags {
    bits: u8,
}

impl Flags {
    /// The raw flag byte.
    #[inline]
    #[must_use]
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Whether the congestion window reduced flag is set.
    #[inline]
    #[must_use]
    pub fn cwr(&self) -> bool {
        bitset(self.bits, 7)
    }

    /// Whether the ECN echo flag is set.
    #[inline]
    #[must_use]
    pub fn ece(&self) -> bool {
        bitset(self.bits, 6)
    }

    /// Whether the urgent pointer is significant.
    #[inline]
    #[must_use]
    pub fn urg(&self) -> bool {
        bitset(self.bits, 5)
    }

    /// Whether the acknowledgment number is significant.
    #[inline]
    #[must_use]
    pub fn ack(&self) -> bool {
        bitset(self.bits, 4)
    }

    #[inline]
    #[must_use]
    pub fn psh(&self) -> bool {
        bitset(self.bits, 3)
    }

    #[inline]
    #[must_use]
    pub fn rst(&self) -> bool {
        bitset(self.bits, 2)
    }

    #[inline]
    #[must_use]
    pub fn syn(&self) -> bool {
        bitset(self.bits, 1)
    }

    #[inline]
    #[must_use]
    pub fn fin(&self) -> bool {
        bitset(self.bits, 0)
    }
}

impl From<u8> for Flags {
    fn from(bits: u8) -> Self {
        Self { bits }
    }
}

/// Minimum length of a TCP header.
pub const MIN_HEADER_LEN: usize = 20;
