//! Capture filters.
//!
//! A [`Filter`] is chosen by name and resolves to two selectors: the
//! link-layer protocol the socket is opened for ([`Link`]) and, for the IP
//! families, a finer [`Transport`] sub-filter applied to each decoded packet.
use crate::enet::EtherType;
use crate::ip::Protocol;
use crate::Error;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Which packets a capture decodes and delivers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Arp,
    Ip,
    Ipv6,
    Tcp,
    Tcp6,
    Udp,
    Udp6,
}

impl Filter {
    /// Every filter, in the order they are usually offered to users.
    pub const ALL: [Filter; 8] = [
        Filter::All,
        Filter::Arp,
        Filter::Ip,
        Filter::Ipv6,
        Filter::Tcp,
        Filter::Tcp6,
        Filter::Udp,
        Filter::Udp6,
    ];

    /// The name the filter is selected by.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Arp => "arp",
            Filter::Ip => "ip",
            Filter::Ipv6 => "ipv6",
            Filter::Tcp => "tcp",
            Filter::Tcp6 => "tcp6",
            Filter::Udp => "udp",
            Filter::Udp6 => "udp6",
        }
    }

    /// The link-layer selector.
    #[must_use]
    pub fn link(self) -> Link {
        match self {
            Filter::All => Link::All,
            Filter::Arp => Link::Arp,
            Filter::Ip | Filter::Tcp | Filter::Udp => Link::Ipv4,
            Filter::Ipv6 | Filter::Tcp6 | Filter::Udp6 => Link::Ipv6,
        }
    }

    /// The transport sub-filter.
    #[must_use]
    pub fn transport(self) -> Transport {
        match self {
            Filter::Tcp | Filter::Tcp6 => Transport::Tcp,
            Filter::Udp | Filter::Udp6 => Transport::Udp,
            _ => Transport::All,
        }
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Filter::ALL
            .into_iter()
            .find(|filter| filter.name() == name)
            .ok_or_else(|| Error::UnsupportedProtocol(name.to_owned()))
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Link-layer protocol selector, the protocol a packet socket is opened for.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Link {
    All,
    Arp,
    Ipv4,
    Ipv6,
}

impl Link {
    /// The `ETH_P_*` value handed to the kernel, in host byte order.
    #[must_use]
    pub fn protocol(self) -> u16 {
        match self {
            Link::All => ETH_P_ALL,
            Link::Arp => EtherType::Arp.into(),
            Link::Ipv4 => EtherType::Ipv4.into(),
            Link::Ipv6 => EtherType::Ipv6.into(),
        }
    }
}

/// Transport sub-filter applied after the IP layer is decoded.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Transport {
    All,
    Tcp,
    Udp,
}

impl Transport {
    /// Whether packets carrying `protocol` pass this filter.
    #[must_use]
    pub fn matches(self, protocol: Protocol) -> bool {
        match self {
            Transport::All => true,
            Transport::Tcp => protocol == Protocol::Tcp,
            Transport::Udp => protocol == Protocol::Udp,
        }
    }
}

// Every protocol, see linux/if_ether.h. Filters are usable for offline
// decoding on any platform, and libc only defines this on Linux.
const ETH_P_ALL: u16 = 0x0003;

#[cfg(test)]
mod tests {
    use super::{Filter, Link, Transport};
    use crate::ip::Protocol;
    use crate::Error;

    #[test]
    fn filter_parses_every_name() -> Result<(), Error> {
        for filter in Filter::ALL {
            assert_eq!(filter.name().parse::<Filter>()?, filter);
        }
        Ok(())
    }

    #[test]
    fn filter_rejects_unknown_name() {
        let result = "icmp".parse::<Filter>();
        assert!(matches!(result, Err(Error::UnsupportedProtocol(name)) if name == "icmp"));
    }

    #[test]
    fn transport_filters_select_ip_family() {
        assert_eq!(Filter::Tcp.link(), Link::Ipv4);
        assert_eq!(Filter::Udp.link(), Link::Ipv4);
        assert_eq!(Filter::Tcp6.link(), Link::Ipv6);
        assert_eq!(Filter::Udp6.link(), Link::Ipv6);
        assert_eq!(Filter::Tcp6.transport(), Transport::Tcp);
        assert_eq!(Filter::Udp.transport(), Transport::Udp);
        assert_eq!(Filter::Ip.transport(), Transport::All);
    }

    #[test]
    fn link_protocols_match_kernel_values() {
        assert_eq!(Link::All.protocol(), 0x0003);
        assert_eq!(Link::Arp.protocol(), 0x0806);
        assert_eq!(Link::Ipv4.protocol(), 0x0800);
        assert_eq!(Link::Ipv6.protocol(), 0x86DD);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn eth_p_all_matches_kernel_header() {
        assert_eq!(i32::from(super::ETH_P_ALL), libc::ETH_P_ALL);
    }

    #[test]
    fn transport_matches_protocol() {
        assert!(Transport::All.matches(Protocol::Icmp));
        assert!(Transport::Tcp.matches(Protocol::Tcp));
        assert!(!Transport::Tcp.matches(Protocol::Udp));
        assert!(!Transport::Udp.matches(Protocol::Unknown(200)));
    }
}
