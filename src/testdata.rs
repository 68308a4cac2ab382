// Hand-assembled frames shared by the unit tests.

// 192.168.0.104:80 -> 192.168.0.1:443, SYN, data offset 7 with 8 bytes of
// options.
pub(crate) const ENET_IPV4_TCP: &[u8] = &[
    // ethernet
    0x00, 0x1A, 0xA0, 0xBB, 0xCC, 0xDD, 0x00, 0x1A, 0xB0, 0xCC, 0xDD, 0xEE, 0x08, 0x00,
    // ipv4
    0x45, 0x00, 0x00, 0x30, 0x1C, 0x46, 0x40, 0x00, 0x40, 0x06, 0xB1, 0xE6, 0xC0, 0xA8, 0x00,
    0x68, 0xC0, 0xA8, 0x00, 0x01,
    // tcp
    0x00, 0x50, 0x01, 0xBB, 0x1C, 0x46, 0x6F, 0x58, 0x00, 0x00, 0x00, 0x00, 0x70, 0x02, 0x20,
    0x00, 0xE0, 0x57, 0x00, 0x00, 0x01, 0x01, 0x08, 0x0A, 0x00, 0x00, 0x00, 0x01,
];

// mDNS from fe80::21c:7eff:fee4:2c00 to fe80::21c:7eff:fee4:2c01 with a 4
// byte payload.
pub(crate) const ENET_IPV6_UDP: &[u8] = &[
    // ethernet
    0x33, 0x33, 0x00, 0x00, 0x00, 0xFB, 0x00, 0x1A, 0xB0, 0xCC, 0xDD, 0xEE, 0x86, 0xDD,
    // ipv6
    0x60, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x11, 0x40, 0xFE, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x02, 0x1C, 0x7E, 0xFF, 0xFE, 0xE4, 0x2C, 0x00, 0xFE, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x1C, 0x7E, 0xFF, 0xFE, 0xE4, 0x2C, 0x01,
    // udp
    0x14, 0xE9, 0x14, 0xE9, 0x00, 0x0C, 0xAB, 0xCD, 0xDE, 0xAD, 0xBE, 0xEF,
];

// Who has 192.168.0.1? Tell 192.168.0.104.
pub(crate) const ENET_ARP_REQUEST: &[u8] = &[
    // ethernet
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x1A, 0xB0, 0xCC, 0xDD, 0xEE, 0x08, 0x06,
    // arp
    0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 0x00, 0x1A, 0xB0, 0xCC, 0xDD, 0xEE, 0xC0,
    0xA8, 0x00, 0x68, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0xA8, 0x00, 0x01,
];

// 10.0.0.1:1234 -> 10.0.0.2:53 with a 24 byte IPv4 header (IHL 6).
pub(crate) const ENET_IPV4_OPTS_UDP: &[u8] = &[
    // ethernet
    0x00, 0x1A, 0xA0, 0xBB, 0xCC, 0xDD, 0x00, 0x1A, 0xB0, 0xCC, 0xDD, 0xEE, 0x08, 0x00,
    // ipv4
    0x46, 0x00, 0x00, 0x20, 0x00, 0x01, 0x00, 0x00, 0x40, 0x11, 0x00, 0x00, 0x0A, 0x00, 0x00,
    0x01, 0x0A, 0x00, 0x00, 0x02, 0x01, 0x01, 0x01, 0x00,
    // udp
    0x04, 0xD2, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00,
];
