#![no_main]

use libfuzzer_sys::fuzz_target;
use sniff::ip::Packet;
use std::error::Error;

fuzz_target!(|data: &[u8]| {
    let _ = fuzz_ip(data);
});

fn fuzz_ip(bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    let packet = Packet::new(bytes)?;

    let _dst = packet.dest();
    let _src = packet.source();
    let _hdrlen = packet.header_len();
    let _proto = packet.transport_protocol();
    let _payload = packet.payload().len();

    match packet {
        Packet::V4(packet) => {
            let _dscp = packet.dscp();
            let _ecn = packet.ecn();
            let _len = packet.total_len();
            let _flags = packet.flags();
            let _fragment_offset = packet.fragment_offset();
            let _ttl = packet.ttl();
            let _cksm = packet.checksum();
            let _options = packet.options().map(<[u8]>::to_owned);
        }
        Packet::V6(packet) => {
            let _class = packet.traffic_class();
            let _label = packet.flow_label();
            let _len = packet.payload_len();
            let _hop_limit = packet.hop_limit();
        }
    }

    Ok(())
}
