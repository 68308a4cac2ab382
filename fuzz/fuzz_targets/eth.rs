#![no_main]

use libfuzzer_sys::fuzz_target;
use std::error::Error;

fuzz_target!(|data: &[u8]| {
    let _ = fuzz_eth(data);
});

fn fuzz_eth(bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    let frame = sniff::enet::Frame::new(bytes)?;

    let _dst = frame.dest();
    let _src = frame.source();
    let _typ = frame.ethertype();
    let _info = frame.info();

    let packet = sniff::arp::Packet::from_frame(frame)?;
    let _op = packet.operation();
    let _sender = packet.sender_protocol_addr();
    let _target = packet.target_hardware_addr();

    Ok(())
}
