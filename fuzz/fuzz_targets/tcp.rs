#![no_main]

use libfuzzer_sys::fuzz_target;
use sniff::Summary;
use std::error::Error;

fuzz_target!(|data: &[u8]| {
    let _ = fuzz_tcp(data);
});

fn fuzz_tcp(bytes: &[u8]) -> Result<(), Box<dyn Error>> {
    let segment = sniff::tcp::Segment::new(sniff::ip::Packet::new(bytes)?)?;

    let _src = segment.source();
    let _dst = segment.destination();
    let _sequence = segment.sequence();
    let _acked = segment.acked();
    let _data_offset = segment.data_offset();
    let _flags = segment.flags();
    let _window = segment.window();
    let _checksum = segment.checksum();
    let _urgent = segment.urgent();
    let _options = segment.options().map(<[u8]>::len);
    let _payload = segment.payload().len();

    Ok(())
}
