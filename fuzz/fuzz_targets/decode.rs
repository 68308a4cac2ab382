#![no_main]

use libfuzzer_sys::fuzz_target;
use sniff::{capture, Filter, Summary};

fuzz_target!(|data: &[u8]| {
    for filter in Filter::ALL {
        if let Some(Ok(packet)) = capture::decode(filter, data) {
            let _info = packet.info();
            let _src = packet.source();
            let _dst = packet.destination();
        }
    }
});
