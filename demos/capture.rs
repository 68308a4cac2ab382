use sniff::socket::Interface;
use sniff::{Capture, Config, Filter, Summary};
use std::error::Error;
use std::sync::mpsc;
use std::time::Duration;

/// capture and print packets from a network interface (needs CAP_NET_RAW)
#[derive(argh::FromArgs, Debug)]
struct Args {
    /// interface to capture on, e.g. eth0
    #[argh(positional)]
    interface: String,

    /// one of all, arp, ip, ipv6, tcp, tcp6, udp, udp6
    #[argh(option, short = 'p', default = "Filter::All", from_str_fn(parse_filter))]
    protocol: Filter,

    /// stop after this many packets
    #[argh(option, short = 'c')]
    count: Option<usize>,

    /// receive timeout in milliseconds, 0 polls without blocking
    #[argh(option, default = "250")]
    timeout: u64,
}

fn parse_filter(name: &str) -> Result<Filter, String> {
    name.parse().map_err(|e: sniff::Error| e.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let Args {
        interface,
        protocol,
        count,
        timeout,
    } = argh::from_env::<Args>();

    let config = Config::new(protocol).with_read_timeout(Duration::from_millis(timeout));
    let mut capture = Capture::with_config(&config)?;
    capture.bind(Interface::by_name(&interface)?)?;
    let stop = capture.stop_handle();

    let (packets, packet_rx) = mpsc::channel();
    let (errors, error_rx) = mpsc::channel();
    let handle = capture.spawn(packets, errors)?;

    let reporter = std::thread::spawn(move || {
        for err in error_rx {
            eprintln!("error: {err}");
        }
    });

    for (n, packet) in packet_rx.iter().enumerate() {
        println!(
            "{:>6} {:<5} {:>5} {} -> {}",
            n + 1,
            packet.protocol(),
            packet.len(),
            packet.source(),
            packet.destination()
        );
        if count.is_some_and(|count| n + 1 >= count) {
            stop.stop();
            break;
        }
    }

    let mut capture = handle.join().map_err(|_| "capture thread panicked")??;
    capture.close()?;
    reporter.join().map_err(|_| "reporter thread panicked")?;
    Ok(())
}
