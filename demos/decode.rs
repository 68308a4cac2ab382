use sniff::capture::decode;
use sniff::{enet, Filter, Summary};
use std::error::Error;

/// decode a captured Ethernet frame stored in a file
#[derive(argh::FromArgs, Debug)]
struct Args {
    /// path of the binary frame to decode
    #[argh(positional)]
    path: String,

    /// filter to decode with
    #[argh(option, short = 'p', default = "String::from(\"all\")")]
    protocol: String,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let Args { path, protocol } = argh::from_env::<Args>();
    let filter: Filter = protocol.parse()?;

    println!("Reading {path}");
    let bytes = std::fs::read(path)?;
    println!("{}\n", enet::Frame::new(&bytes)?.info());

    match decode(filter, &bytes) {
        Some(Ok(packet)) => {
            println!("{}", packet.info());
            println!("source: {}", packet.source());
            println!("destination: {}", packet.destination());
        }
        Some(Err(err)) => println!("malformed: {err}"),
        None => println!("dropped by the {filter} filter"),
    }
    Ok(())
}
