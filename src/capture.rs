//! The receive loop.
//!
//! A [`Capture`] owns a [`Receive`] primitive, a reusable receive buffer and a
//! [`Filter`]. Once bound to an interface, [`Capture::run`] blocks in a loop:
//! every frame is copied out of the receive buffer, decoded according to the
//! filter and sent on one of two channels. Frames are delivered in the order
//! they were received, and a frame that fails to decode is reported on the
//! error channel in its place.
//!
//! The loop ends when its [`StopHandle`] is triggered or when the consumer
//! drops either receiving end. A stop request is observed before the next
//! receive. The raw socket always carries a non-zero read timeout (see
//! [`Config::with_read_timeout`]), so a stopped capture returns within one
//! timeout even on a quiet interface.
use crate::enet::{self, EtherType};
use crate::filter::{Filter, Link, Transport};
use crate::ip::Protocol;
use crate::packet::NetworkPacket;
use crate::socket::{Interface, Receive};
use crate::{arp, ip, tcp, udp, Config, Error, Result};
use log::{debug, info, trace, warn};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[cfg(target_os = "linux")]
use crate::socket::RawSocket;

/// Lifecycle of a [`Capture`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum State {
    /// The receive primitive is open but not bound to an interface.
    Open,
    Bound,
    /// The receive loop is running.
    Receiving,
    Closed,
}

/// Asks a running capture to return.
///
/// Handles are cheap to clone and may be shared between captures. Once
/// triggered a handle stays triggered.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that every capture using this handle stops.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters for one run of the receive loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Stats {
    /// Frames read from the receive primitive.
    pub received: u64,
    /// Packets sent on the packet channel.
    pub delivered: u64,
    /// Receive and decode errors sent on the error channel.
    pub errors: u64,
    /// Frames the filter dropped.
    pub skipped: u64,
}

/// A packet capture over a receive primitive.
#[derive(Debug)]
pub struct Capture<R: Receive> {
    receiver: R,
    filter: Filter,
    buf: Vec<u8>,
    stop: StopHandle,
    state: State,
    interface: Option<Interface>,
}

#[cfg(target_os = "linux")]
impl Capture<RawSocket> {
    /// Open a raw socket capture for the filter named `filter`, with default
    /// settings otherwise.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnsupportedProtocol`] when `filter` is not a known
    /// filter name and with [`Error::Io`] when the socket cannot be opened.
    pub fn open(filter: &str) -> Result<Self> {
        Self::with_config(&Config::new(filter.parse()?))
    }

    /// Open a raw socket capture.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Io`] when the socket cannot be opened, which
    /// usually means the process lacks `CAP_NET_RAW`.
    pub fn with_config(config: &Config) -> Result<Self> {
        let socket = RawSocket::open(config.filter().link().protocol(), config.read_timeout())?;
        info!(
            "opened raw socket for {} packets (protocol {:#06x})",
            config.filter(),
            socket.protocol()
        );
        Ok(Self::with_receiver(socket, config))
    }
}

impl<R: Receive> Capture<R> {
    /// Wrap an already open receive primitive.
    #[must_use]
    pub fn with_receiver(receiver: R, config: &Config) -> Self {
        Self {
            receiver,
            filter: config.filter(),
            buf: vec![0; config.buffer_size()],
            stop: StopHandle::new(),
            state: State::Open,
            interface: None,
        }
    }

    /// Replace the stop handle, e.g. to stop several captures at once.
    #[must_use]
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    #[must_use]
    pub fn filter(&self) -> Filter {
        self.filter
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// The interface the capture is bound to.
    #[must_use]
    pub fn interface(&self) -> Option<&Interface> {
        self.interface.as_ref()
    }

    /// A handle that stops the receive loop from another thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Bind the receive primitive to `interface`. Binding again moves the
    /// capture to the new interface.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Closed`] after [`Capture::close`] and with
    /// [`Error::Io`] when the primitive refuses the binding.
    pub fn bind(&mut self, interface: Interface) -> Result<()> {
        if self.state == State::Closed {
            return Err(Error::Closed);
        }
        self.receiver.bind(&interface)?;
        info!(
            "bound {} capture to {} (index {})",
            self.filter,
            interface.name(),
            interface.index()
        );
        self.interface = Some(interface);
        self.state = State::Bound;
        Ok(())
    }

    /// Run the receive loop on the calling thread until the capture is
    /// stopped or a channel is disconnected.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotBound`] before [`Capture::bind`] and with
    /// [`Error::Closed`] after [`Capture::close`]. Errors met while receiving
    /// and decoding go to `errors` and never end the loop.
    pub fn run(
        &mut self,
        packets: &Sender<NetworkPacket>,
        errors: &Sender<Error>,
    ) -> Result<Stats> {
        self.check_runnable()?;
        self.state = State::Receiving;
        info!("started {} capture", self.filter);

        let mut stats = Stats::default();
        while !self.stop.is_stopped() {
            let len = match self.receiver.recv(&mut self.buf) {
                Ok(len) => len.min(self.buf.len()),
                Err(e) if is_retryable(&e) => continue,
                Err(e) => {
                    warn!("receive failed: {e}");
                    if errors.send(Error::Io(e)).is_err() {
                        debug!("error channel disconnected");
                        break;
                    }
                    stats.errors += 1;
                    continue;
                }
            };
            stats.received += 1;

            // The buffer is reused, every delivered packet owns its frame.
            let frame = self.buf[..len].to_vec();
            match decode(self.filter, frame) {
                Some(Ok(packet)) => {
                    if packets.send(packet).is_err() {
                        debug!("packet channel disconnected");
                        break;
                    }
                    stats.delivered += 1;
                }
                Some(Err(e)) => {
                    debug!("dropping {len} byte frame: {e}");
                    if errors.send(e).is_err() {
                        debug!("error channel disconnected");
                        break;
                    }
                    stats.errors += 1;
                }
                None => stats.skipped += 1,
            }
        }

        self.state = State::Bound;
        info!(
            "stopped {} capture: {} received, {} delivered, {} errors, {} skipped",
            self.filter, stats.received, stats.delivered, stats.errors, stats.skipped
        );
        Ok(stats)
    }

    /// Stop the receive loop and release the receive primitive.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Closed`] when the capture was already closed and
    /// with [`Error::Io`] when the primitive fails to close.
    pub fn close(&mut self) -> Result<()> {
        if self.state == State::Closed {
            return Err(Error::Closed);
        }
        self.stop.stop();
        self.state = State::Closed;
        self.receiver.close()?;
        info!("closed {} capture", self.filter);
        Ok(())
    }

    fn check_runnable(&self) -> Result<()> {
        match self.state {
            State::Open => Err(Error::NotBound),
            State::Closed => Err(Error::Closed),
            State::Bound | State::Receiving => Ok(()),
        }
    }
}

impl<R: Receive + Send + 'static> Capture<R> {
    /// Run the receive loop on a dedicated thread.
    ///
    /// Joining the returned handle gives the capture back once the loop has
    /// ended, so it can be run again or closed.
    ///
    /// # Errors
    ///
    /// Fails like [`Capture::run`] when the capture cannot run, and with
    /// [`Error::Io`] when the thread cannot be spawned.
    pub fn spawn(
        mut self,
        packets: Sender<NetworkPacket>,
        errors: Sender<Error>,
    ) -> Result<JoinHandle<Result<Self>>> {
        self.check_runnable()?;
        let name = format!("capture-{}", self.filter);
        let handle = thread::Builder::new().name(name).spawn(move || {
            self.run(&packets, &errors)?;
            Ok(self)
        })?;
        Ok(handle)
    }
}

/// Decode one captured Ethernet frame according to `filter`.
///
/// Returns `None` when the filter drops the frame: its EtherType is neither
/// ARP nor IP, or its transport protocol does not pass the filter or has no
/// decoder.
pub fn decode<B: AsRef<[u8]>>(filter: Filter, frame: B) -> Option<Result<NetworkPacket<B>>> {
    match filter.link() {
        Link::All => {
            let ethertype = match enet::Frame::new(frame.as_ref()) {
                Ok(header) => header.ethertype(),
                Err(e) => return Some(Err(e)),
            };
            match ethertype {
                EtherType::Arp => Some(decode_arp(frame)),
                EtherType::Ipv4 | EtherType::Ipv6 => decode_ip(frame, filter.transport()),
                other => {
                    trace!("skipping frame with EtherType {:#06x}", u16::from(other));
                    None
                }
            }
        }
        Link::Arp => Some(decode_arp(frame)),
        Link::Ipv4 | Link::Ipv6 => decode_ip(frame, filter.transport()),
    }
}

fn decode_arp<B: AsRef<[u8]>>(frame: B) -> Result<NetworkPacket<B>> {
    arp::Packet::new(frame).map(NetworkPacket::Arp)
}

fn decode_ip<B: AsRef<[u8]>>(frame: B, transport: Transport) -> Option<Result<NetworkPacket<B>>> {
    let packet = match ip::Packet::new(frame) {
        Ok(packet) => packet,
        Err(e) => return Some(Err(e)),
    };

    let protocol = packet.transport_protocol();
    if !transport.matches(protocol) {
        trace!("skipping {protocol} packet");
        return None;
    }
    match protocol {
        Protocol::Tcp => Some(tcp::Segment::new(packet).map(NetworkPacket::Tcp)),
        Protocol::Udp => Some(udp::Datagram::new(packet).map(NetworkPacket::Udp)),
        other => {
            trace!("no decoder for IP protocol {}", u8::from(other));
            None
        }
    }
}

fn is_retryable(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}
