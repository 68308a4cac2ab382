//! The receive primitive a capture reads frames from.
//!
//! [`Receive`] is the seam between the capture loop and the operating system.
//! On Linux it is implemented by [`RawSocket`], a `SOCK_RAW` packet socket that
//! delivers whole Ethernet frames.
use crate::{Error, Result};
use byteorder::{ByteOrder, NetworkEndian};
use std::io;

/// Something that blocks until a link-layer frame arrives.
pub trait Receive {
    /// Restrict the primitive to frames traversing `interface`.
    ///
    /// # Errors
    ///
    /// Fails when the operating system refuses the binding.
    fn bind(&mut self, interface: &Interface) -> io::Result<()>;

    /// Copy the next frame into `buf` and return its length.
    ///
    /// # Errors
    ///
    /// `WouldBlock`, `TimedOut` and `Interrupted` mean that no frame arrived
    /// yet; the capture loop retries them silently. Every other error is
    /// reported to the consumer before the loop carries on.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the primitive.
    ///
    /// # Errors
    ///
    /// Fails when the operating system reports an error on close.
    fn close(&mut self) -> io::Result<()>;
}

/// A network interface, resolved by name.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Interface {
    name: String,
    index: u32,
}

impl Interface {
    /// Describe an interface that was resolved elsewhere.
    #[must_use]
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Look an interface up by name.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InterfaceNotFound`] when no interface has that name.
    #[cfg(unix)]
    pub fn by_name(name: &str) -> Result<Self> {
        let not_found = || Error::InterfaceNotFound(name.to_owned());
        let cname = std::ffi::CString::new(name).map_err(|_| not_found())?;
        let index = unsafe { libc::if_nametoindex(cname.as_ptr()) };
        if index == 0 {
            Err(not_found())
        } else {
            Ok(Self::new(name, index))
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

#[cfg(target_os = "linux")]
pub use linux::RawSocket;

#[cfg(target_os = "linux")]
mod linux {
    use super::{htons, Interface, Receive};
    use std::io;
    use std::mem::size_of;
    use std::os::fd::RawFd;
    use std::time::Duration;

    /// An `AF_PACKET`/`SOCK_RAW` socket.
    ///
    /// Opening one needs `CAP_NET_RAW`. Until it is bound the socket receives
    /// matching frames from every interface.
    #[derive(Debug)]
    pub struct RawSocket {
        fd: Option<RawFd>,
        protocol: u16,
    }

    impl RawSocket {
        /// Open a packet socket for the `ETH_P_*` protocol `protocol`, given
        /// in host byte order.
        ///
        /// A receive blocks for at most `read_timeout`, rounded up to one
        /// microsecond, and then fails with `WouldBlock`.
        ///
        /// # Errors
        ///
        /// Fails when the socket cannot be created or the read timeout cannot
        /// be applied.
        pub fn open(protocol: u16, read_timeout: Duration) -> io::Result<Self> {
            let fd = unsafe {
                libc::socket(
                    libc::AF_PACKET,
                    libc::SOCK_RAW,
                    libc::c_int::from(htons(protocol)),
                )
            };
            if fd < 0 {
                return Err(io::Error::last_os_error());
            }

            let socket = Self {
                fd: Some(fd),
                protocol,
            };
            socket.set_read_timeout(read_timeout)?;
            Ok(socket)
        }

        /// The protocol the socket was opened for, in host byte order.
        #[must_use]
        pub fn protocol(&self) -> u16 {
            self.protocol
        }

        #[allow(clippy::cast_possible_truncation)]
        fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
            let tv = timeval(timeout);
            let ret = unsafe {
                libc::setsockopt(
                    self.fd()?,
                    libc::SOL_SOCKET,
                    libc::SO_RCVTIMEO,
                    std::ptr::addr_of!(tv).cast(),
                    size_of::<libc::timeval>() as libc::socklen_t,
                )
            };
            if ret < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }

        fn fd(&self) -> io::Result<RawFd> {
            self.fd
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "socket is closed"))
        }
    }

    impl Receive for RawSocket {
        #[allow(clippy::cast_possible_truncation)]
        fn bind(&mut self, interface: &Interface) -> io::Result<()> {
            let ifindex = libc::c_int::try_from(interface.index())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

            let mut addr: libc::sockaddr_ll = unsafe { std::mem::zeroed() };
            addr.sll_family = libc::AF_PACKET as libc::c_ushort;
            addr.sll_protocol = htons(self.protocol);
            addr.sll_ifindex = ifindex;

            let ret = unsafe {
                libc::bind(
                    self.fd()?,
                    std::ptr::addr_of!(addr).cast(),
                    size_of::<libc::sockaddr_ll>() as libc::socklen_t,
                )
            };
            if ret < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }

        fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let read = unsafe { libc::recv(self.fd()?, buf.as_mut_ptr().cast(), buf.len(), 0) };
            usize::try_from(read).map_err(|_| io::Error::last_os_error())
        }

        fn close(&mut self) -> io::Result<()> {
            let fd = self.fd()?;
            self.fd = None;
            if unsafe { libc::close(fd) } < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }
    }

    impl Drop for RawSocket {
        fn drop(&mut self) {
            if let Some(fd) = self.fd.take() {
                unsafe { libc::close(fd) };
            }
        }
    }

    // A zero timeval disables SO_RCVTIMEO and blocks forever, so the shortest
    // expressible timeout stands in for zero.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub(crate) fn timeval(timeout: Duration) -> libc::timeval {
        let mut tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };
        if tv.tv_sec == 0 && tv.tv_usec == 0 {
            tv.tv_usec = 1;
        }
        tv
    }
}

// Convert a short from host to network byte order.
pub(crate) fn htons(val: u16) -> u16 {
    let mut bytes = [0, 0];
    NetworkEndian::write_u16(&mut bytes, val);
    u16::from_ne_bytes(bytes)
}
