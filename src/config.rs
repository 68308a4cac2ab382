//! Capture configuration.
use crate::{enet, Filter};
use std::time::Duration;

/// Settings for opening a [`Capture`](crate::Capture).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Config {
    filter: Filter,
    buffer_size: usize,
    read_timeout: Duration,
}

impl Config {
    /// Default settings for `filter`.
    #[must_use]
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Set the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the size of the receive buffer. Frames longer than this are
    /// truncated by the kernel.
    ///
    /// Sizes below [`MIN_BUFFER_SIZE`] are raised to it; a smaller buffer
    /// could not hold a single Ethernet header.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(MIN_BUFFER_SIZE);
        self
    }

    /// Set how long a single receive may block before the capture loop checks
    /// whether it was asked to stop.
    ///
    /// Timeouts below [`MIN_READ_TIMEOUT`] are raised to it. A zero timeout
    /// would make the receive block indefinitely, and a stopped capture would
    /// never return.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout.max(MIN_READ_TIMEOUT);
        self
    }

    #[must_use]
    pub fn filter(&self) -> Filter {
        self.filter
    }

    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: Filter::All,
            buffer_size: DEFAULT_BUFFER_SIZE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Large enough for any frame on a standard MTU link, and for most offloaded
/// super-frames.
pub const DEFAULT_BUFFER_SIZE: usize = 65536;

pub const MIN_BUFFER_SIZE: usize = enet::HEADER_LEN;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(250);

/// The smallest timeout `SO_RCVTIMEO` can express.
pub const MIN_READ_TIMEOUT: Duration = Duration::from_micros(1);

#[cfg(test)]
mod tests {
    use super::{
        Config, DEFAULT_BUFFER_SIZE, DEFAULT_READ_TIMEOUT, MIN_BUFFER_SIZE, MIN_READ_TIMEOUT,
    };
    use crate::Filter;
    use std::time::Duration;

    #[test]
    fn config_has_expected_defaults() {
        let config = Config::new(Filter::Udp6);
        assert_eq!(config.filter(), Filter::Udp6);
        assert_eq!(config.buffer_size(), DEFAULT_BUFFER_SIZE);
        assert_eq!(config.read_timeout(), DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn config_setters_override_defaults() {
        let config = Config::default()
            .with_filter(Filter::Arp)
            .with_buffer_size(2048)
            .with_read_timeout(Duration::from_secs(1));
        assert_eq!(config.filter(), Filter::Arp);
        assert_eq!(config.buffer_size(), 2048);
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn read_timeout_is_never_zero() {
        for timeout in [Duration::ZERO, Duration::from_nanos(1), Duration::from_nanos(999)] {
            let config = Config::default().with_read_timeout(timeout);
            assert_eq!(config.read_timeout(), MIN_READ_TIMEOUT);
        }
        let config = Config::default().with_read_timeout(Duration::from_micros(3));
        assert_eq!(config.read_timeout(), Duration::from_micros(3));
    }

    #[test]
    fn buffer_size_holds_an_ethernet_header() {
        assert_eq!(Config::default().with_buffer_size(0).buffer_size(), MIN_BUFFER_SIZE);
        assert_eq!(Config::default().with_buffer_size(13).buffer_size(), 14);
        assert_eq!(Config::default().with_buffer_size(15).buffer_size(), 15);
    }
}
