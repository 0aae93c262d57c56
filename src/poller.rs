use crate::types::ScanError;
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};
use std::os::unix::io::RawFd;
use std::time::Duration;

/// One readiness event, mapped back to the submission index of the attempt
/// whose socket became ready.
#[derive(Debug, Clone, Copy)]
pub struct Readiness {
    pub index: usize,
    pub writable: bool,
    pub failed: bool,
}

/// Write-readiness multiplexer for one batch of connect attempts.
///
/// Owns a single kernel polling context. The poller lives exactly as long as
/// the batch that created it, so no registration can outlive its socket.
pub struct ReadinessPoller {
    poll: Poll,
    events: Events,
}

impl ReadinessPoller {
    /// Create a polling context able to return up to `capacity` events from
    /// one wait call.
    pub fn with_capacity(capacity: usize) -> Result<Self, ScanError> {
        let poll = Poll::new().map_err(ScanError::PollerCreate)?;
        Ok(Self {
            poll,
            events: Events::with_capacity(capacity.max(1)),
        })
    }

    /// Register `fd` for write readiness, tagged with the owning attempt's
    /// submission index as a non-owning back-reference.
    ///
    /// Error and hangup conditions are always reported by the kernel, so
    /// registering for writes alone is enough to observe failed handshakes.
    pub fn register(&self, fd: RawFd, index: usize) -> Result<(), ScanError> {
        self.poll
            .registry()
            .register(&mut SourceFd(&fd), Token(index), Interest::WRITABLE)
            .map_err(ScanError::Register)
    }

    /// Wait once, up to `timeout`, for registered sockets to become ready.
    ///
    /// Returns the batch of events the kernel delivered; an empty vector
    /// means the timeout elapsed first.
    pub fn wait(&mut self, timeout: Duration) -> Result<Vec<Readiness>, ScanError> {
        self.poll
            .poll(&mut self.events, Some(timeout))
            .map_err(ScanError::Wait)?;

        Ok(self
            .events
            .iter()
            .map(|event| Readiness {
                index: event.token().0,
                writable: event.is_writable(),
                failed: event.is_error() || event.is_read_closed() || event.is_write_closed(),
            })
            .collect())
    }
}
