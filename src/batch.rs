use crate::poller::{Readiness, ReadinessPoller};
use crate::socket::{ConnectStart, ProbeSocket};
use crate::types::ScanError;
use log::debug;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::os::unix::io::AsRawFd;
use std::time::Duration;

/// Lifecycle of a single connect attempt.
///
/// `Pending` transitions synchronously on the non-blocking connect call;
/// `InProgress` resolves only through the batch's readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptState {
    Pending,
    ConnectedImmediately,
    InProgress,
    Opened,
    Closed,
}

/// Per-port attempt record: target port, exclusively owned socket, and the
/// current state of the handshake.
struct ConnectAttempt {
    port: u16,
    socket: Option<ProbeSocket>,
    state: AttemptState,
}

impl ConnectAttempt {
    fn new(port: u16) -> Self {
        Self {
            port,
            socket: None,
            state: AttemptState::Pending,
        }
    }

    fn is_open(&self) -> bool {
        matches!(
            self.state,
            AttemptState::Opened | AttemptState::ConnectedImmediately
        )
    }
}

/// One bounded group of concurrent connect attempts, resolved through a
/// single readiness wait.
///
/// The attempt records are indexed by submission order, and that index is the
/// token handed to the poller, so a readiness event maps back to its record
/// without any pointer tagging. Poller and sockets are released when the
/// connector is dropped, whatever the final states were.
pub struct BatchConnector {
    attempts: Vec<ConnectAttempt>,
    poller: ReadinessPoller,
    timeout: Duration,
}

impl BatchConnector {
    /// Create a connector for up to `capacity` concurrent attempts.
    ///
    /// Failure to create the polling context is fatal for the whole scan.
    pub fn new(capacity: usize, timeout: Duration) -> Result<Self, ScanError> {
        Ok(Self {
            attempts: Vec::with_capacity(capacity),
            poller: ReadinessPoller::with_capacity(capacity)?,
            timeout,
        })
    }

    /// Probe `ports` on `ip` and return the opened subset in submission
    /// order.
    ///
    /// Performs at most one readiness wait: attempts the wait could not
    /// resolve within the timeout are abandoned as closed, never retried.
    pub fn run(&mut self, ip: Ipv4Addr, ports: &[u16]) -> Result<Vec<u16>, ScanError> {
        for &port in ports {
            self.submit(ip, port)?;
        }

        let pending = self
            .attempts
            .iter()
            .filter(|a| a.state == AttemptState::InProgress)
            .count();
        if pending > 0 {
            debug!("waiting on {pending} in-progress attempts");
            let ready = self.poller.wait(self.timeout)?;
            for event in ready {
                self.classify(event);
            }
        }

        // The timeout budget is shared by the whole batch; whatever the one
        // wait call did not resolve is abandoned.
        for attempt in &mut self.attempts {
            if attempt.state == AttemptState::InProgress {
                attempt.state = AttemptState::Closed;
                attempt.socket = None;
            }
        }

        Ok(self
            .attempts
            .iter()
            .filter(|a| a.is_open())
            .map(|a| a.port)
            .collect())
    }

    /// Issue the non-blocking connect for one port and record the synchronous
    /// outcome.
    ///
    /// Socket creation and connect failures close this attempt only; a
    /// registration failure aborts the scan.
    fn submit(&mut self, ip: Ipv4Addr, port: u16) -> Result<(), ScanError> {
        let index = self.attempts.len();
        let addr = SocketAddr::V4(SocketAddrV4::new(ip, port));
        let mut attempt = ConnectAttempt::new(port);

        match ProbeSocket::open() {
            Ok(socket) => match socket.start_connect(addr) {
                Ok(ConnectStart::Connected) => {
                    attempt.state = AttemptState::ConnectedImmediately;
                    attempt.socket = Some(socket);
                }
                Ok(ConnectStart::InProgress) => {
                    self.poller.register(socket.as_raw_fd(), index)?;
                    attempt.state = AttemptState::InProgress;
                    attempt.socket = Some(socket);
                }
                Err(e) => {
                    debug!("port {port}: connect failed: {e}");
                    attempt.state = AttemptState::Closed;
                }
            },
            Err(e) => {
                debug!("port {port}: socket creation failed: {e}");
                attempt.state = AttemptState::Closed;
            }
        }

        self.attempts.push(attempt);
        Ok(())
    }

    /// Apply one readiness event to the attempt it refers to.
    ///
    /// Only records still in progress are affected; an error or hangup
    /// condition closes the attempt, a plain writable event is confirmed
    /// against the socket's pending error status.
    fn classify(&mut self, event: Readiness) {
        let Some(attempt) = self.attempts.get_mut(event.index) else {
            return;
        };
        if attempt.state != AttemptState::InProgress {
            return;
        }

        if event.failed {
            attempt.state = AttemptState::Closed;
            attempt.socket = None;
            return;
        }

        if event.writable {
            let status = match attempt.socket.as_ref() {
                Some(socket) => socket.take_error(),
                None => return,
            };
            match status {
                Ok(None) => attempt.state = AttemptState::Opened,
                Ok(Some(e)) => {
                    debug!("port {}: handshake failed: {e}", attempt.port);
                    attempt.state = AttemptState::Closed;
                    attempt.socket = None;
                }
                Err(e) => {
                    debug!("port {}: error status unreadable: {e}", attempt.port);
                    attempt.state = AttemptState::Closed;
                    attempt.socket = None;
                }
            }
        }
    }
}
