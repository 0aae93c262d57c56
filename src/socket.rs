use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::os::unix::io::{AsRawFd, RawFd};

/// Outcome of issuing a non-blocking connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStart {
    /// The handshake completed inside the connect call itself.
    Connected,
    /// The handshake continues in the background; completion is signalled
    /// through write readiness on the socket.
    InProgress,
}

/// A non-blocking IPv4 stream socket, exclusively owned by one connect
/// attempt for its entire lifetime.
///
/// The descriptor is closed exactly once, when the handle is dropped.
pub struct ProbeSocket {
    inner: Socket,
}

impl ProbeSocket {
    /// Open an IPv4 TCP socket and switch it to non-blocking mode.
    pub fn open() -> io::Result<Self> {
        let inner = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
        inner.set_nonblocking(true)?;
        Ok(Self { inner })
    }

    /// Issue the non-blocking connect to `addr`.
    ///
    /// `EINPROGRESS` is the expected answer and maps to
    /// [`ConnectStart::InProgress`]; every other failure is returned to the
    /// caller to classify.
    pub fn start_connect(&self, addr: SocketAddr) -> io::Result<ConnectStart> {
        match self.inner.connect(&SockAddr::from(addr)) {
            Ok(()) => Ok(ConnectStart::Connected),
            Err(e) if connect_in_progress(&e) => Ok(ConnectStart::InProgress),
            Err(e) => Err(e),
        }
    }

    /// Pending error status of the socket (`SO_ERROR`).
    pub fn take_error(&self) -> io::Result<Option<io::Error>> {
        self.inner.take_error()
    }
}

impl AsRawFd for ProbeSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}

fn connect_in_progress(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EINPROGRESS) || e.kind() == io::ErrorKind::WouldBlock
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn connect_to_listener_starts_or_completes() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let socket = ProbeSocket::open().unwrap();
        let started = socket.start_connect(addr).unwrap();
        assert!(matches!(
            started,
            ConnectStart::Connected | ConnectStart::InProgress
        ));
    }
}
