use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

/// Fatal scan errors.
///
/// Per-attempt failures (socket creation, refused connects, timeouts) never
/// surface here; they fold into the affected port being reported closed.
/// These variants mean the readiness machinery itself is unusable, so the
/// scan aborts without a partial result.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("readiness poller creation failed: {0}")]
    PollerCreate(#[source] std::io::Error),

    #[error("readiness registration failed: {0}")]
    Register(#[source] std::io::Error),

    #[error("readiness wait failed: {0}")]
    Wait(#[source] std::io::Error),
}

/// Parameters for one scan invocation.
///
/// Ports are probed in the order given; the scanner neither reorders nor
/// deduplicates them. `batch_size` bounds how many connect attempts are in
/// flight at once, and `timeout` bounds the single readiness wait each batch
/// performs.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub ip: Ipv4Addr,
    pub ports: Vec<u16>,
    pub batch_size: usize,
    pub timeout: Duration,
}

/// Serializable summary of a finished scan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub ip: String,
    pub scanned: usize,
    pub opened: Vec<u16>,
    pub elapsed_ms: u64,
    pub timestamp: String,
}
