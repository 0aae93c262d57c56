use crate::batch::BatchConnector;
use crate::types::{ScanError, ScanReport, ScanRequest};
use ::time::{format_description::well_known, OffsetDateTime};
use log::{debug, info};
use std::time::Instant;

/// Scan the requested ports in sequential batches of at most
/// `request.batch_size` concurrent attempts.
///
/// - Each batch owns a fresh readiness poller and at most `batch_size`
///   non-blocking sockets; no chunk starts before the previous chunk's wait
///   cycle has returned.
/// - The result is the opened subsequence of `request.ports`, preserving
///   relative order end to end.
pub fn scan(request: &ScanRequest) -> Result<Vec<u16>, ScanError> {
    let batch_size = request.batch_size.max(1);
    let mut opened = Vec::new();

    info!(
        "scanning {} ports on {} ({} attempts per batch, {:?} wait budget)",
        request.ports.len(),
        request.ip,
        batch_size,
        request.timeout
    );

    for chunk in request.ports.chunks(batch_size) {
        let mut batch = BatchConnector::new(chunk.len(), request.timeout)?;
        let found = batch.run(request.ip, chunk)?;
        debug!("batch of {} probed, {} opened", chunk.len(), found.len());
        opened.extend(found);
    }

    info!("scan finished, {} ports opened", opened.len());
    Ok(opened)
}

/// Run [`scan`] and wrap the findings in a serializable report with elapsed
/// time and timestamp.
pub fn scan_report(request: &ScanRequest) -> Result<ScanReport, ScanError> {
    let start = Instant::now();
    let opened = scan(request)?;
    Ok(ScanReport {
        ip: request.ip.to_string(),
        scanned: request.ports.len(),
        opened,
        elapsed_ms: start.elapsed().as_millis() as u64,
        timestamp: now_iso_like(),
    })
}

fn now_iso_like() -> String {
    // RFC3339-like UTC timestamp using `time` crate for correctness without heavy deps.
    let now = OffsetDateTime::now_utc();
    now.format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
