use std::fs::File;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use batch_scan_rs::config::Config;
use batch_scan_rs::ports;
use batch_scan_rs::scanner;
use batch_scan_rs::types::{ScanReport, ScanRequest};

use anyhow::{bail, Context, Result};
use clap::Parser;

/// batch-scan-rs — batched non-blocking TCP connect scanner multiplexed through one readiness poller.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "batch-scan-rs",
    version,
    about = "Batched non-blocking TCP connect scanner multiplexed through one readiness poller.",
    long_about = None
)]
struct Cli {
    /// Path to a `key = value` config file (ip, port_start, port_end, timeout_millisec).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target IPv4 address (ignored when --config is given).
    #[arg(long)]
    ip: Option<Ipv4Addr>,

    /// First port of the range to probe.
    #[arg(long = "port-start", default_value_t = 1)]
    port_start: u16,

    /// Last port of the range to probe (inclusive).
    #[arg(long = "port-end", default_value_t = 1024)]
    port_end: u16,

    /// Probe the fixed well-known-ports preset instead of a range.
    #[arg(long = "common-ports", default_value_t = false)]
    common_ports: bool,

    /// Max concurrent connect attempts per batch.
    #[arg(long = "batch-size", default_value_t = 512)]
    batch_size: usize,

    /// Readiness-wait budget per batch in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = 400)]
    timeout_ms: u64,

    /// Write the scan report as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (ip, ports, timeout_ms) = if let Some(path) = cli.config.as_deref() {
        let config = Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        let ports = ports::port_range(config.port_start, config.port_end);
        (config.ip, ports, config.timeout_millisec)
    } else {
        let Some(ip) = cli.ip else {
            bail!("either --config or --ip is required");
        };
        let ports = if cli.common_ports {
            ports::well_known_ports()
        } else {
            if cli.port_start > cli.port_end {
                bail!("--port-start must not exceed --port-end");
            }
            ports::port_range(cli.port_start, cli.port_end)
        };
        (ip, ports, cli.timeout_ms)
    };

    println!("batch-scan-rs configuration:");
    println!("  ip           : {ip}");
    println!("  ports        : {} to probe", ports.len());
    println!("  batch_size   : {}", cli.batch_size);
    println!("  timeout_ms   : {timeout_ms}");

    println!("\nscanning...");
    let request = ScanRequest {
        ip,
        ports,
        batch_size: cli.batch_size,
        timeout: Duration::from_millis(timeout_ms),
    };
    let report = scanner::scan_report(&request).context("scan aborted")?;

    println!("scan takes {} ms", report.elapsed_ms);
    print_opened(&report);

    if let Some(path) = cli.output.as_deref() {
        if let Err(e) = write_report_json(path, &report) {
            eprintln!("Failed to write JSON to {}: {}", path.display(), e);
        } else {
            println!("Wrote JSON report to {}", path.display());
        }
    }

    Ok(())
}

fn print_opened(report: &ScanReport) {
    let list = report
        .opened
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!("\nopened tcp ports: {list}");
}

fn write_report_json(path: &std::path::Path, report: &ScanReport) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
