use anyhow::{bail, Result};

/// Expand a contiguous inclusive range into an ordered port list.
pub fn port_range(start: u16, end: u16) -> Vec<u16> {
    (start..=end).collect()
}

/// The fixed preset of commonly probed TCP ports.
pub fn well_known_ports() -> Vec<u16> {
    const WELL_KNOWN: &[u16] = &[
        21, 22, 23, 25, 53, 80, 110, 443, 1433, 3306, 5432, 6379, 8000, 8080,
    ];
    WELL_KNOWN.to_vec()
}

/// Parse a TCP port number (0..=65535) from a digit-only string.
pub fn parse_port_str(s: &str) -> Result<u16> {
    let val = parse_positive_integer(s)?;
    if val > 65535 {
        bail!("port out of range: {val}");
    }
    Ok(val as u16)
}

/// Parse a non-negative integer from a digit-only string.
///
/// Signs, whitespace, and any other non-digit characters are rejected.
pub fn parse_positive_integer(s: &str) -> Result<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        bail!("not a positive integer: {s}");
    }
    s.parse::<u64>()
        .map_err(|_| anyhow::anyhow!("integer overflow: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_ordered_and_inclusive() {
        assert_eq!(port_range(80, 83), vec![80, 81, 82, 83]);
        assert_eq!(port_range(443, 443), vec![443]);
    }

    #[test]
    fn preset_has_common_ports() {
        let preset = well_known_ports();
        assert_eq!(preset.len(), 14);
        assert!(preset.contains(&22) && preset.contains(&443) && preset.contains(&8080));
    }

    #[test]
    fn parse_accepts_digits_only() {
        assert_eq!(parse_port_str("8080").unwrap(), 8080);
        assert_eq!(parse_port_str("0").unwrap(), 0);
        assert!(parse_port_str("-1").is_err());
        assert!(parse_port_str("+80").is_err());
        assert!(parse_port_str(" 80").is_err());
        assert!(parse_port_str("80a").is_err());
        assert!(parse_port_str("").is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_port() {
        assert!(parse_port_str("65536").is_err());
        assert_eq!(parse_port_str("65535").unwrap(), 65535);
    }
}
