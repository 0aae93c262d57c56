use batch_scan_rs::config::{parse_config_str, Config, ConfigError};
use std::net::Ipv4Addr;

const FULL: &str = "\
ip = 127.0.0.1
port_start = 20
port_end = 90
timeout_millisec = 500
";

#[test]
fn full_config_extracts_all_fields() {
    let config = Config::from_map(&parse_config_str(FULL)).expect("extract ok");
    assert_eq!(
        config,
        Config {
            ip: Ipv4Addr::LOCALHOST,
            port_start: 20,
            port_end: 90,
            timeout_millisec: 500,
        }
    );
}

#[test]
fn swapped_port_bounds_are_normalized() {
    let input = "ip = 127.0.0.1\nport_start = 90\nport_end = 20\ntimeout_millisec = 500\n";
    let config = Config::from_map(&parse_config_str(input)).expect("extract ok");
    assert_eq!((config.port_start, config.port_end), (20, 90));
}

#[test]
fn missing_key_reports_which_one() {
    let input = "ip = 127.0.0.1\nport_end = 90\ntimeout_millisec = 500\n";
    match Config::from_map(&parse_config_str(input)) {
        Err(ConfigError::NotFound(key)) => assert_eq!(key, "port_start"),
        other => panic!("expected NotFound(port_start), got {other:?}"),
    }
}

#[test]
fn malformed_value_reports_invalid_not_missing() {
    let input = "ip = 127.0.0.1\nport_start = 20\nport_end = 90\ntimeout_millisec = soon\n";
    match Config::from_map(&parse_config_str(input)) {
        Err(ConfigError::Invalid(key)) => assert_eq!(key, "timeout_millisec"),
        other => panic!("expected Invalid(timeout_millisec), got {other:?}"),
    }
}

#[test]
fn non_ipv4_target_is_invalid() {
    let input = "ip = not-an-address\nport_start = 20\nport_end = 90\ntimeout_millisec = 500\n";
    match Config::from_map(&parse_config_str(input)) {
        Err(ConfigError::Invalid(key)) => assert_eq!(key, "ip"),
        other => panic!("expected Invalid(ip), got {other:?}"),
    }
}

#[test]
fn presence_is_checked_before_values_are_parsed() {
    // port_start is malformed AND timeout_millisec is absent; the missing key
    // is reported first.
    let input = "ip = 127.0.0.1\nport_start = abc\nport_end = 90\n";
    match Config::from_map(&parse_config_str(input)) {
        Err(ConfigError::NotFound(key)) => assert_eq!(key, "timeout_millisec"),
        other => panic!("expected NotFound(timeout_millisec), got {other:?}"),
    }
}
