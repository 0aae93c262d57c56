use batch_scan_rs::ports::{parse_port_str, port_range, well_known_ports};

#[test]
fn range_covers_both_endpoints_in_order() {
    assert_eq!(port_range(8000, 8002), vec![8000, 8001, 8002]);
    assert_eq!(port_range(65535, 65535), vec![65535]);
}

#[test]
fn preset_is_the_fixed_well_known_list() {
    assert_eq!(
        well_known_ports(),
        vec![21, 22, 23, 25, 53, 80, 110, 443, 1433, 3306, 5432, 6379, 8000, 8080]
    );
}

#[test]
fn port_parsing_rejects_non_digit_input() {
    assert_eq!(parse_port_str("443").unwrap(), 443);
    assert!(parse_port_str("70000").is_err()); // out of range
    assert!(parse_port_str("4 43").is_err());
    assert!(parse_port_str("0x1f").is_err());
}
