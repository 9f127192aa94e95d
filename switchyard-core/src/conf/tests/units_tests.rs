use crate::conf::types::DEFAULT_REQUEST_BODY_LIMIT;
use crate::conf::units::{ParseUnitError, parse_duration, parse_size};
use std::time::Duration;

#[test]
fn parse_duration_simple_units() {
    assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
    assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    assert_eq!(parse_duration("5us").unwrap(), Duration::from_micros(5));
}

#[test]
fn parse_duration_compound_and_fractional() {
    assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
    assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
}

#[test]
fn parse_duration_zero_without_unit() {
    assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
}

#[test]
fn parse_duration_rejects_invalid_input() {
    assert_eq!(parse_duration(""), Err(ParseUnitError::Empty));
    assert!(matches!(
        parse_duration("10"),
        Err(ParseUnitError::MissingUnit(_))
    ));
    assert!(matches!(
        parse_duration("10d"),
        Err(ParseUnitError::UnknownUnit(_))
    ));
    assert!(matches!(
        parse_duration("s"),
        Err(ParseUnitError::InvalidNumber(_))
    ));
}

#[test]
fn parse_size_uses_decimal_multipliers() {
    assert_eq!(parse_size("512").unwrap(), 512);
    assert_eq!(parse_size("512b").unwrap(), 512);
    assert_eq!(parse_size("1kB").unwrap(), 1_000);
    assert_eq!(parse_size("1 KiB").unwrap(), 1_000);
    assert_eq!(parse_size("2MB").unwrap(), 2_000_000);
    assert_eq!(parse_size("1.5g").unwrap(), 1_500_000_000);
}

#[test]
fn default_request_body_limit_is_64_megabytes() {
    assert_eq!(parse_size(DEFAULT_REQUEST_BODY_LIMIT).unwrap(), 64_000_000);
    assert_eq!(parse_size("64MiB").unwrap(), parse_size("64MB").unwrap());
}

#[test]
fn parse_size_rejects_unknown_unit() {
    assert!(matches!(
        parse_size("3 bananas"),
        Err(ParseUnitError::UnknownUnit(_))
    ));
    assert!(matches!(
        parse_size("1ib"),
        Err(ParseUnitError::UnknownUnit(_))
    ));
    assert_eq!(parse_size("  "), Err(ParseUnitError::Empty));
}
