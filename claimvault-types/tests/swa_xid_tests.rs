use claimvault_types::{SwaTimezones, SwaXid};
use chrono::{TimeZone, Utc};

#[test]
fn embedded_timestamp_converts_to_utc() {
    let xid = SwaXid::new("20220222-123456-abc", "AR");
    // 12:34:56 America/Chicago (CST, -06:00) on 2022-02-22
    assert_eq!(
        xid.as_isoformat().as_deref(),
        Some("2022-02-22T18:34:56+00:00")
    );
    assert!(xid.datetime().is_some());
    assert_eq!(format!("{xid}"), "20220222-123456-abc");
    // timestamp parses, but a three-segment identifier is not the long form
    assert!(!xid.format_ok());
}

#[test]
fn long_form_passes_format_check() {
    let xid = SwaXid::new("20220222-123456-1234567-123456789", "AR");
    assert!(xid.format_ok());
    assert!(xid.datetime().is_some());
}

#[test]
fn unknown_issuer_has_no_timestamp() {
    let xid = SwaXid::new("abc-123", "XX");
    assert!(xid.format_ok());
    assert!(xid.datetime().is_none());
    assert!(xid.as_isoformat().is_none());
}

#[test]
fn invalid_time_digits_yield_no_timestamp() {
    let xid = SwaXid::new("20220222-999999-abc", "AR");
    assert!(!xid.format_ok());
    assert!(xid.datetime().is_none());
}

#[test]
fn invalid_date_digits_yield_no_timestamp() {
    // month 13 is not a calendar date
    let xid = SwaXid::new("20221322-123456-1234567-123456789", "AR");
    assert!(xid.datetime().is_none());
    // long form shape still passes: the structural check is decoupled
    // from date validity
    assert!(xid.format_ok());
}

#[test]
fn known_issuer_without_timestamp_prefix() {
    let xid = SwaXid::new("abc-123", "AR");
    assert!(xid.format_ok());
    assert!(xid.datetime().is_none());
}

#[test]
fn daylight_saving_offset_applies() {
    // 2022-07-01 is CDT (-05:00) in America/Chicago
    let xid = SwaXid::new("20220701-120000-1234567-123456789", "AR");
    assert_eq!(
        xid.datetime(),
        Some(Utc.with_ymd_and_hms(2022, 7, 1, 17, 0, 0).unwrap())
    );
}

#[test]
fn custom_timezone_table() {
    let table: SwaTimezones = [("NJ".to_string(), chrono_tz::America::New_York)]
        .into_iter()
        .collect();
    let xid = SwaXid::with_timezones("20220222-123456-abc", "NJ", &table);
    assert_eq!(
        xid.as_isoformat().as_deref(),
        Some("2022-02-22T17:34:56+00:00")
    );

    // AR is absent from the custom table
    let xid = SwaXid::with_timezones("20220222-123456-abc", "AR", &table);
    assert!(xid.datetime().is_none());
}

#[test]
fn display_preserves_raw_identifier() {
    let raw = "20220222-123456-1234567-123456789";
    let xid = SwaXid::new(raw, "AR");
    assert_eq!(xid.to_string(), raw);
}
