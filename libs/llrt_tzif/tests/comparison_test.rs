// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Comparison test between jiff's TZif reader and our Location.
//!
//! Encoded data must be accepted by an independent RFC 8536 reader and yield the
//! same offsets, DST flags and designations as our own lookup.
//!
//! RFC 8536 asks for indicator counts of zero or `typecnt`, while the encoder
//! always writes `timecnt` indicators. The templates below use one transition per
//! type record (zones + anchor), so strict readers accept them.

use chrono::{DateTime, Offset, TimeZone, Utc};
use jiff::tz::TimeZone as JiffTz;
use jiff::Timestamp;
use llrt_tzif::{Location, Template, Transition, Zone};

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// Offset, DST flag and designation according to jiff
fn jiff_offset(tz: &JiffTz, timestamp_secs: i64) -> (i32, bool, String) {
    let info = tz.to_offset_info(Timestamp::from_second(timestamp_secs).unwrap());
    (
        info.offset().seconds(),
        info.dst().is_dst(),
        info.abbreviation().to_string(),
    )
}

/// Offset, DST flag and designation according to our Location
fn location_offset(location: &Location, timestamp_secs: i64) -> (i32, bool, String) {
    let utc = DateTime::from_timestamp(timestamp_secs, 0).unwrap();
    let local = utc.with_timezone(location);
    let offset = local.offset();
    assert_eq!(offset.fix().local_minus_utc(), offset.local_minus_utc());
    (
        offset.local_minus_utc(),
        offset.is_dst(),
        offset.abbreviation().to_string(),
    )
}

/// Compare offsets and panic with details if they differ
fn assert_offsets_match(tz: &JiffTz, location: &Location, timestamp_secs: i64, label: &str) {
    let expected = jiff_offset(tz, timestamp_secs);
    let actual = location_offset(location, timestamp_secs);

    assert_eq!(
        expected,
        actual,
        "Offset mismatch for {} at {} (ts={}): jiff={:?}, location={:?}",
        location.name(),
        label,
        timestamp_secs,
        expected,
        actual
    );
}

/// Test a template across many timestamps
fn test_template_comprehensive(template: &Template) {
    let data = template.to_tzif().unwrap();
    let tz = JiffTz::tzif(&template.name, &data).unwrap();
    let location = Location::from_tzif(template.name.clone(), &data).unwrap();

    // Around every transition
    for transition in &template.transitions {
        let ts = transition.start.timestamp();
        for delta in [-3600, -1, 0, 1, 3600] {
            assert_offsets_match(&tz, &location, ts + delta, "transition");
        }
    }

    // Twice a month from 1850 to 2100
    for year in (1850..=2100).step_by(5) {
        for month in 1..=12 {
            for day in [1, 15] {
                let ts = utc(year, month, day, 12).timestamp();
                assert_offsets_match(&tz, &location, ts, &format!("{year}-{month:02}-{day:02}"));
            }
        }
    }

    // Every hour of a recent year, to cover the rule's transitions
    let start = utc(2024, 1, 1, 0).timestamp();
    for hour in 0..(366 * 24) {
        assert_offsets_match(&tz, &location, start + hour * 3600, "2024");
    }
}

#[test]
fn test_fixed_offset() {
    test_template_comprehensive(&Template {
        name: "MyFixed".into(),
        zones: vec![Zone::new("MyFixed", 2 * 3600 + 23 * 60, false)],
        ..Default::default()
    });
}

#[test]
fn test_transitions_without_rule() {
    test_template_comprehensive(&Template {
        name: "MyChanges".into(),
        zones: vec![
            Zone::new("Std", 2 * 3600 + 23 * 60, false),
            Zone::new("Dst", 2 * 3600 + 53 * 60, true),
        ],
        transitions: vec![
            Transition::new(utc(2022, 1, 9, 10), 1),
            Transition::new(utc(2022, 1, 9, 11), 0),
            Transition::new(utc(2023, 1, 9, 10), 1),
        ],
        extend: String::new(),
    });
}

#[test]
fn test_transitions_with_rule() {
    test_template_comprehensive(&Template {
        name: "America/New_York".into(),
        zones: vec![
            Zone::new("LMT", -17762, false),
            Zone::new("EST", -18000, false),
            Zone::new("EDT", -14400, true),
        ],
        transitions: vec![
            Transition::new(utc(1883, 11, 18, 17), 1),
            Transition::new(utc(1918, 3, 31, 7), 2),
            Transition::new(utc(1918, 10, 27, 6), 1),
            Transition::new(utc(1919, 3, 30, 7), 2),
        ],
        extend: "EST5EDT,M3.2.0,M11.1.0".into(),
    });
}

#[test]
fn test_southern_hemisphere_rule() {
    test_template_comprehensive(&Template {
        name: "Australia/Sydney".into(),
        zones: vec![
            Zone::new("LMT", 36292, false),
            Zone::new("AEST", 36000, false),
            Zone::new("AEDT", 39600, true),
        ],
        transitions: vec![
            Transition::new(utc(1895, 1, 31, 13), 1),
            Transition::new(utc(1916, 12, 31, 14), 2),
            Transition::new(utc(1917, 3, 24, 15), 1),
            Transition::new(utc(1941, 12, 31, 16), 2),
        ],
        extend: "AEST-10AEDT,M10.1.0,M4.1.0/3".into(),
    });
}

#[test]
fn test_data_accepted_by_jiff() {
    let template = Template {
        name: "MyExt".into(),
        extend: "<MyExt>-02:23:00<MyExtDST>-03:23:00,M1.2.3/10:00:00,M2.3.4/10:00:00".into(),
        ..Default::default()
    };
    let data = template.to_tzif().unwrap();
    assert!(JiffTz::tzif("MyExt", &data).is_ok());
}
