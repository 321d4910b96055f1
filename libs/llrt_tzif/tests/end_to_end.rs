// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Templates encoded, loaded as a Location and formatted with chrono.

use chrono::{DateTime, Duration, TimeZone, Utc};
use llrt_tzif::{Location, Template, Transition, Zone};

const FORMAT: &str = "%Y-%m-%d %H:%M:%S %z %Z";

fn render(dt: &DateTime<Location>) -> String {
    dt.format(FORMAT).to_string()
}

#[test]
fn test_fixed_offset() {
    let location = llrt_tzif::new_location(&Template {
        name: "MyFixed".into(),
        zones: vec![Zone::new("MyFixed", 2 * 3600 + 23 * 60, false)],
        ..Default::default()
    })
    .unwrap();
    assert_eq!(location.name(), "MyFixed");

    let t = location.with_ymd_and_hms(2022, 1, 9, 8, 10, 15).unwrap();
    assert_eq!(render(&t), "2022-01-09 08:10:15 +0223 MyFixed");
    assert!(!t.offset().is_dst());
    assert_eq!(
        t.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2022, 1, 9, 5, 47, 15).unwrap()
    );
}

#[test]
fn test_utc() {
    let location = llrt_tzif::new_location(&Template {
        name: "MyUTC".into(),
        zones: vec![Zone::new("MyUTC", 0, false)],
        ..Default::default()
    })
    .unwrap();

    let t = location.with_ymd_and_hms(2022, 1, 9, 8, 10, 15).unwrap();
    assert_eq!(render(&t), "2022-01-09 08:10:15 +0000 MyUTC");
    assert!(!t.offset().is_dst());
    assert_eq!(
        t.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2022, 1, 9, 8, 10, 15).unwrap()
    );
}

#[test]
fn test_changes() {
    let location = llrt_tzif::new_location(&Template {
        name: "MyChanges".into(),
        zones: vec![
            Zone::new("Std", 2 * 3600 + 23 * 60, false),
            Zone::new("Dst", 2 * 3600 + 53 * 60, true),
        ],
        transitions: vec![
            Transition::new(Utc.with_ymd_and_hms(2022, 1, 9, 10, 0, 0).unwrap(), 1),
            Transition::new(Utc.with_ymd_and_hms(2022, 1, 9, 11, 0, 0).unwrap(), 0),
        ],
        extend: String::new(),
    })
    .unwrap();

    let t = location.with_ymd_and_hms(2022, 1, 9, 12, 22, 59).unwrap();
    assert_eq!(render(&t), "2022-01-09 12:22:59 +0223 Std");
    assert!(!t.offset().is_dst());

    let t = t + Duration::seconds(1);
    assert_eq!(render(&t), "2022-01-09 12:53:00 +0253 Dst");
    assert!(t.offset().is_dst());

    let t = t + Duration::hours(1);
    assert_eq!(render(&t), "2022-01-09 13:23:00 +0223 Std");
}

#[test]
fn test_extend() {
    let location = llrt_tzif::new_location(&Template {
        name: "MyExt".into(),
        extend: "<MyExt>-02:23:00<MyExtDST>-03:23:00,M1.2.3/10:00:00,M2.3.4/10:00:00".into(),
        ..Default::default()
    })
    .unwrap();

    let t = location.with_ymd_and_hms(2022, 1, 9, 8, 10, 15).unwrap();
    assert_eq!(render(&t), "2022-01-09 08:10:15 +0223 MyExt");
    assert!(!t.offset().is_dst());

    let t = location.with_ymd_and_hms(2022, 1, 12, 9, 59, 59).unwrap();
    assert_eq!(render(&t), "2022-01-12 09:59:59 +0223 MyExt");

    let t = t + Duration::seconds(1);
    assert_eq!(render(&t), "2022-01-12 11:00:00 +0323 MyExtDST");
    assert!(t.offset().is_dst());

    // the rule repeats every year
    let t = location.with_ymd_and_hms(2030, 1, 20, 12, 0, 0).unwrap();
    assert_eq!(render(&t), "2030-01-20 12:00:00 +0323 MyExtDST");
}

#[test]
fn test_location_from_foreign_name() {
    let template = Template {
        zones: vec![Zone::new("CET", 3600, false)],
        ..Default::default()
    };
    let data = llrt_tzif::tzif_data(&template).unwrap();
    let location = Location::from_tzif("Europe/Somewhere", &data).unwrap();
    assert_eq!(location.to_string(), "Europe/Somewhere");

    let t = location.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    assert_eq!(render(&t), "2024-06-01 00:00:00 +0100 CET");
}
