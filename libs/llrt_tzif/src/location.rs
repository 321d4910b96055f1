// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Chrono-compatible time zone built from TZif data.
//!
//! This module provides a `Location` type that implements chrono's `TimeZone`
//! trait, so decoded data can be used directly with chrono's datetime types.

use std::fmt;
use std::sync::Arc;

use chrono::{
    FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use tracing::debug;

use crate::compat::DecodeOptions;
use crate::decode::decode_with;
use crate::encode::encode;
use crate::error::Result;
use crate::model::{Template, Zone};
use crate::posix::{PosixTz, PosixZone};

/// A time zone that can be used with chrono.
///
/// Cloning is cheap, the lookup tables are shared.
#[derive(Clone)]
pub struct Location {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    zones: Vec<LocalZone>,
    /// Unix seconds and zone index, strictly increasing.
    transitions: Vec<(i64, usize)>,
    /// The extend rule, if present and valid.
    rule: Option<Rule>,
    /// Used when there are neither zones nor a valid rule.
    fallback: LocalZone,
}

struct Rule {
    tz: PosixTz,
    std: LocalZone,
    dst: Option<LocalZone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LocalZone {
    name: Arc<str>,
    offset: i32,
    is_dst: bool,
}

impl LocalZone {
    fn utc() -> Self {
        Self {
            name: "UTC".into(),
            offset: 0,
            is_dst: false,
        }
    }

    fn from_posix(zone: &PosixZone, is_dst: bool) -> Self {
        Self {
            name: zone.name.as_str().into(),
            offset: zone.offset,
            is_dst,
        }
    }
}

impl From<&Zone> for LocalZone {
    fn from(zone: &Zone) -> Self {
        Self {
            name: zone.name.as_str().into(),
            offset: zone.offset,
            is_dst: zone.is_dst,
        }
    }
}

impl Rule {
    fn parse(extend: &str) -> Option<Self> {
        if extend.is_empty() {
            return None;
        }
        let Some(tz) = PosixTz::parse(extend) else {
            debug!("tzif: ignoring invalid extend rule {:?}", extend);
            return None;
        };
        Some(Self {
            std: LocalZone::from_posix(tz.std(), false),
            dst: tz.dst().map(|zone| LocalZone::from_posix(zone, true)),
            tz,
        })
    }

    fn zone_at(&self, timestamp_secs: i64) -> &LocalZone {
        match &self.dst {
            Some(dst) if self.tz.is_dst_at(timestamp_secs) => dst,
            _ => &self.std,
        }
    }
}

impl Location {
    /// Encode the template and load the result, so that every encoder check applies.
    pub fn from_template(template: &Template) -> Result<Self> {
        let data = encode(template)?;
        Self::from_tzif(template.name.clone(), &data)
    }

    /// Load TZif data with the default [`DecodeOptions`].
    pub fn from_tzif(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        Self::from_tzif_with(name, data, &DecodeOptions::default())
    }

    pub fn from_tzif_with(
        name: impl Into<String>,
        data: &[u8],
        options: &DecodeOptions,
    ) -> Result<Self> {
        let template = decode_with(data, options)?;
        Ok(Self::new(name.into(), &template))
    }

    fn new(name: String, template: &Template) -> Self {
        let inner = Inner {
            name,
            zones: template.zones.iter().map(LocalZone::from).collect(),
            transitions: template
                .transitions
                .iter()
                .map(|t| (t.start.timestamp(), t.zone_index))
                .collect(),
            rule: Rule::parse(&template.extend),
            fallback: LocalZone::utc(),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Get the name this location was loaded with.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    fn offset(&self, zone: &LocalZone) -> LocationOffset {
        LocationOffset {
            zone: zone.clone(),
            location: self.clone(),
        }
    }

    /// Zone in effect at a Unix timestamp (in seconds).
    fn lookup(&self, timestamp_secs: i64) -> &LocalZone {
        let inner = &*self.inner;
        let first = || inner.zones.first();
        let from_rule = || inner.rule.as_ref().map(|rule| rule.zone_at(timestamp_secs));

        let zone = if inner.transitions.is_empty() {
            from_rule().or_else(first)
        } else {
            match inner
                .transitions
                .partition_point(|(start, _)| *start <= timestamp_secs)
            {
                0 => first(),
                n if n == inner.transitions.len() => {
                    from_rule().or_else(|| inner.zones.get(inner.transitions[n - 1].1))
                },
                n => inner.zones.get(inner.transitions[n - 1].1),
            }
        };
        zone.unwrap_or(&inner.fallback)
    }

    /// Resolve a wall clock time, in seconds since the Unix epoch as if it were UTC.
    fn resolve_local(&self, local_secs: i64) -> LocalResult<&LocalZone> {
        let inner = &*self.inner;
        let mut offsets: Vec<i32> = inner.zones.iter().map(|z| z.offset).collect();
        if let Some(rule) = &inner.rule {
            offsets.push(rule.std.offset);
            offsets.extend(rule.dst.as_ref().map(|z| z.offset));
        }
        if offsets.is_empty() {
            offsets.push(0);
        }
        // Larger offsets give earlier instants.
        offsets.sort_unstable_by(|a, b| b.cmp(a));
        offsets.dedup();

        let mut matches = offsets.into_iter().filter_map(|offset| {
            let zone = self.lookup(local_secs - i64::from(offset));
            (zone.offset == offset).then_some(zone)
        });
        match (matches.next(), matches.last()) {
            (None, _) => LocalResult::None,
            (Some(zone), None) => LocalResult::Single(zone),
            (Some(earliest), Some(latest)) => LocalResult::Ambiguous(earliest, latest),
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("name", &self.inner.name)
            .field("zones", &self.inner.zones.len())
            .field("transitions", &self.inner.transitions.len())
            .field("rule", &self.inner.rule.is_some())
            .finish()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The zone in effect at some instant of a [`Location`].
#[derive(Debug, Clone)]
pub struct LocationOffset {
    zone: LocalZone,
    location: Location,
}

impl LocationOffset {
    /// Get the zone designation, e.g. "PST".
    pub fn abbreviation(&self) -> &str {
        &self.zone.name
    }

    pub fn is_dst(&self) -> bool {
        self.zone.is_dst
    }

    /// Get the offset in seconds (positive = east of UTC).
    pub fn local_minus_utc(&self) -> i32 {
        self.zone.offset
    }
}

impl PartialEq for LocationOffset {
    fn eq(&self, other: &Self) -> bool {
        self.zone == other.zone
    }
}

impl Eq for LocationOffset {}

impl fmt::Display for LocationOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

// Implement chrono's Offset trait for LocationOffset
impl Offset for LocationOffset {
    fn fix(&self) -> FixedOffset {
        FixedOffset::east_opt(self.zone.offset).unwrap_or_else(|| Utc.fix())
    }
}

// Implement chrono's TimeZone trait for Location
impl TimeZone for Location {
    type Offset = LocationOffset;

    fn from_offset(offset: &Self::Offset) -> Self {
        offset.location.clone()
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<Self::Offset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::default()))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<Self::Offset> {
        self.resolve_local(local.and_utc().timestamp())
            .map(|zone| self.offset(zone))
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> Self::Offset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::default()))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> Self::Offset {
        let zone = self.lookup(utc.and_utc().timestamp());
        self.offset(zone)
    }
}
