// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Logical description of a time zone.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::location::Location;

/// Maximum number of zones a [`Template`] can hold.
///
/// TZif has room for 255 local time type records. Record 0 is reserved for the
/// anchor zone, which transitions never reference.
pub const MAX_ZONES: usize = 254;

/// A single local time rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    /// Designation of the zone (e.g. "PST").
    pub name: String,
    /// Seconds to add to UTC to get local time. Positive east of UTC.
    pub offset: i32,
    /// Whether daylight saving time is in effect.
    pub is_dst: bool,
}

impl Zone {
    pub fn new(name: impl Into<String>, offset: i32, is_dst: bool) -> Self {
        Self {
            name: name.into(),
            offset,
            is_dst,
        }
    }
}

/// A switch to another zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Instant at which `zone_index` takes effect.
    pub start: DateTime<Utc>,
    /// Index into [`Template::zones`].
    pub zone_index: usize,
}

impl Transition {
    pub fn new(start: DateTime<Utc>, zone_index: usize) -> Self {
        Self { start, zone_index }
    }
}

/// Everything needed to build a time zone.
///
/// - At the beginning of time `zones[0]` applies, until the first transition.
/// - `transitions` must be strictly increasing by `start`.
/// - If `extend` is non-empty it replaces the zone selected by the last transition,
///   or applies since the beginning of time when there are no transitions.
/// - If `zones` is empty, `extend` must be non-empty.
///
/// `extend` is a TZ string as described in RFC 8536, section 3.3. It is written
/// and read verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    /// Name of the location. Not stored in TZif data.
    pub name: String,
    /// At most [`MAX_ZONES`] zones.
    pub zones: Vec<Zone>,
    pub transitions: Vec<Transition>,
    pub extend: String,
}

impl Template {
    /// Encode the template as TZif data. See [`encode`](crate::encode()).
    pub fn to_tzif(&self) -> Result<Vec<u8>> {
        crate::encode(self)
    }

    /// Decode TZif data into a template. See [`decode`](crate::decode()).
    pub fn from_tzif(data: &[u8]) -> Result<Self> {
        crate::decode(data)
    }

    /// Build a [`Location`] from the template.
    pub fn to_location(&self) -> Result<Location> {
        Location::from_template(self)
    }
}
