// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! TZif to template conversion.

use bytes::Buf;
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::compat::{promote_first_zone, strip_anchor, DecodeOptions};
use crate::error::{Error, Result};
use crate::header::{Header, Reader, Version, LOCAL_TIME_TYPE_SIZE};
use crate::model::{Template, Transition, Zone, MAX_ZONES};

/// Load TZif data into a template, selecting the first zone the way Go does.
///
/// Output of [`encode`](crate::encode()) decodes back to the template it was
/// built from, apart from the name, which TZif does not store.
pub fn decode(data: &[u8]) -> Result<Template> {
    decode_with(data, &DecodeOptions::default())
}

/// Load TZif data into a template.
///
/// Only universal-time transitions are supported: every standard/wall and UT/local
/// indicator must be 1.
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Template> {
    let mut reader = Reader::new(data);
    let first = Header::read_from(&mut reader)?;
    let mut header = first;

    // The first data block always holds 32-bit times, whatever the version.
    let v1_size = first.counts.data_block_size(Version::V1.time_size());
    if (reader.remaining() as u64) < v1_size {
        debug!("tzif: version 1 data block is truncated");
        return Err(Error::InvalidData);
    }
    if first.version > Version::V1 {
        reader.take_u64(v1_size)?;
        header = Header::read_from(&mut reader)?;
        if header.version != first.version {
            debug!("tzif: version mismatch between headers");
            return Err(Error::InvalidData);
        }
        let size = header.counts.data_block_size(header.version.time_size());
        if (reader.remaining() as u64) < size {
            debug!("tzif: data block is truncated");
            return Err(Error::InvalidData);
        }
    }

    let counts = header.counts;
    let time_size = header.version.time_size();
    trace!(
        "tzif: decoding version {:?} with {} transitions, {} types",
        header.version,
        counts.timecnt,
        counts.typecnt
    );

    let timecnt = counts.timecnt as usize;
    let typecnt = counts.typecnt as usize;
    let mut times = reader.take(timecnt * time_size)?;
    let types = reader.take(timecnt)?;
    let mut records = reader.take(typecnt * LOCAL_TIME_TYPE_SIZE)?;
    let chars = reader.take(counts.charcnt as usize)?;
    // Leap second records are skipped.
    reader.take_u64(u64::from(counts.leapcnt) * (time_size as u64 + 4))?;
    let isstd = reader.take(counts.isstdcnt as usize)?;
    let isut = reader.take(counts.isutcnt as usize)?;

    if isstd.iter().chain(isut).any(|indicator| *indicator != 1) {
        return Err(Error::UnsupportedIndicatorValues);
    }

    let mut transitions = Vec::with_capacity(timecnt);
    let mut zero_is_used = false;
    for &zone_index in types {
        let secs = match header.version {
            Version::V1 => i64::from(times.get_i32()),
            Version::V2 | Version::V3 => times.get_i64(),
        };
        let start = DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
            debug!("tzif: transition time {} is out of range", secs);
            Error::InvalidData
        })?;
        let zone_index = usize::from(zone_index);
        if zone_index >= typecnt {
            debug!("tzif: transition type {} is out of range", zone_index);
            return Err(Error::InvalidData);
        }
        zero_is_used |= zone_index == 0;
        transitions.push(Transition { start, zone_index });
    }

    let mut zones = Vec::with_capacity(typecnt);
    for _ in 0..typecnt {
        let offset = records.get_i32();
        let is_dst = match records.get_u8() {
            0 => false,
            1 => true,
            other => {
                debug!("tzif: invalid isdst value {}", other);
                return Err(Error::InvalidData);
            },
        };
        let name = designation(chars, usize::from(records.get_u8()))?;
        zones.push(Zone {
            name,
            offset,
            is_dst,
        });
    }

    let zero_is_used = promote_first_zone(
        &mut zones,
        &mut transitions,
        zero_is_used,
        options.compatibility,
    );

    let extend = footer(header.version, reader.rest())?;

    strip_anchor(&mut zones, &mut transitions, zero_is_used, &extend);

    if zones.len() > MAX_ZONES {
        // Keep every decoded template re-encodable.
        return Err(Error::TooManyZones { count: zones.len() });
    }

    Ok(Template {
        name: String::new(),
        zones,
        transitions,
        extend,
    })
}

/// Read the NUL-terminated designation starting at `index`.
fn designation(chars: &[u8], index: usize) -> Result<String> {
    let Some(tail) = chars.get(index..).filter(|tail| !tail.is_empty()) else {
        debug!("tzif: designation index {} is out of range", index);
        return Err(Error::InvalidData);
    };
    let name = match tail.iter().position(|b| *b == 0) {
        Some(end) => &tail[..end],
        None => tail,
    };
    String::from_utf8(name.to_vec()).map_err(|_| Error::InvalidData)
}

/// Extract the TZ string from the footer.
fn footer(version: Version, rest: &[u8]) -> Result<String> {
    if version == Version::V1 {
        return Ok(String::new());
    }
    match rest {
        [b'\n', extend @ .., b'\n'] => {
            String::from_utf8(extend.to_vec()).map_err(|_| Error::InvalidData)
        },
        _ => {
            debug!("tzif: footer is not enclosed in newlines");
            Err(Error::InvalidData)
        },
    }
}
