// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Template to TZif conversion.
//!
//! See <https://datatracker.ietf.org/doc/html/rfc8536>.
//!
//! When version 2+ data is present, readers use it and ignore the version 1
//! block. The version 1 block is therefore a placeholder: one zeroed local time
//! type record and an empty designation, the minimum RFC 8536 allows.
//!
//! Local time type record 0 is the anchor: a copy of the first zone that no
//! transition references. Go's `time` package picks a non-zero record as the
//! first zone when record 0 is referenced by a transition (see
//! `time.Location.lookupFirstZone`), so user zones start at record 1.

use bytes::BufMut;
use tracing::trace;

use crate::designations::{Designations, MAX_CHARCNT};
use crate::error::{Error, Result};
use crate::header::{Counts, Header, Version, HEADER_SIZE, LOCAL_TIME_TYPE_SIZE};
use crate::model::{Template, Zone, MAX_ZONES};

/// Counts of the placeholder version 1 block. `typecnt` and `charcnt` must not be zero.
const V1_COUNTS: Counts = Counts {
    isutcnt: 0,
    isstdcnt: 0,
    leapcnt: 0,
    timecnt: 0,
    typecnt: 1,
    charcnt: 1,
};

/// One local time type record and one NUL.
const V1_BLOCK_SIZE: usize = LOCAL_TIME_TYPE_SIZE + 1;

/// Convert the template to TZif data.
///
/// The output is version 3 data that Go's `time.LoadLocationFromTZData` and
/// other version 2+ readers accept. Readers that only understand version 1
/// will see an empty time zone.
pub fn encode(template: &Template) -> Result<Vec<u8>> {
    validate(template)?;

    let timecnt = template.transitions.len();
    // Transition times are always universal time, so every indicator is 1.
    let isutcnt = timecnt;
    let isstdcnt = timecnt;
    // The first record is the anchor.
    let typecnt = template.zones.len() + 1;

    let anchor = template
        .zones
        .first()
        .cloned()
        .unwrap_or_else(|| Zone::new("", 0, false));

    let mut designations = Designations::with_capacity(typecnt);
    designations.add(&anchor.name);
    for zone in &template.zones {
        designations.add(&zone.name);
    }
    let charcnt = designations.charcnt();
    if charcnt > MAX_CHARCNT {
        return Err(Error::DesignationsTooLong { charcnt });
    }

    let header = Header {
        version: Version::V3,
        counts: Counts {
            isutcnt: isutcnt as u32,
            isstdcnt: isstdcnt as u32,
            leapcnt: 0,
            timecnt: timecnt as u32,
            typecnt: typecnt as u32,
            charcnt: charcnt as u32,
        },
    };

    // No leap second records are written.
    let size = HEADER_SIZE
        + V1_BLOCK_SIZE
        + HEADER_SIZE
        + timecnt * 8
        + timecnt
        + typecnt * LOCAL_TIME_TYPE_SIZE
        + charcnt
        + isstdcnt
        + isutcnt
        + template.extend.len()
        + 2;

    trace!(
        "tzif: encoding {} zones, {} transitions into {} bytes",
        template.zones.len(),
        timecnt,
        size
    );

    let mut data = vec![0u8; size];
    let mut cursor = &mut data[..];

    // Version 1 header and its placeholder data block.
    Header {
        version: Version::V3,
        counts: V1_COUNTS,
    }
    .write_to(&mut cursor);
    cursor.put_bytes(0, V1_BLOCK_SIZE);

    header.write_to(&mut cursor);
    for transition in &template.transitions {
        cursor.put_i64(transition.start.timestamp());
    }
    for transition in &template.transitions {
        cursor.put_u8((transition.zone_index + 1) as u8);
    }
    let offsets = designations.offsets();
    put_local_time_type(&mut cursor, &anchor, offsets[0]);
    for (zone, &offset) in template.zones.iter().zip(&offsets[1..]) {
        put_local_time_type(&mut cursor, zone, offset);
    }
    designations.write_to(&mut cursor);
    cursor.put_bytes(1, isstdcnt + isutcnt);

    // Footer.
    cursor.put_u8(b'\n');
    cursor.put_slice(template.extend.as_bytes());
    cursor.put_u8(b'\n');

    debug_assert!(
        cursor.is_empty(),
        "tzif: {} bytes were not written",
        cursor.len()
    );

    Ok(data)
}

fn validate(template: &Template) -> Result<()> {
    if template.zones.len() > MAX_ZONES {
        return Err(Error::TooManyZones {
            count: template.zones.len(),
        });
    }
    if template.zones.is_empty() && template.extend.is_empty() {
        return Err(Error::MissingZoneInformation);
    }
    if u32::try_from(template.transitions.len()).is_err() {
        return Err(Error::TooManyTransitions {
            count: template.transitions.len(),
        });
    }
    for (index, transition) in template.transitions.iter().enumerate() {
        // Compared as written: whole seconds.
        if index > 0
            && transition.start.timestamp() <= template.transitions[index - 1].start.timestamp()
        {
            return Err(Error::UnorderedTransitions { index });
        }
        if transition.zone_index >= template.zones.len() {
            return Err(Error::ZoneIndexOutOfRange {
                index,
                zone_index: transition.zone_index,
                zones: template.zones.len(),
            });
        }
    }
    Ok(())
}

fn put_local_time_type<B: BufMut>(buf: &mut B, zone: &Zone, designation: usize) {
    buf.put_i32(zone.offset);
    buf.put_u8(zone.is_dst as u8);
    buf.put_u8(designation as u8);
}
