// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Compatibility rules applied while decoding.
//!
//! RFC 8536 says local time type 0 applies before the first transition. Go's
//! `time` package does not follow that exactly: when type 0 is referenced by a
//! transition it picks the first zone with a heuristic (`lookupFirstZone`).
//! [`Compatibility::GoLoader`] reproduces that choice and moves the selected zone
//! to index 0, so that `zones[0]` of the decoded template is what Go uses.
//!
//! Independently of that, the encoder always writes an anchor zone at record 0.
//! [`strip_anchor`] removes it again when decoding our own output.

use tracing::debug;

use crate::model::{Transition, Zone};

/// How to determine the zone in effect before the first transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Compatibility {
    /// Select the first zone the way Go's `time.LoadLocationFromTZData` does.
    #[default]
    GoLoader,
    /// Local time type 0 is the first zone, per RFC 8536.
    Rfc8536,
}

/// Options for [`decode_with`](crate::decode_with).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
    pub compatibility: Compatibility,
}

impl DecodeOptions {
    pub fn new(compatibility: Compatibility) -> Self {
        Self { compatibility }
    }
}

/// Index of the zone Go uses before the first transition.
///
/// Transition zone indexes must already be validated against `zones`.
pub(crate) fn first_zone(zones: &[Zone], transitions: &[Transition], zero_is_used: bool) -> usize {
    if !zero_is_used {
        return 0;
    }
    if let Some(first) = transitions.first() {
        if zones[first.zone_index].is_dst {
            if let Some(index) = zones[..first.zone_index].iter().rposition(|z| !z.is_dst) {
                return index;
            }
        }
    }
    zones.iter().position(|z| !z.is_dst).unwrap_or(0)
}

/// Move the first zone to index 0, remapping transitions.
///
/// Returns whether zone 0 is referenced by a transition afterwards.
pub(crate) fn promote_first_zone(
    zones: &mut [Zone],
    transitions: &mut [Transition],
    zero_is_used: bool,
    compatibility: Compatibility,
) -> bool {
    let fz = match compatibility {
        Compatibility::GoLoader => first_zone(zones, transitions, zero_is_used),
        Compatibility::Rfc8536 => 0,
    };
    if fz == 0 {
        return zero_is_used;
    }

    debug!(
        "tzif: zone {} ({:?}) is used before the first transition, swapping with zone 0",
        fz, zones[fz].name
    );
    zones.swap(0, fz);
    let mut zero_is_used = false;
    for transition in transitions.iter_mut() {
        if transition.zone_index == 0 {
            transition.zone_index = fz;
        } else if transition.zone_index == fz {
            transition.zone_index = 0;
            zero_is_used = true;
        }
    }
    zero_is_used
}

/// Remove the anchor zone written by the encoder, if `zones[0]` looks like one.
///
/// The anchor is recognised when no transition uses it and it duplicates the zone
/// after it, or when there are no transitions and the extend rule is what applies.
pub(crate) fn strip_anchor(
    zones: &mut Vec<Zone>,
    transitions: &mut [Transition],
    zero_is_used: bool,
    extend: &str,
) {
    if zones.is_empty() {
        return;
    }
    let duplicated = !zero_is_used && zones.len() >= 2 && zones[0] == zones[1];
    let extend_only = transitions.is_empty() && !extend.is_empty();
    if !(duplicated || extend_only) {
        return;
    }

    debug!("tzif: dropping anchor zone {:?}", zones[0].name);
    zones.remove(0);
    for transition in transitions.iter_mut() {
        transition.zone_index -= 1;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn standard(name: &str) -> Zone {
        Zone::new(name, 3600, false)
    }

    fn daylight(name: &str) -> Zone {
        Zone::new(name, 7200, true)
    }

    fn transitions(indexes: &[usize]) -> Vec<Transition> {
        indexes
            .iter()
            .enumerate()
            .map(|(i, zone_index)| {
                Transition::new(
                    Utc.timestamp_opt(1_000_000 * i as i64, 0).unwrap(),
                    *zone_index,
                )
            })
            .collect()
    }

    #[test]
    fn test_first_zone_unused_zero() {
        let zones = [daylight("A"), standard("B")];
        assert_eq!(first_zone(&zones, &transitions(&[1]), false), 0);
    }

    #[test]
    fn test_first_zone_searches_backwards_from_dst() {
        let zones = [standard("A"), standard("B"), daylight("C"), standard("D")];
        assert_eq!(first_zone(&zones, &transitions(&[2, 0]), true), 1);
    }

    #[test]
    fn test_first_zone_falls_back_to_first_standard() {
        // no standard zone before the DST zone
        let zones = [daylight("A"), daylight("B"), standard("C")];
        assert_eq!(first_zone(&zones, &transitions(&[1, 0]), true), 2);

        // first transition is to a standard zone
        let zones = [daylight("A"), standard("B"), standard("C")];
        assert_eq!(first_zone(&zones, &transitions(&[2, 0]), true), 1);
    }

    #[test]
    fn test_first_zone_all_dst() {
        let zones = [daylight("A"), daylight("B")];
        assert_eq!(first_zone(&zones, &transitions(&[1, 0]), true), 0);
    }

    #[test]
    fn test_promote_first_zone() {
        let mut zones = vec![daylight("A"), daylight("B"), standard("C")];
        let mut changes = transitions(&[1, 0, 2]);
        let zero_is_used =
            promote_first_zone(&mut zones, &mut changes, true, Compatibility::GoLoader);

        assert_eq!(zones, [standard("C"), daylight("B"), daylight("A")]);
        let indexes: Vec<_> = changes.iter().map(|t| t.zone_index).collect();
        assert_eq!(indexes, [1, 2, 0]);
        assert!(zero_is_used);
    }

    #[test]
    fn test_promote_first_zone_rfc() {
        let mut zones = vec![daylight("A"), standard("B")];
        let mut changes = transitions(&[0, 1]);
        let zero_is_used =
            promote_first_zone(&mut zones, &mut changes, true, Compatibility::Rfc8536);

        assert_eq!(zones, [daylight("A"), standard("B")]);
        assert!(zero_is_used);
    }

    #[test]
    fn test_strip_anchor_duplicate() {
        let mut zones = vec![standard("A"), standard("A"), daylight("B")];
        let mut changes = transitions(&[2, 1]);
        strip_anchor(&mut zones, &mut changes, false, "");
        assert_eq!(zones, [standard("A"), daylight("B")]);
        assert_eq!(changes[0].zone_index, 1);
        assert_eq!(changes[1].zone_index, 0);
    }

    #[test]
    fn test_strip_anchor_keeps_used_zero() {
        let mut zones = vec![standard("A"), standard("A")];
        let mut changes = transitions(&[0, 1]);
        strip_anchor(&mut zones, &mut changes, true, "");
        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn test_strip_anchor_keeps_distinct() {
        let mut zones = vec![standard("A"), standard("B")];
        let mut changes = transitions(&[1]);
        strip_anchor(&mut zones, &mut changes, false, "");
        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn test_strip_anchor_extend_only() {
        let mut zones = vec![Zone::new("", 0, false)];
        strip_anchor(&mut zones, &mut [], false, "UTC0");
        assert!(zones.is_empty());

        let mut zones = Vec::new();
        strip_anchor(&mut zones, &mut [], false, "UTC0");
        assert!(zones.is_empty());
    }
}
