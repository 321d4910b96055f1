// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Errors returned while building or loading TZif data.

use crate::model::MAX_ZONES;

/// Error returned by [`encode`](crate::encode()) and [`decode`](crate::decode()).
///
/// Every variant is a recoverable input error. Decoding never panics on
/// corrupt input; anything structurally wrong is reported as [`Error::InvalidData`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// More than [`MAX_ZONES`] zones were supplied, or a decoded file holds more
    /// zones than can be re-encoded.
    #[error("too many zones ({count}), max is {max}", max = MAX_ZONES)]
    TooManyZones { count: usize },

    /// Neither zones nor an extend rule were supplied.
    #[error("either zones or extend string need to be present")]
    MissingZoneInformation,

    /// The transition count does not fit the 32-bit `timecnt` field.
    #[error("too many transitions ({count}), max is {}", u32::MAX)]
    TooManyTransitions { count: usize },

    /// Transition `index` does not start strictly after transition `index - 1`.
    #[error("transitions must be strictly increasing (transition {index})")]
    UnorderedTransitions { index: usize },

    /// Transition `index` selects a zone that does not exist.
    #[error("transition {index} refers to zone {zone_index}, but only {zones} zones are defined")]
    ZoneIndexOutOfRange {
        index: usize,
        zone_index: usize,
        zones: usize,
    },

    /// The interned designations need more than 255 bytes.
    #[error("time zone designations don't fit into limit, charcnt={charcnt}")]
    DesignationsTooLong { charcnt: usize },

    /// The input is not well-formed TZif data.
    #[error("invalid tzdata")]
    InvalidData,

    /// The version byte is not `0`, `'2'` or `'3'`.
    #[error("unsupported tzdata version {0:#04x}")]
    UnsupportedVersion(u8),

    /// A standard/wall or UT/local indicator is not 1.
    #[error("unsupported isstd/isut indicator values")]
    UnsupportedIndicatorValues,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::TooManyZones { count: 255 }.to_string(),
            "too many zones (255), max is 254"
        );
        assert_eq!(
            Error::UnsupportedVersion(b'4').to_string(),
            "unsupported tzdata version 0x34"
        );
        assert_eq!(
            Error::ZoneIndexOutOfRange {
                index: 1,
                zone_index: 3,
                zones: 2
            }
            .to_string(),
            "transition 1 refers to zone 3, but only 2 zones are defined"
        );
    }
}
