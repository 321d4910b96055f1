// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! TZif encoding and decoding for LLRT.
//!
//! This library turns a logical description of a time zone, a [`Template`], into
//! binary TZif data as specified by [RFC 8536](https://datatracker.ietf.org/doc/html/rfc8536),
//! and parses such data back into a template.
//!
//! # Architecture
//!
//! - **Templates** ([`Template`], [`Zone`], [`Transition`]) - a list of zones, the
//!   instants at which the active zone changes, and an optional TZ string
//!   (`extend`) describing the rule that applies after the last transition.
//!
//! - **Encoding** ([`encode`]) - computes the exact output size up front and fills a
//!   single buffer. Designations are interned with suffix sharing, so `EST` reuses
//!   the bytes of `WEST`. The output is always version 3 with a placeholder
//!   version 1 block.
//!
//! - **Decoding** ([`decode`], [`decode_with`]) - validates the input and undoes the
//!   encoder's conventions, so that encoded templates decode back to themselves.
//!   By default the zone used before the first transition is selected the way Go's
//!   `time.LoadLocationFromTZData` does; see [`Compatibility`].
//!
//! - **Locations** ([`Location`]) - a `chrono::TimeZone` backed by decoded data,
//!   including evaluation of the `extend` rule.
//!
//! # Example
//!
//! ```
//! use chrono::TimeZone;
//! use llrt_tzif::{Template, Zone};
//!
//! let template = Template {
//!     name: "MyFixed".into(),
//!     zones: vec![Zone::new("MyFixed", 2 * 3600 + 23 * 60, false)],
//!     ..Default::default()
//! };
//!
//! let data = llrt_tzif::tzif_data(&template).unwrap();
//! assert_eq!(llrt_tzif::load_tzif_data(&data).unwrap().zones, template.zones);
//!
//! let location = llrt_tzif::new_location(&template).unwrap();
//! let local = location.with_ymd_and_hms(2022, 1, 9, 8, 10, 15).unwrap();
//! assert_eq!(
//!     local.format("%Y-%m-%d %H:%M:%S %z %Z").to_string(),
//!     "2022-01-09 08:10:15 +0223 MyFixed"
//! );
//! ```

mod compat;
mod decode;
mod designations;
mod encode;
mod error;
mod header;
mod location;
mod model;
mod posix;

pub use compat::{Compatibility, DecodeOptions};
pub use decode::{decode, decode_with};
pub use encode::encode;
pub use error::{Error, Result};
pub use location::{Location, LocationOffset};
pub use model::{Template, Transition, Zone, MAX_ZONES};

/// Convert a template to TZif data. Same as [`encode`].
pub fn tzif_data(template: &Template) -> Result<Vec<u8>> {
    encode(template)
}

/// Parse TZif data into a template. Same as [`decode`].
pub fn load_tzif_data(data: &[u8]) -> Result<Template> {
    decode(data)
}

/// Build a [`Location`] from a template, through its TZif encoding.
pub fn new_location(template: &Template) -> Result<Location> {
    Location::from_template(template)
}
