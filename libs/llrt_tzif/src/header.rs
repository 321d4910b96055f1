// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! TZif header layout, shared by the encoder and decoder.
//!
//! See <https://datatracker.ietf.org/doc/html/rfc8536#section-3.1>.

use bytes::{Buf, BufMut};
use tracing::debug;

use crate::error::{Error, Result};

pub const MAGIC: &[u8; 4] = b"TZif";

/// magic + version + unused + 6x count
pub const HEADER_SIZE: usize = 4 + 1 + 15 + 6 * 4;

/// Size of a local time type record: utoff (4), is_dst (1), desigidx (1).
pub const LOCAL_TIME_TYPE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Version::V1),
            b'2' => Ok(Version::V2),
            b'3' => Ok(Version::V3),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Version::V1 => 0,
            Version::V2 => b'2',
            Version::V3 => b'3',
        }
    }

    /// Width of transition times and leap second occurrences in the data block
    /// that follows a header of this version.
    pub fn time_size(self) -> usize {
        match self {
            Version::V1 => 4,
            Version::V2 | Version::V3 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub isutcnt: u32,
    pub isstdcnt: u32,
    pub leapcnt: u32,
    pub timecnt: u32,
    pub typecnt: u32,
    pub charcnt: u32,
}

impl Counts {
    /// Size of the data block described by these counts.
    ///
    /// Computed in `u64` so no combination of 32-bit counts can overflow.
    pub fn data_block_size(&self, time_size: usize) -> u64 {
        let time_size = time_size as u64;
        u64::from(self.timecnt) * (time_size + 1)
            + u64::from(self.typecnt) * LOCAL_TIME_TYPE_SIZE as u64
            + u64::from(self.charcnt)
            + u64::from(self.leapcnt) * (time_size + 4)
            + u64::from(self.isstdcnt)
            + u64::from(self.isutcnt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: Version,
    pub counts: Counts,
}

impl Header {
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(MAGIC);
        buf.put_u8(self.version.as_byte());
        buf.put_bytes(0, 15);
        buf.put_u32(self.counts.isutcnt);
        buf.put_u32(self.counts.isstdcnt);
        buf.put_u32(self.counts.leapcnt);
        buf.put_u32(self.counts.timecnt);
        buf.put_u32(self.counts.typecnt);
        buf.put_u32(self.counts.charcnt);
    }

    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self> {
        let mut header = reader.take(HEADER_SIZE)?;
        if &header[..4] != MAGIC {
            debug!("tzif: bad magic");
            return Err(Error::InvalidData);
        }
        let version = Version::from_byte(header[4])?;
        header.advance(20);
        Ok(Header {
            version,
            counts: Counts {
                isutcnt: header.get_u32(),
                isstdcnt: header.get_u32(),
                leapcnt: header.get_u32(),
                timecnt: header.get_u32(),
                typecnt: header.get_u32(),
                charcnt: header.get_u32(),
            },
        })
    }
}

/// Bounds-checked cursor over TZif input.
///
/// Every read goes through [`Reader::take`], so the `bytes::Buf` getters used on
/// the returned slices never run past their end.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.data.len() < len {
            debug!(
                "tzif: truncated data, need {} bytes, have {}",
                len,
                self.data.len()
            );
            return Err(Error::InvalidData);
        }
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        Ok(head)
    }

    /// Like [`Reader::take`], for sizes computed from untrusted 64-bit arithmetic.
    pub fn take_u64(&mut self, len: u64) -> Result<&'a [u8]> {
        let len = usize::try_from(len).map_err(|_| Error::InvalidData)?;
        self.take(len)
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn rest(self) -> &'a [u8] {
        self.data
    }
}
