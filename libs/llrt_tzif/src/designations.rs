// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Time zone designation buffer.
//!
//! The index into the designation buffer is a single byte, so names are
//! deduplicated. A name that is a suffix of a name already stored points into
//! that name's storage instead of being appended; readers scan from the offset
//! to the next NUL, so the suffix ends where the longer name ends.

use bytes::BufMut;

/// Largest designation buffer addressable by a local time type record.
pub const MAX_CHARCNT: usize = u8::MAX as usize;

#[derive(Debug, Default)]
pub struct Designations {
    charcnt: usize,
    /// Distinct names and where they start.
    names: Vec<(String, usize)>,
    /// Offset of every added name.
    offsets: Vec<usize>,
}

impl Designations {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            charcnt: 0,
            names: Vec::with_capacity(capacity),
            offsets: Vec::with_capacity(capacity),
        }
    }

    /// Add a name, returning its byte offset in the buffer.
    ///
    /// Stored names are checked in insertion order and the first one ending with
    /// `name` is reused.
    pub fn add(&mut self, name: &str) -> usize {
        let offset = self
            .names
            .iter()
            .find(|(stored, _)| stored.ends_with(name))
            .map(|(stored, offset)| offset + stored.len() - name.len());

        let offset = match offset {
            Some(offset) => offset,
            None => {
                let offset = self.charcnt;
                self.names.push((name.to_owned(), offset));
                self.charcnt += name.len() + 1;
                offset
            },
        };
        self.offsets.push(offset);
        offset
    }

    /// Size of the buffer in bytes, terminators included.
    pub fn charcnt(&self) -> usize {
        self.charcnt
    }

    /// Offset of every added name, in the order they were added.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Write the NUL-terminated names, `charcnt` bytes in total.
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        for (name, _) in &self.names {
            buf.put_slice(name.as_bytes());
            buf.put_u8(0);
        }
    }
}
