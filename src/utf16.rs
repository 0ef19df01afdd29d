// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion between UTF-8 byte offsets and UTF-16 code unit offsets.
//!
//! Layout works in UTF-8 internally while the query surface speaks
//! UTF-16. The map is built once per paragraph, on first use.

/// Bidirectional offset map for one text.
///
/// Offsets inside a code point map to the offset of the code point
/// itself, so surrogate halves and continuation bytes never produce
/// positions the text does not have.
#[derive(Clone, Default, Debug)]
pub(crate) struct Utf16Map {
    /// UTF-16 offset for every UTF-8 offset, one trailing entry.
    to_utf16: Vec<u32>,
    /// UTF-8 offset for every UTF-16 offset, one trailing entry.
    to_utf8: Vec<u32>,
}

impl Utf16Map {
    pub(crate) fn new(text: &str) -> Self {
        let mut to_utf16 = Vec::with_capacity(text.len() + 1);
        let mut to_utf8 = Vec::with_capacity(text.len() + 1);
        let mut offset8 = 0_u32;
        let mut offset16 = 0_u32;
        for ch in text.chars() {
            for _ in 0..ch.len_utf8() {
                to_utf16.push(offset16);
            }
            for _ in 0..ch.len_utf16() {
                to_utf8.push(offset8);
            }
            offset8 += ch.len_utf8() as u32;
            offset16 += ch.len_utf16() as u32;
        }
        to_utf16.push(offset16);
        to_utf8.push(offset8);
        Self { to_utf16, to_utf8 }
    }

    /// Length of the text in UTF-16 code units.
    pub(crate) fn len16(&self) -> usize {
        self.to_utf8.len() - 1
    }

    /// Converts a UTF-8 offset to UTF-16, clamping to the text end.
    pub(crate) fn utf16(&self, offset: usize) -> usize {
        let offset = offset.min(self.to_utf16.len() - 1);
        self.to_utf16[offset] as usize
    }

    /// Converts a UTF-16 offset to UTF-8, clamping to the text end.
    pub(crate) fn utf8(&self, offset: usize) -> usize {
        let offset = offset.min(self.to_utf8.len() - 1);
        self.to_utf8[offset] as usize
    }
}
