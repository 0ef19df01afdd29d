// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text analysis abstraction and its default implementation.
//!
//! Layout consumes Unicode data through the [`Unicode`] trait so embedders
//! with their own tables (or an ICU binding) can supply them.
//! [`DefaultUnicode`] covers the common case with the `unicode-*` crates.

use core::fmt;

use unicode_bidi::{BidiInfo, Level};
use unicode_linebreak::BreakOpportunity;
use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

/// Properties of a single UTF-8 code unit.
///
/// Multi byte characters carry their character's properties on every code
/// unit; the break flags are positional and only ever appear on the first.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct CodeUnitFlags(u16);

impl CodeUnitFlags {
    /// No properties.
    pub const NONE: Self = Self(0);
    /// First code unit of an extended grapheme cluster.
    pub const GRAPHEME_START: Self = Self(1 << 0);
    /// A line may break before this code unit.
    pub const SOFT_BREAK_BEFORE: Self = Self(1 << 1);
    /// A line must break before this code unit.
    pub const HARD_BREAK_BEFORE: Self = Self(1 << 2);
    /// Whitespace that lines may be broken and trimmed at.
    pub const WHITESPACE_BREAK: Self = Self(1 << 3);
    /// A control character.
    pub const CONTROL: Self = Self(1 << 4);
    /// An ideograph.
    pub const IDEOGRAPHIC: Self = Self(1 << 5);
    /// Whitespace that binds its word: no break and no trimming at it.
    pub const INTRA_WORD_WHITESPACE: Self = Self(1 << 6);

    /// Returns `true` if every flag in `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets every flag in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl core::ops::BitOr for CodeUnitFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for CodeUnitFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodeUnitFlags({:#09b})", self.0)
    }
}

/// Maximal substring with a single bidi embedding level.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BidiRegion {
    /// Start byte of the region.
    pub start: usize,
    /// End byte of the region.
    pub end: usize,
    /// Embedding level; odd levels are right-to-left.
    pub level: u8,
}

/// Unicode analysis oracle.
pub trait Unicode: fmt::Debug {
    /// Computes the property flags of every code unit of `text`.
    ///
    /// The result has `text.len() + 1` entries; the final entry describes
    /// the end-of-text position and may carry break flags.
    fn codeunit_flags(&self, text: &str) -> Vec<CodeUnitFlags>;

    /// Returns the closest grapheme boundary at or before `offset`.
    fn prev_grapheme_boundary(&self, text: &str, offset: usize) -> usize;

    /// Returns `true` for characters that can start an emoji sequence.
    fn is_emoji(&self, c: char) -> bool;

    /// Returns `true` for characters that extend an emoji sequence.
    fn is_emoji_component(&self, c: char) -> bool;

    /// Returns `true` for regional indicator symbols.
    fn is_regional_indicator(&self, c: char) -> bool;

    /// Splits `text` into maximal single level bidi regions.
    ///
    /// `base_level` is the paragraph embedding level: 0 for left-to-right,
    /// 1 for right-to-left. Empty text yields no regions.
    fn bidi_regions(&self, text: &str, base_level: u8) -> Vec<BidiRegion>;
}

/// [`Unicode`] implementation backed by the `unicode-*` crates.
#[derive(Copy, Clone, Default, Debug)]
pub struct DefaultUnicode;

impl Unicode for DefaultUnicode {
    fn codeunit_flags(&self, text: &str) -> Vec<CodeUnitFlags> {
        let mut flags = vec![CodeUnitFlags::NONE; text.len() + 1];

        for (start, c) in text.char_indices() {
            let mut f = CodeUnitFlags::NONE;
            if c.is_whitespace() {
                // No-break spaces neither break nor trim.
                if matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}') {
                    f.insert(CodeUnitFlags::INTRA_WORD_WHITESPACE);
                } else {
                    f.insert(CodeUnitFlags::WHITESPACE_BREAK);
                }
            }
            if c.is_control() {
                f.insert(CodeUnitFlags::CONTROL);
            }
            if is_ideographic(c) {
                f.insert(CodeUnitFlags::IDEOGRAPHIC);
            }
            if f != CodeUnitFlags::NONE {
                for unit in &mut flags[start..start + c.len_utf8()] {
                    unit.insert(f);
                }
            }
        }

        for (start, _) in text.grapheme_indices(true) {
            flags[start].insert(CodeUnitFlags::GRAPHEME_START);
        }
        flags[text.len()].insert(CodeUnitFlags::GRAPHEME_START);

        for (pos, opportunity) in unicode_linebreak::linebreaks(text) {
            // The end-of-text opportunity is reported as mandatory for any
            // input; keep it hard only after an actual break character.
            let hard = opportunity == BreakOpportunity::Mandatory
                && (pos < text.len() || text.ends_with(is_mandatory_break_char));
            flags[pos].insert(if hard {
                CodeUnitFlags::HARD_BREAK_BEFORE
            } else {
                CodeUnitFlags::SOFT_BREAK_BEFORE
            });
        }

        flags
    }

    fn prev_grapheme_boundary(&self, text: &str, offset: usize) -> usize {
        let mut offset = offset.min(text.len());
        while offset > 0 && !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let mut cursor = GraphemeCursor::new(offset, text.len(), true);
        match cursor.is_boundary(text, 0) {
            Ok(true) => offset,
            _ => cursor.prev_boundary(text, 0).ok().flatten().unwrap_or(0),
        }
    }

    fn is_emoji(&self, c: char) -> bool {
        matches!(
            c as u32,
            0x1F1E6..=0x1F1FF
                | 0x1F300..=0x1F5FF
                | 0x1F600..=0x1F64F
                | 0x1F680..=0x1F6FF
                | 0x1F900..=0x1F9FF
                | 0x1FA70..=0x1FAFF
                | 0x2600..=0x26FF
                | 0x2700..=0x27BF
        )
    }

    fn is_emoji_component(&self, c: char) -> bool {
        matches!(
            c as u32,
            0x200D // zero width joiner
                | 0xFE0E
                | 0xFE0F // variation selectors
                | 0x20E3 // combining enclosing keycap
                | 0x1F3FB..=0x1F3FF // skin tone modifiers
                | 0x1F1E6..=0x1F1FF // regional indicators
                | 0xE0020..=0xE007F // tag characters
        )
    }

    fn is_regional_indicator(&self, c: char) -> bool {
        matches!(c as u32, 0x1F1E6..=0x1F1FF)
    }

    fn bidi_regions(&self, text: &str, base_level: u8) -> Vec<BidiRegion> {
        if text.is_empty() {
            return Vec::new();
        }
        let base = Level::new(base_level).unwrap_or_else(|_| Level::ltr());
        let info = BidiInfo::new(text, Some(base));
        let mut regions: Vec<BidiRegion> = Vec::new();
        for (start, level) in info.levels.iter().enumerate() {
            let number = level.number();
            match regions.last_mut() {
                Some(last) if last.level == number => last.end = start + 1,
                _ => regions.push(BidiRegion {
                    start,
                    end: start + 1,
                    level: number,
                }),
            }
        }
        regions
    }
}

fn is_mandatory_break_char(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_ideographic(c: char) -> bool {
    matches!(
        c as u32,
        0x3006..=0x3007
            | 0x3021..=0x3029
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x20000..=0x2EBEF
            | 0x30000..=0x3134F
    )
}
