// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-code-unit analysis that precedes shaping.

use std::sync::Arc;

use crate::style::TextDirection;
use crate::unicode::{BidiRegion, CodeUnitFlags, Unicode};

/// Character level analysis of the paragraph text.
///
/// Flags carry one extra trailing entry so lookups at the end-of-text
/// sentinel offset stay in bounds.
#[derive(Clone, Default, Debug)]
pub(crate) struct TextIndex {
    pub(crate) flags: Vec<CodeUnitFlags>,
    pub(crate) bidi: Vec<BidiRegion>,
    pub(crate) first_whitespace: Option<usize>,
    pub(crate) trailing_whitespace: usize,
    pub(crate) has_hard_breaks: bool,
}

impl TextIndex {
    pub(crate) fn has_flag(&self, offset: usize, flag: CodeUnitFlags) -> bool {
        self.flags[offset].contains(flag)
    }
}

/// Computes code unit flags, whitespace markers and bidi regions.
pub(crate) fn index_text(
    unicode: &Arc<dyn Unicode>,
    text: &str,
    direction: TextDirection,
) -> TextIndex {
    let base_level = match direction {
        TextDirection::Ltr => 0,
        TextDirection::Rtl => 1,
    };
    let flags = unicode.codeunit_flags(text);
    debug_assert_eq!(flags.len(), text.len() + 1);

    let mut first_whitespace = None;
    let mut trailing_whitespace = text.len();
    for (i, flag) in flags.iter().enumerate().take(text.len()) {
        if flag.contains(CodeUnitFlags::WHITESPACE_BREAK) {
            if first_whitespace.is_none() {
                first_whitespace = Some(i);
            }
            if trailing_whitespace == text.len() {
                trailing_whitespace = i;
            }
        } else {
            trailing_whitespace = text.len();
        }
    }
    // Hard break flags land on the code unit after each newline, so a
    // trailing newline marks the sentinel slot.
    let has_hard_breaks = flags
        .iter()
        .any(|f| f.contains(CodeUnitFlags::HARD_BREAK_BEFORE));

    let bidi = bidi_regions_or_fallback(unicode, text, base_level);

    TextIndex {
        flags,
        bidi,
        first_whitespace,
        trailing_whitespace,
        has_hard_breaks,
    }
}

fn bidi_regions_or_fallback(
    unicode: &Arc<dyn Unicode>,
    text: &str,
    base_level: u8,
) -> Vec<BidiRegion> {
    if text.is_empty() {
        return Vec::new();
    }
    let regions = unicode.bidi_regions(text, base_level);
    let valid = !regions.is_empty()
        && regions[0].start == 0
        && regions.last().map(|r| r.end) == Some(text.len())
        && regions.windows(2).all(|w| w[0].end == w[1].start);
    if valid {
        regions
    } else {
        log::warn!("bidi analysis failed; treating text as a single region");
        vec![BidiRegion {
            start: 0,
            end: text.len(),
            level: base_level,
        }]
    }
}
