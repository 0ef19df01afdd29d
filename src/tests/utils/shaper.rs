// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::HashSet;

use crate::shaper::{Point, RunHandler, RunInfo, ShapeOptions, Shaper};

/// Shaper producing one glyph per character at half an em each, with
/// the glyph id equal to the codepoint. Control characters take no
/// space. Characters outside a face's coverage come out as glyph 0.
#[derive(Default, Debug)]
pub(crate) struct FixedAdvanceShaper {
    /// Unique ids of typefaces covering ASCII only; every other face
    /// covers everything.
    pub(crate) ascii_only: HashSet<u64>,
}

impl Shaper for FixedAdvanceShaper {
    fn shape(&self, text: &str, options: &ShapeOptions<'_>, handler: &mut dyn RunHandler) {
        let size = options.font.size();
        let limited = self
            .ascii_only
            .contains(&options.font.typeface().unique_id());
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut advance = 0.;
        for &(_, codepoint) in &chars {
            advance += advance_of(codepoint, size);
        }
        let info = RunInfo {
            font: options.font,
            bidi_level: options.bidi_level,
            script: options.script,
            language: options.language,
            advance: Point::new(advance, 0.),
            glyph_count: chars.len(),
            utf8_range: 0..text.len(),
        };
        handler.run_info(&info);
        let buffer = handler.buffer();
        let rtl = options.bidi_level & 1 == 1;
        let mut x = buffer.origin.x;
        for slot in 0..chars.len() {
            let (offset, codepoint) = if rtl {
                chars[chars.len() - 1 - slot]
            } else {
                chars[slot]
            };
            buffer.glyphs[slot] = if limited && !codepoint.is_ascii() {
                0
            } else {
                codepoint as u32
            };
            buffer.positions[slot] = Point::new(x, buffer.origin.y);
            buffer.offsets[slot] = Point::ZERO;
            buffer.clusters[slot] = offset as u32;
            x += advance_of(codepoint, size);
        }
        handler.commit_run(&info);
    }
}

/// Half an em per character; controls take no space.
pub(crate) fn advance_of(codepoint: char, size: f32) -> f32 {
    if codepoint.is_control() {
        0.
    } else {
        size * 0.5
    }
}
