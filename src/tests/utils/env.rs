// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::HashSet;
use std::sync::Arc;

use smallvec::smallvec;

use crate::context::LayoutContext;
use crate::paragraph::Paragraph;
use crate::style::{ParagraphStyle, TextStyle};

use super::font::{TestFontCollection, TestTypeface};
use super::painter::ColorBrush;
use super::shaper::FixedAdvanceShaper;

/// Half an em per glyph at this size gives round numbers: 10 per
/// glyph, line boxes 20 tall with the baseline at 15.
pub(crate) const FONT_SIZE: f32 = 20.;

/// Context with a single face covering everything.
pub(crate) fn test_context() -> LayoutContext {
    let sans = TestTypeface::new("Sans", 1);
    let collection = TestFontCollection::new(vec![sans], None);
    LayoutContext::new(
        Arc::new(FixedAdvanceShaper::default()),
        Arc::new(collection),
    )
}

/// Context whose primary face covers only ASCII, backed by a fallback
/// face covering everything.
pub(crate) fn fallback_context() -> LayoutContext {
    let sans = TestTypeface::ascii_only("Sans", 1);
    let fallback = TestTypeface::new("Fallback", 2);
    let shaper = FixedAdvanceShaper {
        ascii_only: HashSet::from([1]),
    };
    let collection = TestFontCollection::new(vec![sans], Some(fallback));
    LayoutContext::new(Arc::new(shaper), Arc::new(collection))
}

/// Context whose only face covers ASCII, with no fallback at all.
pub(crate) fn no_fallback_context() -> LayoutContext {
    let sans = TestTypeface::ascii_only("Sans", 1);
    let shaper = FixedAdvanceShaper {
        ascii_only: HashSet::from([1]),
    };
    let collection = TestFontCollection::new(vec![sans], None);
    LayoutContext::new(Arc::new(shaper), Arc::new(collection))
}

pub(crate) fn test_text_style() -> TextStyle<ColorBrush> {
    TextStyle {
        font_families: smallvec!["Sans".to_string()],
        font_size: FONT_SIZE,
        ..TextStyle::default()
    }
}

pub(crate) fn test_style() -> ParagraphStyle<ColorBrush> {
    ParagraphStyle {
        text_style: test_text_style(),
        ..ParagraphStyle::default()
    }
}

/// Builds and lays out a single-style paragraph.
pub(crate) fn layout_text(
    context: &LayoutContext,
    text: &str,
    width: f32,
) -> Paragraph<ColorBrush> {
    layout_styled(context, text, test_style(), width)
}

pub(crate) fn layout_styled(
    context: &LayoutContext,
    text: &str,
    style: ParagraphStyle<ColorBrush>,
    width: f32,
) -> Paragraph<ColorBrush> {
    let mut builder = context.builder(style);
    builder.add_text(text);
    let mut paragraph = builder.build();
    paragraph.layout(width);
    paragraph
}

#[track_caller]
pub(crate) fn assert_near(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}
