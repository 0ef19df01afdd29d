// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;
mod font;
mod painter;
mod shaper;

pub(crate) use env::{
    assert_near, fallback_context, layout_styled, layout_text, no_fallback_context, test_context,
    test_style, test_text_style, FONT_SIZE,
};
pub(crate) use font::{TestFontCollection, TestTypeface};
pub(crate) use painter::{ColorBrush, PaintOp, RecordingPainter, BLUE, RED};
pub(crate) use shaper::{advance_of, FixedAdvanceShaper};
