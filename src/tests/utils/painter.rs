// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::{BezPath, Rect};

use crate::paint::{GlyphBlob, Painter};
use crate::shaper::Point;
use crate::style::TextShadow;

/// Plain color brush for tests.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct ColorBrush(pub(crate) u32);

pub(crate) const RED: ColorBrush = ColorBrush(0xff_00_00_ff);
pub(crate) const BLUE: ColorBrush = ColorBrush(0x00_00_ff_ff);

/// One draw call captured by [`RecordingPainter`].
#[derive(Clone, Debug)]
pub(crate) enum PaintOp {
    Glyphs {
        font_size: f32,
        glyphs: Vec<u32>,
        positions: Vec<Point>,
        brush: ColorBrush,
    },
    Shadow {
        glyphs: Vec<u32>,
        offset: Point,
        brush: ColorBrush,
    },
    Rect {
        rect: Rect,
        brush: ColorBrush,
    },
    FilledRect {
        rect: Rect,
        brush: ColorBrush,
    },
    Line {
        from: Point,
        to: Point,
        thickness: f32,
        brush: ColorBrush,
    },
    Path {
        elements: usize,
        thickness: f32,
        brush: ColorBrush,
    },
    Save,
    Restore,
    Translate(f32, f32),
    ClipRect(Rect),
}

/// Painter recording its draw calls for assertions.
#[derive(Default, Debug)]
pub(crate) struct RecordingPainter {
    pub(crate) ops: Vec<PaintOp>,
}

impl RecordingPainter {
    pub(crate) fn glyph_ops(&self) -> Vec<&PaintOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Glyphs { .. }))
            .collect()
    }
}

impl Painter<ColorBrush> for RecordingPainter {
    fn draw_glyphs(&mut self, blob: &GlyphBlob, brush: &ColorBrush) {
        self.ops.push(PaintOp::Glyphs {
            font_size: blob.font.size(),
            glyphs: blob.glyphs.clone(),
            positions: blob.positions.clone(),
            brush: *brush,
        });
    }

    fn draw_shadow(&mut self, blob: &GlyphBlob, shadow: &TextShadow<ColorBrush>) {
        self.ops.push(PaintOp::Shadow {
            glyphs: blob.glyphs.clone(),
            offset: shadow.offset,
            brush: shadow.brush,
        });
    }

    fn draw_rect(&mut self, rect: &Rect, brush: &ColorBrush) {
        self.ops.push(PaintOp::Rect {
            rect: *rect,
            brush: *brush,
        });
    }

    fn draw_filled_rect(&mut self, rect: &Rect, brush: &ColorBrush) {
        self.ops.push(PaintOp::FilledRect {
            rect: *rect,
            brush: *brush,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, thickness: f32, brush: &ColorBrush) {
        self.ops.push(PaintOp::Line {
            from,
            to,
            thickness,
            brush: *brush,
        });
    }

    fn draw_path(&mut self, path: &BezPath, thickness: f32, brush: &ColorBrush) {
        self.ops.push(PaintOp::Path {
            elements: path.elements().len(),
            thickness,
            brush: *brush,
        });
    }

    fn save(&mut self) {
        self.ops.push(PaintOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(PaintOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(PaintOp::Translate(dx, dy));
    }

    fn clip_rect(&mut self, rect: &Rect) {
        self.ops.push(PaintOp::ClipRect(*rect));
    }
}
