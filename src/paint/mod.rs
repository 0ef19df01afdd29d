// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting: glyph blob assembly and the painter abstraction.

mod decoration;

use peniko::kurbo::{BezPath, Rect};

use crate::font::Font;
use crate::layout::Line;
use crate::paragraph::Paragraph;
use crate::shaper::Point;
use crate::style::{Brush, TextShadow};

/// Sink for the draw calls a paragraph produces.
///
/// Implementations rasterize however they like; the paragraph hands
/// them positioned glyphs, rectangles and stroked paths, all in
/// paragraph coordinates after the initial translation.
pub trait Painter<B: Brush> {
    /// Draws a run of positioned glyphs.
    fn draw_glyphs(&mut self, blob: &GlyphBlob, brush: &B);
    /// Draws a blurred, offset copy of the glyphs under the text.
    fn draw_shadow(&mut self, blob: &GlyphBlob, shadow: &TextShadow<B>);
    /// Fills a rectangle.
    fn draw_rect(&mut self, rect: &Rect, brush: &B);
    /// Fills a decoration bar.
    fn draw_filled_rect(&mut self, rect: &Rect, brush: &B);
    /// Strokes a straight line of the given thickness.
    fn draw_line(&mut self, from: Point, to: Point, thickness: f32, brush: &B);
    /// Strokes a path of the given thickness.
    fn draw_path(&mut self, path: &BezPath, thickness: f32, brush: &B);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Restricts subsequent draws to `rect` until the matching restore.
    fn clip_rect(&mut self, rect: &Rect);
}

/// Glyphs sharing one font and style block, positioned relative to the
/// paragraph origin.
#[derive(Clone, Debug)]
pub struct GlyphBlob {
    pub font: Font,
    pub(crate) block_index: usize,
    pub glyphs: Vec<u32>,
    pub positions: Vec<Point>,
}

pub(crate) fn paint<B: Brush>(
    paragraph: &mut Paragraph<B>,
    painter: &mut dyn Painter<B>,
    x: f32,
    y: f32,
) {
    build_blobs(paragraph);
    painter.save();
    painter.translate(x, y);
    for index in 0..paragraph.lines.len() {
        paint_backgrounds(paragraph, painter, index);
        paint_shadows(paragraph, painter, index);
        for blob in &paragraph.blobs[index] {
            let style = &paragraph.blocks[blob.block_index].style;
            painter.draw_glyphs(blob, &style.foreground);
        }
        decoration::paint_decorations(paragraph, painter, index);
    }
    painter.restore();
}

/// Groups each line's visual runs into blobs, merging neighbours that
/// share a font and style block. The cache survives repaints and is
/// dropped whenever the layout changes.
fn build_blobs<B: Brush>(paragraph: &mut Paragraph<B>) {
    if paragraph.blobs.len() == paragraph.lines.len() {
        return;
    }
    let mut blobs = Vec::with_capacity(paragraph.lines.len());
    for index in 0..paragraph.lines.len() {
        let mut line_blobs: Vec<GlyphBlob> = Vec::new();
        let line = Line::new(&*paragraph, index);
        for span in line.glyph_runs() {
            let run = span.run();
            let Some(font) = run.font() else {
                continue;
            };
            let block_index = run.data().block_index;
            let mergeable = line_blobs
                .last()
                .is_some_and(|blob| blob.font == *font && blob.block_index == block_index);
            if !mergeable {
                line_blobs.push(GlyphBlob {
                    font: font.clone(),
                    block_index,
                    glyphs: Vec::new(),
                    positions: Vec::new(),
                });
            }
            if let Some(blob) = line_blobs.last_mut() {
                for glyph in span.positioned_glyphs() {
                    blob.glyphs.push(glyph.id);
                    blob.positions.push(Point::new(glyph.x, glyph.y));
                }
            }
        }
        blobs.push(line_blobs);
    }
    paragraph.blobs = blobs;
}

fn paint_backgrounds<B: Brush>(
    paragraph: &Paragraph<B>,
    painter: &mut dyn Painter<B>,
    index: usize,
) {
    if !paragraph.lines[index].has_backgrounds {
        return;
    }
    let line = Line::new(paragraph, index);
    for span in line.glyph_runs() {
        let run = span.run();
        let Some(background) = &run.style().background else {
            continue;
        };
        let baseline = span.baseline();
        let rect = Rect::new(
            f64::from(span.offset()),
            f64::from(baseline - run.ascent()),
            f64::from(span.offset() + span.advance()),
            f64::from(baseline + run.descent()),
        );
        painter.draw_rect(&rect, background);
    }
}

fn paint_shadows<B: Brush>(paragraph: &Paragraph<B>, painter: &mut dyn Painter<B>, index: usize) {
    if !paragraph.lines[index].has_shadows {
        return;
    }
    for blob in &paragraph.blobs[index] {
        let style = &paragraph.blocks[blob.block_index].style;
        for shadow in &style.shadows {
            painter.draw_shadow(blob, shadow);
        }
    }
}
