// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Underline, overline and strike-through geometry in the five stroke
//! styles.

use peniko::kurbo::{BezPath, Rect};

use crate::layout::Line;
use crate::paragraph::Paragraph;
use crate::shaper::Point;
use crate::style::{Brush, DecorationLines, DecorationStyle};

use super::Painter;

pub(crate) fn paint_decorations<B: Brush>(
    paragraph: &Paragraph<B>,
    painter: &mut dyn Painter<B>,
    index: usize,
) {
    if !paragraph.lines[index].has_decorations {
        return;
    }
    let line = Line::new(paragraph, index);
    for span in line.glyph_runs() {
        let run = span.run();
        let style = run.style();
        let decoration = &style.decoration;
        if decoration.lines.is_empty() {
            continue;
        }
        let brush = decoration
            .brush
            .clone()
            .unwrap_or_else(|| style.foreground.clone());
        let metrics = run.font_metrics();
        let baseline = span.baseline();
        let left = span.offset();
        let right = left + span.advance();
        if decoration.lines.contains(DecorationLines::UNDERLINE) {
            let thickness = metrics.underline_size * decoration.thickness;
            let y = baseline + metrics.underline_offset;
            draw(painter, decoration.style, left, right, y, thickness, &brush);
        }
        if decoration.lines.contains(DecorationLines::OVERLINE) {
            let thickness = metrics.underline_size * decoration.thickness;
            let y = baseline - run.ascent() + thickness * 0.5;
            draw(painter, decoration.style, left, right, y, thickness, &brush);
        }
        if decoration.lines.contains(DecorationLines::LINE_THROUGH) {
            let thickness = metrics.strikethrough_size * decoration.thickness;
            let y = baseline + metrics.strikethrough_offset;
            draw(painter, decoration.style, left, right, y, thickness, &brush);
        }
    }
}

fn draw<B: Brush>(
    painter: &mut dyn Painter<B>,
    style: DecorationStyle,
    left: f32,
    right: f32,
    y: f32,
    thickness: f32,
    brush: &B,
) {
    match style {
        DecorationStyle::Solid => {
            let half = thickness * 0.5;
            let bar = Rect::new(
                f64::from(left),
                f64::from(y - half),
                f64::from(right),
                f64::from(y + half),
            );
            painter.draw_filled_rect(&bar, brush);
        }
        DecorationStyle::Double => {
            painter.draw_line(Point::new(left, y), Point::new(right, y), thickness, brush);
            let lower = y + thickness * 2.;
            painter.draw_line(
                Point::new(left, lower),
                Point::new(right, lower),
                thickness,
                brush,
            );
        }
        DecorationStyle::Dotted => {
            let path = dashed(left, right, y, thickness, thickness * 2.);
            painter.draw_path(&path, thickness, brush);
        }
        DecorationStyle::Dashed => {
            let path = dashed(left, right, y, thickness * 4., thickness * 2.);
            painter.draw_path(&path, thickness, brush);
        }
        DecorationStyle::Wavy => {
            let path = wavy(left, right, y, thickness);
            // The last half-wave may overshoot the span.
            let reach = thickness.max(0.5) * 2. + thickness;
            let clip = Rect::new(
                f64::from(left),
                f64::from(y - reach),
                f64::from(right),
                f64::from(y + reach),
            );
            painter.save();
            painter.clip_rect(&clip);
            painter.draw_path(&path, thickness, brush);
            painter.restore();
        }
    }
}

/// Repeated on/off segments along the decoration's baseline.
fn dashed(left: f32, right: f32, y: f32, on: f32, off: f32) -> BezPath {
    let mut path = BezPath::new();
    if on <= 0. {
        return path;
    }
    let mut x = left;
    while x < right {
        let end = (x + on).min(right);
        path.move_to((f64::from(x), f64::from(y)));
        path.line_to((f64::from(end), f64::from(y)));
        x = end + off;
    }
    path
}

/// Quadratic half-waves with an amplitude of twice the stroke
/// thickness, continuing until the span's right edge is covered.
fn wavy(left: f32, right: f32, y: f32, thickness: f32) -> BezPath {
    let mut path = BezPath::new();
    let quarter = f64::from(thickness.max(0.5)) * 2.;
    let amplitude = quarter;
    let y = f64::from(y);
    let right = f64::from(right);
    let mut x = f64::from(left);
    path.move_to((x, y));
    let mut up = true;
    while x < right {
        let control = if up { y - amplitude } else { y + amplitude };
        path.quad_to((x + quarter, control), (x + quarter * 2., y));
        x += quarter * 2.;
        up = !up;
    }
    path
}
