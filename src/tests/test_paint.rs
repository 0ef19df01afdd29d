// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting: draw call order, brushes, decorations and blob reuse.

use super::utils::{
    assert_near, layout_styled, layout_text, test_context, test_style, test_text_style,
    ColorBrush, PaintOp, RecordingPainter, BLUE, RED,
};
use crate::shaper::Point;
use crate::style::{Decoration, DecorationLines, DecorationStyle, PlaceholderStyle, TextShadow};
use crate::{Paragraph, ParagraphStyle, TextStyle};

fn painted(paragraph: &mut Paragraph<ColorBrush>) -> RecordingPainter {
    let mut painter = RecordingPainter::default();
    paragraph.paint(&mut painter, 0., 0.);
    painter
}

#[test]
fn paint_wraps_draws_in_save_restore() {
    let context = test_context();
    let mut paragraph = layout_text(&context, "ab", 1000.);
    let mut painter = RecordingPainter::default();
    paragraph.paint(&mut painter, 5., 7.);

    assert!(matches!(painter.ops.first(), Some(PaintOp::Save)));
    match &painter.ops[1] {
        PaintOp::Translate(x, y) => {
            assert_near(*x, 5.);
            assert_near(*y, 7.);
        }
        other => panic!("expected a translate, got {other:?}"),
    }
    assert!(matches!(painter.ops.last(), Some(PaintOp::Restore)));

    let glyphs = painter.glyph_ops();
    assert_eq!(glyphs.len(), 1);
    match glyphs[0] {
        PaintOp::Glyphs {
            font_size,
            glyphs,
            positions,
            brush,
        } => {
            assert_near(*font_size, 20.);
            assert_eq!(glyphs.as_slice(), &['a' as u32, 'b' as u32]);
            assert_near(positions[0].x, 0.);
            assert_near(positions[0].y, 15.);
            assert_near(positions[1].x, 10.);
            assert_eq!(*brush, ColorBrush::default());
        }
        other => panic!("expected glyphs, got {other:?}"),
    }
}

#[test]
fn empty_paragraph_paints_nothing() {
    let context = test_context();
    let mut paragraph = layout_text(&context, "", 100.);
    let painter = painted(&mut paragraph);

    assert_eq!(painter.ops.len(), 3);
    assert!(painter.glyph_ops().is_empty());
}

#[test]
fn backgrounds_paint_before_glyphs() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        foreground: RED,
        background: Some(BLUE),
        ..test_text_style()
    });
    builder.add_text("ab");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);

    let rect_at = painter
        .ops
        .iter()
        .position(|op| matches!(op, PaintOp::Rect { .. }))
        .unwrap();
    let glyphs_at = painter
        .ops
        .iter()
        .position(|op| matches!(op, PaintOp::Glyphs { .. }))
        .unwrap();
    assert!(rect_at < glyphs_at);

    match &painter.ops[rect_at] {
        PaintOp::Rect { rect, brush } => {
            assert_eq!(*brush, BLUE);
            assert_near(rect.x0 as f32, 0.);
            assert_near(rect.y0 as f32, 0.);
            assert_near(rect.x1 as f32, 20.);
            assert_near(rect.y1 as f32, 20.);
        }
        other => panic!("expected a rect, got {other:?}"),
    }
    match &painter.ops[glyphs_at] {
        PaintOp::Glyphs { brush, .. } => assert_eq!(*brush, RED),
        other => panic!("expected glyphs, got {other:?}"),
    }
}

#[test]
fn shadows_paint_beneath_glyphs() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        shadows: vec![TextShadow {
            brush: BLUE,
            offset: Point::new(1., 2.),
            blur_sigma: 0.,
        }],
        ..test_text_style()
    });
    builder.add_text("ab");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);

    let shadow_at = painter
        .ops
        .iter()
        .position(|op| matches!(op, PaintOp::Shadow { .. }))
        .unwrap();
    let glyphs_at = painter
        .ops
        .iter()
        .position(|op| matches!(op, PaintOp::Glyphs { .. }))
        .unwrap();
    assert!(shadow_at < glyphs_at);

    match &painter.ops[shadow_at] {
        PaintOp::Shadow {
            glyphs,
            offset,
            brush,
        } => {
            assert_eq!(glyphs.as_slice(), &['a' as u32, 'b' as u32]);
            assert_near(offset.x, 1.);
            assert_near(offset.y, 2.);
            assert_eq!(*brush, BLUE);
        }
        other => panic!("expected a shadow, got {other:?}"),
    }
}

#[test]
fn underline_paints_under_the_baseline() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        decoration: Decoration {
            lines: DecorationLines::UNDERLINE,
            ..Decoration::default()
        },
        ..test_text_style()
    });
    builder.add_text("ab");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);

    let glyphs_at = painter
        .ops
        .iter()
        .position(|op| matches!(op, PaintOp::Glyphs { .. }))
        .unwrap();
    let bar_at = painter
        .ops
        .iter()
        .position(|op| matches!(op, PaintOp::FilledRect { .. }))
        .unwrap();
    assert!(glyphs_at < bar_at);

    // A one-unit bar centered on baseline + underline offset.
    match &painter.ops[bar_at] {
        PaintOp::FilledRect { rect, brush } => {
            assert_near(rect.x0 as f32, 0.);
            assert_near(rect.y0 as f32, 16.5);
            assert_near(rect.x1 as f32, 20.);
            assert_near(rect.y1 as f32, 17.5);
            assert_eq!(*brush, ColorBrush::default());
        }
        other => panic!("expected a filled rect, got {other:?}"),
    }
}

#[test]
fn strikethrough_paints_through_the_text() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        decoration: Decoration {
            lines: DecorationLines::LINE_THROUGH,
            brush: Some(RED),
            ..Decoration::default()
        },
        ..test_text_style()
    });
    builder.add_text("ab");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);

    let bar = painter
        .ops
        .iter()
        .find(|op| matches!(op, PaintOp::FilledRect { .. }))
        .unwrap();
    match bar {
        PaintOp::FilledRect { rect, brush } => {
            assert_near(rect.y0 as f32, 8.5);
            assert_near(rect.y1 as f32, 9.5);
            assert_eq!(*brush, RED);
        }
        other => panic!("expected a filled rect, got {other:?}"),
    }
}

#[test]
fn double_underline_paints_two_lines() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        decoration: Decoration {
            lines: DecorationLines::UNDERLINE,
            style: DecorationStyle::Double,
            ..Decoration::default()
        },
        ..test_text_style()
    });
    builder.add_text("ab");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);

    let ys: Vec<f32> = painter
        .ops
        .iter()
        .filter_map(|op| match op {
            PaintOp::Line { from, .. } => Some(from.y),
            _ => None,
        })
        .collect();
    assert_eq!(ys.len(), 2);
    assert_near(ys[0], 17.);
    assert_near(ys[1], 19.);
}

#[test]
fn dotted_and_wavy_underlines_emit_paths() {
    let context = test_context();
    for style in [DecorationStyle::Dotted, DecorationStyle::Wavy] {
        let mut builder = context.builder(test_style());
        builder.push_style(TextStyle {
            decoration: Decoration {
                lines: DecorationLines::UNDERLINE,
                style,
                ..Decoration::default()
            },
            ..test_text_style()
        });
        builder.add_text("ab");
        let mut paragraph = builder.build();
        paragraph.layout(1000.);
        let painter = painted(&mut paragraph);

        let paths: Vec<_> = painter
            .ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Path { .. }))
            .collect();
        assert_eq!(paths.len(), 1);
        match paths[0] {
            PaintOp::Path {
                elements,
                thickness,
                ..
            } => {
                assert!(*elements > 1);
                assert_near(*thickness, 1.);
            }
            other => panic!("expected a path, got {other:?}"),
        }
    }
}

#[test]
fn wavy_underline_is_clipped_to_its_span() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        decoration: Decoration {
            lines: DecorationLines::UNDERLINE,
            style: DecorationStyle::Wavy,
            ..Decoration::default()
        },
        ..test_text_style()
    });
    builder.add_text("ab");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);

    let at = painter
        .ops
        .iter()
        .position(|op| matches!(op, PaintOp::ClipRect(_)))
        .unwrap();
    match &painter.ops[at] {
        PaintOp::ClipRect(rect) => {
            assert_near(rect.x0 as f32, 0.);
            assert_near(rect.x1 as f32, 20.);
            assert_near(rect.y0 as f32, 14.);
            assert_near(rect.y1 as f32, 20.);
        }
        other => panic!("expected a clip, got {other:?}"),
    }
    assert!(matches!(painter.ops[at - 1], PaintOp::Save));
    assert!(matches!(painter.ops[at + 1], PaintOp::Path { .. }));
    assert!(matches!(painter.ops[at + 2], PaintOp::Restore));
}

#[test]
fn styled_blocks_paint_with_their_brushes() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        foreground: RED,
        ..test_text_style()
    });
    builder.add_text("ab");
    builder.pop_style();
    builder.push_style(TextStyle {
        foreground: BLUE,
        ..test_text_style()
    });
    builder.add_text("cd");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);

    let brushes: Vec<ColorBrush> = painter
        .ops
        .iter()
        .filter_map(|op| match op {
            PaintOp::Glyphs { brush, .. } => Some(*brush),
            _ => None,
        })
        .collect();
    assert_eq!(brushes, [RED, BLUE]);
}

#[test]
fn one_blob_spans_direction_changes() {
    let context = test_context();
    let mut paragraph = layout_text(&context, "ab\u{5d0}\u{5d1}", 1000.);
    let painter = painted(&mut paragraph);

    let glyphs = painter.glyph_ops();
    assert_eq!(glyphs.len(), 1);
    match glyphs[0] {
        PaintOp::Glyphs { glyphs, .. } => {
            assert_eq!(glyphs.as_slice(), &[97, 98, 0x5d1, 0x5d0]);
        }
        other => panic!("expected glyphs, got {other:?}"),
    }
}

#[test]
fn ellipsis_is_painted() {
    let context = test_context();
    let style = ParagraphStyle {
        max_lines: Some(1),
        ellipsis: Some("\u{2026}".to_string()),
        ..test_style()
    };
    let mut paragraph = layout_styled(&context, "aaaa bbbb cccc", style, 100.);
    let painter = painted(&mut paragraph);

    let glyphs = painter.glyph_ops();
    assert_eq!(glyphs.len(), 1);
    match glyphs[0] {
        PaintOp::Glyphs {
            glyphs, positions, ..
        } => {
            assert_eq!(glyphs.len(), 10);
            assert_eq!(*glyphs.last().unwrap(), 0x2026);
            assert_near(positions[9].x, 90.);
        }
        other => panic!("expected glyphs, got {other:?}"),
    }
}

#[test]
fn placeholders_paint_nothing() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.add_text("ab");
    builder.add_placeholder(PlaceholderStyle {
        width: 30.,
        height: 40.,
        ..PlaceholderStyle::default()
    });
    builder.add_text("cd");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);

    let glyphs = painter.glyph_ops();
    assert_eq!(glyphs.len(), 2);
    match glyphs[1] {
        PaintOp::Glyphs {
            glyphs, positions, ..
        } => {
            assert_eq!(glyphs.as_slice(), &['c' as u32, 'd' as u32]);
            assert_near(positions[0].x, 50.);
        }
        other => panic!("expected glyphs, got {other:?}"),
    }
}

#[test]
fn update_foreground_repaints() {
    let context = test_context();
    let mut paragraph = layout_text(&context, "ab", 1000.);
    let painter = painted(&mut paragraph);
    match painter.glyph_ops()[0] {
        PaintOp::Glyphs { brush, .. } => assert_eq!(*brush, ColorBrush::default()),
        other => panic!("expected glyphs, got {other:?}"),
    }

    paragraph.update_foreground(0..2, RED);
    paragraph.layout(1000.);
    let painter = painted(&mut paragraph);
    match painter.glyph_ops()[0] {
        PaintOp::Glyphs { brush, .. } => assert_eq!(*brush, RED),
        other => panic!("expected glyphs, got {other:?}"),
    }
}
