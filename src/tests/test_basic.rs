// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End to end checks of the layout pipeline on plain text.

use super::utils::{assert_near, layout_text, test_context, test_style, test_text_style, FONT_SIZE};
use crate::kurbo::Rect;
use crate::layout::{RectHeightStyle, RectWidthStyle};

#[test]
fn single_line_fits() {
    let context = test_context();
    let paragraph = layout_text(&context, "Hello World", 1000.);

    assert_eq!(paragraph.line_count(), 1);
    assert!(!paragraph.did_exceed_max_lines());
    let line = paragraph.line(0).unwrap();
    assert_eq!(line.text_range(), 0..11);
    assert_near(line.width(), 110.);
    assert_near(paragraph.height(), FONT_SIZE);
    assert_near(paragraph.longest_line(), 110.);
    assert_near(paragraph.alphabetic_baseline(), 15.);
    assert_near(paragraph.ideographic_baseline(), 20.);
}

#[test]
fn newlines_break_lines() {
    let context = test_context();
    let paragraph = layout_text(&context, "Line1\nLine2\nLine3", 1000.);

    assert_eq!(paragraph.line_count(), 3);
    let lines: Vec<_> = paragraph.lines().collect();
    assert_eq!(lines[0].text_range(), 0..5);
    assert_eq!(lines[0].text_range_with_newlines(), 0..6);
    assert_eq!(lines[1].text_range(), 6..11);
    assert_eq!(lines[2].text_range(), 12..17);
    assert!(lines[0].hard_break());
    assert!(lines[1].hard_break());
    assert!(!lines[2].hard_break());
    for (index, line) in lines.iter().enumerate() {
        assert_near(line.top(), 20. * index as f32);
        assert_near(line.baseline(), 20. * index as f32 + 15.);
        assert_near(line.width(), 50.);
    }
    assert_near(paragraph.height(), 60.);
}

#[test]
fn empty_text_reports_style_metrics() {
    let context = test_context();
    let paragraph = layout_text(&context, "", 500.);

    assert_eq!(paragraph.line_count(), 0);
    assert_near(paragraph.height(), 20.);
    assert_near(paragraph.alphabetic_baseline(), 15.);
    let boxes = paragraph.rects_for_range(0..1, RectHeightStyle::Tight, RectWidthStyle::Tight);
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].rect, Rect::new(0., 0., 0., 20.));
}

#[test]
fn empty_paragraph_takes_pushed_style_metrics() {
    let context = test_context();
    let mut style = test_text_style();
    style.font_size = 40.;
    let mut builder = context.builder(test_style());
    builder.push_style(style);
    let mut paragraph = builder.build();
    paragraph.layout(500.);

    assert_eq!(paragraph.line_count(), 0);
    assert_near(paragraph.height(), 40.);
    assert_near(paragraph.alphabetic_baseline(), 30.);
}

#[test]
fn relayout_is_idempotent() {
    let context = test_context();
    let mut paragraph = layout_text(&context, "The quick brown fox", 100.);
    let first: Vec<_> = paragraph
        .lines()
        .map(|line| (line.text_range(), line.width(), line.top()))
        .collect();
    assert!(first.len() > 1);

    paragraph.layout(100.);
    let second: Vec<_> = paragraph
        .lines()
        .map(|line| (line.text_range(), line.width(), line.top()))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn relayout_at_other_widths() {
    let context = test_context();
    let mut paragraph = layout_text(&context, "one two three four", 1000.);
    assert_eq!(paragraph.line_count(), 1);

    paragraph.layout(90.);
    assert!(paragraph.line_count() > 1);
    for line in paragraph.lines() {
        assert!(line.width() <= 90.);
    }

    paragraph.layout(1000.);
    assert_eq!(paragraph.line_count(), 1);
    assert_near(paragraph.line(0).unwrap().width(), 180.);
}

#[test]
fn lines_tile_the_text() {
    let context = test_context();
    let paragraph = layout_text(&context, "ab cd\nef gh ij", 50.);

    let mut cursor = 0;
    for line in paragraph.lines() {
        let range = line.text_range_with_newlines();
        assert_eq!(range.start, cursor);
        assert!(range.end >= range.start);
        cursor = range.end;
    }
    assert_eq!(cursor, paragraph.text().len());
}

#[test]
fn spans_tile_each_line() {
    let context = test_context();
    let paragraph = layout_text(&context, "ab cd\nef gh ij", 50.);

    for line in paragraph.lines() {
        let mut ranges: Vec<_> = line.glyph_runs().map(|span| span.text_range()).collect();
        ranges.sort_by_key(|range| range.start);
        let mut cursor = line.text_range_with_newlines().start;
        for range in ranges {
            assert_eq!(range.start, cursor);
            cursor = range.end;
        }
        assert_eq!(cursor, line.text_range_with_newlines().end);
    }
}

#[test]
fn supplementary_plane_text() {
    let context = test_context();
    let paragraph = layout_text(&context, "a\u{3b2}\u{1d11e}b", 1000.);

    assert_eq!(paragraph.line_count(), 1);
    // Offsets on the query surface are UTF-16 code units.
    assert_eq!(paragraph.actual_text_range(0, true), 0..5);
    let line = paragraph.line(0).unwrap();
    assert_eq!(line.text_range(), 0..8);
    assert_near(line.width(), 40.);
}

#[test]
fn baselines_follow_first_line() {
    let context = test_context();
    let paragraph = layout_text(&context, "first\nsecond", 1000.);

    let first = paragraph.line(0).unwrap();
    assert_near(paragraph.alphabetic_baseline(), first.baseline());
    assert_near(paragraph.ideographic_baseline(), first.baseline() + first.descent());
}
