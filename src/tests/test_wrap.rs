// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line breaking: word wrap, too-long words, max lines and the
//! overflow ellipsis.

use super::utils::{
    assert_near, fallback_context, layout_styled, layout_text, test_context, test_style,
};
use crate::style::PlaceholderStyle;
use crate::ParagraphStyle;

#[test]
fn narrow_width_splits_long_words() {
    let context = test_context();
    let paragraph = layout_text(&context, "Hello World", 1.);

    assert_eq!(paragraph.line_count(), 10);
    for line in paragraph.lines() {
        assert!(line.width() <= 10.);
        assert!(!line.text_range().is_empty());
    }
    assert_near(paragraph.min_intrinsic_width(), 50.);
    assert_near(paragraph.longest_line(), 10.);
    assert!(!paragraph.did_exceed_max_lines());
}

#[test]
fn wrap_prefers_word_boundaries() {
    let context = test_context();
    let paragraph = layout_text(&context, "aaa bb cc", 60.);

    assert_eq!(paragraph.line_count(), 2);
    let lines: Vec<_> = paragraph.lines().collect();
    assert_eq!(lines[0].text_range(), 0..6);
    assert_eq!(lines[0].text_range_with_spaces(), 0..7);
    assert_eq!(lines[1].text_range(), 7..9);
    assert_near(lines[0].width(), 60.);
    assert_near(lines[0].width_with_spaces(), 70.);
    assert_near(lines[1].width(), 20.);
}

#[test]
fn max_lines_cuts_and_reports() {
    let context = test_context();
    let style = ParagraphStyle {
        max_lines: Some(2),
        ..test_style()
    };
    let paragraph = layout_styled(&context, "Line1\nLine2\nLine3", style, 1000.);

    assert_eq!(paragraph.line_count(), 2);
    assert!(paragraph.did_exceed_max_lines());
    assert_eq!(paragraph.line(0).unwrap().text_range(), 0..5);
    assert_eq!(paragraph.line(1).unwrap().text_range(), 6..11);
    assert_near(paragraph.height(), 40.);
}

#[test]
fn zero_max_lines_keeps_nothing() {
    let context = test_context();
    let style = ParagraphStyle {
        max_lines: Some(0),
        ..test_style()
    };
    let paragraph = layout_styled(&context, "abc", style, 1000.);

    assert_eq!(paragraph.line_count(), 0);
    assert!(paragraph.did_exceed_max_lines());
    assert_near(paragraph.height(), 0.);
    assert_near(paragraph.alphabetic_baseline(), 15.);
}

#[test]
fn trailing_newline_owes_empty_line() {
    let context = test_context();
    let paragraph = layout_text(&context, "a\n", 1000.);

    assert_eq!(paragraph.line_count(), 2);
    let last = paragraph.line(1).unwrap();
    assert_eq!(last.text_range(), 2..2);
    assert!(!last.hard_break());
    assert_near(last.top(), 20.);
    assert_near(last.height(), 20.);
    assert_near(paragraph.height(), 40.);
}

#[test]
fn max_lines_one_suppresses_trailing_empty_line() {
    let context = test_context();
    let style = ParagraphStyle {
        max_lines: Some(1),
        ..test_style()
    };
    let paragraph = layout_styled(&context, "a\n", style, 1000.);

    assert_eq!(paragraph.line_count(), 1);
    assert!(!paragraph.did_exceed_max_lines());
}

#[test]
fn ellipsis_with_max_lines() {
    let context = test_context();
    let style = ParagraphStyle {
        max_lines: Some(1),
        ellipsis: Some("\u{2026}".to_string()),
        ..test_style()
    };
    let paragraph = layout_styled(&context, "aaaa bbbb cccc", style, 100.);

    assert_eq!(paragraph.line_count(), 1);
    assert!(paragraph.did_exceed_max_lines());
    let line = paragraph.line(0).unwrap();
    assert_eq!(line.text_range(), 0..9);
    let ellipsis = line.ellipsis().unwrap();
    assert!(ellipsis.is_ellipsis());
    assert_near(ellipsis.advance(), 10.);
    assert_near(line.width(), 100.);
}

#[test]
fn ellipsis_without_max_lines_stops_at_first_overflow() {
    let context = test_context();
    let style = ParagraphStyle {
        ellipsis: Some("\u{2026}".to_string()),
        ..test_style()
    };
    let paragraph = layout_styled(&context, "one two three", style, 60.);

    assert_eq!(paragraph.line_count(), 1);
    assert!(paragraph.did_exceed_max_lines());
    let line = paragraph.line(0).unwrap();
    assert!(line.ellipsis().is_some());
    // The ghost space fits under the ellipsis and stays.
    assert_eq!(line.text_range(), 0..4);
    assert_near(line.width(), 50.);
    assert_near(paragraph.min_intrinsic_width(), paragraph.max_intrinsic_width());
}

#[test]
fn ellipsis_alone_when_nothing_fits() {
    let context = test_context();
    let style = ParagraphStyle {
        max_lines: Some(1),
        ellipsis: Some("\u{2026}".to_string()),
        ..test_style()
    };
    let paragraph = layout_styled(&context, "aaaaaa", style, 5.);

    assert_eq!(paragraph.line_count(), 1);
    let line = paragraph.line(0).unwrap();
    assert!(line.ellipsis().is_some());
    assert_eq!(line.text_range(), 0..0);
    assert_near(line.width(), 10.);
}

#[test]
fn ellipsis_falls_back_through_the_collection() {
    let context = fallback_context();
    let style = ParagraphStyle {
        max_lines: Some(1),
        ellipsis: Some("\u{2026}".to_string()),
        ..test_style()
    };
    let paragraph = layout_styled(&context, "aaaa bbbb cccc", style, 100.);

    assert_eq!(paragraph.line_count(), 1);
    let line = paragraph.line(0).unwrap();
    let ellipsis = line.ellipsis().unwrap();
    let font = ellipsis.font().unwrap();
    assert_eq!(font.typeface().unique_id(), 2);
    assert_near(font.size(), 20.);
    assert_near(line.width(), 100.);
}

#[test]
fn rounding_hack_forgives_hairline_overflow() {
    let context = test_context();
    let mut style = test_style();
    // Five glyphs at 10.0008 each overflow a width of 50 by four
    // thousandths of a unit.
    style.text_style.font_size = 20.0016;

    let paragraph = layout_styled(&context, "aaaaa", style.clone(), 50.);
    assert_eq!(paragraph.line_count(), 1);

    style.apply_rounding_hack = false;
    let paragraph = layout_styled(&context, "aaaaa", style, 50.);
    assert_eq!(paragraph.line_count(), 2);
    assert_eq!(paragraph.line(0).unwrap().text_range(), 0..4);
    assert_eq!(paragraph.line(1).unwrap().text_range(), 4..5);
}

#[test]
fn intrinsic_widths() {
    let context = test_context();
    let paragraph = layout_text(&context, "one two three", 1000.);

    assert_near(paragraph.max_intrinsic_width(), 130.);
    assert_near(paragraph.min_intrinsic_width(), 50.);
}

#[test]
fn hard_breaks_bound_max_intrinsic() {
    let context = test_context();
    let paragraph = layout_text(&context, "aaaa\nbb", 1000.);

    assert_near(paragraph.max_intrinsic_width(), 40.);
    assert_near(paragraph.min_intrinsic_width(), 40.);
}

#[test]
fn longest_line_ignores_ghost_whitespace() {
    let context = test_context();
    let paragraph = layout_text(&context, "aa bb\ncc", 1000.);

    assert_near(paragraph.longest_line(), 50.);
}

#[test]
fn whitespace_only_line_reports_ghost_width() {
    let context = test_context();
    let paragraph = layout_text(&context, " ", 1000.);

    assert_eq!(paragraph.line_count(), 1);
    let line = paragraph.line(0).unwrap();
    assert_eq!(line.text_range(), 0..0);
    assert_near(line.width(), 0.);
    assert_near(line.width_with_spaces(), 10.);
    assert_near(paragraph.longest_line(), 10.);
}

#[test]
fn unwrapped_line_still_trims_trailing_spaces() {
    let context = test_context();
    let paragraph = layout_text(&context, "ab  ", 1000.);

    assert_eq!(paragraph.line_count(), 1);
    let line = paragraph.line(0).unwrap();
    assert_eq!(line.text_range(), 0..2);
    assert_eq!(line.text_range_with_spaces(), 0..4);
    assert_near(line.width(), 20.);
    assert_near(line.width_with_spaces(), 40.);
    assert_near(paragraph.longest_line(), 20.);
    assert_near(paragraph.min_intrinsic_width(), 20.);
    assert_near(paragraph.max_intrinsic_width(), 40.);
    assert!(!line.hard_break());
    assert_near(paragraph.height(), 20.);
}

#[test]
fn placeholder_wraps_as_a_word() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.add_text("aaaa");
    builder.add_placeholder(PlaceholderStyle {
        width: 50.,
        height: 10.,
        ..PlaceholderStyle::default()
    });
    let mut paragraph = builder.build();
    paragraph.layout(60.);

    assert_eq!(paragraph.line_count(), 2);
    let second = paragraph.line(1).unwrap();
    assert_near(second.width(), 50.);
    assert_near(second.height(), 10.);
    let runs: Vec<_> = second.runs().collect();
    assert_eq!(runs.len(), 1);
    assert!(runs[0].is_placeholder());
    assert_near(paragraph.height(), 30.);
}
