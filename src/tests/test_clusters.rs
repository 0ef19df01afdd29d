// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cluster construction: break flags, text coverage and spacing.

use super::utils::{assert_near, layout_text, test_context, test_style, test_text_style};
use crate::TextStyle;

#[test]
fn break_flags_mark_clusters() {
    let context = test_context();
    let paragraph = layout_text(&context, "ab cd\nef", 1000.);

    let line = paragraph.line(0).unwrap();
    let runs: Vec<_> = line.runs().collect();
    let run = runs[0];
    let clusters: Vec<_> = run.clusters().collect();
    assert_eq!(clusters.len(), 8);

    assert!(clusters[2].is_whitespace());
    assert!(!clusters[2].is_soft_break());
    assert!(clusters[3].is_soft_break());
    assert!(clusters[5].is_hard_break());
    assert_near(clusters[5].width(), 0.);
    assert!(!clusters[6].is_soft_break());
    for cluster in [clusters[0], clusters[1], clusters[3]] {
        assert_near(cluster.width(), 10.);
    }
}

#[test]
fn no_break_space_binds_its_word() {
    let context = test_context();
    let paragraph = layout_text(&context, "aa\u{a0}bb cc", 1000.);

    let line = paragraph.line(0).unwrap();
    let runs: Vec<_> = line.runs().collect();
    let clusters: Vec<_> = runs[0].clusters().collect();
    assert_eq!(clusters.len(), 8);
    assert!(!clusters[2].is_whitespace());
    assert!(clusters[2].is_intra_word_break());
    assert_near(clusters[2].width(), 10.);
    assert!(!clusters[3].is_soft_break());
    assert!(clusters[5].is_whitespace());
    assert!(!clusters[5].is_intra_word_break());
    assert!(clusters[6].is_soft_break());

    // The bound word wraps as a unit and the no-break space is never a
    // trim point.
    let narrow = layout_text(&context, "aa\u{a0}bb cc", 50.);
    assert_eq!(narrow.line_count(), 2);
    let first = narrow.line(0).unwrap();
    assert_eq!(first.text_range(), 0..6);
    assert_near(first.width(), 50.);
    assert_near(first.width_with_spaces(), 60.);
    assert_eq!(narrow.line(1).unwrap().text_range(), 7..9);
}

#[test]
fn clusters_tile_their_run() {
    let context = test_context();
    let paragraph = layout_text(&context, "a\u{3b2}\u{1d11e} b", 1000.);

    let line = paragraph.line(0).unwrap();
    for run in line.runs() {
        let mut cursor = run.text_range().start;
        let mut width = 0.;
        for cluster in run.clusters() {
            assert_eq!(cluster.text_range().start, cursor);
            cursor = cluster.text_range().end;
            width += cluster.width();
        }
        assert_eq!(cursor, run.text_range().end);
        assert_near(width, run.advance());
    }
}

#[test]
fn letter_spacing_widens_every_cluster() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        letter_spacing: 5.,
        ..test_text_style()
    });
    builder.add_text("abc");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);

    let line = paragraph.line(0).unwrap();
    assert_near(line.width(), 45.);
    let runs: Vec<_> = line.runs().collect();
    let run = runs[0];
    for cluster in run.clusters() {
        assert_near(cluster.width(), 15.);
    }
    assert_near(run.advance(), 45.);
}

#[test]
fn word_spacing_widens_spaces_only() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        word_spacing: 4.,
        ..test_text_style()
    });
    builder.add_text("ab cd");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);

    let line = paragraph.line(0).unwrap();
    assert_near(line.width(), 54.);
    let runs: Vec<_> = line.runs().collect();
    let run = runs[0];
    let clusters: Vec<_> = run.clusters().collect();
    assert_near(clusters[0].width(), 10.);
    assert_near(clusters[2].width(), 14.);
    assert_near(clusters[3].width(), 10.);
}

#[test]
fn word_spacing_skips_leading_whitespace() {
    let context = test_context();
    let mut builder = context.builder(test_style());
    builder.push_style(TextStyle {
        word_spacing: 4.,
        ..test_text_style()
    });
    builder.add_text(" ab");
    let mut paragraph = builder.build();
    paragraph.layout(1000.);

    let line = paragraph.line(0).unwrap();
    let runs: Vec<_> = line.runs().collect();
    let run = runs[0];
    let clusters: Vec<_> = run.clusters().collect();
    assert_near(clusters[0].width(), 10.);
    assert_near(line.width(), 30.);
}
