// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal alignment and justification of laid out lines.

use crate::layout::data::{ClusterData, LineData, RunData};
use crate::style::{TextAlign, TextDirection};

/// Computes per-line horizontal shifts for the effective alignment and
/// expands whitespace on justified lines.
///
/// `effective_align` must already have `Start` and `End` resolved
/// against the paragraph direction. Infinite width cannot be aligned
/// against; combined with anything but left alignment the paragraph
/// keeps its measurements but produces no lines.
pub(crate) fn format_lines(
    lines: &mut Vec<LineData>,
    runs: &[RunData],
    clusters: &mut [ClusterData],
    effective_align: TextAlign,
    direction: TextDirection,
    max_width: f32,
) {
    let is_left = effective_align == TextAlign::Left
        || (effective_align == TextAlign::Justify && direction == TextDirection::Ltr);
    if !max_width.is_finite() && !is_left {
        log::warn!(
            "cannot {:?}-align against an infinite width; dropping lines",
            effective_align
        );
        lines.clear();
        return;
    }

    let sentinel = clusters.len().saturating_sub(1);
    for line in lines.iter_mut() {
        line.shift = 0.;
        let mut width = line.width;
        if let Some(run) = line.ellipsis_run {
            width += runs[run].advance;
        }
        let delta = max_width - width;
        if delta <= 0. {
            continue;
        }
        match effective_align {
            TextAlign::Justify => {
                let expanded = !ends_with_hard_break(line, sentinel)
                    && justify(line, runs, clusters, max_width);
                if !expanded && direction == TextDirection::Rtl {
                    // Justification falls back to right alignment.
                    line.shift = delta;
                }
            }
            TextAlign::Right => line.shift = delta,
            TextAlign::Center => line.shift = delta * 0.5,
            _ => {}
        }
    }
}

/// Restores the natural widths justification replaced.
///
/// Runs whenever formatted lines are thrown away, both before lines are
/// reformatted in place and before the text is broken again, since the
/// wrapper measures against cluster widths.
pub(crate) fn unjustify(runs: &[RunData], clusters: &mut [ClusterData], lines: &mut [LineData]) {
    for cluster in clusters.iter_mut() {
        let Some(run) = runs.get(cluster.run_index) else {
            // End-of-text sentinel.
            continue;
        };
        if run.is_placeholder() {
            continue;
        }
        cluster.width = run.span_width(cluster.glyph_range());
    }
    for line in lines.iter_mut() {
        line.shift = 0.;
        line.width = clusters[line.cluster_range.clone()]
            .iter()
            .map(|cluster| cluster.width)
            .sum();
    }
}

/// Lines that end in a newline, carry an ellipsis or finish the text
/// keep their natural width under justification.
pub(crate) fn ends_with_hard_break(line: &LineData, sentinel: usize) -> bool {
    line.hard_break
        || line.ellipsis_run.is_some()
        || line.clusters_with_ghosts.end == sentinel
}

/// Expands the line to `max_width` by replacing the width of every
/// whitespace cluster between words with an equal share of the slack.
/// Leading whitespace and placeholders keep their widths. Returns
/// `false` when the line has no whitespace to expand.
fn justify(
    line: &mut LineData,
    runs: &[RunData],
    clusters: &mut [ClusterData],
    max_width: f32,
) -> bool {
    let expandable = |cluster: &ClusterData| {
        cluster.is_whitespace_break()
            && !runs
                .get(cluster.run_index)
                .is_some_and(RunData::is_placeholder)
    };

    let mut fixed = 0.;
    let mut participating = 0_usize;
    let mut leading = true;
    for cluster in &clusters[line.cluster_range.clone()] {
        if expandable(cluster) && !leading {
            participating += 1;
        } else {
            if !expandable(cluster) {
                leading = false;
            }
            fixed += cluster.width;
        }
    }
    if participating == 0 {
        return false;
    }

    let each = (max_width - fixed) / participating as f32;
    let mut leading = true;
    for cluster in &mut clusters[line.cluster_range.clone()] {
        if expandable(cluster) {
            if !leading {
                cluster.width = each;
            }
        } else {
            leading = false;
        }
    }
    line.width = max_width;
    true
}
