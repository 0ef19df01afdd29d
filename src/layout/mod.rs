// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Laid out paragraph structure and the geometry types queries return.
//!
//! The owning arrays live in [`data`] and belong to the paragraph; the
//! [`Run`], [`Cluster`] and [`Line`] types are cheap views over them.

pub(crate) mod alignment;
pub(crate) mod data;

mod cluster;
pub(crate) mod line;
mod run;

use core::ops::Range;

use peniko::kurbo::Rect;

use crate::layout::data::{ClusterData, LineData, RunData};
use crate::paragraph::Paragraph;
use crate::style::{Brush, TextDirection};

/// A sequence of glyphs sharing one font, direction and style block.
///
/// Runs never span a line boundary after line breaking splits them.
pub struct Run<'a, B: Brush> {
    paragraph: &'a Paragraph<B>,
    index: usize,
    data: &'a RunData,
}

impl<B: Brush> Copy for Run<'_, B> {}

impl<B: Brush> Clone for Run<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

/// The smallest unit of text the layout positions as a whole.
pub struct Cluster<'a, B: Brush> {
    run: Run<'a, B>,
    index: usize,
    data: &'a ClusterData,
}

impl<B: Brush> Copy for Cluster<'_, B> {}

impl<B: Brush> Clone for Cluster<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

/// A laid out line of the paragraph.
pub struct Line<'a, B: Brush> {
    paragraph: &'a Paragraph<B>,
    index: usize,
    data: &'a LineData,
}

impl<B: Brush> Copy for Line<'_, B> {}

impl<B: Brush> Clone for Line<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

/// A positioned glyph.
///
/// Positions are relative to the cluster origin on the baseline.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Glyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub advance: f32,
}

/// Vertical extent of the boxes returned by rect queries.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum RectHeightStyle {
    /// The ascent and descent of the covered runs.
    #[default]
    Tight,
    /// The full line box.
    Max,
    /// The line box with the leading attached above the first line only.
    IncludeLineSpacingTop,
    /// The line box with the leading split evenly around every line.
    IncludeLineSpacingMiddle,
    /// The line box with the leading attached below the last line only.
    IncludeLineSpacingBottom,
    /// The strut metrics, whatever the line content.
    Strut,
}

/// Horizontal extent of the boxes returned by rect queries.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum RectWidthStyle {
    /// Boxes cover glyphs only.
    #[default]
    Tight,
    /// Boxes extend to the widest line of the covered range.
    Max,
}

/// Side of the code unit a caret position leans towards.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum Affinity {
    /// Towards the preceding glyph.
    Upstream,
    /// Towards the following glyph.
    #[default]
    Downstream,
}

/// A caret position produced by hit testing.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct PositionWithAffinity {
    /// UTF-16 code unit offset.
    pub position: usize,
    pub affinity: Affinity,
}

/// An axis aligned box covering part of a queried text range.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct TextBox {
    pub rect: Rect,
    /// Direction of the text the box covers.
    pub direction: TextDirection,
}

/// The glyph cluster under a queried position.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct GlyphClusterInfo {
    /// Bounds relative to the paragraph origin.
    pub bounds: Rect,
    /// Covered text, in UTF-16 code units.
    pub text_range: Range<usize>,
    pub direction: TextDirection,
}

/// Measurements of one laid out line.
///
/// Text offsets are UTF-16 code units; distances are layout units. The
/// vertical numbers describe the line box after strut and height
/// behavior were applied.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct LineMetrics {
    /// First code unit of the line.
    pub start_index: usize,
    /// End of the line's text including trailing whitespace.
    pub end_index: usize,
    /// End of the line's text, trailing whitespace excluded.
    pub end_excluding_whitespace: usize,
    /// End of the line's text including the terminating newline.
    pub end_including_newline: usize,
    /// The line ends in an explicit line break or ends the text.
    pub hard_break: bool,
    /// Rise from the baseline to the top of the line box.
    pub ascent: f32,
    /// Drop from the baseline to the bottom of the line box.
    pub descent: f32,
    /// Ascent from the font alone, before height multipliers.
    pub unscaled_ascent: f32,
    /// Line box height.
    pub height: f32,
    /// Width of the line, ellipsis included, ghosts excluded.
    pub width: f32,
    /// Distance from the paragraph left edge to the line left edge.
    pub left: f32,
    /// Distance from the paragraph top to the baseline.
    pub baseline: f32,
    /// Zero based line index.
    pub line_number: usize,
}

/// Reorders run indices into visual order according to their bidi
/// levels, reversing maximal level subsequences from the innermost
/// level outwards.
pub(crate) fn reorder_visual(runs: &[RunData], indices: &mut [usize]) {
    let mut max_level = 0;
    let mut lowest_odd_level = u8::MAX;
    for &index in indices.iter() {
        let level = runs[index].bidi_level;
        if level > max_level {
            max_level = level;
        }
        if level & 1 != 0 && level < lowest_odd_level {
            lowest_odd_level = level;
        }
    }

    for level in (lowest_odd_level..=max_level).rev() {
        let mut i = 0;
        while i < indices.len() {
            if runs[indices[i]].bidi_level >= level {
                let mut end = i + 1;
                while end < indices.len() && runs[indices[end]].bidi_level >= level {
                    end += 1;
                }
                indices[i..end].reverse();
                i = end;
            }
            i += 1;
        }
    }
}
