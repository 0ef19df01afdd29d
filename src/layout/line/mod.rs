// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

use crate::util;

pub(crate) mod wrap;

impl<'a, B: Brush> Line<'a, B> {
    pub(crate) fn new(paragraph: &'a Paragraph<B>, index: usize) -> Self {
        Self {
            paragraph,
            index,
            data: &paragraph.lines[index],
        }
    }

    /// Returns the zero based index of the line.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the text range of the line, trailing whitespace excluded.
    pub fn text_range(&self) -> Range<usize> {
        self.data.text_range.clone()
    }

    /// Returns the text range including trailing whitespace but not the
    /// terminating newline.
    pub fn text_range_with_spaces(&self) -> Range<usize> {
        self.data.text_with_spaces.clone()
    }

    /// Returns the text range including the terminating newline, if any.
    pub fn text_range_with_newlines(&self) -> Range<usize> {
        self.data.text_with_newlines.clone()
    }

    /// Returns the width of the line, overflow ellipsis included and
    /// trailing whitespace excluded.
    pub fn width(&self) -> f32 {
        let mut width = self.data.width;
        if let Some(run) = self.data.ellipsis_run {
            width += self.paragraph.runs[run].advance;
        }
        width
    }

    /// Returns the width of the line including trailing whitespace.
    pub fn width_with_spaces(&self) -> f32 {
        self.data.width_with_spaces
    }

    /// Returns the alignment shift of the line's left edge from the
    /// paragraph's left edge.
    pub fn offset(&self) -> f32 {
        self.data.shift
    }

    /// Returns the distance from the paragraph top to the line top.
    pub fn top(&self) -> f32 {
        self.data.top
    }

    /// Returns the height of the line box.
    pub fn height(&self) -> f32 {
        self.data.height()
    }

    /// Returns the distance from the paragraph top to the baseline.
    pub fn baseline(&self) -> f32 {
        self.data.baseline()
    }

    /// Returns the ascent of the line box above the baseline.
    pub fn ascent(&self) -> f32 {
        self.data.metrics.ascent
    }

    /// Returns the descent of the line box below the baseline.
    pub fn descent(&self) -> f32 {
        self.data.metrics.descent
    }

    /// Returns `true` if the line ends in an explicit line break.
    pub fn hard_break(&self) -> bool {
        self.data.hard_break
    }

    /// Returns the overflow ellipsis run attached to the line, if any.
    pub fn ellipsis(&self) -> Option<Run<'a, B>> {
        self.data
            .ellipsis_run
            .map(|index| Run::new(self.paragraph, index))
    }

    /// Returns an iterator over the positioned runs of the line in
    /// visual order, the ellipsis run last when one is attached.
    pub fn glyph_runs(&self) -> impl Iterator<Item = GlyphRun<'a, B>> + 'a + Clone {
        GlyphRuns {
            line: *self,
            index: 0,
            x: self.data.shift,
        }
    }

    /// Returns an iterator over the runs of the line in visual order.
    pub fn runs(&self) -> impl Iterator<Item = Run<'a, B>> + 'a + Clone {
        self.glyph_runs().map(|item| item.run())
    }

    pub(crate) fn data(&self) -> &'a LineData {
        self.data
    }
}

/// A run positioned within its line.
pub struct GlyphRun<'a, B: Brush> {
    run: Run<'a, B>,
    /// Clusters of the run that fall on the line, in logical order.
    /// Empty for ellipsis runs.
    clusters: Range<usize>,
    offset: f32,
    width: f32,
    baseline: f32,
}

impl<B: Brush> Clone for GlyphRun<'_, B> {
    fn clone(&self) -> Self {
        Self {
            run: self.run,
            clusters: self.clusters.clone(),
            offset: self.offset,
            width: self.width,
            baseline: self.baseline,
        }
    }
}

impl<'a, B: Brush> GlyphRun<'a, B> {
    /// Returns the underlying run.
    pub fn run(&self) -> Run<'a, B> {
        self.run
    }

    /// Returns the offset of the left edge of the run from the
    /// paragraph's left edge, alignment included.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Returns the distance from the paragraph top to the baseline the
    /// run sits on, baseline shift included.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Returns the summed width of the clusters on the line.
    pub fn advance(&self) -> f32 {
        self.width
    }

    /// Returns the text range covered on this line.
    pub fn text_range(&self) -> Range<usize> {
        if self.clusters.is_empty() {
            return self.run.text_range();
        }
        let clusters = &self.run.paragraph().clusters;
        let start = clusters[self.clusters.start].text_range().start;
        let end = clusters[self.clusters.end - 1].text_range().end;
        start..end
    }

    /// Returns an iterator over the clusters of the run that fall on the
    /// line, in visual order.
    pub fn clusters(&self) -> impl Iterator<Item = Cluster<'a, B>> + 'a + Clone {
        let run = self.run;
        let rev = run.is_rtl();
        let mut range = self.clusters.clone();
        core::iter::from_fn(move || {
            let index = if rev { range.next_back()? } else { range.next()? };
            Some(Cluster::new(run, index))
        })
    }

    /// Returns an iterator pairing each cluster with the x position of
    /// its left edge, in visual order.
    pub(crate) fn cluster_xs(&self) -> impl Iterator<Item = (Cluster<'a, B>, f32)> + 'a {
        let mut x = self.offset;
        self.clusters().map(move |cluster| {
            let left = x;
            x += cluster.width();
            (cluster, left)
        })
    }

    /// Returns an iterator over the glyphs of the run, positioned
    /// relative to the paragraph origin.
    pub fn positioned_glyphs(&self) -> PositionedGlyphs<'a, B> {
        let data = self.run.data();
        let (glyphs, relative) = if self.run.is_ellipsis() {
            (0..data.glyph_count(), data.glyph_x(0))
        } else {
            (0..0, 0.)
        };
        PositionedGlyphs {
            run: self.run,
            clusters: self.clusters.clone(),
            rev: self.run.is_rtl(),
            glyphs,
            origin: self.offset,
            pen: self.offset,
            relative,
            baseline: self.baseline,
        }
    }
}

/// Iterator over the positioned runs of a line.
struct GlyphRuns<'a, B: Brush> {
    line: Line<'a, B>,
    index: usize,
    x: f32,
}

impl<B: Brush> Clone for GlyphRuns<'_, B> {
    fn clone(&self) -> Self {
        Self {
            line: self.line,
            index: self.index,
            x: self.x,
        }
    }
}

impl<'a, B: Brush> Iterator for GlyphRuns<'a, B> {
    type Item = GlyphRun<'a, B>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.line.data;
        let run_index = *data.visual_runs.get(self.index)?;
        self.index += 1;
        let run = Run::new(self.line.paragraph, run_index);
        let (clusters, width) = if run.is_ellipsis() {
            (0..0, run.advance())
        } else {
            let clusters = util::intersect(&run.cluster_range(), &data.clusters_with_ghosts);
            let width = self.line.paragraph.clusters[clusters.clone()]
                .iter()
                .map(|cluster| cluster.width)
                .sum();
            (clusters, width)
        };
        let offset = self.x;
        self.x += width;
        Some(GlyphRun {
            run,
            clusters,
            offset,
            width,
            baseline: self.line.data.baseline() + run.baseline_shift(),
        })
    }
}

/// Iterator over the glyphs of a [`GlyphRun`], positioned relative to
/// the paragraph origin.
pub struct PositionedGlyphs<'a, B: Brush> {
    run: Run<'a, B>,
    clusters: Range<usize>,
    rev: bool,
    /// Glyph cursor within the current cluster.
    glyphs: Range<usize>,
    /// Left edge of the current cluster.
    origin: f32,
    /// Left edge of the next cluster.
    pen: f32,
    /// Shaped x of the current cluster's first glyph, subtracted to
    /// rebase glyph positions onto the cluster origin.
    relative: f32,
    baseline: f32,
}

impl<B: Brush> Clone for PositionedGlyphs<'_, B> {
    fn clone(&self) -> Self {
        Self {
            run: self.run,
            clusters: self.clusters.clone(),
            rev: self.rev,
            glyphs: self.glyphs.clone(),
            origin: self.origin,
            pen: self.pen,
            relative: self.relative,
            baseline: self.baseline,
        }
    }
}

impl<B: Brush> Iterator for PositionedGlyphs<'_, B> {
    type Item = Glyph;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let data = self.run.data();
            if let Some(index) = self.glyphs.next() {
                return Some(Glyph {
                    id: data.glyphs[index],
                    x: self.origin - self.relative + data.glyph_x(index) + data.offsets[index].x,
                    y: self.baseline + data.offsets[index].y,
                    advance: data.span_width(index..index + 1),
                });
            }
            let index = if self.rev {
                self.clusters.next_back()?
            } else {
                self.clusters.next()?
            };
            let cluster = &self.run.paragraph().clusters[index];
            self.glyphs = cluster.glyph_range();
            self.origin = self.pen;
            self.pen += cluster.width;
            self.relative = if self.glyphs.is_empty() {
                0.
            } else {
                data.glyph_x(self.glyphs.start)
            };
        }
    }
}
