// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

impl<'a, B: Brush> Cluster<'a, B> {
    pub(crate) fn new(run: Run<'a, B>, index: usize) -> Self {
        Self {
            run,
            index,
            data: &run.paragraph.clusters[index],
        }
    }

    /// Returns the run containing the cluster.
    pub fn run(&self) -> Run<'a, B> {
        self.run
    }

    /// Returns the index of the cluster within the paragraph.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the text range backing the cluster.
    pub fn text_range(&self) -> Range<usize> {
        self.data.text_range()
    }

    /// Returns the width of the cluster, spacing and justification
    /// included.
    pub fn width(&self) -> f32 {
        self.data.width
    }

    /// Returns `true` if any code unit of the cluster is breakable
    /// whitespace. Newlines are not whitespace in this sense.
    pub fn is_whitespace(&self) -> bool {
        self.data.is_whitespace_break()
    }

    /// Returns `true` if a soft wrap opportunity precedes the cluster.
    pub fn is_soft_break(&self) -> bool {
        self.data.is_soft_break()
    }

    /// Returns `true` if a hard line break follows the cluster.
    pub fn is_hard_break(&self) -> bool {
        self.data.is_hard_break()
    }

    /// Returns `true` if the base character is ideographic.
    pub fn is_ideographic(&self) -> bool {
        self.data.is_ideographic()
    }

    /// Returns `true` for whitespace that binds its word, such as a
    /// no-break space. Such clusters are never wrapped or trimmed at.
    pub fn is_intra_word_break(&self) -> bool {
        self.data.is_intra_word_break()
    }

    /// Returns `true` if the cluster belongs to a placeholder run.
    pub fn is_placeholder(&self) -> bool {
        self.run.is_placeholder()
    }

    /// Returns an iterator over the glyphs of the cluster, with
    /// positions relative to the cluster origin on the baseline.
    pub fn glyphs(&self) -> impl Iterator<Item = Glyph> + 'a + Clone {
        let run = self.run.data();
        let range = self.data.glyph_range();
        let origin = if range.is_empty() {
            0.
        } else {
            run.glyph_x(range.start)
        };
        range.map(move |index| Glyph {
            id: run.glyphs[index],
            x: run.glyph_x(index) - origin + run.offsets[index].x,
            y: run.offsets[index].y,
            advance: run.glyph_x(index + 1) - run.glyph_x(index),
        })
    }

    pub(crate) fn data(&self) -> &'a ClusterData {
        self.data
    }
}
