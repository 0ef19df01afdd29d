// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

use crate::font::{Font, FontMetrics};
use crate::shaper::ScriptTag;
use crate::style::TextStyle;

impl<'a, B: Brush> Run<'a, B> {
    pub(crate) fn new(paragraph: &'a Paragraph<B>, index: usize) -> Self {
        Self {
            paragraph,
            index,
            data: &paragraph.runs[index],
        }
    }

    /// Returns the index of the run within the paragraph.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the font for the run, or `None` for placeholder runs.
    pub fn font(&self) -> Option<&'a Font> {
        self.data.font.as_ref()
    }

    /// Returns the metrics of the run's font at its resolved size.
    pub fn font_metrics(&self) -> &'a FontMetrics {
        &self.data.metrics
    }

    /// Returns the style the run was shaped with.
    pub fn style(&self) -> &'a TextStyle<B> {
        &self.paragraph.blocks[self.data.block_index].style
    }

    /// Returns the original text range for the run.
    pub fn text_range(&self) -> Range<usize> {
        self.data.text_range.clone()
    }

    /// Returns the range of clusters belonging to the run.
    pub fn cluster_range(&self) -> Range<usize> {
        self.data.cluster_range.clone()
    }

    /// Returns the number of clusters in the run.
    pub fn len(&self) -> usize {
        self.data.cluster_range.len()
    }

    /// Returns `true` if the run is empty.
    pub fn is_empty(&self) -> bool {
        self.data.cluster_range.is_empty()
    }

    /// Returns the bidi level of the run.
    pub fn bidi_level(&self) -> u8 {
        self.data.bidi_level
    }

    /// Returns the script the run was shaped as.
    pub fn script(&self) -> ScriptTag {
        self.data.script
    }

    /// Returns the BCP-47 language tag of the run's style, if set.
    pub fn language(&self) -> Option<&'a str> {
        let locale = &self.style().locale;
        (!locale.is_empty()).then_some(locale.as_str())
    }

    /// Returns `true` if the run has right-to-left directionality.
    pub fn is_rtl(&self) -> bool {
        self.data.bidi_level & 1 != 0
    }

    /// Returns the direction of the run.
    pub fn direction(&self) -> TextDirection {
        if self.is_rtl() {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    /// Returns `true` if the run stands in for an inline placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.data.is_placeholder()
    }

    /// Returns `true` if the run holds the overflow ellipsis.
    pub fn is_ellipsis(&self) -> bool {
        self.data.is_ellipsis
    }

    /// Returns the advance of the run, letter and word spacing included.
    pub fn advance(&self) -> f32 {
        self.data.advance
    }

    /// Returns the ascent the run contributes to its line box, height
    /// multiplier applied.
    pub fn ascent(&self) -> f32 {
        self.data.corrected_ascent
    }

    /// Returns the descent the run contributes to its line box.
    pub fn descent(&self) -> f32 {
        self.data.corrected_descent
    }

    /// Returns the leading the run contributes to its line box.
    pub fn leading(&self) -> f32 {
        self.data.corrected_leading
    }

    /// Returns the shift of this run's baseline below the line baseline.
    pub fn baseline_shift(&self) -> f32 {
        self.data.baseline_shift
    }

    /// Returns the cluster at the specified index counted from the start
    /// of the run.
    pub fn get(&self, index: usize) -> Option<Cluster<'a, B>> {
        let range = &self.data.cluster_range;
        let index = range.start.checked_add(index)?;
        if index >= range.end {
            return None;
        }
        Some(Cluster::new(*self, index))
    }

    /// Returns an iterator over the clusters of the run in logical order.
    pub fn clusters(&'a self) -> impl Iterator<Item = Cluster<'a, B>> + 'a + Clone {
        Clusters {
            run: self,
            range: self.data.cluster_range.clone(),
            rev: false,
        }
    }

    /// Returns an iterator over the clusters of the run in visual order,
    /// walking right-to-left runs from their logical end.
    pub fn visual_clusters(&'a self) -> impl Iterator<Item = Cluster<'a, B>> + 'a + Clone {
        Clusters {
            run: self,
            range: self.data.cluster_range.clone(),
            rev: self.is_rtl(),
        }
    }

    pub(crate) fn paragraph(&self) -> &'a Paragraph<B> {
        self.paragraph
    }

    pub(crate) fn data(&self) -> &'a RunData {
        self.data
    }
}

struct Clusters<'a, B: Brush> {
    run: &'a Run<'a, B>,
    range: Range<usize>,
    rev: bool,
}

impl<B: Brush> Clone for Clusters<'_, B> {
    fn clone(&self) -> Self {
        Self {
            run: self.run,
            range: self.range.clone(),
            rev: self.rev,
        }
    }
}

impl<'a, B: Brush> Iterator for Clusters<'a, B> {
    type Item = Cluster<'a, B>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = if self.rev {
            self.range.next_back()?
        } else {
            self.range.next()?
        };
        Some(Cluster::new(*self.run, index))
    }
}
