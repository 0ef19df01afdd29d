// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat storage for runs, clusters and lines.
//!
//! All cross-references are indices into the paragraph's arrays, never
//! pointers, so relayout can rebuild the arrays wholesale.

use core::ops::Range;

use crate::font::{Font, FontMetrics};
use crate::shaper::{Point, ScriptTag};
use crate::style::{PlaceholderAlignment, PlaceholderStyle};
use crate::unicode::CodeUnitFlags;

/// Run index of the end-of-text sentinel cluster.
pub(crate) const NO_RUN: usize = usize::MAX;

/// Ascent, descent and leading accumulated over the runs of a line.
///
/// Ascent and descent are positive distances from the baseline. The raw
/// pair tracks uncorrected font metrics for the text-height-behavior
/// overrides; strut merging leaves it untouched.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct VerticalMetrics {
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) leading: f32,
    pub(crate) raw_ascent: f32,
    pub(crate) raw_descent: f32,
    /// Ignore run contributions; the strut will supply the height.
    pub(crate) force: bool,
}

impl VerticalMetrics {
    pub(crate) fn new(force: bool) -> Self {
        Self {
            force,
            ..Self::default()
        }
    }

    pub(crate) fn height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }

    /// Distance from the top of the line box to the alphabetic baseline.
    pub(crate) fn baseline(&self) -> f32 {
        self.leading * 0.5 + self.ascent
    }

    pub(crate) fn clean(&mut self) {
        let force = self.force;
        *self = Self::new(force);
    }

    pub(crate) fn add_run(&mut self, run: &RunData) {
        if self.force {
            return;
        }
        self.ascent = self.ascent.max(run.corrected_ascent);
        self.descent = self.descent.max(run.corrected_descent);
        self.leading = self.leading.max(run.corrected_leading);
        self.raw_ascent = self.raw_ascent.max(run.metrics.ascent);
        self.raw_descent = self.raw_descent.max(run.metrics.descent);
    }

    pub(crate) fn add(&mut self, other: &Self) {
        if self.force {
            return;
        }
        self.ascent = self.ascent.max(other.ascent);
        self.descent = self.descent.max(other.descent);
        self.leading = self.leading.max(other.leading);
        self.raw_ascent = self.raw_ascent.max(other.raw_ascent);
        self.raw_descent = self.raw_descent.max(other.raw_descent);
    }

    /// Rounds the line box to whole units, half the leading going to
    /// each side.
    pub(crate) fn round_out(&mut self) {
        self.ascent = self.ascent.round();
        self.descent = self.descent.round();
        self.leading = (self.leading * 0.5).round() * 2.;
    }
}

/// Paragraph-global minimum line box.
#[derive(Clone, Default, Debug)]
pub(crate) struct StrutMetrics {
    pub(crate) metrics: VerticalMetrics,
    pub(crate) enabled: bool,
    pub(crate) force: bool,
}

impl StrutMetrics {
    /// Merges the strut into accumulated line metrics, replacing them
    /// entirely when the strut height is forced.
    pub(crate) fn update_line(&self, metrics: &mut VerticalMetrics) {
        if !self.enabled {
            return;
        }
        if self.force {
            metrics.ascent = self.metrics.ascent;
            metrics.descent = self.metrics.descent;
            metrics.leading = self.metrics.leading;
        } else {
            metrics.ascent = metrics.ascent.max(self.metrics.ascent);
            metrics.descent = metrics.descent.max(self.metrics.descent);
            metrics.leading = metrics.leading.max(self.metrics.leading);
        }
    }
}

/// A shaped run: one font, one script, one bidi level.
///
/// Glyphs are stored in visual order with monotone x positions relative
/// to the run origin. The arrays hold one trailing entry so that
/// `positions[glyph_count]` is the end-of-run advance point.
#[derive(Clone, Debug)]
pub(crate) struct RunData {
    /// Absent only for placeholder runs that never went through a shaper.
    pub(crate) font: Option<Font>,
    pub(crate) text_range: Range<usize>,
    pub(crate) block_index: usize,
    pub(crate) bidi_level: u8,
    pub(crate) script: ScriptTag,
    pub(crate) glyphs: Vec<u32>,
    pub(crate) positions: Vec<Point>,
    pub(crate) offsets: Vec<Point>,
    /// Absolute text offset of the source cluster of each glyph.
    pub(crate) clusters: Vec<u32>,
    /// Per-glyph shift from letter and word spacing.
    pub(crate) shifts: Vec<f32>,
    pub(crate) cluster_range: Range<usize>,
    pub(crate) advance: f32,
    pub(crate) metrics: FontMetrics,
    pub(crate) corrected_ascent: f32,
    pub(crate) corrected_descent: f32,
    pub(crate) corrected_leading: f32,
    pub(crate) baseline_shift: f32,
    /// Index into the paragraph's placeholder list.
    pub(crate) placeholder: Option<usize>,
    pub(crate) is_ellipsis: bool,
}

impl RunData {
    pub(crate) fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub(crate) fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    pub(crate) fn is_left_to_right(&self) -> bool {
        self.bidi_level & 1 == 0
    }

    /// Shaped x position of a glyph including spacing shifts. Valid for
    /// indices up to and including the glyph count.
    ///
    /// Justification never moves glyphs within their run; it widens
    /// cluster widths, and line positions are rebuilt from those.
    pub(crate) fn glyph_x(&self, index: usize) -> f32 {
        self.positions[index].x + self.shifts[index]
    }

    /// Width of a glyph span, spacing included.
    pub(crate) fn span_width(&self, glyphs: Range<usize>) -> f32 {
        self.glyph_x(glyphs.end) - self.glyph_x(glyphs.start)
    }

    /// Derives the line box contribution of the run from its font
    /// metrics, the style's height multiplier and half-leading flag.
    pub(crate) fn compute_corrected_metrics(&mut self, height: Option<f32>, half_leading: bool) {
        self.corrected_ascent = self.metrics.ascent + self.metrics.leading * 0.5;
        self.corrected_descent = self.metrics.descent + self.metrics.leading * 0.5;
        self.corrected_leading = 0.;
        let Some(multiplier) = height else {
            return;
        };
        let font_size = self.font.as_ref().map(Font::size).unwrap_or_default();
        let run_height = multiplier * font_size;
        let intrinsic = self.corrected_ascent + self.corrected_descent;
        if intrinsic <= 0. {
            return;
        }
        if half_leading {
            let extra = (run_height - intrinsic) * 0.5;
            self.corrected_ascent += extra;
            self.corrected_descent += extra;
        } else {
            let scale = run_height / intrinsic;
            self.corrected_ascent = self.metrics.ascent * scale;
            self.corrected_descent = self.metrics.descent * scale;
        }
    }

    /// Recomputes a placeholder run's metrics for the line it landed on
    /// and folds them into the line box.
    ///
    /// The box geometry depends on the metrics accumulated from the text
    /// runs of the same line, so this runs once per line.
    pub(crate) fn update_placeholder_metrics(
        &mut self,
        style: &PlaceholderStyle,
        line: &mut VerticalMetrics,
    ) {
        let height = style.height;
        let (ascent, descent) = match style.alignment {
            PlaceholderAlignment::Baseline => {
                (style.baseline_offset, height - style.baseline_offset)
            }
            PlaceholderAlignment::AboveBaseline => (height, 0.),
            PlaceholderAlignment::BelowBaseline => (0., height),
            PlaceholderAlignment::Top => (line.ascent, height - line.ascent),
            PlaceholderAlignment::Bottom => (height - line.descent, line.descent),
            PlaceholderAlignment::Middle => {
                let center = (line.descent - line.ascent) * 0.5;
                (height * 0.5 - center, height * 0.5 + center)
            }
        };
        self.metrics.ascent = ascent;
        self.metrics.descent = descent;
        self.metrics.leading = 0.;
        self.corrected_ascent = ascent;
        self.corrected_descent = descent;
        self.corrected_leading = 0.;
        line.add_run(self);
    }
}

/// Cluster flag: any code unit in the cluster is breakable whitespace.
pub(crate) const WHITESPACE_BREAK: u16 = 1 << 0;
/// Cluster flag: the cluster starts at a soft line break opportunity.
pub(crate) const SOFT_BREAK: u16 = 1 << 1;
/// Cluster flag: a hard line break follows the cluster.
pub(crate) const HARD_BREAK: u16 = 1 << 2;
/// Cluster flag: the base character is ideographic.
pub(crate) const IDEOGRAPHIC: u16 = 1 << 3;
/// Cluster flag: whitespace that binds its word, such as a no-break
/// space. Never a break or trim point.
pub(crate) const INTRA_WORD_BREAK: u16 = 1 << 4;

/// Smallest text-equivalent unit: one or more glyphs rendering one or
/// more code points.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ClusterData {
    /// Owning run, or [`NO_RUN`] for the end-of-text sentinel.
    pub(crate) run_index: usize,
    pub(crate) text_start: u32,
    pub(crate) text_len: u16,
    /// Start of the glyph span within the owning run.
    pub(crate) glyph_start: u32,
    pub(crate) glyph_len: u16,
    pub(crate) flags: u16,
    /// Current width; widened by spacing and justification.
    pub(crate) width: f32,
}

impl ClusterData {
    pub(crate) fn text_range(&self) -> Range<usize> {
        let start = self.text_start as usize;
        start..start + self.text_len as usize
    }

    pub(crate) fn glyph_range(&self) -> Range<usize> {
        let start = self.glyph_start as usize;
        start..start + self.glyph_len as usize
    }

    pub(crate) fn is_whitespace_break(&self) -> bool {
        self.flags & WHITESPACE_BREAK != 0
    }

    pub(crate) fn is_soft_break(&self) -> bool {
        self.flags & SOFT_BREAK != 0
    }

    pub(crate) fn is_hard_break(&self) -> bool {
        self.flags & HARD_BREAK != 0
    }

    pub(crate) fn is_ideographic(&self) -> bool {
        self.flags & IDEOGRAPHIC != 0
    }

    pub(crate) fn is_intra_word_break(&self) -> bool {
        self.flags & INTRA_WORD_BREAK != 0
    }
}

/// A laid out line.
#[derive(Clone, Default, Debug)]
pub(crate) struct LineData {
    /// Text excluding trailing whitespace.
    pub(crate) text_range: Range<usize>,
    /// Text including trailing ghost whitespace but not the newline.
    pub(crate) text_with_spaces: Range<usize>,
    /// Text including the terminating newline, if any.
    pub(crate) text_with_newlines: Range<usize>,
    /// Clusters excluding trailing whitespace.
    pub(crate) cluster_range: Range<usize>,
    /// Clusters including ghost whitespace and the newline.
    pub(crate) clusters_with_ghosts: Range<usize>,
    /// Run indices in visual order. An attached ellipsis run sits on the
    /// overflow side: last for left-to-right paragraphs, first for
    /// right-to-left ones.
    pub(crate) visual_runs: Vec<usize>,
    /// Distance from the paragraph top to the line top.
    pub(crate) top: f32,
    /// Horizontal alignment shift.
    pub(crate) shift: f32,
    /// Trimmed width, excluding any attached ellipsis.
    pub(crate) width: f32,
    pub(crate) width_with_spaces: f32,
    pub(crate) metrics: VerticalMetrics,
    pub(crate) hard_break: bool,
    /// Run index of the attached ellipsis, if any.
    pub(crate) ellipsis_run: Option<usize>,
    /// Set by the wrapper; cleared once the ellipsis run is attached.
    pub(crate) needs_ellipsis: bool,
    pub(crate) has_backgrounds: bool,
    pub(crate) has_shadows: bool,
    pub(crate) has_decorations: bool,
}

impl LineData {
    pub(crate) fn baseline(&self) -> f32 {
        self.top + self.metrics.baseline()
    }

    pub(crate) fn height(&self) -> f32 {
        self.metrics.height()
    }
}

/// Groups the glyphs of every run into clusters and builds the
/// code-unit lookup table.
///
/// Clusters come out in text order. Within a left-to-right run glyph
/// storage order matches text order; within a right-to-left run the
/// glyphs are walked backwards so the emitted clusters still ascend by
/// text position.
pub(crate) fn build_clusters(
    runs: &mut [RunData],
    text_len: usize,
    flags: &[CodeUnitFlags],
) -> (Vec<ClusterData>, Vec<u32>) {
    let mut clusters = Vec::new();
    let mut ranges = Vec::with_capacity(runs.len());
    for (run_index, run) in runs.iter().enumerate() {
        let first = clusters.len();
        if run.is_placeholder() {
            clusters.push(make_cluster(
                run_index,
                run.text_range.clone(),
                0..0,
                run.advance,
                flags,
            ));
        } else if run.is_left_to_right() {
            let mut glyph = 0;
            while glyph < run.glyph_count() {
                let text_start = run.clusters[glyph] as usize;
                let mut end = glyph + 1;
                while end < run.glyph_count() && run.clusters[end] as usize == text_start {
                    end += 1;
                }
                let text_end = if end < run.glyph_count() {
                    run.clusters[end] as usize
                } else {
                    run.text_range.end
                };
                let width = run.positions[end].x - run.positions[glyph].x;
                clusters.push(make_cluster(
                    run_index,
                    text_start..text_end,
                    glyph..end,
                    width,
                    flags,
                ));
                glyph = end;
            }
        } else {
            // Visual storage runs right to left through the text, so walk
            // it backwards to emit clusters in text order.
            let mut end = run.glyph_count();
            while end > 0 {
                let text_start = run.clusters[end - 1] as usize;
                let mut glyph = end - 1;
                while glyph > 0 && run.clusters[glyph - 1] as usize == text_start {
                    glyph -= 1;
                }
                let text_end = if glyph > 0 {
                    run.clusters[glyph - 1] as usize
                } else {
                    run.text_range.end
                };
                let width = run.positions[end].x - run.positions[glyph].x;
                clusters.push(make_cluster(
                    run_index,
                    text_start..text_end,
                    glyph..end,
                    width,
                    flags,
                ));
                end = glyph;
            }
        }
        ranges.push(first..clusters.len());
    }
    for (run, range) in runs.iter_mut().zip(ranges) {
        run.cluster_range = range;
    }
    clusters.push(make_cluster(NO_RUN, text_len..text_len, 0..0, 0., flags));

    let mut cluster_of_codeunit = vec![0_u32; text_len + 1];
    for (index, cluster) in clusters.iter().enumerate() {
        for slot in &mut cluster_of_codeunit[cluster.text_range()] {
            *slot = index as u32;
        }
    }
    cluster_of_codeunit[text_len] = (clusters.len() - 1) as u32;
    (clusters, cluster_of_codeunit)
}

fn make_cluster(
    run_index: usize,
    text: Range<usize>,
    glyphs: Range<usize>,
    width: f32,
    unit_flags: &[CodeUnitFlags],
) -> ClusterData {
    let mut flags = 0;
    if unit_flags[text.end].contains(CodeUnitFlags::HARD_BREAK_BEFORE) {
        flags |= HARD_BREAK;
    }
    // Hard break clusters are ghosts of their line but never plain
    // whitespace; the wrapper trims and absorbs the two differently.
    if flags & HARD_BREAK == 0
        && unit_flags[text.clone()]
            .iter()
            .any(|f| f.contains(CodeUnitFlags::WHITESPACE_BREAK))
    {
        flags |= WHITESPACE_BREAK;
    }
    if unit_flags[text.clone()]
        .iter()
        .any(|f| f.contains(CodeUnitFlags::INTRA_WORD_WHITESPACE))
    {
        flags |= INTRA_WORD_BREAK;
    }
    if unit_flags[text.start].contains(CodeUnitFlags::SOFT_BREAK_BEFORE) {
        flags |= SOFT_BREAK;
    }
    if unit_flags[text.start].contains(CodeUnitFlags::IDEOGRAPHIC) {
        flags |= IDEOGRAPHIC;
    }
    ClusterData {
        run_index,
        text_start: text.start as u32,
        text_len: (text.end - text.start) as u16,
        glyph_start: glyphs.start as u32,
        glyph_len: (glyphs.end - glyphs.start) as u16,
        flags,
        width,
    }
}

/// Applies letter and word spacing, widening clusters and shifting the
/// glyphs that follow them within each run.
///
/// `spacing` holds one `(letter, word)` pair per style block. Within a
/// run the shift accumulates in visual storage order. Word spacing skips
/// whitespace clusters at the start of a run.
pub(crate) fn apply_spacing(
    runs: &mut [RunData],
    clusters: &mut [ClusterData],
    spacing: &[(f32, f32)],
) {
    for run in runs.iter_mut() {
        if run.is_placeholder() || run.is_ellipsis {
            continue;
        }
        let (letter, word) = spacing[run.block_index];
        if letter == 0. && word == 0. {
            continue;
        }
        let ltr = run.is_left_to_right();
        let range = run.cluster_range.clone();
        let mut acc = 0.;
        let mut whitespace_so_far = true;
        let mut step = |index: usize, acc: &mut f32, whitespace_so_far: &mut bool| {
            let cluster = &mut clusters[index];
            for shift in &mut run.shifts[cluster.glyph_range()] {
                *shift += *acc;
            }
            let mut extra = letter;
            if cluster.is_whitespace_break() && !*whitespace_so_far {
                extra += word;
            }
            *whitespace_so_far &= cluster.is_whitespace_break();
            cluster.width += extra;
            *acc += extra;
        };
        if ltr {
            for index in range {
                step(index, &mut acc, &mut whitespace_so_far);
            }
        } else {
            // Storage order is reversed text order.
            for index in range.rev() {
                step(index, &mut acc, &mut whitespace_so_far);
            }
        }
        let count = run.glyph_count();
        run.shifts[count] += acc;
        run.advance += acc;
    }
}
