// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paragraph itself: pipeline driver, query surface and mutators.
//!
//! Layout is staged. Each stage owns a flat array (runs, clusters,
//! lines) and a state marker records how far the pipeline has run, so
//! mutators only rewind as far as their change requires.

use core::fmt;
use core::ops::Range;
use std::cell::OnceCell;
use std::sync::Arc;

use peniko::kurbo::Rect;

use crate::font::{Font, FontCollection};
use crate::itemize::{index_text, TextIndex};
use crate::layout::data::{
    apply_spacing, build_clusters, ClusterData, LineData, RunData, StrutMetrics, VerticalMetrics,
    NO_RUN,
};
use crate::layout::line::wrap::{break_lines, single_line, AddedLine, BreakOptions};
use crate::layout::{
    alignment, reorder_visual, Affinity, GlyphClusterInfo, Line, LineMetrics,
    PositionWithAffinity, RectHeightStyle, RectWidthStyle, Run, TextBox,
};
use crate::paint::{self, GlyphBlob, Painter};
use crate::shape::{shape_ellipsis, shape_text, ShapeStyle};
use crate::shaper::Shaper;
use crate::style::{
    Block, Brush, ParagraphStyle, Placeholder, PlaceholderStyle, TextAlign, TextDirection,
};
use crate::unicode::{CodeUnitFlags, Unicode};
use crate::utf16::Utf16Map;
use crate::util;

/// Pipeline progress, strictly ordered.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub(crate) enum LayoutState {
    Unknown,
    Indexed,
    Shaped,
    LineBroken,
    Formatted,
}

/// A laid out rich text paragraph.
///
/// Built by [`ParagraphBuilder`](crate::ParagraphBuilder); the text and
/// block structure are immutable afterwards. Call [`layout`](Self::layout)
/// before querying or painting, and again after any mutator.
pub struct Paragraph<B: Brush> {
    pub(crate) text: String,
    pub(crate) style: ParagraphStyle<B>,
    pub(crate) blocks: Vec<Block<B>>,
    pub(crate) placeholders: Vec<Placeholder>,

    shaper: Arc<dyn Shaper>,
    fonts: Arc<dyn FontCollection>,
    unicode: Arc<dyn Unicode>,

    state: LayoutState,
    index: TextIndex,
    pub(crate) runs: Vec<RunData>,
    /// Number of runs produced by shaping; the tail holds per-layout
    /// ellipsis runs.
    base_run_count: usize,
    pub(crate) clusters: Vec<ClusterData>,
    pub(crate) cluster_of_codeunit: Vec<u32>,
    pub(crate) lines: Vec<LineData>,
    pub(crate) strut: StrutMetrics,
    empty_metrics: VerticalMetrics,

    width: f32,
    height: f32,
    min_intrinsic_width: f32,
    max_intrinsic_width: f32,
    longest_line: f32,
    alphabetic_baseline: f32,
    ideographic_baseline: f32,
    exceeded_max_lines: bool,
    unresolved_glyphs: usize,
    unresolved_codepoints: Vec<char>,

    utf16: OnceCell<Utf16Map>,
    pub(crate) blobs: Vec<Vec<GlyphBlob>>,
}

impl<B: Brush> Paragraph<B> {
    pub(crate) fn new(
        text: String,
        style: ParagraphStyle<B>,
        blocks: Vec<Block<B>>,
        placeholders: Vec<Placeholder>,
        shaper: Arc<dyn Shaper>,
        fonts: Arc<dyn FontCollection>,
        unicode: Arc<dyn Unicode>,
    ) -> Self {
        Self {
            text,
            style,
            blocks,
            placeholders,
            shaper,
            fonts,
            unicode,
            state: LayoutState::Unknown,
            index: TextIndex::default(),
            runs: Vec::new(),
            base_run_count: 0,
            clusters: Vec::new(),
            cluster_of_codeunit: Vec::new(),
            lines: Vec::new(),
            strut: StrutMetrics::default(),
            empty_metrics: VerticalMetrics::default(),
            width: f32::NAN,
            height: 0.,
            min_intrinsic_width: 0.,
            max_intrinsic_width: 0.,
            longest_line: 0.,
            alphabetic_baseline: 0.,
            ideographic_baseline: 0.,
            exceeded_max_lines: false,
            unresolved_glyphs: 0,
            unresolved_codepoints: Vec::new(),
            utf16: OnceCell::new(),
            blobs: Vec::new(),
        }
    }

    /// Lays the text out against `raw_width`.
    ///
    /// Reuses as much of the previous layout as the width change allows:
    /// an unchanged width reformats at most, and a single line that still
    /// fits is realigned without breaking the text again.
    pub fn layout(&mut self, raw_width: f32) {
        let floor_width = if self.style.apply_rounding_hack {
            raw_width.floor()
        } else {
            raw_width
        };

        if self.state >= LayoutState::LineBroken
            && self.lines.len() == 1
            && self.lines[0].ellipsis_run.is_none()
            && (!raw_width.is_finite() || self.longest_line <= floor_width)
        {
            self.width = floor_width;
            self.format();
            self.state = LayoutState::Formatted;
            return;
        }

        if self.state >= LayoutState::LineBroken && self.width != floor_width {
            self.state = LayoutState::Shaped;
        }
        self.width = floor_width;

        if self.state < LayoutState::Indexed {
            self.index = index_text(&self.unicode, &self.text, self.style.direction);
            self.state = LayoutState::Indexed;
        }
        if self.state < LayoutState::Shaped {
            self.shape();
            self.state = LayoutState::Shaped;
        }
        if self.state < LayoutState::LineBroken {
            self.break_into_lines();
            self.state = LayoutState::LineBroken;
        }
        if self.state < LayoutState::Formatted {
            self.format();
            self.state = LayoutState::Formatted;
        }
    }

    fn shape(&mut self) {
        let styles: Vec<ShapeStyle<'_>> = self
            .blocks
            .iter()
            .map(|block| ShapeStyle {
                range: block.range.clone(),
                families: &block.style.font_families,
                font_style: block.style.font_style,
                font_size: block.style.font_size,
                features: &block.style.font_features,
                locale: &block.style.locale,
                height: block.style.height,
                half_leading: block.style.half_leading,
                baseline_shift: block.style.baseline_shift,
            })
            .collect();
        let shaped = shape_text(
            &self.text,
            &styles,
            &self.placeholders,
            &self.index,
            self.shaper.as_ref(),
            self.fonts.as_ref(),
            self.unicode.as_ref(),
        );
        self.runs = shaped.runs;
        self.base_run_count = self.runs.len();
        self.unresolved_glyphs = shaped.unresolved_glyphs;
        self.unresolved_codepoints = shaped.unresolved_codepoints;

        let (clusters, map) = build_clusters(&mut self.runs, self.text.len(), &self.index.flags);
        self.clusters = clusters;
        self.cluster_of_codeunit = map;

        let spacing: Vec<(f32, f32)> = self
            .blocks
            .iter()
            .map(|block| (block.style.letter_spacing, block.style.word_spacing))
            .collect();
        apply_spacing(&mut self.runs, &mut self.clusters, &spacing);
    }

    fn break_into_lines(&mut self) {
        self.resolve_strut();
        self.compute_empty_metrics();
        self.runs.truncate(self.base_run_count);
        alignment::unjustify(&self.runs, &mut self.clusters, &mut self.lines);
        self.lines.clear();
        self.blobs.clear();
        self.exceeded_max_lines = false;
        self.height = 0.;
        self.min_intrinsic_width = 0.;
        self.max_intrinsic_width = 0.;
        self.longest_line = 0.;

        if self.runs.is_empty() {
            // Empty text, or nothing the shaper could work with. The
            // paragraph still has a height.
            self.height = self.empty_metrics.height();
            self.alphabetic_baseline = self.empty_metrics.baseline();
            self.ideographic_baseline = self.empty_metrics.baseline() + self.empty_metrics.descent;
            return;
        }

        if self.style.max_lines == Some(0) {
            self.exceeded_max_lines = true;
            self.alphabetic_baseline = self.empty_metrics.baseline();
            self.ideographic_baseline = self.empty_metrics.baseline() + self.empty_metrics.descent;
            return;
        }

        let placeholder_styles: Vec<PlaceholderStyle> = self
            .placeholders
            .iter()
            .map(|placeholder| placeholder.style.clone())
            .collect();
        let options = BreakOptions {
            max_width: self.width,
            max_lines: self.style.max_lines,
            has_ellipsis: self.style.ellipsized(),
            strut: &self.strut,
            empty_metrics: &self.empty_metrics,
            text_len: self.text.len(),
            height_behavior: self.style.text_height_behavior,
            rounding_hack: self.style.apply_rounding_hack,
        };
        let (added, result) = if self.fits_on_one_line() {
            single_line(&self.clusters, &self.runs, &options)
        } else {
            break_lines(&self.clusters, &mut self.runs, &placeholder_styles, &options)
        };

        self.exceeded_max_lines = result.exceeded;
        self.min_intrinsic_width = result.min_intrinsic;
        self.max_intrinsic_width = result.max_intrinsic;
        self.height = result.height;
        if self.style.max_lines == Some(1)
            || (self.style.max_lines.is_none() && self.style.ellipsized())
        {
            self.min_intrinsic_width = self.max_intrinsic_width;
        }

        for line in added {
            self.push_line(line);
        }

        if let Some(first) = self.lines.first() {
            self.alphabetic_baseline = first.baseline();
            self.ideographic_baseline = first.baseline() + first.metrics.descent;
        } else {
            self.alphabetic_baseline = self.empty_metrics.baseline();
            self.ideographic_baseline = self.empty_metrics.baseline() + self.empty_metrics.descent;
        }
    }

    /// A lone run with no break opportunity that fits the width lays
    /// out as one line without running the breaker. Trailing whitespace
    /// is fine; whitespace inside the text is not.
    fn fits_on_one_line(&self) -> bool {
        if self.index.has_hard_breaks || !self.placeholders.is_empty() || self.runs.len() != 1 {
            return false;
        }
        let inside = self
            .index
            .first_whitespace
            .is_some_and(|first| first < self.index.trailing_whitespace);
        !inside && self.runs[0].advance <= self.width
    }

    fn push_line(&mut self, added: AddedLine) {
        let natural = if util::nearly_zero(added.width) {
            added.width_with_spaces
        } else {
            added.width
        };
        self.longest_line = self.longest_line.max(natural);

        let mut line = LineData {
            text_range: added.text,
            text_with_spaces: added.text_with_spaces,
            text_with_newlines: added.text_with_newlines,
            cluster_range: added.clusters,
            clusters_with_ghosts: added.clusters_with_ghosts,
            visual_runs: Vec::new(),
            top: added.top,
            shift: 0.,
            width: added.width,
            width_with_spaces: added.width_with_spaces,
            metrics: added.metrics,
            hard_break: added.hard_break,
            ellipsis_run: None,
            needs_ellipsis: added.needs_ellipsis,
            has_backgrounds: false,
            has_shadows: false,
            has_decorations: false,
        };
        if line.needs_ellipsis {
            self.attach_ellipsis(&mut line);
        }
        self.order_visual_runs(&mut line);
        if let Some(index) = line.ellipsis_run {
            match self.style.direction {
                TextDirection::Ltr => line.visual_runs.push(index),
                TextDirection::Rtl => line.visual_runs.insert(0, index),
            }
        }
        self.classify_paint(&mut line);
        self.lines.push(line);
    }

    /// Collects the runs intersecting the line and reorders them into
    /// visual order by bidi level.
    fn order_visual_runs(&self, line: &mut LineData) {
        let mut indices = Vec::new();
        let mut current = NO_RUN;
        for cluster in &self.clusters[line.clusters_with_ghosts.clone()] {
            if cluster.run_index != current {
                current = cluster.run_index;
                indices.push(current);
            }
        }
        reorder_visual(&self.runs, &mut indices);
        line.visual_runs = indices;
    }

    /// Replaces enough of the line's tail with an ellipsis run shaped in
    /// the font of the trimmed content.
    fn attach_ellipsis(&mut self, line: &mut LineData) {
        line.needs_ellipsis = false;
        let Some(ellipsis) = self.style.ellipsis.clone() else {
            return;
        };
        let start = line.cluster_range.start;
        let mut end = line.clusters_with_ghosts.end;
        let mut width = line.width_with_spaces;
        let mut shaped: Option<(usize, RunData)> = None;

        while end > start {
            let cluster = self.clusters[end - 1];
            if shaped.as_ref().map(|(donor, _)| *donor) != Some(cluster.run_index) {
                shaped = self
                    .ellipsis_run_for(&ellipsis, cluster.run_index)
                    .map(|run| (cluster.run_index, run));
            }
            if let Some((_, run)) = &shaped {
                if width + run.advance <= self.width {
                    break;
                }
            }
            width -= cluster.width;
            end -= 1;
        }

        if end == start {
            // Nothing fits next to the ellipsis; the line keeps only it.
            width = 0.;
            if shaped.is_none() {
                let donor = self
                    .clusters
                    .get(start)
                    .map(|cluster| cluster.run_index)
                    .filter(|index| *index < self.runs.len())
                    .unwrap_or(0);
                shaped = self
                    .ellipsis_run_for(&ellipsis, donor)
                    .map(|run| (donor, run));
            }
        }

        let Some((donor, mut run)) = shaped else {
            log::warn!("no font could shape the overflow ellipsis {ellipsis:?}");
            return;
        };

        let text_end = if end > start {
            self.clusters[end - 1].text_range().end
        } else {
            line.text_range.start
        };
        line.cluster_range.end = end;
        line.clusters_with_ghosts.end = end;
        line.text_range.end = text_end;
        line.text_with_spaces.end = text_end;
        line.text_with_newlines.end = text_end;
        line.width = width;
        line.width_with_spaces = width;

        let block_index = self.runs[donor].block_index;
        run.block_index = block_index;
        run.baseline_shift = self.runs[donor].baseline_shift;
        run.bidi_level = self.style.base_level();
        run.text_range = text_end..text_end;
        let style = &self.blocks[block_index].style;
        run.compute_corrected_metrics(style.height, style.half_leading);

        line.ellipsis_run = Some(self.runs.len());
        self.runs.push(run);
    }

    /// Shapes the ellipsis in the donor run's font. When that font lacks
    /// the needed glyphs, walks the donor style's families and finally
    /// collection fallback.
    fn ellipsis_run_for(&self, ellipsis: &str, donor: usize) -> Option<RunData> {
        let run = self.runs.get(donor)?;
        if let Some(font) = &run.font {
            if let Some(shaped) = shape_ellipsis(ellipsis, font, self.shaper.as_ref()) {
                return Some(shaped);
            }
        }
        let style = &self.blocks[run.block_index].style;
        for typeface in self
            .fonts
            .find_typefaces(&style.font_families, style.font_style)
        {
            let tried = run
                .font
                .as_ref()
                .is_some_and(|font| font.typeface().unique_id() == typeface.unique_id());
            if tried {
                continue;
            }
            let font = Font::new(typeface, style.font_size);
            if let Some(shaped) = shape_ellipsis(ellipsis, &font, self.shaper.as_ref()) {
                return Some(shaped);
            }
        }
        let codepoint = ellipsis.chars().next()?;
        let typeface = self
            .fonts
            .default_fallback(codepoint, style.font_style, &style.locale)?;
        let font = Font::new(typeface, style.font_size);
        shape_ellipsis(ellipsis, &font, self.shaper.as_ref())
    }

    fn classify_paint(&self, line: &mut LineData) {
        for &run in &line.visual_runs {
            let style = &self.blocks[self.runs[run].block_index].style;
            line.has_backgrounds |= style.has_background();
            line.has_shadows |= style.has_shadows();
            line.has_decorations |= style.has_decorations();
        }
    }

    fn resolve_strut(&mut self) {
        self.strut = StrutMetrics::default();
        let style = &self.style.strut;
        if !style.enabled || style.font_size <= 0. {
            return;
        }
        let typefaces = self.fonts.find_typefaces(&style.font_families, style.font_style);
        let Some(typeface) = typefaces.into_iter().next() else {
            log::warn!("no strut typeface for families {:?}", style.font_families);
            return;
        };
        let metrics = typeface.metrics(style.font_size);
        let leading = match style.leading {
            Some(leading) => leading * style.font_size,
            None => metrics.leading,
        };
        let (ascent, descent) = match style.height {
            Some(height) => {
                let intrinsic = metrics.ascent + metrics.descent;
                let target = height * style.font_size;
                if style.half_leading {
                    let extra = (target - intrinsic) * 0.5;
                    (metrics.ascent + extra, metrics.descent + extra)
                } else if intrinsic > 0. {
                    (
                        metrics.ascent / intrinsic * target,
                        metrics.descent / intrinsic * target,
                    )
                } else {
                    (metrics.ascent, metrics.descent)
                }
            }
            None => (metrics.ascent, metrics.descent),
        };
        self.strut = StrutMetrics {
            metrics: VerticalMetrics {
                ascent,
                descent,
                leading,
                raw_ascent: metrics.ascent,
                raw_descent: metrics.descent,
                force: false,
            },
            enabled: true,
            force: style.force_height,
        };
    }

    /// Line box for lines with nothing measurable on them, and for the
    /// empty paragraph. An empty paragraph sizes itself from the last
    /// style block; empty lines inside text use the paragraph default.
    fn compute_empty_metrics(&mut self) {
        let style = if self.runs.is_empty() {
            self.blocks
                .last()
                .map(|block| &block.style)
                .unwrap_or(&self.style.text_style)
        } else {
            &self.style.text_style
        };
        let typefaces = self.fonts.find_typefaces(&style.font_families, style.font_style);
        let metrics = typefaces
            .first()
            .map(|typeface| typeface.metrics(style.font_size))
            .unwrap_or_default();
        let mut empty = VerticalMetrics {
            ascent: metrics.ascent,
            descent: metrics.descent,
            leading: metrics.leading,
            raw_ascent: metrics.ascent,
            raw_descent: metrics.descent,
            force: self.style.strut.force_height,
        };
        if !self.style.strut.force_height {
            if let Some(height) = style.height {
                let target = height * style.font_size;
                let intrinsic = empty.height();
                if intrinsic > 0. {
                    if style.half_leading {
                        let extra = (target - (empty.ascent + empty.descent)) * 0.5;
                        empty.ascent += extra;
                        empty.descent += extra;
                    } else {
                        let multiplier = target / intrinsic;
                        empty.ascent *= multiplier;
                        empty.descent *= multiplier;
                        empty.leading *= multiplier;
                    }
                }
            }
        }
        if self.style.strut.enabled {
            self.strut.update_line(&mut empty);
        }
        self.empty_metrics = empty;
    }

    fn format(&mut self) {
        alignment::unjustify(&self.runs, &mut self.clusters, &mut self.lines);
        alignment::format_lines(
            &mut self.lines,
            &self.runs,
            &mut self.clusters,
            self.style.effective_align(),
            self.style.direction,
            self.width,
        );
        self.blobs.clear();
    }

    /// Paints the paragraph with its origin at `(x, y)`.
    pub fn paint(&mut self, painter: &mut dyn Painter<B>, x: f32, y: f32) {
        paint::paint(self, painter, x, y);
    }

    // ---------------------------------------------------------------
    // Accessors

    /// The text the paragraph was built over.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The paragraph style.
    pub fn style(&self) -> &ParagraphStyle<B> {
        &self.style
    }

    /// Width the last layout was given, after rounding.
    pub fn width_limit(&self) -> f32 {
        self.width
    }

    /// Summed height of the laid out lines.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Width of the widest word; breaking below this cuts words apart.
    pub fn min_intrinsic_width(&self) -> f32 {
        self.min_intrinsic_width
    }

    /// Width the text would take laid out without any soft breaks.
    pub fn max_intrinsic_width(&self) -> f32 {
        self.max_intrinsic_width
    }

    /// Width of the widest laid out line.
    pub fn longest_line(&self) -> f32 {
        self.longest_line
    }

    /// Distance from the paragraph top to the first baseline.
    pub fn alphabetic_baseline(&self) -> f32 {
        self.alphabetic_baseline
    }

    /// Distance from the paragraph top to the bottom of the first line's
    /// text box.
    pub fn ideographic_baseline(&self) -> f32 {
        self.ideographic_baseline
    }

    /// Returns `true` when `max_lines` cut the text short.
    pub fn did_exceed_max_lines(&self) -> bool {
        self.exceeded_max_lines
    }

    /// Number of laid out lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the line at `index`.
    pub fn line(&self, index: usize) -> Option<Line<'_, B>> {
        (index < self.lines.len()).then(|| Line::new(self, index))
    }

    /// Returns an iterator over the laid out lines.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_, B>> + '_ + Clone {
        (0..self.lines.len()).map(move |index| Line::new(self, index))
    }

    /// Number of glyphs no typeface could resolve.
    pub fn unresolved_glyph_count(&self) -> usize {
        self.unresolved_glyphs
    }

    /// Sorted codepoints that stayed unresolved through font fallback.
    pub fn unresolved_codepoints(&self) -> &[char] {
        &self.unresolved_codepoints
    }

    // ---------------------------------------------------------------
    // Queries. All text offsets on this surface are UTF-16 code units.

    /// Returns the bounding boxes covering the text range.
    ///
    /// Offsets snap to grapheme boundaries. One box is produced per
    /// directional span per line; `height_style` and `width_style`
    /// control the vertical and horizontal extents.
    pub fn rects_for_range(
        &self,
        range: Range<usize>,
        height_style: RectHeightStyle,
        width_style: RectWidthStyle,
    ) -> Vec<TextBox> {
        let mut boxes = Vec::new();
        if self.text.is_empty() {
            if range.start == 0 && range.end > 0 {
                boxes.push(TextBox {
                    rect: Rect::new(0., 0., 0., f64::from(self.height)),
                    direction: self.style.direction,
                });
            }
            return boxes;
        }
        if range.start >= range.end || !self.indexed() {
            return boxes;
        }
        let map = self.utf16_map();
        let start = self.prev_grapheme(map.utf8(range.start));
        let end = self.prev_grapheme(map.utf8(range.end));
        if start >= end {
            return boxes;
        }
        let query = start..end;

        for index in 0..self.lines.len() {
            let line_text = self.lines[index].text_with_newlines.clone();
            let intersect = util::intersect(&line_text, &query);
            if intersect.is_empty() && line_text.start != query.start {
                continue;
            }
            self.line_boxes(index, &intersect, height_style, width_style, &mut boxes);
        }
        boxes
    }

    /// Returns one box per laid out placeholder, in text order.
    pub fn rects_for_placeholders(&self) -> Vec<TextBox> {
        let mut boxes = Vec::new();
        for index in 0..self.lines.len() {
            let line = Line::new(self, index);
            for span in line.glyph_runs() {
                let run = span.run();
                if !run.is_placeholder() {
                    continue;
                }
                let baseline = span.baseline();
                let top = baseline - run.ascent();
                let bottom = baseline + run.descent();
                boxes.push(TextBox {
                    rect: Rect::new(
                        f64::from(span.offset()),
                        f64::from(top),
                        f64::from(span.offset() + span.advance()),
                        f64::from(bottom),
                    ),
                    direction: self.style.direction,
                });
            }
        }
        boxes
    }

    /// Returns the caret position closest to the point.
    ///
    /// The line is chosen by `dy`, clamped to the last line; within the
    /// line the cluster containing `dx` decides between its edges, the
    /// nearer one winning. Affinity leans upstream at a cluster's
    /// trailing edge and downstream at its leading edge.
    pub fn hit_test(&self, dx: f32, dy: f32) -> PositionWithAffinity {
        let mut result = PositionWithAffinity::default();
        if self.text.is_empty() || self.lines.is_empty() {
            return result;
        }
        let mut chosen = self.lines.len() - 1;
        for (index, line) in self.lines.iter().enumerate() {
            if dy < line.top + line.height() {
                chosen = index;
                break;
            }
        }
        let (offset, affinity) = self.hit_test_line(chosen, dx);
        result.position = self.utf16_map().utf16(offset);
        result.affinity = affinity;
        result
    }

    fn hit_test_line(&self, index: usize, dx: f32) -> (usize, Affinity) {
        let line = Line::new(self, index);
        let mut cells: Vec<(f32, f32, Range<usize>, bool)> = Vec::new();
        for span in line.glyph_runs() {
            let run = span.run();
            if run.is_ellipsis() {
                continue;
            }
            let rtl = run.is_rtl();
            for (cluster, left) in span.cluster_xs() {
                // The newline is not a caret position of this line.
                if cluster.is_hard_break() {
                    continue;
                }
                cells.push((left, cluster.width(), cluster.text_range(), rtl));
            }
        }
        let Some(first) = cells.first() else {
            return (line.data().text_with_newlines.start, Affinity::Downstream);
        };
        if dx < first.0 {
            return if first.3 {
                (first.2.end, Affinity::Upstream)
            } else {
                (first.2.start, Affinity::Downstream)
            };
        }
        for (left, width, text, rtl) in &cells {
            if dx < left + width {
                return if dx < left + width * 0.5 {
                    if *rtl {
                        (text.end, Affinity::Upstream)
                    } else {
                        (text.start, Affinity::Downstream)
                    }
                } else if *rtl {
                    (text.start, Affinity::Downstream)
                } else {
                    (text.end, Affinity::Upstream)
                };
            }
        }
        let last = &cells[cells.len() - 1];
        if last.3 {
            (last.2.start, Affinity::Downstream)
        } else {
            (last.2.end, Affinity::Upstream)
        }
    }

    /// Returns the word range containing the offset: the maximal span of
    /// code units bounded by whitespace or control characters, or the
    /// span of those separators themselves.
    pub fn word_boundary(&self, offset: usize) -> Range<usize> {
        if self.text.is_empty() || !self.indexed() {
            return 0..0;
        }
        let map = self.utf16_map();
        let last = map.len16().saturating_sub(1);
        let target = map.utf8(offset.min(last));
        let separator = |offset: usize| {
            let flags = self.index.flags[offset];
            flags.contains(CodeUnitFlags::WHITESPACE_BREAK)
                || flags.contains(CodeUnitFlags::CONTROL)
        };
        let class = separator(target);
        let mut start = target;
        while start > 0 && separator(start - 1) == class {
            start -= 1;
        }
        let mut end = target;
        while end < self.text.len() && separator(end) == class {
            end += 1;
        }
        map.utf16(start)..map.utf16(end)
    }

    /// Returns the measurements of every line.
    pub fn line_metrics(&self) -> Vec<LineMetrics> {
        (0..self.lines.len())
            .map(|index| self.line_metrics_of(index))
            .collect()
    }

    /// Returns the measurements of one line.
    pub fn line_metrics_at(&self, index: usize) -> Option<LineMetrics> {
        (index < self.lines.len()).then(|| self.line_metrics_of(index))
    }

    fn line_metrics_of(&self, index: usize) -> LineMetrics {
        let map = self.utf16_map();
        let data = &self.lines[index];
        let sentinel = self.clusters.len().saturating_sub(1);
        let mut width = data.width;
        if let Some(run) = data.ellipsis_run {
            width += self.runs[run].advance;
        }
        LineMetrics {
            start_index: map.utf16(data.text_range.start),
            end_index: map.utf16(data.text_with_spaces.end),
            end_excluding_whitespace: map.utf16(data.text_range.end),
            end_including_newline: map.utf16(data.text_with_newlines.end),
            hard_break: alignment::ends_with_hard_break(data, sentinel),
            ascent: data.metrics.ascent,
            descent: data.metrics.descent,
            unscaled_ascent: data.metrics.raw_ascent,
            height: data.height(),
            width: util::little_round(width),
            left: data.shift,
            baseline: data.baseline(),
            line_number: index,
        }
    }

    /// Returns the index of the line containing the offset.
    pub fn line_number_at(&self, offset: usize) -> Option<usize> {
        let target = self.utf16_map().utf8(offset);
        if target >= self.text.len() {
            return None;
        }
        self.lines
            .iter()
            .position(|line| line.text_with_newlines.contains(&target))
    }

    /// Returns the text range of a line, with or without its trailing
    /// whitespace. Out of range indices produce an empty range.
    pub fn actual_text_range(&self, index: usize, include_spaces: bool) -> Range<usize> {
        let Some(data) = self.lines.get(index) else {
            return 0..0;
        };
        let map = self.utf16_map();
        let range = if include_spaces {
            &data.text_with_spaces
        } else {
            &data.text_range
        };
        map.utf16(range.start)..map.utf16(range.end)
    }

    /// Returns the glyph cluster containing the offset, with its bounds
    /// relative to the paragraph origin.
    pub fn glyph_cluster_at(&self, offset: usize) -> Option<GlyphClusterInfo> {
        let map = self.utf16_map();
        let target = map.utf8(offset);
        if target >= self.text.len() {
            return None;
        }
        let index = *self.cluster_of_codeunit.get(target)? as usize;
        let cluster = self.clusters.get(index)?;
        if cluster.run_index == NO_RUN {
            return None;
        }
        let line_index = self
            .lines
            .iter()
            .position(|line| line.clusters_with_ghosts.contains(&index))?;
        let line = Line::new(self, line_index);
        for span in line.glyph_runs() {
            let run = span.run();
            if run.is_ellipsis() {
                continue;
            }
            for (candidate, left) in span.cluster_xs() {
                if candidate.index() != index {
                    continue;
                }
                let baseline = span.baseline();
                let top = baseline - run.ascent();
                let text = candidate.text_range();
                return Some(GlyphClusterInfo {
                    bounds: Rect::new(
                        f64::from(left),
                        f64::from(top),
                        f64::from(left + candidate.width()),
                        f64::from(baseline + run.descent()),
                    ),
                    text_range: map.utf16(text.start)..map.utf16(text.end),
                    direction: run.direction(),
                });
            }
        }
        None
    }

    /// Returns the font shaping the text at the offset.
    pub fn font_at(&self, offset: usize) -> Option<Font> {
        let target = self.utf16_map().utf8(offset);
        if target >= self.text.len() {
            return None;
        }
        let index = *self.cluster_of_codeunit.get(target)? as usize;
        let cluster = self.clusters.get(index)?;
        self.runs.get(cluster.run_index)?.font.clone()
    }

    // ---------------------------------------------------------------
    // Mutators. Each rewinds the pipeline no further than its change
    // requires; call `layout` again before querying.

    /// Changes the paragraph alignment. Only formatting is redone.
    pub fn update_text_align(&mut self, align: TextAlign) {
        self.style.align = align;
        self.state = self.state.min(LayoutState::LineBroken);
    }

    /// Changes the font size of every style block intersecting the byte
    /// range.
    pub fn update_font_size(&mut self, range: Range<usize>, size: f32) {
        if range.start == 0 && range.end >= self.text.len() {
            self.style.text_style.font_size = size;
        }
        for block in self.blocks_in(range) {
            block.style.font_size = size;
        }
        self.state = LayoutState::Unknown;
    }

    /// Repaints every style block intersecting the byte range with a new
    /// glyph brush.
    pub fn update_foreground(&mut self, range: Range<usize>, brush: B) {
        for block in self.blocks_in(range) {
            block.style.foreground = brush.clone();
        }
        self.state = LayoutState::Unknown;
    }

    /// Changes the background brush of every style block intersecting
    /// the byte range; `None` clears it.
    pub fn update_background(&mut self, range: Range<usize>, brush: Option<B>) {
        for block in self.blocks_in(range) {
            block.style.background = brush.clone();
        }
        self.state = LayoutState::Unknown;
    }

    /// Invalidates shaping onward; the text analysis is kept.
    pub fn mark_dirty(&mut self) {
        self.state = self.state.min(LayoutState::Indexed);
    }

    fn blocks_in(&mut self, range: Range<usize>) -> impl Iterator<Item = &mut Block<B>> + '_ {
        self.blocks
            .iter_mut()
            .filter(move |block| block.range.start < range.end && range.start < block.range.end)
    }

    // ---------------------------------------------------------------
    // Internal helpers

    pub(crate) fn utf16_map(&self) -> &Utf16Map {
        self.utf16.get_or_init(|| Utf16Map::new(&self.text))
    }

    fn indexed(&self) -> bool {
        self.index.flags.len() == self.text.len() + 1
    }

    /// Snaps an offset to the grapheme boundary at or before it.
    fn prev_grapheme(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while offset > 0 && !self.index.has_flag(offset, CodeUnitFlags::GRAPHEME_START) {
            offset -= 1;
        }
        offset
    }

    fn line_boxes(
        &self,
        index: usize,
        query: &Range<usize>,
        height_style: RectHeightStyle,
        width_style: RectWidthStyle,
        boxes: &mut Vec<TextBox>,
    ) {
        let line = Line::new(self, index);
        let first_box = boxes.len();
        for span in line.glyph_runs() {
            let run = span.run();
            if run.is_ellipsis() {
                continue;
            }
            let mut left = f32::INFINITY;
            let mut right = f32::NEG_INFINITY;
            for (cluster, x) in span.cluster_xs() {
                let text = cluster.text_range();
                if text.start < query.end && query.start < text.end {
                    left = left.min(x);
                    right = right.max(x + cluster.width());
                }
            }
            if left > right {
                continue;
            }
            let (top, bottom) = self.box_extent(index, &run, height_style);
            boxes.push(TextBox {
                rect: Rect::new(
                    f64::from(left),
                    f64::from(top),
                    f64::from(right),
                    f64::from(bottom),
                ),
                direction: run.direction(),
            });
        }
        if width_style == RectWidthStyle::Max && boxes.len() > first_box {
            let data = line.data();
            let line_left = f64::from(data.shift);
            let line_right = f64::from(data.shift + line.width());
            let mut leftmost = first_box;
            let mut rightmost = first_box;
            for candidate in first_box..boxes.len() {
                if boxes[candidate].rect.x0 < boxes[leftmost].rect.x0 {
                    leftmost = candidate;
                }
                if boxes[candidate].rect.x1 > boxes[rightmost].rect.x1 {
                    rightmost = candidate;
                }
            }
            if boxes[leftmost].rect.x0 > line_left {
                boxes[leftmost].rect.x0 = line_left;
            }
            if boxes[rightmost].rect.x1 < line_right {
                boxes[rightmost].rect.x1 = line_right;
            }
        }
    }

    fn box_extent(
        &self,
        index: usize,
        run: &Run<'_, B>,
        height_style: RectHeightStyle,
    ) -> (f32, f32) {
        let data = &self.lines[index];
        let first = index == 0;
        let last = index + 1 == self.lines.len();
        let baseline = data.baseline();
        let tight = (
            baseline + run.baseline_shift() - run.ascent(),
            baseline + run.baseline_shift() + run.descent(),
        );
        match height_style {
            RectHeightStyle::Tight => tight,
            RectHeightStyle::Max => (
                data.top + data.metrics.leading * 0.5,
                data.top + data.height(),
            ),
            RectHeightStyle::IncludeLineSpacingTop => {
                let shift = data.metrics.ascent - data.metrics.raw_ascent;
                let top = data.top
                    + data.metrics.leading * 0.5
                    + if first { shift } else { 0. };
                (top, data.top + data.height())
            }
            RectHeightStyle::IncludeLineSpacingMiddle => {
                let shift = (data.metrics.ascent - data.metrics.raw_ascent) * 0.5;
                let top = data.top
                    + data.metrics.leading * 0.5
                    + shift
                    + if first { shift } else { 0. };
                let bottom = data.top + data.height() + shift - if last { shift } else { 0. };
                (top, bottom)
            }
            RectHeightStyle::IncludeLineSpacingBottom => {
                let shift = data.metrics.ascent - data.metrics.raw_ascent;
                let top = data.top + data.metrics.leading * 0.5 + shift;
                let bottom = data.top + data.height() + if last { 0. } else { shift };
                (top, bottom)
            }
            RectHeightStyle::Strut => {
                let style = &self.style.strut;
                if style.enabled && style.font_size > 0. {
                    (
                        baseline - self.strut.metrics.ascent,
                        baseline + self.strut.metrics.descent,
                    )
                } else {
                    tight
                }
            }
        }
    }
}

impl<B: Brush> fmt::Debug for Paragraph<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paragraph")
            .field("text", &self.text)
            .field("state", &self.state)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("lines", &self.lines.len())
            .finish_non_exhaustive()
    }
}
