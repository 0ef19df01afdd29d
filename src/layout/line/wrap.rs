// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy width-driven line breaking over the cluster array.
//!
//! The breaker looks ahead from the current position accumulating three
//! moving stretches: the line built so far, the complete words since the
//! last break opportunity and the partial word after them. When a cluster
//! no longer fits, whatever combination of stretches is allowed on the
//! line moves forward, trailing whitespace is trimmed into ghost clusters
//! and the next line starts after them. Words wider than the available
//! width break mid-word; single clusters wider than the width are kept
//! whole and overflow.

use core::ops::Range;

use crate::layout::data::{ClusterData, RunData, StrutMetrics, VerticalMetrics, NO_RUN};
use crate::style::{PlaceholderStyle, TextHeightBehavior};
use crate::util::little_round;

/// Inputs that shape the breaking pass.
pub(crate) struct BreakOptions<'a> {
    pub(crate) max_width: f32,
    /// `None` keeps producing lines until the text runs out.
    pub(crate) max_lines: Option<usize>,
    pub(crate) has_ellipsis: bool,
    pub(crate) strut: &'a StrutMetrics,
    /// Line box for lines without any measurable content.
    pub(crate) empty_metrics: &'a VerticalMetrics,
    pub(crate) text_len: usize,
    pub(crate) height_behavior: TextHeightBehavior,
    pub(crate) rounding_hack: bool,
}

/// One produced line, in wrapper terms; the paragraph turns this into
/// its line record and attaches ellipsis runs where requested.
#[derive(Clone, Debug)]
pub(crate) struct AddedLine {
    pub(crate) text: Range<usize>,
    pub(crate) text_with_spaces: Range<usize>,
    pub(crate) text_with_newlines: Range<usize>,
    pub(crate) clusters: Range<usize>,
    pub(crate) clusters_with_ghosts: Range<usize>,
    pub(crate) width: f32,
    pub(crate) width_with_spaces: f32,
    pub(crate) top: f32,
    pub(crate) metrics: VerticalMetrics,
    pub(crate) hard_break: bool,
    pub(crate) needs_ellipsis: bool,
}

/// Aggregates the wrapper computes while producing lines.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct BreakResult {
    /// The permitted line count ran out before the text did.
    pub(crate) exceeded: bool,
    /// Width of the widest unbreakable piece.
    pub(crate) min_intrinsic: f32,
    /// Width of the widest line if only hard breaks applied.
    pub(crate) max_intrinsic: f32,
    /// Sum of line heights.
    pub(crate) height: f32,
}

/// A contiguous range of clusters plus its width and accumulated line
/// metric contributions.
#[derive(Clone, Default, Debug)]
struct Stretch {
    start: usize,
    end: usize,
    /// Saved end before trimming, one past the last ghost cluster.
    break_at: usize,
    width: f32,
    /// Width recorded when the break was saved, ghosts included.
    width_with_spaces: f32,
    metrics: VerticalMetrics,
}

impl Stretch {
    fn new(force_metrics: bool) -> Self {
        Self {
            metrics: VerticalMetrics::new(force_metrics),
            ..Self::default()
        }
    }

    fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Collapses the stretch to a new starting position. The metrics are
    /// reset and then seeded with the starting cluster's run so that an
    /// otherwise empty line still has a height.
    fn start_from(&mut self, index: usize, seed: Option<&RunData>) {
        self.start = index;
        self.end = index;
        self.break_at = index;
        self.width = 0.;
        self.width_with_spaces = 0.;
        self.metrics.clean();
        if let Some(run) = seed {
            self.metrics.add_run(run);
        }
    }

    /// Appends one cluster. An empty stretch re-anchors at the incoming
    /// index first; stretches stay contiguous otherwise.
    fn extend_cluster(&mut self, index: usize, cluster: &ClusterData, runs: &[RunData]) {
        if self.is_empty() {
            self.start = index;
            self.end = index;
        }
        debug_assert_eq!(self.end, index);
        self.end = index + 1;
        if !cluster.is_hard_break() {
            if let Some(run) = runs.get(cluster.run_index) {
                self.metrics.add_run(run);
            }
        }
        self.width += cluster.width;
    }

    /// Folds another stretch in and empties it. The other stretch must
    /// start where this one ends.
    fn extend_stretch(&mut self, other: &mut Stretch) {
        self.metrics.add(&other.metrics);
        self.end = other.end;
        self.width += other.width;
        other.start = other.end;
        other.width = 0.;
        other.metrics.clean();
    }

    fn save_break(&mut self) {
        self.width_with_spaces = self.width;
        self.break_at = self.end;
    }

    /// Undoes trimming, putting ghost whitespace back on the line.
    fn restore_break(&mut self) {
        self.width = self.width_with_spaces;
        self.end = self.break_at;
    }

    /// Drops the trailing cluster.
    fn trim_cluster(&mut self, cluster: &ClusterData) {
        self.end -= 1;
        if self.is_empty() {
            self.width = 0.;
        } else {
            self.width -= cluster.width;
        }
    }
}

/// Width comparison with the quarter-unit hysteresis band legacy text
/// clients expect. Inside the band widths are rounded to a precision
/// that shrinks as the magnitude grows.
struct WidthBreaker {
    lower: f32,
    max_width: f32,
    upper: f32,
    rounding_hack: bool,
}

impl WidthBreaker {
    fn new(max_width: f32, rounding_hack: bool) -> Self {
        Self {
            lower: max_width - 0.25,
            max_width,
            upper: max_width + 0.25,
            rounding_hack,
        }
    }

    fn exceeds(&self, width: f32) -> bool {
        if width < self.lower {
            return false;
        }
        if width > self.upper {
            return true;
        }
        if !self.rounding_hack {
            return width > self.max_width;
        }
        little_round(width) > self.max_width
    }
}

struct LineBreaker<'a> {
    clusters: &'a [ClusterData],
    /// Index of the end-of-text sentinel cluster.
    end: usize,
    line: Stretch,
    words: Stretch,
    partial: Stretch,
    clip: Stretch,
    too_long_word: bool,
    too_long_cluster: bool,
    hard_break: bool,
    exceeded: bool,
    min_intrinsic: f32,
    max_intrinsic: f32,
    height: f32,
}

/// Breaks the cluster array into lines no wider than
/// `options.max_width`, save for single clusters that cannot fit.
///
/// `clusters` must hold at least one cluster before the sentinel. Runs
/// are mutable because placeholders derive their metrics from the line
/// they land on.
pub(crate) fn break_lines(
    clusters: &[ClusterData],
    runs: &mut [RunData],
    placeholders: &[PlaceholderStyle],
    options: &BreakOptions<'_>,
) -> (Vec<AddedLine>, BreakResult) {
    debug_assert!(clusters.len() > 1);
    let end = clusters.len() - 1;
    let mut breaker = LineBreaker {
        clusters,
        end,
        line: Stretch::new(options.strut.enabled && options.strut.force),
        words: Stretch::default(),
        partial: Stretch::default(),
        clip: Stretch::default(),
        too_long_word: false,
        too_long_cluster: false,
        hard_break: false,
        exceeded: false,
        min_intrinsic: 0.,
        max_intrinsic: 0.,
        height: 0.,
    };

    let unlimited = options.max_lines.is_none();
    let endless = !options.max_width.is_finite();
    let disable_first_ascent = options.height_behavior.disable_first_ascent();
    let disable_last_descent = options.height_behavior.disable_last_descent();

    let mut lines = Vec::new();
    let mut first_line = true;
    let mut soft_line_max = 0.;
    let mut line_number: usize = 1;

    while breaker.line.end < end {
        breaker.look_ahead(options.max_width, runs, options.rounding_hack);

        let last_line = (options.has_ellipsis && unlimited)
            || options.max_lines.is_some_and(|limit| line_number >= limit);
        let mut needs_ellipsis = options.has_ellipsis && !endless && last_line;

        breaker.move_forward(needs_ellipsis);
        // Only if some text is left to stand in for.
        needs_ellipsis &= breaker.line.end < end;

        breaker.trim_end_spaces();
        let (start_line, mut width_with_spaces) = breaker.trim_start_spaces();

        if needs_ellipsis && !breaker.hard_break {
            // Keep the ghost whitespace; the ellipsis replaces text from
            // the untrimmed end.
            breaker.line.restore_break();
            width_with_spaces = breaker.line.width_with_spaces;
        }

        if breaker.hard_break && breaker.line.width == 0. {
            // A line holding nothing but its newline takes the default
            // line box.
            breaker.line.metrics = *options.empty_metrics;
        }

        // Placeholders size their box against the line they ended up on.
        let mut last_run = NO_RUN;
        for cluster in &clusters[breaker.line.start..breaker.line.end] {
            if cluster.run_index == last_run {
                continue;
            }
            last_run = cluster.run_index;
            let Some(run) = runs.get_mut(last_run) else {
                continue;
            };
            if let Some(index) = run.placeholder {
                run.update_placeholder_metrics(&placeholders[index], &mut breaker.line.metrics);
            }
        }

        let text_start = clusters[breaker.line.start].text_start as usize;
        let trimmed_end = if breaker.line.is_empty() {
            text_start
        } else {
            clusters[breaker.line.end - 1].text_range().end
        };
        let mut with_spaces_end = if breaker.hard_break {
            clusters[breaker.line.break_at - 1].text_start as usize
        } else {
            clusters[start_line].text_start as usize
        };
        let mut with_newlines_end = clusters[start_line].text_start as usize;
        if start_line == end {
            with_spaces_end = options.text_len;
            with_newlines_end = options.text_len;
        }

        if disable_first_ascent && first_line {
            breaker.line.metrics.ascent = breaker.line.metrics.raw_ascent;
        }
        if disable_last_descent && (last_line || (start_line == end && !breaker.hard_break)) {
            breaker.line.metrics.descent = breaker.line.metrics.raw_descent;
        }
        options.strut.update_line(&mut breaker.line.metrics);
        if options.rounding_hack {
            breaker.line.metrics.round_out();
        }
        first_line = false;

        lines.push(AddedLine {
            text: text_start..trimmed_end,
            text_with_spaces: text_start..with_spaces_end,
            text_with_newlines: text_start..with_newlines_end,
            clusters: breaker.line.start..breaker.line.end,
            clusters_with_ghosts: breaker.line.start..start_line,
            width: breaker.line.width,
            width_with_spaces,
            top: breaker.height,
            metrics: breaker.line.metrics,
            hard_break: breaker.hard_break,
            needs_ellipsis: needs_ellipsis && !breaker.hard_break,
        });

        soft_line_max += width_with_spaces;
        breaker.max_intrinsic = breaker.max_intrinsic.max(soft_line_max);
        if breaker.hard_break {
            soft_line_max = 0.;
        }
        breaker.height += breaker.line.metrics.height();

        let kept_metrics = breaker.line.metrics;
        let seed = clusters
            .get(start_line)
            .and_then(|cluster| runs.get(cluster.run_index));
        breaker.line.start_from(start_line, seed);
        if breaker.hard_break && start_line == end {
            // The trailing empty line below reuses this line's box.
            breaker.line.metrics = kept_metrics;
        }

        if options.has_ellipsis && unlimited {
            // With unlimited lines the ellipsis only cuts soft wrapped
            // text; hard breaks keep their own lines.
            if !breaker.hard_break {
                break;
            }
        } else if last_line {
            breaker.hard_break = false;
            break;
        }
        line_number += 1;
    }

    // Scan whatever did not fit for the intrinsic widths.
    let mut last_word = 0.;
    let mut index = breaker.line.end;
    while index < end {
        breaker.exceeded = true;
        let cluster = &clusters[index];
        if cluster.is_hard_break() {
            breaker.max_intrinsic = breaker.max_intrinsic.max(soft_line_max);
            soft_line_max = 0.;
            breaker.min_intrinsic = breaker.min_intrinsic.max(last_word);
            last_word = 0.;
        } else if cluster.is_whitespace_break() {
            soft_line_max += cluster.width;
            breaker.min_intrinsic = breaker.min_intrinsic.max(last_word);
            last_word = 0.;
        } else if runs.get(cluster.run_index).is_some_and(RunData::is_placeholder) {
            soft_line_max += cluster.width;
            breaker.min_intrinsic = breaker
                .min_intrinsic
                .max(last_word)
                .max(cluster.width);
            last_word = 0.;
        } else {
            soft_line_max += cluster.width;
            last_word += cluster.width;
        }
        index += 1;
    }
    breaker.min_intrinsic = breaker.min_intrinsic.max(last_word);
    breaker.max_intrinsic = breaker.max_intrinsic.max(soft_line_max);

    if breaker.hard_break {
        // Text ending in a hard break owes an empty trailing line.
        if disable_last_descent {
            breaker.line.metrics.descent = breaker.line.metrics.raw_descent;
        }
        options.strut.update_line(&mut breaker.line.metrics);
        if options.rounding_hack {
            breaker.line.metrics.round_out();
        }
        lines.push(AddedLine {
            text: options.text_len..options.text_len,
            text_with_spaces: options.text_len..options.text_len,
            text_with_newlines: options.text_len..options.text_len,
            clusters: end..end,
            clusters_with_ghosts: end..end,
            width: 0.,
            width_with_spaces: 0.,
            top: breaker.height,
            metrics: breaker.line.metrics,
            hard_break: false,
            needs_ellipsis: false,
        });
        breaker.height += breaker.line.metrics.height();
    }

    let result = BreakResult {
        exceeded: breaker.exceeded,
        min_intrinsic: breaker.min_intrinsic,
        max_intrinsic: breaker.max_intrinsic,
        height: breaker.height,
    };
    (lines, result)
}

/// Lays the whole cluster array out as one line.
///
/// Callers guarantee no break can occur: a single text run, no hard
/// breaks, whitespace only in a trailing stretch, and an advance within
/// the width limit. Trailing whitespace still trims into ghosts.
pub(crate) fn single_line(
    clusters: &[ClusterData],
    runs: &[RunData],
    options: &BreakOptions<'_>,
) -> (Vec<AddedLine>, BreakResult) {
    debug_assert!(clusters.len() > 1);
    let end = clusters.len() - 1;

    let mut metrics = VerticalMetrics::new(options.strut.enabled && options.strut.force);
    metrics.add_run(&runs[0]);
    if options.height_behavior.disable_first_ascent() {
        metrics.ascent = metrics.raw_ascent;
    }
    if options.height_behavior.disable_last_descent() {
        metrics.descent = metrics.raw_descent;
    }
    options.strut.update_line(&mut metrics);
    if options.rounding_hack {
        metrics.round_out();
    }

    let mut width_with_spaces = 0.;
    for cluster in &clusters[..end] {
        width_with_spaces += cluster.width;
    }
    let mut width = width_with_spaces;
    let mut trimmed = end;
    while trimmed > 0 && clusters[trimmed - 1].is_whitespace_break() {
        trimmed -= 1;
        if trimmed == 0 {
            width = 0.;
        } else {
            width -= clusters[trimmed].width;
        }
    }

    // The lone word's width, trimmed the way the breaker trims words.
    let mut min_intrinsic = 0.;
    let mut trailing = true;
    for cluster in clusters[..end].iter().rev() {
        if trailing {
            if cluster.is_whitespace_break() {
                continue;
            }
            trailing = false;
        }
        min_intrinsic += cluster.width;
    }

    let text_start = clusters[0].text_start as usize;
    let trimmed_end = if trimmed == 0 {
        text_start
    } else {
        clusters[trimmed - 1].text_range().end
    };

    let line = AddedLine {
        text: text_start..trimmed_end,
        text_with_spaces: text_start..options.text_len,
        text_with_newlines: text_start..options.text_len,
        clusters: 0..trimmed,
        clusters_with_ghosts: 0..end,
        width,
        width_with_spaces,
        top: 0.,
        metrics,
        hard_break: false,
        needs_ellipsis: false,
    };
    let result = BreakResult {
        exceeded: false,
        min_intrinsic,
        max_intrinsic: width_with_spaces,
        height: metrics.height(),
    };
    (vec![line], result)
}

impl LineBreaker<'_> {
    /// Walks clusters from the line's current end, splitting them into
    /// complete words and a trailing partial word, until one no longer
    /// fits or a hard break ends the line.
    fn look_ahead(&mut self, max_width: f32, runs: &[RunData], rounding_hack: bool) {
        self.too_long_word = false;
        self.too_long_cluster = false;
        self.hard_break = false;
        self.line.metrics.clean();
        let from = self.line.end;
        let seed = self
            .clusters
            .get(from)
            .and_then(|cluster| runs.get(cluster.run_index));
        self.words.start_from(from, seed);
        self.partial.start_from(from, seed);
        self.clip.start_from(from, seed);

        let breaker = WidthBreaker::new(max_width, rounding_hack);
        let mut index = from;
        while index < self.end {
            let cluster = &self.clusters[index];
            if cluster.is_hard_break() {
                // Never faces the width check; it ends the line below.
            } else if breaker.exceeds(self.words.width + self.partial.width + cluster.width) {
                if cluster.is_whitespace_break() {
                    // Trailing whitespace rides along as ghosts.
                    self.partial.extend_cluster(index, cluster, runs);
                    self.fold_word(runs);
                    index += 1;
                    continue;
                }
                if runs.get(cluster.run_index).is_some_and(RunData::is_placeholder) {
                    if !self.partial.is_empty() {
                        self.fold_word(runs);
                    }
                    if cluster.width > max_width && self.words.is_empty() {
                        // Alone on the line and still too wide; keep it.
                        self.partial.extend_cluster(index, cluster, runs);
                        self.clip.extend_cluster(index, cluster, runs);
                        self.too_long_cluster = true;
                        self.too_long_word = true;
                    }
                    break;
                }

                // Measure the word across the break to decide whether a
                // mid-word break is allowed at all.
                let mut word_width = self.partial.width;
                let mut further = index;
                while further < self.end {
                    let c = &self.clusters[further];
                    if c.is_whitespace_break()
                        || c.is_hard_break()
                        || self.clusters[further + 1].is_soft_break()
                        || runs.get(c.run_index).is_some_and(RunData::is_placeholder)
                    {
                        break;
                    }
                    if max_width == 0. {
                        // Zero width places one cluster per line.
                        word_width = word_width.max(c.width);
                    } else {
                        word_width += c.width;
                    }
                    further += 1;
                }
                if word_width > max_width {
                    self.min_intrinsic = self.min_intrinsic.max(word_width);
                    self.too_long_word = true;
                }
                if cluster.width > max_width {
                    // The cluster spans into the over-width region; its
                    // metrics still count for the line it clips on.
                    self.partial.extend_cluster(index, cluster, runs);
                    self.clip.extend_cluster(index, cluster, runs);
                    self.too_long_cluster = true;
                    self.too_long_word = true;
                }
                break;
            }

            if runs.get(cluster.run_index).is_some_and(RunData::is_placeholder) {
                if !self.partial.is_empty() {
                    self.fold_word(runs);
                }
                // A placeholder is a word of its own.
                self.min_intrinsic = self.min_intrinsic.max(cluster.width);
                self.words.extend_cluster(index, cluster, runs);
            } else {
                self.partial.extend_cluster(index, cluster, runs);
                if self.ends_word(index) {
                    self.fold_word(runs);
                }
            }

            self.hard_break = cluster.is_hard_break();
            if self.hard_break {
                break;
            }
            index += 1;
        }
    }

    /// A break opportunity follows the cluster.
    fn ends_word(&self, index: usize) -> bool {
        let cluster = &self.clusters[index];
        cluster.is_whitespace_break()
            || cluster.is_hard_break()
            || self
                .clusters
                .get(index + 1)
                .is_some_and(ClusterData::is_soft_break)
    }

    /// Completes the partial word and records its trimmed width.
    fn fold_word(&mut self, runs: &[RunData]) {
        self.min_intrinsic = self.min_intrinsic.max(self.partial_trimmed_width(runs));
        self.words.extend_stretch(&mut self.partial);
    }

    /// Width of the partial word without placeholders and trailing
    /// whitespace.
    fn partial_trimmed_width(&self, runs: &[RunData]) -> f32 {
        let mut width = 0.;
        let mut trailing = true;
        for cluster in self.clusters[self.partial.start..self.partial.end]
            .iter()
            .rev()
        {
            if runs.get(cluster.run_index).is_some_and(RunData::is_placeholder) {
                continue;
            }
            if trailing {
                if cluster.is_whitespace_break() || cluster.is_hard_break() {
                    continue;
                }
                trailing = false;
            }
            width += cluster.width;
        }
        width
    }

    /// Moves the stretches the look-ahead accumulated onto the line.
    ///
    /// Lines normally break at words. The partial word joins only when a
    /// mid-word break was permitted, and a too-long cluster contributes
    /// its metrics even where its glyphs overflow.
    fn move_forward(&mut self, has_ellipsis: bool) {
        if !self.words.is_empty() {
            self.line.extend_stretch(&mut self.words);
            if !self.too_long_word || has_ellipsis {
                return;
            }
        }
        if !self.partial.is_empty() {
            self.line.extend_stretch(&mut self.partial);
            if !self.too_long_cluster {
                return;
            }
        }
        if !self.clip.is_empty() {
            self.line.metrics.add(&self.clip.metrics);
        }
    }

    /// Trims trailing whitespace and the newline off the line, saving
    /// the untrimmed end as the break position first.
    fn trim_end_spaces(&mut self) {
        self.line.save_break();
        while self.line.end > self.line.start {
            let cluster = &self.clusters[self.line.end - 1];
            if !cluster.is_whitespace_break() && !cluster.is_hard_break() {
                break;
            }
            self.line.trim_cluster(cluster);
        }
    }

    /// Skips whitespace between this line and the next, adding its width
    /// to this line's ghosts. Returns the next line's first cluster and
    /// this line's width with ghost whitespace.
    fn trim_start_spaces(&mut self) -> (usize, f32) {
        if self.hard_break {
            // Whitespace on either side of the newline counts into the
            // ghost width; the newline does not. Whitespace after a hard
            // break starts the next line instead of being absorbed.
            let mut width = self.line.width;
            for cluster in &self.clusters[self.line.end..self.line.break_at] {
                if cluster.is_whitespace_break() {
                    width += cluster.width;
                }
            }
            let mut index = self.line.break_at;
            while index < self.end && self.clusters[index].is_whitespace_break() {
                width += self.clusters[index].width;
                index += 1;
            }
            return (self.line.break_at, width);
        }
        let mut width = self.line.width_with_spaces;
        let mut index = self.line.break_at;
        while index < self.end && self.clusters[index].is_whitespace_break() {
            width += self.clusters[index].width;
            index += 1;
        }
        (index, width)
    }
}
