// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run production: shaping plus cascading font fallback.
//!
//! Text is cut into single block, single bidi level, single script
//! fragments which seed an unresolved queue. Candidate typefaces from the
//! style's family list are tried first, then per codepoint fallback from
//! the font collection. After every shape the glyphs are sorted into
//! resolved and unresolved ranges on grapheme boundaries; whatever is left
//! keeps its missing glyphs rather than failing layout.

use core::ops::Range;
use std::collections::VecDeque;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;
use unicode_script::{Script, UnicodeScript};

use crate::font::{Font, FontCollection, FontFeature, FontMetrics, FontStyle, Typeface};
use crate::itemize::TextIndex;
use crate::layout::data::RunData;
use crate::shaper::{Point, RunBuffer, RunHandler, RunInfo, ScriptTag, ShapeOptions, Shaper};
use crate::style::Placeholder;
use crate::unicode::{CodeUnitFlags, Unicode};
use crate::util::intersect;

/// Style fields that drive shaping, detached from the brush type.
#[derive(Clone, Debug)]
pub(crate) struct ShapeStyle<'a> {
    pub(crate) range: Range<usize>,
    pub(crate) families: &'a [String],
    pub(crate) font_style: FontStyle,
    pub(crate) font_size: f32,
    pub(crate) features: &'a [FontFeature],
    pub(crate) locale: &'a str,
    pub(crate) height: Option<f32>,
    pub(crate) half_leading: bool,
    pub(crate) baseline_shift: f32,
}

/// Output of the shaping stage.
#[derive(Default, Debug)]
pub(crate) struct ShapedText {
    /// Runs in text order, covering the text exactly.
    pub(crate) runs: Vec<RunData>,
    /// Glyphs that stayed unresolved after fallback.
    pub(crate) unresolved_glyphs: usize,
    /// Sorted codepoints no typeface could render.
    pub(crate) unresolved_codepoints: Vec<char>,
}

/// Shapes the whole paragraph into runs.
pub(crate) fn shape_text(
    text: &str,
    styles: &[ShapeStyle<'_>],
    placeholders: &[Placeholder],
    index: &TextIndex,
    shaper: &dyn Shaper,
    fonts: &dyn FontCollection,
    unicode: &dyn Unicode,
) -> ShapedText {
    TextShaper {
        text,
        styles,
        placeholders,
        index,
        shaper,
        fonts,
        unicode,
        staged: Vec::new(),
        resolved: Vec::new(),
        unresolved: VecDeque::new(),
        placeholder_runs: Vec::new(),
        fallback_cache: HashMap::new(),
        last_resort: None,
        unresolved_codepoints: HashSet::new(),
    }
    .shape()
}

/// Raw output of a single shaper invocation.
#[derive(Clone, Debug)]
struct StagedRun {
    font: Font,
    bidi_level: u8,
    script: ScriptTag,
    block_index: usize,
    /// Absolute text range the run covers.
    text_range: Range<usize>,
    glyphs: Vec<u32>,
    positions: Vec<Point>,
    offsets: Vec<Point>,
    /// Absolute cluster back-indices, one trailing entry.
    clusters: Vec<u32>,
    advance: f32,
}

/// A text range bound, or still to be bound, to a staged run.
#[derive(Clone, Debug)]
struct FontEntry {
    /// Absolute text range, aligned to grapheme boundaries.
    text: Range<usize>,
    /// Staged run holding the glyphs; `None` when never shaped.
    staged: Option<usize>,
    /// Glyph span within the staged run.
    glyphs: Range<usize>,
    block_index: usize,
    bidi_level: u8,
    script: ScriptTag,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct FallbackKey {
    codepoint: char,
    style: FontStyle,
    locale: String,
}

/// Outcome of shaping the unresolved queue with one candidate.
enum Resolved {
    Everything,
    Something,
    Nothing,
}

struct TextShaper<'a> {
    text: &'a str,
    styles: &'a [ShapeStyle<'a>],
    placeholders: &'a [Placeholder],
    index: &'a TextIndex,
    shaper: &'a dyn Shaper,
    fonts: &'a dyn FontCollection,
    unicode: &'a dyn Unicode,
    staged: Vec<StagedRun>,
    resolved: Vec<FontEntry>,
    unresolved: VecDeque<FontEntry>,
    placeholder_runs: Vec<RunData>,
    fallback_cache: HashMap<FallbackKey, Option<Arc<dyn Typeface>>>,
    /// First typeface the collection ever produced; shapes text that no
    /// candidate covered so coverage never has holes.
    last_resort: Option<Arc<dyn Typeface>>,
    unresolved_codepoints: HashSet<char>,
}

impl TextShaper<'_> {
    fn shape(mut self) -> ShapedText {
        let scripts = script_regions(self.text);
        for (placeholder_index, placeholder) in self.placeholders.iter().enumerate() {
            for block_index in placeholder.blocks_before.clone() {
                self.shape_block(block_index, &scripts);
            }
            if !placeholder.range.is_empty() {
                self.push_placeholder_run(placeholder_index, placeholder);
            }
        }
        self.materialize()
    }

    /// Resolves one style block: primary typefaces, then per codepoint
    /// fallback, then whatever is left keeps its missing glyphs.
    fn shape_block(&mut self, block_index: usize, scripts: &[(Range<usize>, ScriptTag)]) {
        let styles = self.styles;
        let style = &styles[block_index];
        for region in self.index.bidi.clone() {
            let bidi_range = intersect(&(region.start..region.end), &style.range);
            if bidi_range.is_empty() {
                continue;
            }
            for (script_range, script) in scripts {
                let range = intersect(script_range, &bidi_range);
                if range.is_empty() {
                    continue;
                }
                self.unresolved.push_back(FontEntry {
                    text: range,
                    staged: None,
                    glyphs: 0..0,
                    block_index,
                    bidi_level: region.level,
                    script: *script,
                });
            }
        }
        if self.unresolved.is_empty() {
            return;
        }

        let mut tried = HashSet::new();
        for typeface in self.fonts.find_typefaces(style.families, style.font_style) {
            if self.last_resort.is_none() {
                self.last_resort = Some(typeface.clone());
            }
            if !tried.insert(typeface.unique_id()) {
                continue;
            }
            let font = Font::new(typeface, style.font_size);
            if matches!(self.shape_queue(&font, style), Resolved::Everything) {
                break;
            }
        }
        if !self.unresolved.is_empty() {
            self.codepoint_fallback(style, &mut tried);
        }
        while let Some(entry) = self.unresolved.pop_front() {
            self.give_up(entry);
        }
    }

    /// Walks the distinct codepoints of the front unresolved entry, asking
    /// the collection for a fallback typeface for each and reshaping the
    /// queue whenever a new one turns up. Undecidable entries are parked so
    /// the remaining ones still get their chance.
    fn codepoint_fallback(&mut self, style: &ShapeStyle<'_>, tried: &mut HashSet<u64>) {
        let text = self.text;
        let mut hopeless = Vec::new();
        'entries: while let Some(front) = self.unresolved.front() {
            let front_range = front.text.clone();
            let mut attempted = HashSet::new();
            let mut chars = text[front_range].chars().peekable();
            loop {
                let Some(codepoint) = self.next_query_codepoint(&mut chars, &mut attempted)
                else {
                    // Every codepoint failed; the entry keeps its glyphs.
                    match self.unresolved.pop_front() {
                        Some(entry) => hopeless.push(entry),
                        None => break 'entries,
                    }
                    continue 'entries;
                };
                let Some(typeface) = self.fallback_for(codepoint, style) else {
                    continue;
                };
                if !tried.insert(typeface.unique_id()) {
                    continue;
                }
                let font = Font::new(typeface, style.font_size);
                match self.shape_queue(&font, style) {
                    Resolved::Everything => break 'entries,
                    // The front entry may have changed; start over with it.
                    Resolved::Something => continue 'entries,
                    Resolved::Nothing => {}
                }
            }
        }
        self.unresolved.extend(hopeless);
    }

    /// Returns the next codepoint of `chars` worth querying fallback for.
    ///
    /// An emoji sequence counts as one query driven by its base character,
    /// so joiners and modifiers never pick the fallback font on their own.
    fn next_query_codepoint(
        &self,
        chars: &mut core::iter::Peekable<core::str::Chars<'_>>,
        attempted: &mut HashSet<char>,
    ) -> Option<char> {
        while let Some(c) = chars.next() {
            if self.unicode.is_emoji(c) || self.unicode.is_regional_indicator(c) {
                while chars
                    .peek()
                    .is_some_and(|next| self.unicode.is_emoji_component(*next))
                {
                    chars.next();
                }
            }
            if attempted.insert(c) {
                return Some(c);
            }
        }
        None
    }

    fn fallback_for(&mut self, codepoint: char, style: &ShapeStyle<'_>) -> Option<Arc<dyn Typeface>> {
        let key = FallbackKey {
            codepoint,
            style: style.font_style,
            locale: style.locale.to_string(),
        };
        if let Some(cached) = self.fallback_cache.get(&key) {
            return cached.clone();
        }
        let result = self
            .fonts
            .default_fallback(codepoint, style.font_style, style.locale);
        if self.last_resort.is_none() {
            self.last_resort = result.clone();
        }
        self.fallback_cache.insert(key, result.clone());
        result
    }

    /// Reshapes every entry currently queued with one candidate font.
    fn shape_queue(&mut self, font: &Font, style: &ShapeStyle<'_>) -> Resolved {
        let resolved_before = self.resolved.len();
        for _ in 0..self.unresolved.len() {
            let Some(entry) = self.unresolved.pop_front() else {
                break;
            };
            self.shape_entry(entry, font, style);
        }
        if self.unresolved.is_empty() {
            Resolved::Everything
        } else if self.resolved.len() > resolved_before {
            Resolved::Something
        } else {
            Resolved::Nothing
        }
    }

    fn shape_entry(&mut self, entry: FontEntry, font: &Font, style: &ShapeStyle<'_>) {
        let staged = self.shape_raw(&entry, font, style);
        if staged.is_empty() {
            // The engine produced nothing; leave the entry for the next
            // candidate.
            self.unresolved.push_back(entry);
            return;
        }
        // Re-queue anything the engine skipped over.
        let mut covered = entry.text.start;
        let spans: SmallVec<[Range<usize>; 2]> = staged
            .clone()
            .map(|si| self.staged[si].text_range.clone())
            .collect();
        for span in spans {
            if span.start > covered {
                self.unresolved.push_back(FontEntry {
                    text: covered..span.start,
                    staged: None,
                    glyphs: 0..0,
                    ..entry.clone()
                });
            }
            covered = span.end.max(covered);
        }
        if covered < entry.text.end {
            self.unresolved.push_back(FontEntry {
                text: covered..entry.text.end,
                staged: None,
                glyphs: 0..0,
                ..entry
            });
        }
        for si in staged {
            self.sort_out(si);
        }
    }

    /// Runs the engine once over an entry, staging its output.
    fn shape_raw(&mut self, entry: &FontEntry, font: &Font, style: &ShapeStyle<'_>) -> Range<usize> {
        let first = self.staged.len();
        let shaper = self.shaper;
        let slice = &self.text[entry.text.clone()];
        let options = ShapeOptions {
            font,
            bidi_level: entry.bidi_level,
            script: entry.script,
            language: (!style.locale.is_empty()).then_some(style.locale),
            features: style.features,
            width: f32::INFINITY,
        };
        let mut handler = StagingHandler {
            staged: &mut self.staged,
            current: None,
            text_offset: entry.text.start,
            block_index: entry.block_index,
        };
        shaper.shape(slice, &options, &mut handler);
        handler.finish();
        first..self.staged.len()
    }

    /// Splits a staged run into resolved ranges and unresolved ranges that
    /// go back to the queue. Missing glyphs condemn their whole grapheme
    /// unless the underlying code unit is a control character.
    fn sort_out(&mut self, staged_index: usize) {
        let run = &self.staged[staged_index];
        let text_range = run.text_range.clone();
        let glyph_count = run.glyphs.len();
        let mut starts: Vec<u32> = run.clusters[..glyph_count].to_vec();
        starts.sort_unstable();
        starts.dedup();

        let mut unresolved: Vec<Range<usize>> = Vec::new();
        for (glyph, id) in run.glyphs.iter().enumerate() {
            if *id != 0 {
                continue;
            }
            let cluster = run.clusters[glyph] as usize;
            if self.index.flags[cluster].contains(CodeUnitFlags::CONTROL) {
                continue;
            }
            let cluster_end = match starts.binary_search(&(cluster as u32)) {
                Ok(at) if at + 1 < starts.len() => starts[at + 1] as usize,
                _ => text_range.end,
            };
            let mut start = self.unicode.prev_grapheme_boundary(self.text, cluster);
            let mut end = cluster_end;
            while end < self.text.len()
                && !self.index.flags[end].contains(CodeUnitFlags::GRAPHEME_START)
            {
                end += 1;
            }
            start = start.max(text_range.start);
            end = end.min(text_range.end);
            unresolved.push(start..end);
        }
        // Glyph storage is not in text order for RTL runs.
        unresolved.sort_by_key(|range| range.start);
        let mut merged: Vec<Range<usize>> = Vec::new();
        for range in unresolved {
            match merged.last_mut() {
                Some(last) if last.end >= range.start => last.end = last.end.max(range.end),
                _ => merged.push(range),
            }
        }

        // The complement of the unresolved set is resolved.
        let template = FontEntry {
            text: 0..0,
            staged: Some(staged_index),
            glyphs: 0..0,
            block_index: run.block_index,
            bidi_level: run.bidi_level,
            script: run.script,
        };
        let mut entries: SmallVec<[(Range<usize>, bool); 4]> = SmallVec::new();
        let mut cursor = text_range.start;
        for range in merged {
            if range.start > cursor {
                entries.push((cursor..range.start, true));
            }
            entries.push((range.clone(), false));
            cursor = range.end;
        }
        if cursor < text_range.end {
            entries.push((cursor..text_range.end, true));
        }
        let spans: SmallVec<[Range<usize>; 4]> = entries
            .iter()
            .map(|(range, _)| glyph_span(&self.staged[staged_index], range))
            .collect();
        for ((text, resolved), glyphs) in entries.into_iter().zip(spans) {
            let entry = FontEntry {
                text,
                glyphs,
                ..template.clone()
            };
            if resolved {
                self.resolved.push(entry);
            } else {
                self.unresolved.push_back(entry);
            }
        }
    }

    /// Records an entry that keeps its missing glyphs.
    fn give_up(&mut self, entry: FontEntry) {
        for c in self.text[entry.text.clone()].chars() {
            self.unresolved_codepoints.insert(c);
        }
        self.resolved.push(entry);
    }

    fn push_placeholder_run(&mut self, placeholder_index: usize, placeholder: &Placeholder) {
        let start = placeholder.range.start;
        let bidi_level = self
            .index
            .bidi
            .iter()
            .find(|region| region.start <= start && start < region.end)
            .map(|region| region.level)
            .unwrap_or(0);
        self.placeholder_runs.push(RunData {
            font: None,
            text_range: placeholder.range.clone(),
            block_index: placeholder.blocks_before.end,
            bidi_level,
            script: ScriptTag::UNKNOWN,
            glyphs: Vec::new(),
            positions: vec![Point::ZERO],
            offsets: vec![Point::ZERO],
            clusters: vec![start as u32],
            shifts: vec![0.],
            cluster_range: 0..0,
            advance: placeholder.style.width,
            metrics: FontMetrics::default(),
            corrected_ascent: 0.,
            corrected_descent: 0.,
            corrected_leading: 0.,
            baseline_shift: 0.,
            placeholder: Some(placeholder_index),
            is_ellipsis: false,
        });
    }

    /// Turns resolved entries and placeholder runs into the final ordered
    /// run list.
    fn materialize(mut self) -> ShapedText {
        self.resolved.sort_by(|a, b| {
            (a.text.start, a.text.end).cmp(&(b.text.start, b.text.end))
        });
        let mut merged: Vec<FontEntry> = Vec::new();
        for entry in core::mem::take(&mut self.resolved) {
            if let Some(last) = merged.last_mut() {
                if last.staged.is_some()
                    && last.staged == entry.staged
                    && last.text.end == entry.text.start
                    && glyphs_touch(last, &entry)
                {
                    last.text.end = entry.text.end;
                    last.glyphs =
                        last.glyphs.start.min(entry.glyphs.start)..last.glyphs.end.max(entry.glyphs.end);
                    continue;
                }
            }
            merged.push(entry);
        }

        let mut runs = Vec::with_capacity(merged.len() + self.placeholder_runs.len());
        for entry in merged {
            if let Some(staged_index) = entry.staged {
                runs.push(self.carve(staged_index, &entry));
            } else if let Some(typeface) = self.last_resort.clone() {
                // Never shaped: give it the last resort face so coverage
                // holds, missing glyphs and all.
                let style = &self.styles[entry.block_index];
                let font = Font::new(typeface, style.font_size);
                for si in self.shape_raw(&entry, &font, style) {
                    let whole = FontEntry {
                        text: self.staged[si].text_range.clone(),
                        staged: Some(si),
                        glyphs: 0..self.staged[si].glyphs.len(),
                        ..entry.clone()
                    };
                    runs.push(self.carve(si, &whole));
                }
            }
        }
        runs.append(&mut self.placeholder_runs);
        runs.sort_by_key(|run| run.text_range.start);

        let mut unresolved_glyphs = 0;
        for run in &runs {
            for (glyph, id) in run.glyphs.iter().enumerate() {
                let cluster = run.clusters[glyph] as usize;
                if *id == 0 && !self.index.flags[cluster].contains(CodeUnitFlags::CONTROL) {
                    unresolved_glyphs += 1;
                }
            }
        }
        let mut unresolved_codepoints: Vec<char> =
            self.unresolved_codepoints.into_iter().collect();
        unresolved_codepoints.sort_unstable();

        ShapedText {
            runs,
            unresolved_glyphs,
            unresolved_codepoints,
        }
    }

    /// Carves the entry's glyph span out of its staged run.
    fn carve(&self, staged_index: usize, entry: &FontEntry) -> RunData {
        let staged = &self.staged[staged_index];
        let style = &self.styles[entry.block_index];
        let glyphs = entry.glyphs.clone();
        let base = staged.positions[glyphs.start];
        let positions: Vec<Point> = staged.positions[glyphs.start..=glyphs.end]
            .iter()
            .map(|p| *p - base)
            .collect();
        let advance = positions[positions.len() - 1].x;
        let count = glyphs.len();
        let mut run = RunData {
            font: Some(staged.font.clone()),
            text_range: entry.text.clone(),
            block_index: entry.block_index,
            bidi_level: staged.bidi_level,
            script: entry.script,
            glyphs: staged.glyphs[glyphs.clone()].to_vec(),
            positions,
            offsets: staged.offsets[glyphs.start..=glyphs.end].to_vec(),
            clusters: staged.clusters[glyphs.start..=glyphs.end].to_vec(),
            shifts: vec![0.; count + 1],
            cluster_range: 0..0,
            advance,
            metrics: staged.font.metrics(),
            corrected_ascent: 0.,
            corrected_descent: 0.,
            corrected_leading: 0.,
            baseline_shift: style.baseline_shift,
            placeholder: None,
            is_ellipsis: false,
        };
        run.compute_corrected_metrics(style.height, style.half_leading);
        run
    }
}

fn glyphs_touch(a: &FontEntry, b: &FontEntry) -> bool {
    a.glyphs.end == b.glyphs.start || b.glyphs.end == a.glyphs.start
}

/// Glyph span of a staged run whose clusters fall inside `text`.
fn glyph_span(run: &StagedRun, text: &Range<usize>) -> Range<usize> {
    let count = run.glyphs.len();
    let mut start = usize::MAX;
    let mut end = 0;
    for (glyph, cluster) in run.clusters[..count].iter().enumerate() {
        if text.contains(&(*cluster as usize)) {
            start = start.min(glyph);
            end = end.max(glyph + 1);
        }
    }
    if start == usize::MAX {
        0..0
    } else {
        start..end
    }
}

/// Writes engine output into staged run storage.
struct StagingHandler<'a> {
    staged: &'a mut Vec<StagedRun>,
    current: Option<StagedRun>,
    /// Absolute offset of the shaped slice.
    text_offset: usize,
    block_index: usize,
}

impl StagingHandler<'_> {
    fn finish(&mut self) {
        if let Some(run) = self.current.take() {
            self.staged.push(run);
        }
    }
}

impl RunHandler for StagingHandler<'_> {
    fn run_info(&mut self, info: &RunInfo<'_>) {
        self.finish();
        let count = info.glyph_count;
        self.current = Some(StagedRun {
            font: info.font.clone(),
            bidi_level: info.bidi_level,
            script: info.script,
            block_index: self.block_index,
            text_range: self.text_offset + info.utf8_range.start
                ..self.text_offset + info.utf8_range.end,
            glyphs: vec![0; count],
            positions: vec![Point::ZERO; count + 1],
            offsets: vec![Point::ZERO; count + 1],
            clusters: vec![0; count + 1],
            advance: 0.,
        });
    }

    fn buffer(&mut self) -> RunBuffer<'_> {
        match &mut self.current {
            Some(run) => {
                let count = run.glyphs.len();
                RunBuffer {
                    glyphs: &mut run.glyphs,
                    positions: &mut run.positions[..count],
                    offsets: &mut run.offsets[..count],
                    clusters: &mut run.clusters[..count],
                    origin: Point::ZERO,
                }
            }
            // Contract violation by the engine; give it somewhere to write.
            None => RunBuffer {
                glyphs: &mut [],
                positions: &mut [],
                offsets: &mut [],
                clusters: &mut [],
                origin: Point::ZERO,
            },
        }
    }

    fn commit_run(&mut self, info: &RunInfo<'_>) {
        if let Some(run) = &mut self.current {
            let count = run.glyphs.len();
            for cluster in &mut run.clusters[..count] {
                *cluster += self.text_offset as u32;
            }
            run.clusters[count] = run.text_range.end as u32;
            run.advance = info.advance.x;
            run.positions[count] = Point::new(info.advance.x, 0.);
        }
        self.finish();
    }
}

/// Shapes an ellipsis string with one font, accepting only a fully
/// resolved single run.
pub(crate) fn shape_ellipsis(ellipsis: &str, font: &Font, shaper: &dyn Shaper) -> Option<RunData> {
    let mut staged = Vec::new();
    let options = ShapeOptions {
        font,
        bidi_level: 0,
        script: ScriptTag::UNKNOWN,
        language: None,
        features: &[],
        width: f32::INFINITY,
    };
    let mut handler = StagingHandler {
        staged: &mut staged,
        current: None,
        text_offset: 0,
        block_index: 0,
    };
    shaper.shape(ellipsis, &options, &mut handler);
    handler.finish();
    if staged.len() != 1 {
        return None;
    }
    let run = staged.remove(0);
    if run.glyphs.is_empty() || run.glyphs.contains(&0) {
        return None;
    }
    let count = run.glyphs.len();
    let mut data = RunData {
        font: Some(run.font.clone()),
        text_range: 0..0,
        block_index: 0,
        bidi_level: 0,
        script: run.script,
        glyphs: run.glyphs,
        positions: run.positions,
        offsets: run.offsets,
        clusters: run.clusters,
        shifts: vec![0.; count + 1],
        cluster_range: 0..0,
        advance: run.advance,
        metrics: run.font.metrics(),
        corrected_ascent: 0.,
        corrected_descent: 0.,
        corrected_leading: 0.,
        baseline_shift: 0.,
        placeholder: None,
        is_ellipsis: true,
    };
    data.compute_corrected_metrics(None, false);
    Some(data)
}

/// Splits text into maximal single script ranges, folding common and
/// inherited characters into the surrounding script.
fn script_regions(text: &str) -> Vec<(Range<usize>, ScriptTag)> {
    let mut regions: Vec<(Range<usize>, Script)> = Vec::new();
    for (start, c) in text.char_indices() {
        let end = start + c.len_utf8();
        let script = c.script();
        let neutral = is_neutral(script);
        match regions.last_mut() {
            Some((range, last)) if neutral || *last == script || is_neutral(*last) => {
                if is_neutral(*last) && !neutral {
                    *last = script;
                }
                range.end = end;
            }
            _ => regions.push((start..end, script)),
        }
    }
    regions
        .into_iter()
        .map(|(range, script)| (range, script_tag(script)))
        .collect()
}

fn is_neutral(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

fn script_tag(script: Script) -> ScriptTag {
    let name = script.short_name().as_bytes();
    match name.try_into() {
        Ok(tag) => ScriptTag(tag),
        Err(_) => ScriptTag::UNKNOWN,
    }
}
