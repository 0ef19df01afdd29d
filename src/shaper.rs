// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaping abstraction.
//!
//! Shaping proper is delegated to an external engine behind the [`Shaper`]
//! trait. The engine announces each run it produces through a
//! [`RunHandler`], then writes glyphs directly into storage borrowed from
//! the run under construction, so no intermediate copy is needed.

use core::fmt;
use core::ops::Range;

use crate::font::{Font, FontFeature};

/// Two dimensional point in layout units.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, positive downward.
    pub y: f32,
}

impl Point {
    /// Point at the origin.
    pub const ZERO: Self = Self { x: 0., y: 0. };

    /// Creates a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl core::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Four byte script tag such as `*b"Latn"`, following ISO 15924.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScriptTag(pub [u8; 4]);

impl ScriptTag {
    /// Tag for unknown or unclassified script.
    pub const UNKNOWN: Self = Self(*b"Zzzz");
}

impl fmt::Debug for ScriptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptTag({})", String::from_utf8_lossy(&self.0))
    }
}

/// Parameters for one shaping request.
#[derive(Clone, Debug)]
pub struct ShapeOptions<'a> {
    /// Font to shape with.
    pub font: &'a Font,
    /// Bidi embedding level; odd levels request right-to-left shaping.
    pub bidi_level: u8,
    /// Script of the text.
    pub script: ScriptTag,
    /// BCP-47 language tag, if known.
    pub language: Option<&'a str>,
    /// OpenType features to apply.
    pub features: &'a [FontFeature],
    /// Width hint for engines that measure as they shape. Layout shapes
    /// the text as one endless line and passes infinity.
    pub width: f32,
}

/// Description of a run delivered by the engine.
#[derive(Clone, Debug)]
pub struct RunInfo<'a> {
    /// Font the run was shaped with.
    pub font: &'a Font,
    /// Bidi embedding level of the run.
    pub bidi_level: u8,
    /// Script of the run.
    pub script: ScriptTag,
    /// BCP-47 language tag, if known.
    pub language: Option<&'a str>,
    /// Total advance of the run.
    pub advance: Point,
    /// Number of glyphs produced.
    pub glyph_count: usize,
    /// Range covered by the run, in bytes relative to the shaped slice.
    pub utf8_range: Range<usize>,
}

/// Mutable view over the glyph storage for one run.
///
/// All slices have the glyph count announced by the preceding
/// [`RunHandler::run_info`] call. Engines add `origin` to every position
/// they write; cluster indices are byte offsets relative to the shaped
/// slice.
#[derive(Debug)]
pub struct RunBuffer<'a> {
    /// Glyph identifiers; 0 is the missing glyph.
    pub glyphs: &'a mut [u32],
    /// Glyph positions.
    pub positions: &'a mut [Point],
    /// Extra per glyph offsets, applied on top of positions.
    pub offsets: &'a mut [Point],
    /// Byte offset of the source cluster of each glyph.
    pub clusters: &'a mut [u32],
    /// Origin added to each position.
    pub origin: Point,
}

/// Receiver for the runs produced by a shaping engine.
pub trait RunHandler {
    /// Announces the next run before its glyphs are delivered.
    fn run_info(&mut self, info: &RunInfo<'_>);

    /// Returns the buffer to fill for the announced run.
    fn buffer(&mut self) -> RunBuffer<'_>;

    /// Completes the run once the buffer has been filled.
    fn commit_run(&mut self, info: &RunInfo<'_>);
}

/// External shaping engine.
pub trait Shaper: fmt::Debug {
    /// Shapes `text`, reporting the resulting runs to `handler` in text
    /// order.
    ///
    /// Glyphs of right-to-left runs are delivered in visual order with
    /// monotonically increasing positions.
    fn shape(&self, text: &str, options: &ShapeOptions<'_>, handler: &mut dyn RunHandler);
}
