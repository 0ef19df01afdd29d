// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich styling of paragraph text.

mod brush;
mod paragraph;

pub use brush::Brush;
pub use paragraph::{
    ParagraphStyle, StrutStyle, TextAlign, TextBaseline, TextDirection, TextHeightBehavior,
};

use core::ops::Range;

use smallvec::SmallVec;

use crate::font::{FontFeature, FontStyle};
use crate::shaper::Point;

/// Set of decoration lines attached to text.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct DecorationLines(u8);

impl DecorationLines {
    /// No decoration lines.
    pub const NONE: Self = Self(0);
    /// Line under the baseline.
    pub const UNDERLINE: Self = Self(1 << 0);
    /// Line over the ascent.
    pub const OVERLINE: Self = Self(1 << 1);
    /// Line through the middle of the text.
    pub const LINE_THROUGH: Self = Self(1 << 2);

    /// Returns `true` if every line in `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` when no lines are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl core::ops::BitOr for DecorationLines {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// How decoration lines are stroked.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum DecorationStyle {
    /// Single solid line.
    #[default]
    Solid,
    /// Two parallel solid lines.
    Double,
    /// Dotted line.
    Dotted,
    /// Dashed line.
    Dashed,
    /// Sinusoidal line.
    Wavy,
}

/// Decoration lines attached to a range of text.
#[derive(Clone, PartialEq, Debug)]
pub struct Decoration<B: Brush> {
    /// Which lines to draw.
    pub lines: DecorationLines,
    /// Stroke style of the lines.
    pub style: DecorationStyle,
    /// Brush for the lines; the text foreground when `None`.
    pub brush: Option<B>,
    /// Multiplier over the thickness reported by the font.
    pub thickness: f32,
}

impl<B: Brush> Default for Decoration<B> {
    fn default() -> Self {
        Self {
            lines: DecorationLines::NONE,
            style: DecorationStyle::Solid,
            brush: None,
            thickness: 1.,
        }
    }
}

/// Shadow painted beneath a range of text.
#[derive(Clone, PartialEq, Debug)]
pub struct TextShadow<B: Brush> {
    /// Brush for the shadow.
    pub brush: B,
    /// Offset from the glyph positions.
    pub offset: Point,
    /// Gaussian blur radius; 0 paints a hard shadow.
    pub blur_sigma: f32,
}

impl<B: Brush> Default for TextShadow<B> {
    fn default() -> Self {
        Self {
            brush: B::default(),
            offset: Point::ZERO,
            blur_sigma: 0.,
        }
    }
}

/// Style applied to a range of text.
#[derive(Clone, PartialEq, Debug)]
pub struct TextStyle<B: Brush> {
    /// Font families in lookup priority order; empty selects the
    /// collection's default faces.
    pub font_families: SmallVec<[String; 2]>,
    /// Face selection parameters.
    pub font_style: FontStyle,
    /// Font size in layout units.
    pub font_size: f32,
    /// OpenType features to apply.
    pub font_features: Vec<FontFeature>,
    /// BCP-47 language tag guiding shaping and fallback.
    pub locale: String,
    /// Line height multiplier; the font metrics are used when `None`.
    pub height: Option<f32>,
    /// Distributes the extra height from `height` evenly above and below
    /// the text instead of proportionally to ascent and descent.
    pub half_leading: bool,
    /// Baseline shift in layout units, positive downward.
    pub baseline_shift: f32,
    /// Extra advance after every cluster.
    pub letter_spacing: f32,
    /// Extra advance after every whitespace cluster.
    pub word_spacing: f32,
    /// Brush for glyphs.
    pub foreground: B,
    /// Brush for the rectangle behind the glyphs.
    pub background: Option<B>,
    /// Decoration lines.
    pub decoration: Decoration<B>,
    /// Shadows painted beneath the text, in paint order.
    pub shadows: Vec<TextShadow<B>>,
}

impl<B: Brush> Default for TextStyle<B> {
    fn default() -> Self {
        Self {
            font_families: SmallVec::new(),
            font_style: FontStyle::NORMAL,
            font_size: 14.,
            font_features: Vec::new(),
            locale: String::new(),
            height: None,
            half_leading: false,
            baseline_shift: 0.,
            letter_spacing: 0.,
            word_spacing: 0.,
            foreground: B::default(),
            background: None,
            decoration: Decoration::default(),
            shadows: Vec::new(),
        }
    }
}

impl<B: Brush> TextStyle<B> {
    /// Returns `true` when painting this style draws more than glyphs.
    pub(crate) fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub(crate) fn has_shadows(&self) -> bool {
        !self.shadows.is_empty()
    }

    pub(crate) fn has_decorations(&self) -> bool {
        !self.decoration.lines.is_empty()
    }
}

/// A run of text sharing one style.
#[derive(Clone, Debug)]
pub struct Block<B: Brush> {
    /// Byte range the style applies to.
    pub range: Range<usize>,
    /// The style.
    pub style: TextStyle<B>,
}

/// Vertical alignment of a placeholder box relative to the text.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum PlaceholderAlignment {
    /// The box's own baseline, `baseline_offset` below its top edge, sits
    /// on the text baseline.
    #[default]
    Baseline,
    /// The bottom edge sits on the text baseline.
    AboveBaseline,
    /// The top edge sits on the text baseline.
    BelowBaseline,
    /// The top edge aligns with the line top.
    Top,
    /// The bottom edge aligns with the line bottom.
    Bottom,
    /// Centered on the line midpoint.
    Middle,
}

/// Geometry of an inline placeholder box.
#[derive(Clone, PartialEq, Debug)]
pub struct PlaceholderStyle {
    /// Width of the box in layout units.
    pub width: f32,
    /// Height of the box in layout units.
    pub height: f32,
    /// Vertical alignment.
    pub alignment: PlaceholderAlignment,
    /// Text baseline to align against.
    pub baseline: TextBaseline,
    /// Distance from the top of the box to its own baseline; only used by
    /// [`PlaceholderAlignment::Baseline`].
    pub baseline_offset: f32,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            width: 0.,
            height: 0.,
            alignment: PlaceholderAlignment::Baseline,
            baseline: TextBaseline::Alphabetic,
            baseline_offset: 0.,
        }
    }
}

/// An embedded box positioned like text but painted by the client.
///
/// The builder keeps a leading sentinel with empty ranges and appends a
/// terminal sentinel covering the text tail, so consecutive `text_before`
/// ranges always tile the paragraph.
#[derive(Clone, Debug)]
pub(crate) struct Placeholder {
    /// Byte range of the object replacement character.
    pub(crate) range: Range<usize>,
    /// Box geometry.
    pub(crate) style: PlaceholderStyle,
    /// Style blocks between the previous placeholder and this one.
    pub(crate) blocks_before: Range<usize>,
    /// Text between the previous placeholder and this one.
    pub(crate) text_before: Range<usize>,
}
