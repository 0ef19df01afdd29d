// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paragraph level style.

use smallvec::SmallVec;

use super::{Brush, TextStyle};
use crate::font::FontStyle;

/// Horizontal alignment of lines within the paragraph width.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum TextAlign {
    /// Flush with the leading edge for the paragraph direction.
    #[default]
    Start,
    /// Flush with the trailing edge for the paragraph direction.
    End,
    /// Flush left.
    Left,
    /// Flush right.
    Right,
    /// Centered.
    Center,
    /// Expanded to fill the width on soft wrapped lines.
    Justify,
}

/// Base direction of the paragraph.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// Baseline used to align placeholders.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum TextBaseline {
    /// Baseline of alphabetic scripts.
    #[default]
    Alphabetic,
    /// Baseline of ideographic scripts, at the bottom of the em box.
    Ideographic,
}

/// Controls whether line height multipliers reach the outer edges of the
/// paragraph.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum TextHeightBehavior {
    /// Height multipliers apply everywhere.
    #[default]
    All,
    /// The first line ascent uses the raw font metrics.
    DisableFirstAscent,
    /// The last line descent uses the raw font metrics.
    DisableLastDescent,
    /// Both of the above.
    DisableAll,
}

impl TextHeightBehavior {
    /// The first line ascent ignores the height multiplier.
    pub fn disable_first_ascent(self) -> bool {
        matches!(self, Self::DisableFirstAscent | Self::DisableAll)
    }

    /// The last line descent ignores the height multiplier.
    pub fn disable_last_descent(self) -> bool {
        matches!(self, Self::DisableLastDescent | Self::DisableAll)
    }
}

/// Minimum line metrics applied independently of run content.
#[derive(Clone, PartialEq, Debug)]
pub struct StrutStyle {
    /// Families used to resolve the strut typeface.
    pub font_families: SmallVec<[String; 2]>,
    /// Face selection parameters.
    pub font_style: FontStyle,
    /// Font size in layout units.
    pub font_size: f32,
    /// Line height multiplier; the font metrics are used when `None`.
    pub height: Option<f32>,
    /// Leading multiplier over the font size; the font leading when `None`.
    pub leading: Option<f32>,
    /// Uses the strut as the exact line height instead of a minimum.
    pub force_height: bool,
    /// Enables the strut.
    pub enabled: bool,
    /// Distributes extra height from `height` evenly above and below.
    pub half_leading: bool,
}

impl Default for StrutStyle {
    fn default() -> Self {
        Self {
            font_families: SmallVec::new(),
            font_style: FontStyle::NORMAL,
            font_size: 14.,
            height: None,
            leading: None,
            force_height: false,
            enabled: false,
            half_leading: false,
        }
    }
}

/// Top level paragraph configuration.
#[derive(Clone, Debug)]
pub struct ParagraphStyle<B: Brush> {
    /// Style of text outside any pushed style.
    pub text_style: TextStyle<B>,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Base direction.
    pub direction: TextDirection,
    /// Maximum number of lines to lay out; unlimited when `None`.
    pub max_lines: Option<usize>,
    /// String appended to an overflowing last line, typically `"…"`.
    pub ellipsis: Option<String>,
    /// Strut configuration.
    pub strut: StrutStyle,
    /// First and last line metric handling.
    pub text_height_behavior: TextHeightBehavior,
    /// Rounds layout widths the way legacy clients expect.
    pub apply_rounding_hack: bool,
}

impl<B: Brush> Default for ParagraphStyle<B> {
    fn default() -> Self {
        Self {
            text_style: TextStyle::default(),
            align: TextAlign::Start,
            direction: TextDirection::Ltr,
            max_lines: None,
            ellipsis: None,
            strut: StrutStyle::default(),
            text_height_behavior: TextHeightBehavior::All,
            apply_rounding_hack: true,
        }
    }
}

impl<B: Brush> ParagraphStyle<B> {
    /// Alignment with `Start` and `End` resolved against the direction.
    pub fn effective_align(&self) -> TextAlign {
        match (self.align, self.direction) {
            (TextAlign::Start, TextDirection::Ltr) | (TextAlign::End, TextDirection::Rtl) => {
                TextAlign::Left
            }
            (TextAlign::Start, TextDirection::Rtl) | (TextAlign::End, TextDirection::Ltr) => {
                TextAlign::Right
            }
            (align, _) => align,
        }
    }

    /// Returns `true` when overflow is replaced with an ellipsis.
    pub fn ellipsized(&self) -> bool {
        self.ellipsis.is_some()
    }

    pub(crate) fn base_level(&self) -> u8 {
        match self.direction {
            TextDirection::Ltr => 0,
            TextDirection::Rtl => 1,
        }
    }
}
