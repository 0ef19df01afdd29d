// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font abstraction.
//!
//! Font management lives outside this crate. Layout selects faces through
//! the [`FontCollection`] trait and reads metrics through [`Typeface`];
//! glyph identifiers only have meaning to the collection and the shaping
//! engine that produced them.

use core::fmt;
use std::sync::Arc;

/// Slant of a face.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub enum FontSlant {
    /// Upright glyphs.
    #[default]
    Upright,
    /// Cursive glyphs.
    Italic,
    /// Slanted upright glyphs.
    Oblique,
}

/// Parameters used to select a face within a family.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FontStyle {
    /// Weight class, 100..=900 with 400 as normal.
    pub weight: u16,
    /// Width class, 1..=9 with 5 as normal.
    pub width: u8,
    /// Slant.
    pub slant: FontSlant,
}

impl FontStyle {
    /// Normal weight and width, upright.
    pub const NORMAL: Self = Self {
        weight: 400,
        width: 5,
        slant: FontSlant::Upright,
    };

    /// Bold weight, normal width, upright.
    pub const BOLD: Self = Self {
        weight: 700,
        width: 5,
        slant: FontSlant::Upright,
    };

    /// Normal weight and width, italic.
    pub const ITALIC: Self = Self {
        weight: 400,
        width: 5,
        slant: FontSlant::Italic,
    };
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Metrics of a face scaled to a size, y-down with positive ascent above
/// and positive descent below the baseline.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the em box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the em box.
    pub descent: f32,
    /// Recommended extra spacing between lines.
    pub leading: f32,
    /// Offset from the baseline to the top of the underline.
    pub underline_offset: f32,
    /// Thickness of the underline.
    pub underline_size: f32,
    /// Offset from the baseline to the top of the strikethrough, negative
    /// above the baseline.
    pub strikethrough_offset: f32,
    /// Thickness of the strikethrough.
    pub strikethrough_size: f32,
}

impl FontMetrics {
    /// Sum of ascent, descent and leading.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// A single face held by a collection.
pub trait Typeface: fmt::Debug {
    /// Identifier unique within the collection.
    fn unique_id(&self) -> u64;

    /// Primary family name.
    fn family_name(&self) -> &str;

    /// Style parameters of this face.
    fn font_style(&self) -> FontStyle;

    /// Metrics scaled to `size` layout units per em.
    fn metrics(&self, size: f32) -> FontMetrics;
}

/// A typeface bound to a size.
#[derive(Clone, Debug)]
pub struct Font {
    typeface: Arc<dyn Typeface>,
    size: f32,
}

impl Font {
    /// Binds a typeface to a size in layout units.
    pub fn new(typeface: Arc<dyn Typeface>, size: f32) -> Self {
        Self { typeface, size }
    }

    /// The underlying typeface.
    pub fn typeface(&self) -> &Arc<dyn Typeface> {
        &self.typeface
    }

    /// Size in layout units per em.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Scaled metrics.
    pub fn metrics(&self) -> FontMetrics {
        self.typeface.metrics(self.size)
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.typeface.unique_id() == other.typeface.unique_id() && self.size == other.size
    }
}

/// Set of typefaces available to layout.
///
/// Both operations may come up empty. Layout then shapes with whatever it
/// has and keeps a count of glyphs that stayed unresolved; it never fails
/// outright unless no typeface can be obtained at all.
pub trait FontCollection: fmt::Debug {
    /// Resolves each named family to its best match for `style`, in the
    /// priority order of `families`. An empty family list selects the
    /// collection's default faces.
    fn find_typefaces(&self, families: &[String], style: FontStyle) -> Vec<Arc<dyn Typeface>>;

    /// Proposes a face covering `codepoint` when none of the listed
    /// families did.
    fn default_fallback(
        &self,
        codepoint: char,
        style: FontStyle,
        locale: &str,
    ) -> Option<Arc<dyn Typeface>>;
}

/// OpenType feature setting.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FontFeature {
    /// Feature tag such as `*b"liga"`.
    pub tag: [u8; 4],
    /// Feature value; 0 disables, 1 enables.
    pub value: u16,
}
