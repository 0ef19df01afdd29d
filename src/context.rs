// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use crate::builder::ParagraphBuilder;
use crate::font::FontCollection;
use crate::shaper::Shaper;
use crate::style::{Brush, ParagraphStyle};
use crate::unicode::{DefaultUnicode, Unicode};

/// Shared environment for building paragraphs: the shaper, the font
/// collection and the Unicode tables they consult.
///
/// Cheap to clone; every paragraph built from it holds its own handles.
#[derive(Clone, Debug)]
pub struct LayoutContext {
    shaper: Arc<dyn Shaper>,
    fonts: Arc<dyn FontCollection>,
    unicode: Arc<dyn Unicode>,
}

impl LayoutContext {
    pub fn new(shaper: Arc<dyn Shaper>, fonts: Arc<dyn FontCollection>) -> Self {
        Self {
            shaper,
            fonts,
            unicode: Arc::new(DefaultUnicode),
        }
    }

    /// Replaces the Unicode implementation, for callers with richer
    /// tables than the bundled ones.
    pub fn with_unicode(mut self, unicode: Arc<dyn Unicode>) -> Self {
        self.unicode = unicode;
        self
    }

    /// Starts a paragraph under the given style.
    pub fn builder<B: Brush>(&self, style: ParagraphStyle<B>) -> ParagraphBuilder<B> {
        ParagraphBuilder::new(
            style,
            self.shaper.clone(),
            self.fonts.clone(),
            self.unicode.clone(),
        )
    }
}
