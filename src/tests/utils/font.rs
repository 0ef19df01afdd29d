// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::font::{FontCollection, FontMetrics, FontStyle, Typeface};

/// Deterministic typeface: the ascent is three quarters of the size,
/// the descent one quarter, and there is no leading. At size 20 a line
/// box is exactly 20 units tall with the baseline at 15.
#[derive(Debug)]
pub(crate) struct TestTypeface {
    name: String,
    id: u64,
    ascii_only: bool,
}

impl TestTypeface {
    pub(crate) fn new(name: &str, id: u64) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            id,
            ascii_only: false,
        })
    }

    /// A face claiming coverage of ASCII only, for fallback tests.
    pub(crate) fn ascii_only(name: &str, id: u64) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            id,
            ascii_only: true,
        })
    }

    pub(crate) fn covers(&self, codepoint: char) -> bool {
        !self.ascii_only || codepoint.is_ascii()
    }
}

impl Typeface for TestTypeface {
    fn unique_id(&self) -> u64 {
        self.id
    }

    fn family_name(&self) -> &str {
        &self.name
    }

    fn font_style(&self) -> FontStyle {
        FontStyle::NORMAL
    }

    fn metrics(&self, size: f32) -> FontMetrics {
        FontMetrics {
            ascent: size * 0.75,
            descent: size * 0.25,
            leading: 0.,
            underline_offset: size * 0.1,
            underline_size: size * 0.05,
            strikethrough_offset: -size * 0.3,
            strikethrough_size: size * 0.05,
        }
    }
}

/// Collection over a fixed face list with an optional fallback face.
#[derive(Debug)]
pub(crate) struct TestFontCollection {
    faces: Vec<Arc<TestTypeface>>,
    fallback: Option<Arc<TestTypeface>>,
    queries: AtomicUsize,
}

impl TestFontCollection {
    pub(crate) fn new(
        faces: Vec<Arc<TestTypeface>>,
        fallback: Option<Arc<TestTypeface>>,
    ) -> Self {
        Self {
            faces,
            fallback,
            queries: AtomicUsize::new(0),
        }
    }

    /// Number of per codepoint fallback queries received so far.
    pub(crate) fn fallback_queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl FontCollection for TestFontCollection {
    fn find_typefaces(&self, families: &[String], _style: FontStyle) -> Vec<Arc<dyn Typeface>> {
        if families.is_empty() {
            return self
                .faces
                .iter()
                .map(|face| face.clone() as Arc<dyn Typeface>)
                .collect();
        }
        let mut found = Vec::new();
        for family in families {
            for face in &self.faces {
                if face.family_name() == family {
                    found.push(face.clone() as Arc<dyn Typeface>);
                }
            }
        }
        found
    }

    fn default_fallback(
        &self,
        codepoint: char,
        _style: FontStyle,
        _locale: &str,
    ) -> Option<Arc<dyn Typeface>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let fallback = self.fallback.as_ref()?;
        fallback
            .covers(codepoint)
            .then(|| fallback.clone() as Arc<dyn Typeface>)
    }
}
