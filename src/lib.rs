// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich text paragraph layout.
//!
//! Alinea turns styled text into positioned lines of glyphs. The text
//! is itemized into uniformly styled runs, shaped through a pluggable
//! [`Shaper`](shaper::Shaper) with per codepoint font fallback, broken
//! into lines against a width, then aligned or justified. The laid out
//! paragraph answers the caret, selection and cluster queries an editor
//! needs, and paints itself through a [`Painter`](paint::Painter)
//! supplied by the embedder.
//!
//! A paragraph is assembled with a [`ParagraphBuilder`] obtained from a
//! [`LayoutContext`], which carries the shaper, the font collection and
//! the Unicode tables. Indices on the query surface are UTF-16 code
//! units; everything else in the crate works in UTF-8 bytes.

mod builder;
mod context;
mod itemize;
mod paragraph;
mod shape;
mod utf16;
mod util;

pub mod font;
pub mod layout;
pub mod paint;
pub mod shaper;
pub mod style;
pub mod unicode;

#[cfg(test)]
mod tests;

pub use builder::ParagraphBuilder;
pub use context::LayoutContext;
pub use paragraph::Paragraph;
pub use style::{Brush, ParagraphStyle, TextStyle};

pub use peniko::kurbo;
