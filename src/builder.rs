// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental construction of a paragraph from styled text spans and
//! inline placeholders.

use core::fmt;
use std::sync::Arc;

use crate::font::FontCollection;
use crate::paragraph::Paragraph;
use crate::shaper::Shaper;
use crate::style::{Block, Brush, ParagraphStyle, Placeholder, PlaceholderStyle, TextStyle};
use crate::unicode::Unicode;

/// Object replacement character standing in for an inline box.
const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Accumulates styled text and placeholders, then builds a
/// [`Paragraph`].
///
/// Styles nest: [`push_style`](Self::push_style) applies until the
/// matching [`pop_style`](Self::pop_style). Consecutive text added
/// under an unchanged style coalesces into one block.
pub struct ParagraphBuilder<B: Brush> {
    style: ParagraphStyle<B>,
    text: String,
    blocks: Vec<Block<B>>,
    placeholders: Vec<Placeholder>,
    stack: Vec<TextStyle<B>>,
    /// Set when the last block must not absorb further text.
    sealed: bool,
    /// First block not yet claimed by a placeholder record.
    block_cursor: usize,
    text_cursor: usize,
    shaper: Arc<dyn Shaper>,
    fonts: Arc<dyn FontCollection>,
    unicode: Arc<dyn Unicode>,
}

impl<B: Brush> ParagraphBuilder<B> {
    pub(crate) fn new(
        style: ParagraphStyle<B>,
        shaper: Arc<dyn Shaper>,
        fonts: Arc<dyn FontCollection>,
        unicode: Arc<dyn Unicode>,
    ) -> Self {
        let stack = vec![style.text_style.clone()];
        Self {
            style,
            text: String::new(),
            blocks: Vec::new(),
            placeholders: vec![Placeholder {
                range: 0..0,
                style: PlaceholderStyle::default(),
                blocks_before: 0..0,
                text_before: 0..0,
            }],
            stack,
            sealed: false,
            block_cursor: 0,
            text_cursor: 0,
            shaper,
            fonts,
            unicode,
        }
    }

    /// The style new text will take.
    pub fn current_style(&self) -> &TextStyle<B> {
        self.stack.last().unwrap_or(&self.style.text_style)
    }

    /// Applies a style to subsequent text.
    pub fn push_style(&mut self, style: TextStyle<B>) {
        self.stack.push(style);
    }

    /// Restores the style in effect before the matching push. Popping
    /// the paragraph's base style logs and does nothing.
    pub fn pop_style(&mut self) {
        if self.stack.len() <= 1 {
            log::warn!("style stack underflow; pop ignored");
            return;
        }
        self.stack.pop();
    }

    /// Appends text under the current style.
    pub fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(text);
        let end = self.text.len();
        let style = self.stack.last().unwrap_or(&self.style.text_style);
        if !self.sealed {
            if let Some(block) = self.blocks.last_mut() {
                if block.style == *style {
                    block.range.end = end;
                    return;
                }
            }
        }
        let style = style.clone();
        self.blocks.push(Block {
            range: start..end,
            style,
        });
        self.sealed = false;
    }

    /// Appends an inline box occupying one object replacement character.
    pub fn add_placeholder(&mut self, style: PlaceholderStyle) {
        let start = self.text.len();
        self.text.push(OBJECT_REPLACEMENT);
        let end = self.text.len();
        let blocks_before = self.block_cursor..self.blocks.len();
        let text_before = self.text_cursor..start;
        let text_style = self.stack.last().unwrap_or(&self.style.text_style).clone();
        // The replacement character gets a block of its own; the run it
        // produces is keyed by this index.
        self.blocks.push(Block {
            range: start..end,
            style: text_style,
        });
        self.block_cursor = self.blocks.len();
        self.text_cursor = end;
        self.sealed = true;
        self.placeholders.push(Placeholder {
            range: start..end,
            style,
            blocks_before,
            text_before,
        });
    }

    /// Text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Finishes the paragraph, consuming the builder.
    pub fn build(mut self) -> Paragraph<B> {
        if self.blocks.is_empty() {
            // An empty paragraph still reports metrics for its style.
            let style = self.stack.last().unwrap_or(&self.style.text_style).clone();
            self.blocks.push(Block {
                range: 0..0,
                style,
            });
        }
        let len = self.text.len();
        self.placeholders.push(Placeholder {
            range: len..len,
            style: PlaceholderStyle::default(),
            blocks_before: self.block_cursor..self.blocks.len(),
            text_before: self.text_cursor..len,
        });
        Paragraph::new(
            self.text,
            self.style,
            self.blocks,
            self.placeholders,
            self.shaper,
            self.fonts,
            self.unicode,
        )
    }
}

impl<B: Brush> fmt::Debug for ParagraphBuilder<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParagraphBuilder")
            .field("text", &self.text)
            .field("blocks", &self.blocks.len())
            .field("placeholders", &(self.placeholders.len() - 1))
            .finish_non_exhaustive()
    }
}
