// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Debug;

/// Trait for types that represent the color or pattern of glyphs,
/// decorations and backgrounds.
///
/// Layout compares brushes when merging style runs but never interprets
/// them; a renderer gives them meaning at paint time.
pub trait Brush: Clone + PartialEq + Default + Debug {}

impl<T: Clone + PartialEq + Default + Debug> Brush for T {}
