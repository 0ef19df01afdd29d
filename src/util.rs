// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Misc helpers.

use core::ops::Range;

pub(crate) fn nearly_eq(x: f32, y: f32) -> bool {
    (x - y).abs() < f32::EPSILON
}

pub(crate) fn nearly_zero(x: f32) -> bool {
    nearly_eq(x, 0.)
}

/// Intersection of two half-open ranges, collapsed to an empty range
/// anchored at the later start when they are disjoint.
pub(crate) fn intersect(a: &Range<usize>, b: &Range<usize>) -> Range<usize> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end).max(start);
    start..end
}

/// Rounds a width the way legacy text clients expect: two decimal digits
/// below ten thousand, one decimal digit below a hundred thousand, whole
/// units beyond that.
pub(crate) fn little_round(x: f32) -> f32 {
    let val = x.abs();
    if val < 10000. {
        (x * 100.).round() / 100.
    } else if val < 100000. {
        (x * 10.).round() / 10.
    } else {
        x.floor()
    }
}
