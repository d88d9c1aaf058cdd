// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Assertions over split results

use std::ops::Range;

/// Assert that `actual` statements equal `expected`, with a readable diff
#[track_caller]
pub fn assert_statements<S: AsRef<str>>(actual: &[S], expected: &[&str], context: &str) {
    let actual: Vec<&str> = actual.iter().map(AsRef::as_ref).collect();
    assert_eq!(
        actual, expected,
        "{context}: expected {} statements, got {}",
        expected.len(),
        actual.len()
    );
}

/// Assert that every range lies inside a script of `len` bytes and that the
/// ranges are ordered and disjoint
#[track_caller]
pub fn assert_offsets_in_range(ranges: &[Range<usize>], len: usize) {
    let mut last_end = 0;
    for range in ranges {
        assert!(range.start <= range.end, "inverted range {range:?}");
        assert!(range.end <= len, "range {range:?} past end of script ({len})");
        assert!(range.start >= last_end, "range {range:?} overlaps previous");
        last_end = range.end;
    }
}
