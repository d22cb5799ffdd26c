//! Case-insensitive, word-boundary aware matching of placeholder names.
//!
//! A match qualifies when its left edge is the start of the text, follows a
//! non-letter, or starts with an uppercase letter (a camel-case boundary such
//! as `Generic` inside `MyGenericValue`). The end of a previous match is
//! also a boundary. The right edge is not checked, so `Generic` also matches
//! inside `Generics`.

use std::ops::Range;

/// Case-insensitive substring test
pub fn contains_fold(haystack: &str, needle: &str) -> bool {
    find_fold(haystack, needle, 0).is_some()
}

/// Byte offset of the first boundary-correct match of `needle` in `haystack`
pub fn index_boundary(haystack: &str, needle: &str) -> Option<usize> {
    next_boundary(haystack, needle, 0, false).map(|range| range.start)
}

/// Whether `needle` occurs in `haystack` at a word boundary
pub fn contains_boundary(haystack: &str, needle: &str) -> bool {
    index_boundary(haystack, needle).is_some()
}

/// All boundary-correct matches, left to right and non-overlapping.
///
/// The end of a match counts as a boundary, so `genericgeneric` holds two
/// matches of `Generic`.
pub fn find_boundaries(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let mut matches = Vec::new();
    let mut from = 0;
    while let Some(range) = next_boundary(haystack, needle, from, !matches.is_empty()) {
        from = range.end;
        matches.push(range);
    }
    matches
}

/// Replace every boundary-correct match with `replacement`
pub fn replace_boundary(haystack: &str, needle: &str, replacement: &str) -> String {
    replace_boundary_with(haystack, needle, |_, _| replacement.to_string())
}

/// Replace every boundary-correct match with the result of `replace`.
///
/// The callback receives the full haystack and the byte range of the match.
pub fn replace_boundary_with<F>(haystack: &str, needle: &str, mut replace: F) -> String
where
    F: FnMut(&str, Range<usize>) -> String,
{
    let mut output = String::with_capacity(haystack.len());
    let mut last = 0;
    for range in find_boundaries(haystack, needle) {
        output.push_str(&haystack[last..range.start]);
        output.push_str(&replace(haystack, range.clone()));
        last = range.end;
    }
    output.push_str(&haystack[last..]);
    output
}

/// Whether the range is delimited by non-identifier characters on both sides
pub fn is_whole_word(haystack: &str, range: &Range<usize>) -> bool {
    let before = haystack[..range.start].chars().next_back();
    let after = haystack[range.end..].chars().next();
    !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
}

/// Characters that may appear inside a Go identifier
pub fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn next_boundary(
    haystack: &str,
    needle: &str,
    from: usize,
    after_match: bool,
) -> Option<Range<usize>> {
    let mut start = from;
    while let Some(pos) = find_fold(haystack, needle, start) {
        if (after_match && pos == from) || starts_at_boundary(haystack, pos) {
            return Some(pos..pos + needle.len());
        }
        // Step one character past the rejected match start
        start = pos + haystack[pos..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn starts_at_boundary(haystack: &str, pos: usize) -> bool {
    let Some(first) = haystack[pos..].chars().next() else {
        return false;
    };
    match haystack[..pos].chars().next_back() {
        None => true,
        Some(prev) => !prev.is_alphabetic() || !first.is_alphabetic() || first.is_uppercase(),
    }
}

fn find_fold(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    if pat.is_empty() || pat.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - pat.len())
        .filter(|&i| haystack.is_char_boundary(i))
        .find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}
