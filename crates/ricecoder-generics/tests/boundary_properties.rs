//! Property-based tests for boundary matching and identifier transformation

use proptest::prelude::*;
use ricecoder_generics::boundary::{
    contains_boundary, find_boundaries, index_boundary, replace_boundary,
};
use ricecoder_generics::{transform_token, LexicalContext, TypeBinding};

/// Strategy for exported placeholder names drawn from the first half of the alphabet
fn placeholder_strategy() -> impl Strategy<Value = String> {
    "[A-M][a-m]{2,8}".prop_map(|s| s.to_string())
}

/// Strategy for concrete Go type names
fn type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("int".to_string()),
        Just("string".to_string()),
        Just("float64".to_string()),
        Just("bool".to_string()),
        "[a-z][a-z0-9]{0,8}".prop_map(|s| s.to_string()),
    ]
}

proptest! {
    /// A placeholder glued after a lowercase prefix is found at the camel-case boundary
    #[test]
    fn prop_camel_case_boundary_found(
        prefix in "[n-z]{0,8}",
        placeholder in placeholder_strategy(),
        suffix in "([A-Z][a-z]{0,6})?",
    ) {
        let haystack = format!("{}{}{}", prefix, placeholder, suffix);
        prop_assert_eq!(index_boundary(&haystack, &placeholder), Some(prefix.len()));
    }

    /// Matches are ordered, non-overlapping and case-insensitively equal to the needle
    #[test]
    fn prop_matches_are_disjoint(haystack in "[aAbB _.]{0,40}", needle in "[aAbB]{1,3}") {
        let matches = find_boundaries(&haystack, &needle);
        for window in matches.windows(2) {
            prop_assert!(window[0].end <= window[1].start);
        }
        for range in &matches {
            prop_assert!(haystack[range.clone()].eq_ignore_ascii_case(&needle));
        }
    }

    /// Text that never contains the needle comes back unchanged
    #[test]
    fn prop_no_match_is_identity(haystack in "[a-pr-z_ .]{0,40}") {
        prop_assert!(!contains_boundary(&haystack, "Queue"));
        prop_assert_eq!(replace_boundary(&haystack, "Queue", "List"), haystack);
    }

    /// An identifier equal to the placeholder always becomes the bound type
    #[test]
    fn prop_exact_match_yields_type(placeholder in placeholder_strategy(), ty in type_strategy()) {
        let binding = TypeBinding::new(placeholder.clone(), ty.clone());
        for context in [
            LexicalContext::Plain,
            LexicalContext::FunctionName,
            LexicalContext::MemberAccess,
            LexicalContext::CommentMarker,
        ] {
            prop_assert_eq!(transform_token(context, &placeholder, &binding), ty.clone());
        }
    }

    /// Compound identifiers keep the case of their first letter
    #[test]
    fn prop_compound_keeps_export_status(
        placeholder in placeholder_strategy(),
        tail in "[N-Z][n-z]{1,6}",
        exported in any::<bool>(),
    ) {
        let binding = TypeBinding::new(placeholder.clone(), "string");
        let token = if exported {
            format!("{}{}", placeholder, tail)
        } else {
            let mut lower = placeholder.to_lowercase();
            lower.push_str(&tail);
            lower
        };
        let result = transform_token(LexicalContext::Plain, &token, &binding);
        let expected_head = if exported { "String" } else { "string" };
        prop_assert!(result.starts_with(expected_head), "{} -> {}", token, result);
        prop_assert!(result.ends_with(&tail));
    }
}

#[test]
fn test_suffixed_words_match_on_left_boundary_only() {
    // The right edge is never checked: `Generics` contains a match.
    assert!(contains_boundary("Generics", "Generic"));
    assert!(contains_boundary("myGenerics", "Generic"));
    // A lowercase continuation inside a word is not a boundary.
    assert!(!contains_boundary("nongeneric", "Generic"));
    assert_eq!(
        replace_boundary("GenericList genericsOf xgeneric", "Generic", "Int"),
        "IntList IntsOf xgeneric"
    );
}

#[test]
fn test_repeated_placeholder_replaced_throughout() {
    assert_eq!(
        replace_boundary("genericgeneric Genericgeneric", "Generic", "int"),
        "intint intint"
    );
    assert_eq!(find_boundaries("GENERICgeneric", "generic").len(), 2);
}
