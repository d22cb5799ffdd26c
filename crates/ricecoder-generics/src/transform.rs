//! Identifier transformer: computes the replacement text for one token
//! under one type binding.

use std::ops::Range;

use crate::boundary::{contains_fold, is_whole_word, replace_boundary_with};
use crate::types::TypeBinding;

/// Lexical position of a token, judged from the text that precedes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalContext {
    Plain,
    /// Token directly follows `func `
    FunctionName,
    /// Token directly follows a `.`
    MemberAccess,
    /// Token is a word inside a comment
    CommentMarker,
}

impl LexicalContext {
    /// Classify a token from the bytes preceding it on its line
    pub fn from_prefix(prefix: &str) -> Self {
        if prefix.ends_with("func ") {
            LexicalContext::FunctionName
        } else if prefix.ends_with('.') {
            LexicalContext::MemberAccess
        } else if prefix.ends_with("// ") {
            LexicalContext::CommentMarker
        } else {
            LexicalContext::Plain
        }
    }

    /// Contexts where numeric bindings take the exported word, e.g. `MaxFloat64`
    fn forces_exported_number(&self) -> bool {
        !matches!(self, LexicalContext::Plain)
    }
}

/// Whether a token starts with an uppercase letter
pub fn is_exported(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

/// Transform a token that may stand in a type position.
///
/// A token equal to the placeholder becomes the binding's type; otherwise
/// whole-word occurrences inside literals and comments become the type and
/// compound occurrences become the derived word.
pub fn transform_token(context: LexicalContext, token: &str, binding: &TypeBinding) -> String {
    if token == binding.placeholder() {
        return binding.type_form().to_string();
    }
    rename(context, token, binding, true)
}

/// Transform a token in a name position: only derived words are substituted.
pub fn transform_name(context: LexicalContext, token: &str, binding: &TypeBinding) -> String {
    rename(context, token, binding, false)
}

/// Transform every whitespace-separated word of a comment, keeping the spacing
pub fn transform_comment(text: &str, binding: &TypeBinding) -> String {
    if !contains_fold(text, binding.placeholder()) {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut word_start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                output.push_str(&transform_token(
                    LexicalContext::CommentMarker,
                    &text[start..idx],
                    binding,
                ));
            }
            output.push(ch);
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }
    if let Some(start) = word_start {
        output.push_str(&transform_token(
            LexicalContext::CommentMarker,
            &text[start..],
            binding,
        ));
    }
    output
}

fn rename(context: LexicalContext, token: &str, binding: &TypeBinding, exact_words: bool) -> String {
    let placeholder = binding.placeholder();
    if !contains_fold(token, placeholder) {
        return token.to_string();
    }

    let exported = binding.word(true);
    let unexported = binding.word(false);
    let force_exported = binding.is_numeric() && context.forces_exported_number();

    let mut result = replace_boundary_with(token, placeholder, |text, range: Range<usize>| {
        let matched = &text[range.clone()];
        if exact_words && matched == placeholder && is_whole_word(text, &range) {
            binding.type_form().to_string()
        } else if force_exported || is_exported(matched) {
            exported.clone()
        } else {
            unexported.clone()
        }
    });

    if !force_exported
        && !is_exported(token)
        && exported != unexported
        && result.starts_with(&exported)
    {
        result.replace_range(..exported.len(), &unexported);
    }

    tracing::trace!(token, %binding, result = %result, "renamed token");
    result
}
