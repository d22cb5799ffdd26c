//! Line-based substitution engine.
//!
//! Rewrites the template one line at a time with a small tokenizer instead
//! of a full parse. Placeholder declarations are dropped together with the
//! comment lines directly above them, and interface blocks that embed a
//! marker are dropped whole. Interface detection does not nest.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use super::SubstitutionEngine;
use crate::boundary::contains_boundary;
use crate::error::Result;
use crate::syntax;
use crate::transform::{transform_comment, transform_token, LexicalContext};
use crate::types::{BindingSet, MarkerKind, TypeBinding};

lazy_static! {
    static ref INTERFACE_BEGIN: Regex = Regex::new(r"^\s*type\s+\w+\s+interface\s*\{").unwrap();
    static ref BLOCK_END: Regex = Regex::new(r"^\s*\}").unwrap();
}

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Comment,
    Literal,
    Ident,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    range: Range<usize>,
}

/// Split one line into comment, literal and identifier spans.
///
/// `in_block_comment` carries `/* ... */` state from the previous line and is
/// updated for the next one. Keywords, numbers and punctuation are not returned.
fn tokenize(line: &str, in_block_comment: &mut bool) -> Vec<Token> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    if *in_block_comment {
        match line.find("*/") {
            Some(end) => {
                *in_block_comment = false;
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    range: 0..end + 2,
                });
                i = end + 2;
            }
            None => {
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    range: 0..line.len(),
                });
                return tokens;
            }
        }
    }

    while i < bytes.len() {
        let rest = &line[i..];
        if rest.starts_with("//") {
            tokens.push(Token {
                kind: TokenKind::Comment,
                range: i..line.len(),
            });
            break;
        }
        if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(end) => {
                    let stop = i + 2 + end + 2;
                    tokens.push(Token {
                        kind: TokenKind::Comment,
                        range: i..stop,
                    });
                    i = stop;
                }
                None => {
                    *in_block_comment = true;
                    tokens.push(Token {
                        kind: TokenKind::Comment,
                        range: i..line.len(),
                    });
                    break;
                }
            }
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        match ch {
            '"' | '\'' | '`' => {
                let end = literal_end(line, i, ch);
                tokens.push(Token {
                    kind: TokenKind::Literal,
                    range: i..end,
                });
                i = end;
            }
            c if c == '_' || c.is_alphabetic() => {
                let end = rest
                    .char_indices()
                    .find(|(_, c)| !(*c == '_' || c.is_alphanumeric()))
                    .map_or(line.len(), |(offset, _)| i + offset);
                if !KEYWORDS.contains(&&line[i..end]) {
                    tokens.push(Token {
                        kind: TokenKind::Ident,
                        range: i..end,
                    });
                }
                i = end;
            }
            c if c.is_ascii_digit() => {
                // Numbers never contain a placeholder worth renaming; skip `0x1F`, `1e9`, `1_000`
                let end = rest
                    .char_indices()
                    .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '.'))
                    .map_or(line.len(), |(offset, _)| i + offset);
                i = end;
            }
            c => i += c.len_utf8(),
        }
    }
    tokens
}

/// End offset of the literal opened by `quote` at `start` (end of line if unterminated)
fn literal_end(line: &str, start: usize, quote: char) -> usize {
    let mut escaped = false;
    for (offset, c) in line[start + 1..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' && quote != '`' {
            escaped = true;
        } else if c == quote {
            return start + 1 + offset + 1;
        }
    }
    line.len()
}

/// Line text with comment spans removed
fn code_text(line: &str, tokens: &[Token]) -> String {
    let mut code = String::with_capacity(line.len());
    let mut last = 0;
    for token in tokens.iter().filter(|t| t.kind == TokenKind::Comment) {
        code.push_str(&line[last..token.range.start]);
        last = token.range.end;
    }
    code.push_str(&line[last..]);
    code
}

fn references_marker(code: &str) -> bool {
    [MarkerKind::AnyType, MarkerKind::AnyNumber]
        .iter()
        .any(|kind| code.contains(kind.selector()))
}

/// Rewrite every comment, literal and identifier of `line` under one binding
fn substitute_line(line: &str, binding: &TypeBinding, starts_in_comment: bool) -> String {
    let mut in_block = starts_in_comment;
    let tokens = tokenize(line, &mut in_block);

    let mut output = String::with_capacity(line.len() + 16);
    let mut last = 0;
    for token in &tokens {
        output.push_str(&line[last..token.range.start]);
        let text = &line[token.range.clone()];
        let replaced = match token.kind {
            TokenKind::Comment => transform_comment(text, binding),
            TokenKind::Literal | TokenKind::Ident => {
                let context = LexicalContext::from_prefix(&line[..token.range.start]);
                transform_token(context, text, binding)
            }
        };
        output.push_str(&replaced);
        last = token.range.end;
    }
    output.push_str(&line[last..]);
    output
}

#[derive(Debug, Default)]
struct InterfaceBlock {
    lines: Vec<String>,
    references_marker: bool,
}

/// Accumulates the output of one instantiation
#[derive(Debug, Default)]
struct LineState {
    lines: Vec<String>,
    pending_comments: Vec<String>,
    interface: Option<InterfaceBlock>,
    in_block_comment: bool,
    in_import_block: bool,
}

impl LineState {
    fn emit(&mut self, line: String) {
        match self.interface.as_mut() {
            Some(block) => block.lines.push(line),
            None => self.lines.push(line),
        }
    }

    fn flush_comments(&mut self) {
        for comment in std::mem::take(&mut self.pending_comments) {
            self.emit(comment);
        }
    }

    fn close_interface(&mut self, closing: Option<&str>) {
        if let Some(block) = self.interface.take() {
            if !block.references_marker {
                self.lines.extend(block.lines);
                self.lines.extend(closing.map(str::to_string));
            }
        }
    }

    /// Package, import and import-block lines are passed through untouched
    fn is_preamble(&mut self, code: &str) -> bool {
        let trimmed = code.trim();
        if self.in_import_block {
            if trimmed.ends_with(')') {
                self.in_import_block = false;
            }
            return true;
        }
        if trimmed.starts_with("import") && trimmed.ends_with('(') {
            self.in_import_block = true;
            return true;
        }
        trimmed.starts_with("package ") || trimmed.starts_with("import ")
    }
}

/// Token-scanning engine
#[derive(Debug, Clone, Default)]
pub struct LineEngine;

impl LineEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SubstitutionEngine for LineEngine {
    fn name(&self) -> &'static str {
        "line"
    }

    fn instantiate(&self, filename: &str, source: &str, bindings: &BindingSet) -> Result<String> {
        let mut state = LineState::default();

        for raw in source.lines() {
            let starts_in_comment = state.in_block_comment;
            let tokens = tokenize(raw, &mut state.in_block_comment);
            let code = code_text(raw, &tokens);

            if state.interface.is_none() && !starts_in_comment && INTERFACE_BEGIN.is_match(raw) {
                let closes_here = code
                    .split_once('{')
                    .is_some_and(|(_, body)| body.contains('}'));
                if !closes_here {
                    state.interface = Some(InterfaceBlock {
                        lines: std::mem::take(&mut state.pending_comments),
                        references_marker: false,
                    });
                }
            } else if state.interface.is_some() && BLOCK_END.is_match(raw) {
                state.flush_comments();
                state.close_interface(Some(raw));
                continue;
            }

            if references_marker(&code) {
                state.pending_comments.clear();
                if let Some(block) = state.interface.as_mut() {
                    block.references_marker = true;
                }
                continue;
            }

            let passthrough =
                !starts_in_comment && (syntax::is_directive(raw) || state.is_preamble(&code));
            let line = if passthrough {
                raw.to_string()
            } else {
                bindings.iter().fold(raw.to_string(), |line, binding| {
                    if contains_boundary(&line, binding.placeholder()) {
                        substitute_line(&line, binding, starts_in_comment)
                    } else {
                        line
                    }
                })
            };

            if line.starts_with("//") {
                state.pending_comments.push(line);
                continue;
            }

            state.flush_comments();
            state.emit(line);
        }

        state.flush_comments();
        state.close_interface(None);

        tracing::debug!(
            filename,
            bindings = %bindings,
            lines = state.lines.len(),
            "line engine produced fragment"
        );

        let mut output = state.lines.join("\n");
        output.push('\n');
        Ok(output)
    }
}
