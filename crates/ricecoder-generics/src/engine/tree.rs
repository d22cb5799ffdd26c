//! Tree-based substitution engine.
//!
//! Parses the template with tree-sitter and rewrites identifier and comment
//! nodes in place. The role of an identifier is read from its parent node
//! and decides between the type form and the name form of a binding.
//! Placeholder declarations are cut out of the source together with their
//! attached comments.

use std::ops::Range;

use tree_sitter::Node;

use super::SubstitutionEngine;
use crate::boundary::contains_fold;
use crate::error::Result;
use crate::syntax::{self, field_in_parent, placeholder_marker, whole_lines};
use crate::transform::{transform_comment, transform_name, transform_token, LexicalContext};
use crate::types::BindingSet;

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "field_identifier",
    "package_identifier",
];

/// Syntactic role of an identifier, derived from its parent node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxRole {
    /// `[]T`, `[4]T`, `chan T`
    ElementType,
    /// `var x T`
    DeclaredType,
    /// `var genericX = ...`
    DeclaredName,
    /// Either side of `=` or `:=`
    AssignTarget,
    /// `T(x)` conversions and called functions
    CallTarget,
    CallArgument,
    /// `type GenericList ...`
    TypeName,
    /// `type List []T`
    AliasedType,
    /// Field, parameter and result types
    FieldType,
    /// Field and parameter names
    FieldName,
    FunctionName,
    /// `a.b` and `pkg.T`
    Selector,
    /// `*T`, `*p`, `&v`
    PointerTarget,
    /// `T{...}`
    CompositeType,
    Operand,
    /// `map[K]V`
    MapSlot,
    KeyValueEntry,
    TypeAssertion,
    ReturnValue,
    /// Parent kind with no rule
    Unresolved(&'static str),
}

impl SyntaxRole {
    /// Classify an identifier node
    pub fn classify(node: Node<'_>) -> Self {
        let Some(parent) = node.parent() else {
            return SyntaxRole::Unresolved("");
        };
        let field = field_in_parent(node);

        match (parent.kind(), field) {
            ("slice_type" | "array_type", Some("element")) => SyntaxRole::ElementType,
            ("channel_type", _) => SyntaxRole::ElementType,
            ("var_spec" | "const_spec", Some("type")) => SyntaxRole::DeclaredType,
            ("var_spec" | "const_spec", _) => SyntaxRole::DeclaredName,
            ("expression_list", _) => match parent.parent().map(|owner| owner.kind()) {
                Some("assignment_statement" | "short_var_declaration") => SyntaxRole::AssignTarget,
                Some("var_spec" | "const_spec") => SyntaxRole::DeclaredName,
                Some("return_statement") => SyntaxRole::ReturnValue,
                Some(kind) => SyntaxRole::Unresolved(kind),
                None => SyntaxRole::Unresolved("expression_list"),
            },
            ("call_expression", Some("function")) => SyntaxRole::CallTarget,
            ("type_conversion_expression", Some("type")) => SyntaxRole::CallTarget,
            ("type_conversion_expression" | "argument_list", _) => SyntaxRole::CallArgument,
            ("type_spec" | "type_alias", Some("name")) => SyntaxRole::TypeName,
            ("type_spec" | "type_alias", _) => SyntaxRole::AliasedType,
            (
                "field_declaration" | "parameter_declaration" | "variadic_parameter_declaration",
                Some("type"),
            ) => SyntaxRole::FieldType,
            ("field_declaration" | "parameter_declaration" | "variadic_parameter_declaration", _) => {
                SyntaxRole::FieldName
            }
            (
                "function_declaration" | "method_declaration" | "method_elem" | "function_type"
                | "func_literal",
                Some("result"),
            ) => SyntaxRole::FieldType,
            ("function_declaration" | "method_declaration" | "method_elem", Some("name")) => {
                SyntaxRole::FunctionName
            }
            ("type_elem", _) => SyntaxRole::FieldType,
            ("selector_expression" | "qualified_type", _) => SyntaxRole::Selector,
            ("pointer_type" | "unary_expression", _) => SyntaxRole::PointerTarget,
            ("composite_literal", Some("type")) => SyntaxRole::CompositeType,
            ("binary_expression", _) => SyntaxRole::Operand,
            ("map_type", _) => SyntaxRole::MapSlot,
            ("keyed_element" | "literal_element", _) => SyntaxRole::KeyValueEntry,
            ("type_assertion_expression", _) => SyntaxRole::TypeAssertion,
            (kind, _) => SyntaxRole::Unresolved(kind),
        }
    }

    /// Whether an exact placeholder match becomes the bound type
    pub fn takes_type_form(&self) -> bool {
        !matches!(
            self,
            SyntaxRole::DeclaredName
                | SyntaxRole::CallArgument
                | SyntaxRole::TypeName
                | SyntaxRole::FieldName
                | SyntaxRole::FunctionName
                | SyntaxRole::Selector
        )
    }

    fn context(&self) -> LexicalContext {
        match self {
            SyntaxRole::FunctionName => LexicalContext::FunctionName,
            SyntaxRole::Selector => LexicalContext::MemberAccess,
            _ => LexicalContext::Plain,
        }
    }
}

#[derive(Debug)]
struct SourceEdit {
    range: Range<usize>,
    replacement: String,
}

fn rewrite_identifier(node: Node<'_>, source: &str, bindings: &BindingSet) -> Option<String> {
    let original = syntax::text(node, source);
    if !bindings
        .iter()
        .any(|binding| contains_fold(original, binding.placeholder()))
    {
        return None;
    }

    let role = SyntaxRole::classify(node);
    if let SyntaxRole::Unresolved(parent) = role {
        tracing::debug!(
            identifier = original,
            parent,
            line = node.start_position().row + 1,
            "no syntax role for identifier, left unchanged"
        );
        return None;
    }

    let context = role.context();
    let rewritten = bindings.iter().fold(original.to_string(), |current, binding| {
        if !contains_fold(&current, binding.placeholder()) {
            current
        } else if role.takes_type_form() {
            transform_token(context, &current, binding)
        } else {
            transform_name(context, &current, binding)
        }
    });
    (rewritten != original).then_some(rewritten)
}

fn rewrite_comment(text: &str, bindings: &BindingSet) -> Option<String> {
    let rewritten = bindings
        .iter()
        .fold(text.to_string(), |current, binding| transform_comment(&current, binding));
    (rewritten != text).then_some(rewritten)
}

/// Byte range of `node` widened over its doc comments and a trailing comment
fn with_attached_comments(node: Node<'_>, source: &str) -> Range<usize> {
    let mut start = node.start_byte();
    let mut first_row = node.start_position().row;
    let mut previous = node.prev_named_sibling();
    while let Some(comment) = previous.filter(|candidate| {
        candidate.kind() == "comment"
            && candidate.end_position().row + 1 == first_row
            && source[..candidate.start_byte()]
                .rsplit('\n')
                .next()
                .map_or(true, |prefix| prefix.trim().is_empty())
    }) {
        start = comment.start_byte();
        first_row = comment.start_position().row;
        previous = comment.prev_named_sibling();
    }

    let mut end = node.end_byte();
    if let Some(trailing) = node.next_named_sibling().filter(|candidate| {
        candidate.kind() == "comment" && candidate.start_position().row == node.end_position().row
    }) {
        end = trailing.end_byte();
    }
    start..end
}

/// Source ranges of every placeholder declaration, merged and sorted.
///
/// A group whose specs are all placeholders goes as a whole.
fn placeholder_deletions(root: Node<'_>, source: &str) -> Vec<Range<usize>> {
    let mut deletions = Vec::new();
    for decl in syntax::children_of_kind(root, "type_declaration") {
        let mut cursor = decl.walk();
        let specs: Vec<Node<'_>> = decl
            .named_children(&mut cursor)
            .filter(|child| matches!(child.kind(), "type_spec" | "type_alias"))
            .collect();
        let placeholders: Vec<Node<'_>> = specs
            .iter()
            .copied()
            .filter(|spec| placeholder_marker(*spec, source).is_some())
            .collect();

        if placeholders.is_empty() {
            continue;
        }
        if placeholders.len() == specs.len() {
            deletions.push(whole_lines(source, with_attached_comments(decl, source)));
        } else {
            deletions.extend(
                placeholders
                    .into_iter()
                    .map(|spec| whole_lines(source, with_attached_comments(spec, source))),
            );
        }
    }

    deletions.sort_by_key(|range| range.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(deletions.len());
    for range in deletions {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

fn apply_edits(source: &str, mut edits: Vec<SourceEdit>) -> String {
    edits.sort_by_key(|edit| edit.range.start);
    let mut output = String::with_capacity(source.len());
    let mut last = 0;
    for edit in edits {
        output.push_str(&source[last..edit.range.start]);
        output.push_str(&edit.replacement);
        last = edit.range.end;
    }
    output.push_str(&source[last..]);
    output
}

/// Syntax-tree engine
#[derive(Debug, Clone, Default)]
pub struct TreeEngine;

impl TreeEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SubstitutionEngine for TreeEngine {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn instantiate(&self, filename: &str, source: &str, bindings: &BindingSet) -> Result<String> {
        let tree = syntax::parse_go(filename, source)?;
        let root = tree.root_node();
        let deletions = placeholder_deletions(root, source);

        let mut edits = Vec::new();
        syntax::walk(root, &mut |node| {
            let replacement = match node.kind() {
                "comment" if !syntax::is_directive(syntax::text(node, source)) => {
                    rewrite_comment(syntax::text(node, source), bindings)
                }
                kind if IDENTIFIER_KINDS.contains(&kind) => {
                    rewrite_identifier(node, source, bindings)
                }
                _ => None,
            };
            if let Some(replacement) = replacement {
                edits.push(SourceEdit {
                    range: node.byte_range(),
                    replacement,
                });
            }
        });

        edits.retain(|edit| {
            !deletions
                .iter()
                .any(|cut| edit.range.start < cut.end && cut.start < edit.range.end)
        });
        tracing::debug!(
            filename,
            bindings = %bindings,
            rewrites = edits.len(),
            deletions = deletions.len(),
            "tree engine produced fragment"
        );
        edits.extend(deletions.into_iter().map(|range| SourceEdit {
            range,
            replacement: String::new(),
        }));

        Ok(apply_edits(source, edits))
    }
}
