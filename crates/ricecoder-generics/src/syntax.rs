//! Tree-sitter helpers for Go templates

use std::ops::Range;

use tree_sitter::{Node, Parser, Tree};

use crate::error::{GenericsError, Result};
use crate::types::{MarkerKind, MARKER_PACKAGE};

/// Parse Go source, failing on any syntax error.
///
/// The error carries the position of the first error or missing node.
pub fn parse_go(filename: &str, source: &str) -> Result<Tree> {
    let tree = parse_go_lenient(filename, source)?;
    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error(root).unwrap_or(root);
        let message = if bad.is_missing() {
            format!("expected `{}`", bad.kind())
        } else {
            let snippet: String = source[bad.byte_range()].chars().take(40).collect();
            format!("syntax error near `{}`", snippet.trim())
        };
        return Err(GenericsError::source_at(filename, bad.start_position(), message));
    }
    Ok(tree)
}

/// Parse Go source without rejecting error nodes
pub fn parse_go_lenient(filename: &str, source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
    parser
        .set_language(&language)
        .map_err(|e| GenericsError::Source {
            filename: filename.to_string(),
            line: 0,
            column: 0,
            message: format!("failed to load Go grammar: {}", e),
        })?;
    parser.parse(source, None).ok_or_else(|| GenericsError::Source {
        filename: filename.to_string(),
        line: 0,
        column: 0,
        message: "parser produced no tree".to_string(),
    })
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// Source text of a node
pub fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Name of the field under which `node` hangs from its parent, if any
pub fn field_in_parent(node: Node<'_>) -> Option<&'static str> {
    let parent = node.parent()?;
    let mut cursor = parent.walk();
    if !cursor.goto_first_child() {
        return None;
    }
    loop {
        if cursor.node() == node {
            return cursor.field_name();
        }
        if !cursor.goto_next_sibling() {
            return None;
        }
    }
}

/// Visit every node of the subtree in document order
pub fn walk<'t, F>(node: Node<'t>, visit: &mut F)
where
    F: FnMut(Node<'t>),
{
    visit(node);
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
    for child in children {
        walk(child, visit);
    }
}

/// Named children of `node` with the given kind
pub fn children_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}

/// Widen a byte range to whole lines when nothing else shares those lines
pub fn whole_lines(source: &str, range: Range<usize>) -> Range<usize> {
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let start = if source[line_start..range.start].trim().is_empty() {
        line_start
    } else {
        range.start
    };

    let line_end = source[range.end..]
        .find('\n')
        .map_or(source.len(), |i| range.end + i + 1);
    let end = if source[range.end..line_end].trim().is_empty() {
        line_end
    } else {
        range.end
    };
    start..end
}

/// `generic.Type` / `generic.Number` marker referenced by a type node
pub fn marker_selector(node: Node<'_>, source: &str) -> Option<MarkerKind> {
    if node.kind() != "qualified_type" {
        return None;
    }
    let package = node.child_by_field_name("package")?;
    let name = node.child_by_field_name("name")?;
    if text(package, source) != MARKER_PACKAGE {
        return None;
    }
    MarkerKind::from_selector(text(name, source))
}

/// Marker kind if the underlying type of a `type_spec`/`type_alias` is a
/// marker selector. Only these declarations need a binding.
pub fn declared_marker(spec: Node<'_>, source: &str) -> Option<MarkerKind> {
    marker_selector(spec.child_by_field_name("type")?, source)
}

/// Marker kind if a `type_spec`/`type_alias` is removed from the output.
///
/// This is either a direct marker reference or an interface that embeds a
/// marker among its members.
pub fn placeholder_marker(spec: Node<'_>, source: &str) -> Option<MarkerKind> {
    let ty = spec.child_by_field_name("type")?;
    if let Some(kind) = marker_selector(ty, source) {
        return Some(kind);
    }
    if ty.kind() != "interface_type" {
        return None;
    }
    let mut found = None;
    walk(ty, &mut |node| {
        if found.is_none() {
            found = marker_selector(node, source);
        }
    });
    found
}

/// Whether a line is a `//go:` or `// +build` compiler directive
pub fn is_directive(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("//go:") || line.starts_with("// +build")
}

/// Type specs declared at the top level of a Go file, grouped or not
pub fn top_level_type_specs(root: Node<'_>) -> Vec<Node<'_>> {
    children_of_kind(root, "type_declaration")
        .into_iter()
        .flat_map(|decl| {
            let mut cursor = decl.walk();
            decl.named_children(&mut cursor)
                .filter(|child| matches!(child.kind(), "type_spec" | "type_alias"))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"package queue

import "github.com/kelindar/genny/generic"

type Generic generic.Type

type (
	Num generic.Number
	Other int
)

type Printer interface {
	generic.Type
	String() string
}
"#;

    #[test]
    fn test_parse_go_reports_position() {
        match parse_go("bad.go", "package x\n\nfunc (\n") {
            Err(GenericsError::Source { filename, line, .. }) => {
                assert_eq!(filename, "bad.go");
                assert!(line >= 3);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected a source error"),
        }
    }

    #[test]
    fn test_top_level_placeholders() -> Result<()> {
        let tree = parse_go("queue.go", TEMPLATE)?;
        let specs = top_level_type_specs(tree.root_node());
        let found: Vec<(String, Option<MarkerKind>)> = specs
            .iter()
            .map(|spec| {
                let name = spec.child_by_field_name("name").map(|n| text(n, TEMPLATE));
                (
                    name.unwrap_or_default().to_string(),
                    placeholder_marker(*spec, TEMPLATE),
                )
            })
            .collect();

        assert_eq!(
            found,
            vec![
                ("Generic".to_string(), Some(MarkerKind::AnyType)),
                ("Num".to_string(), Some(MarkerKind::AnyNumber)),
                ("Other".to_string(), None),
                ("Printer".to_string(), Some(MarkerKind::AnyType)),
            ]
        );

        let declared: Vec<Option<MarkerKind>> = specs
            .iter()
            .map(|spec| declared_marker(*spec, TEMPLATE))
            .collect();
        assert_eq!(
            declared,
            vec![
                Some(MarkerKind::AnyType),
                Some(MarkerKind::AnyNumber),
                None,
                None,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_is_directive() {
        assert!(is_directive("//go:generate rice-generics gen \"Generic=int\""));
        assert!(is_directive("// +build ignore"));
        assert!(is_directive("\t//go:build linux"));
        assert!(!is_directive("// Generic is the element type"));
        assert!(!is_directive("// go:generate is mentioned in prose"));
    }

    #[test]
    fn test_whole_lines() {
        let source = "a\n\tb c\nd\n";
        assert_eq!(whole_lines(source, 3..6), 2..7);
        assert_eq!(whole_lines(source, 7..8), 7..9);
    }

    #[test]
    fn test_field_in_parent() -> Result<()> {
        let source = "package x\n\nvar v Generic\n";
        let tree = parse_go("x.go", source)?;
        let mut fields = Vec::new();
        walk(tree.root_node(), &mut |node| {
            if matches!(node.kind(), "identifier" | "type_identifier") {
                fields.push((text(node, source).to_string(), field_in_parent(node)));
            }
        });
        assert_eq!(
            fields,
            vec![
                ("v".to_string(), Some("name")),
                ("Generic".to_string(), Some("type")),
            ]
        );
        Ok(())
    }
}
