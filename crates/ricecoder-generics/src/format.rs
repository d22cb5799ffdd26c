//! Import resolution and whitespace normalization of assembled Go source.
//!
//! The normalizer re-parses the assembled text, rebuilds a single canonical
//! import declaration (dropping unused imports and adding well-known standard
//! library ones that are referenced but missing), then tidies whitespace.
//! Any failure here points at the substitution logic and is reported as a
//! format error.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use tree_sitter::Node;

use crate::error::{GenericsError, Result};
use crate::syntax::{self, whole_lines};

/// Qualifiers resolved to standard library paths when referenced without an import
const WELL_KNOWN_PACKAGES: &[(&str, &str)] = &[
    ("atomic", "sync/atomic"),
    ("bufio", "bufio"),
    ("bytes", "bytes"),
    ("context", "context"),
    ("errors", "errors"),
    ("fmt", "fmt"),
    ("heap", "container/heap"),
    ("io", "io"),
    ("json", "encoding/json"),
    ("list", "container/list"),
    ("math", "math"),
    ("os", "os"),
    ("reflect", "reflect"),
    ("ring", "container/ring"),
    ("sort", "sort"),
    ("strconv", "strconv"),
    ("strings", "strings"),
    ("sync", "sync"),
    ("time", "time"),
    ("unicode", "unicode"),
    ("utf8", "unicode/utf8"),
];

/// One import spec: an optional local name and the quoted-less path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImportSpec {
    pub path: String,
    pub alias: Option<String>,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    /// Name the package is referenced by in code
    pub fn qualifier(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => assumed_package_name(&self.path),
        }
    }

    /// Blank and dot imports are kept even when nothing references them
    pub fn is_side_effect(&self) -> bool {
        matches!(self.alias.as_deref(), Some("_") | Some("."))
    }

    /// Standard library paths have no dot in their first element
    pub fn is_std(&self) -> bool {
        self.path
            .split('/')
            .next()
            .is_some_and(|first| !first.contains('.'))
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} \"{}\"", alias, self.path),
            None => write!(f, "\"{}\"", self.path),
        }
    }
}

/// Package name a path is assumed to declare when no alias is given.
///
/// `gopkg.in/yaml.v3` gives `yaml`, `github.com/x/go-cache` gives `cache`
/// and `example.com/mod/v2` gives `mod`.
pub fn assumed_package_name(path: &str) -> String {
    let mut elements = path.rsplit('/');
    let mut last = elements.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(previous) = elements.next() {
            last = previous;
        }
    }
    let last = last.strip_prefix("go-").unwrap_or(last);
    last.chars()
        .take_while(|c| *c == '_' || c.is_alphanumeric())
        .collect()
}

fn is_major_version(element: &str) -> bool {
    element
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

fn format_error(message: impl Into<String>) -> GenericsError {
    GenericsError::Format {
        message: message.into(),
    }
}

fn unquote(literal: &str) -> &str {
    literal.trim_matches(|c| c == '"' || c == '`')
}

fn collect_imports(root: Node<'_>, source: &str) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    for decl in syntax::children_of_kind(root, "import_declaration") {
        syntax::walk(decl, &mut |node| {
            if node.kind() != "import_spec" {
                return;
            }
            let Some(path) = node.child_by_field_name("path") else {
                return;
            };
            specs.push(ImportSpec {
                path: unquote(syntax::text(path, source)).to_string(),
                alias: node
                    .child_by_field_name("name")
                    .map(|name| syntax::text(name, source).to_string()),
            });
        });
    }
    specs
}

/// Package qualifiers used in selectors and qualified types
fn referenced_qualifiers(root: Node<'_>, source: &str) -> BTreeSet<String> {
    let mut qualifiers = BTreeSet::new();
    syntax::walk(root, &mut |node| {
        let qualifier = match node.kind() {
            "selector_expression" => node
                .child_by_field_name("operand")
                .filter(|operand| operand.kind() == "identifier"),
            "qualified_type" => node.child_by_field_name("package"),
            _ => None,
        };
        if let Some(qualifier) = qualifier {
            qualifiers.insert(syntax::text(qualifier, source).to_string());
        }
    });
    qualifiers
}

/// Names declared in the file that could shadow a package qualifier
fn declared_names(root: Node<'_>, source: &str) -> HashSet<String> {
    let mut names = HashSet::new();
    syntax::walk(root, &mut |node| {
        if node.kind() != "identifier" {
            return;
        }
        let Some(parent) = node.parent() else {
            return;
        };
        let declares = match parent.kind() {
            "var_spec" | "const_spec" | "parameter_declaration" | "variadic_parameter_declaration"
            | "function_declaration" => syntax::field_in_parent(node) == Some("name"),
            "expression_list" => parent
                .parent()
                .is_some_and(|owner| matches!(owner.kind(), "short_var_declaration" | "range_clause"))
                && syntax::field_in_parent(parent) == Some("left"),
            _ => false,
        };
        if declares {
            names.insert(syntax::text(node, source).to_string());
        }
    });
    names
}

fn render_imports(imports: &BTreeSet<ImportSpec>) -> String {
    match imports.len() {
        0 => String::new(),
        1 => imports
            .iter()
            .map(|spec| format!("import {}\n", spec))
            .collect(),
        _ => {
            let std: Vec<String> = imports
                .iter()
                .filter(|spec| spec.is_std())
                .map(|spec| format!("\t{}\n", spec))
                .collect();
            let others: Vec<String> = imports
                .iter()
                .filter(|spec| !spec.is_std())
                .map(|spec| format!("\t{}\n", spec))
                .collect();
            let mut block = String::from("import (\n");
            block.push_str(&std.concat());
            if !std.is_empty() && !others.is_empty() {
                block.push('\n');
            }
            block.push_str(&others.concat());
            block.push_str(")\n");
            block
        }
    }
}

/// Trim trailing whitespace, collapse blank-line runs, end with one newline
pub fn tidy_whitespace(source: &str) -> String {
    let mut output = String::with_capacity(source.len());
    let mut previous_blank = true;
    for line in source.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            if !previous_blank {
                output.push('\n');
            }
            previous_blank = true;
            continue;
        }
        output.push_str(line);
        output.push('\n');
        previous_blank = false;
    }
    while output.ends_with("\n\n") {
        output.pop();
    }
    output
}

/// Normalize imports and whitespace of a complete Go source file
pub fn normalize(filename: &str, source: &str) -> Result<String> {
    let tree = syntax::parse_go(filename, source)
        .map_err(|e| format_error(format!("assembled output does not parse: {}", e)))?;
    let root = tree.root_node();

    let package = syntax::children_of_kind(root, "package_clause")
        .into_iter()
        .next()
        .ok_or_else(|| format_error(format!("{}: missing package clause", filename)))?;

    let existing = collect_imports(root, source);
    let referenced = referenced_qualifiers(root, source);
    let declared = declared_names(root, source);

    let mut imports: BTreeSet<ImportSpec> = BTreeSet::new();
    for spec in existing {
        if spec.is_side_effect() || referenced.contains(&spec.qualifier()) {
            imports.insert(spec);
        } else {
            tracing::debug!(import = %spec, "removing unused import");
        }
    }

    let known: HashSet<String> = imports.iter().map(ImportSpec::qualifier).collect();
    for qualifier in referenced
        .iter()
        .filter(|q| !known.contains(*q) && !declared.contains(*q))
    {
        if let Some((_, path)) = WELL_KNOWN_PACKAGES
            .iter()
            .find(|(name, _)| *name == qualifier.as_str())
        {
            tracing::debug!(import = %path, "adding missing import");
            imports.insert(ImportSpec::new(*path));
        }
    }

    let mut cuts: Vec<_> = syntax::children_of_kind(root, "import_declaration")
        .into_iter()
        .map(|decl| whole_lines(source, decl.byte_range()))
        .collect();
    cuts.sort_by_key(|range| range.start);

    let package_end = package.end_byte();
    let mut assembled = String::with_capacity(source.len() + 64);
    assembled.push_str(&source[..package_end]);
    assembled.push_str("\n\n");
    assembled.push_str(&render_imports(&imports));
    assembled.push('\n');

    let mut last = package_end;
    for cut in cuts {
        if cut.start < last {
            continue;
        }
        assembled.push_str(&source[last..cut.start]);
        last = cut.end;
    }
    assembled.push_str(&source[last..]);

    Ok(tidy_whitespace(&assembled))
}
