//! Core data types: bindings, placeholders and run options

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GenericsError, Result};

/// Package name whose `Type`/`Number` selectors mark a placeholder declaration
pub const MARKER_PACKAGE: &str = "generic";

/// Go builtin types that count as numeric for the exported-name override
const NUMERIC_TYPES: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr", "float32", "float64", "complex64", "complex128", "byte", "rune",
];

/// The two marker kinds a placeholder can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// `generic.Type`
    AnyType,
    /// `generic.Number`
    AnyNumber,
}

impl MarkerKind {
    /// Resolve the selector name used after `generic.`
    pub fn from_selector(name: &str) -> Option<Self> {
        match name {
            "Type" => Some(MarkerKind::AnyType),
            "Number" => Some(MarkerKind::AnyNumber),
            _ => None,
        }
    }

    /// Fully qualified selector text, e.g. `generic.Type`
    pub fn selector(&self) -> &'static str {
        match self {
            MarkerKind::AnyType => "generic.Type",
            MarkerKind::AnyNumber => "generic.Number",
        }
    }
}

/// A template-level type declaration standing in for a concrete type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub kind: MarkerKind,
}

/// One placeholder bound to a type specification.
///
/// The specification may be written `alias:type`; the alias drives generated
/// identifier words while the type is what gets substituted in type positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBinding {
    placeholder: String,
    spec: String,
}

impl TypeBinding {
    pub fn new(placeholder: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            spec: spec.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Text substituted where the placeholder is used as a type
    pub fn type_form(&self) -> &str {
        match self.spec.split_once(':') {
            Some((_, ty)) => ty,
            None => &self.spec,
        }
    }

    /// Identifier word derived from the alias (or the type), in exported or unexported case
    pub fn word(&self, exported: bool) -> String {
        let base: String = match self.spec.split_once(':') {
            Some((alias, _)) => alias.to_string(),
            None => self
                .spec
                .chars()
                .filter(|c| !matches!(c, '[' | ']' | '{' | '}' | '*' | '&' | '.'))
                .collect(),
        };

        let mut chars = base.chars();
        match chars.next() {
            Some(first) if exported => first.to_uppercase().chain(chars).collect(),
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Whether the bound type is one of Go's builtin numeric types
    pub fn is_numeric(&self) -> bool {
        NUMERIC_TYPES.contains(&self.type_form())
    }
}

impl fmt::Display for TypeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.placeholder, self.spec)
    }
}

/// One complete assignment of concrete types to placeholders.
///
/// Keys are unique and iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSet {
    bindings: Vec<TypeBinding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a binding set from `(placeholder, spec)` pairs, rejecting duplicate keys
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (placeholder, spec) in pairs {
            set.insert(TypeBinding::new(placeholder, spec))?;
        }
        Ok(set)
    }

    /// Add a binding; fails when the placeholder is already bound
    pub fn insert(&mut self, binding: TypeBinding) -> Result<()> {
        if binding.placeholder.is_empty() {
            return Err(GenericsError::InvalidBinding(
                "placeholder name cannot be empty".to_string(),
            ));
        }
        if self.get(&binding.placeholder).is_some() {
            return Err(GenericsError::InvalidBinding(format!(
                "placeholder '{}' is bound more than once",
                binding.placeholder
            )));
        }
        self.bindings.push(binding);
        Ok(())
    }

    pub fn get(&self, placeholder: &str) -> Option<&TypeBinding> {
        self.bindings.iter().find(|b| b.placeholder == placeholder)
    }

    pub fn contains(&self, placeholder: &str) -> bool {
        self.get(placeholder).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for BindingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .bindings
            .iter()
            .map(|b| format!("{}={}", b.placeholder, b.spec))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Substitution strategy used for each instantiation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Token-based rewriting, one line at a time
    #[default]
    Line,
    /// Syntax-tree based rewriting driven by each identifier's role
    Tree,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Line => write!(f, "line"),
            EngineKind::Tree => write!(f, "tree"),
        }
    }
}

impl std::str::FromStr for EngineKind {
    type Err = GenericsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "line" => Ok(EngineKind::Line),
            "tree" | "ast" => Ok(EngineKind::Tree),
            other => Err(GenericsError::Config(format!("Unknown engine: {}", other))),
        }
    }
}

/// Options for one instantiation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Rename the output package; `None` keeps the template's
    #[serde(default)]
    pub package_name: Option<String>,
    /// Import paths injected right after the package clause
    #[serde(default)]
    pub extra_imports: Vec<String>,
    /// Build tag whose generated constraint lines are stripped
    #[serde(default)]
    pub strip_tag: Option<String>,
    #[serde(default)]
    pub engine: EngineKind,
}
