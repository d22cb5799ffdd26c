//! Binding expressions.
//!
//! A binding expression lists placeholders with their candidate types, for
//! example `KeyType=string,int ValueType=int`. It expands to one binding set
//! per combination, first placeholder varying slowest.

use crate::error::{GenericsError, Result};
use crate::types::{BindingSet, TypeBinding};

/// Keyword expanding to every Go builtin type
pub const BUILTINS_KEYWORD: &str = "BUILTINS";

/// Keyword expanding to the Go builtin numeric types
pub const NUMBERS_KEYWORD: &str = "NUMBERS";

pub const BUILTINS: &[&str] = &[
    "bool", "byte", "complex128", "complex64", "error", "float32", "float64", "int", "int16",
    "int32", "int64", "int8", "rune", "string", "uint", "uint16", "uint32", "uint64", "uint8",
    "uintptr",
];

pub const NUMBERS: &[&str] = &[
    "float32", "float64", "int", "int16", "int32", "int64", "int8", "uint", "uint16", "uint32",
    "uint64", "uint8",
];

/// Parse a binding expression into the ordered list of binding sets it describes
pub fn parse_binding_sets(expression: &str) -> Result<Vec<BindingSet>> {
    let terms = parse_terms(expression)?;
    if terms.is_empty() {
        return Err(GenericsError::InvalidBinding(
            "binding expression is empty".to_string(),
        ));
    }

    let mut combinations: Vec<Vec<TypeBinding>> = vec![Vec::new()];
    for (placeholder, specs) in &terms {
        combinations = combinations
            .into_iter()
            .flat_map(|prefix| {
                specs.iter().map(move |spec| {
                    let mut next = prefix.clone();
                    next.push(TypeBinding::new(placeholder.clone(), spec.clone()));
                    next
                })
            })
            .collect();
    }

    let sets = combinations
        .into_iter()
        .map(|bindings| {
            let mut set = BindingSet::new();
            for binding in bindings {
                set.insert(binding)?;
            }
            Ok(set)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(expression, sets = sets.len(), "expanded binding expression");
    Ok(sets)
}

fn parse_terms(expression: &str) -> Result<Vec<(String, Vec<String>)>> {
    let mut terms: Vec<(String, Vec<String>)> = Vec::new();
    for term in expression.split_whitespace() {
        let (name, values) = term.split_once('=').ok_or_else(|| {
            GenericsError::InvalidBinding(format!("'{}' is not of the form Name=type,...", term))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(GenericsError::InvalidBinding(format!(
                "'{}' has an empty placeholder name",
                term
            )));
        }
        if terms.iter().any(|(existing, _)| existing == name) {
            return Err(GenericsError::InvalidBinding(format!(
                "placeholder '{}' is listed more than once",
                name
            )));
        }

        let mut specs: Vec<String> = Vec::new();
        for value in values.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            let expanded: Vec<&str> = match value {
                BUILTINS_KEYWORD => BUILTINS.to_vec(),
                NUMBERS_KEYWORD => NUMBERS.to_vec(),
                other => vec![other],
            };
            for spec in expanded {
                if !specs.iter().any(|existing| existing == spec) {
                    specs.push(spec.to_string());
                }
            }
        }
        if specs.is_empty() {
            return Err(GenericsError::InvalidBinding(format!(
                "placeholder '{}' has no types",
                name
            )));
        }
        terms.push((name.to_string(), specs));
    }
    Ok(terms)
}
