//! Template validation: every declared placeholder must be bound

use tree_sitter::Tree;

use crate::error::{GenericsError, Result};
use crate::syntax::{self, declared_marker, top_level_type_specs};
use crate::types::{BindingSet, Placeholder};

/// Placeholder declarations of a parsed template
#[derive(Debug, Clone)]
pub struct TemplateValidator {
    placeholders: Vec<Placeholder>,
}

impl TemplateValidator {
    /// Parse the template once and record its placeholder declarations
    pub fn parse(filename: &str, source: &str) -> Result<Self> {
        let tree = syntax::parse_go(filename, source)?;
        Ok(Self::from_tree(&tree, source))
    }

    /// Collect placeholder declarations from an already parsed template.
    ///
    /// Interfaces that merely embed a marker are removed from the output but
    /// need no binding.
    pub fn from_tree(tree: &Tree, source: &str) -> Self {
        let placeholders = top_level_type_specs(tree.root_node())
            .into_iter()
            .filter_map(|spec| {
                let kind = declared_marker(spec, source)?;
                let name = spec.child_by_field_name("name")?;
                Some(Placeholder {
                    name: syntax::text(name, source).to_string(),
                    kind,
                })
            })
            .collect();
        Self { placeholders }
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Fail with the first placeholder that has no binding
    pub fn validate(&self, bindings: &BindingSet) -> Result<()> {
        match self
            .placeholders
            .iter()
            .find(|placeholder| !bindings.contains(&placeholder.name))
        {
            Some(missing) => Err(GenericsError::MissingBinding {
                placeholder: missing.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Validate every binding set before any of them is instantiated
    pub fn validate_all(&self, binding_sets: &[BindingSet]) -> Result<()> {
        binding_sets.iter().try_for_each(|set| self.validate(set))
    }
}
