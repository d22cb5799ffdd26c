//! Substitution engines.
//!
//! Both engines implement the same contract: instantiate one template
//! against one binding set, producing one fragment. They are interchangeable
//! and can be run side by side on the same input.

pub mod line;
pub mod tree;

pub use line::LineEngine;
pub use tree::{SyntaxRole, TreeEngine};

use crate::error::Result;
use crate::types::{BindingSet, EngineKind};

/// Instantiates one template against one binding set
pub trait SubstitutionEngine: Send + Sync {
    /// Engine name used in logs
    fn name(&self) -> &'static str;

    /// Produce the specialized fragment for `bindings`.
    ///
    /// Placeholder validation happens before this is called.
    fn instantiate(&self, filename: &str, source: &str, bindings: &BindingSet) -> Result<String>;
}

/// Build the engine selected by `kind`
pub fn engine_for(kind: EngineKind) -> Box<dyn SubstitutionEngine> {
    match kind {
        EngineKind::Line => Box::new(LineEngine::new()),
        EngineKind::Tree => Box::new(TreeEngine::new()),
    }
}
