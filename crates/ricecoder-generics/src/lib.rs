//! Ricecoder Generics
//!
//! Specializes generic Go template files for concrete types at build time.
//!
//! # Architecture
//!
//! A template declares placeholder types with `generic.Type` or
//! `generic.Number` markers. One run instantiates the template once per
//! binding set and merges the fragments into a single file:
//!
//! - **Boundary Matcher**: case-insensitive, left-boundary word matching
//! - **Identifier Transformer**: exact, compound, exported and unexported rename forms
//! - **Template Validator**: every placeholder must be bound before anything is generated
//! - **Substitution Engines**: a line-based token scanner and a tree-sitter based rewriter
//! - **Assembler**: one banner, one package clause, one import block, bodies in order
//! - **Normalizer**: import pruning, grouping and whitespace cleanup
//!
//! # Example
//!
//! ```ignore
//! use std::io::Cursor;
//! use ricecoder_generics::{parse_binding_sets, EngineKind, GenerateOptions, Instantiator};
//!
//! let sets = parse_binding_sets("Generic=int,string")?;
//! let mut template = Cursor::new(std::fs::read("queue.go")?);
//! let output = Instantiator::new(GenerateOptions::default())
//!     .generate("queue.go", &mut template, &sets)?;
//! ```

pub mod assembler;
pub mod boundary;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod instantiate;
pub mod syntax;
pub mod transform;
pub mod types;
pub mod typesets;
pub mod validator;

// Re-export commonly used types
pub use assembler::{Assembler, ImportSet, GENERATED_BANNER, START_MARKER};
pub use config::{ConfigLoader, GenerationJob, GenerationManifest};
pub use engine::{engine_for, LineEngine, SubstitutionEngine, SyntaxRole, TreeEngine};
pub use error::{GenericsError, Result};
pub use format::normalize;
pub use instantiate::{instantiate, Instantiator};
pub use transform::{transform_comment, transform_name, transform_token, LexicalContext};
pub use types::{BindingSet, EngineKind, GenerateOptions, MarkerKind, Placeholder, TypeBinding};
pub use typesets::parse_binding_sets;
pub use validator::TemplateValidator;
