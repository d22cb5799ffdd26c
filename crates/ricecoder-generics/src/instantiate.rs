//! End-to-end instantiation of one template for a list of binding sets

use std::io::{Read, Seek, SeekFrom};

use crate::assembler::Assembler;
use crate::engine::{engine_for, SubstitutionEngine};
use crate::error::{GenericsError, Result};
use crate::format;
use crate::types::{BindingSet, EngineKind, GenerateOptions};
use crate::validator::TemplateValidator;

/// Runs validation, substitution, assembly and normalization for one template.
///
/// Holds no state between runs; separate instances may run concurrently.
pub struct Instantiator {
    options: GenerateOptions,
    engine: Box<dyn SubstitutionEngine>,
}

impl Instantiator {
    pub fn new(options: GenerateOptions) -> Self {
        let engine = engine_for(options.engine);
        Self { options, engine }
    }

    /// Use a custom engine instead of the one named in the options
    pub fn with_engine(options: GenerateOptions, engine: Box<dyn SubstitutionEngine>) -> Self {
        Self { options, engine }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Instantiate the template read from `input` once per binding set.
    ///
    /// Every binding set is validated before any fragment is produced. The
    /// stream is rewound before each read pass. On error nothing is returned.
    pub fn generate<R: Read + Seek>(
        &self,
        filename: &str,
        input: &mut R,
        binding_sets: &[BindingSet],
    ) -> Result<Vec<u8>> {
        if binding_sets.is_empty() {
            return Err(GenericsError::InvalidBinding(
                "at least one binding set is required".to_string(),
            ));
        }

        let template = read_from_start(input)?;
        let validator = TemplateValidator::parse(filename, &template)?;
        validator.validate_all(binding_sets)?;

        let mut fragments = Vec::with_capacity(binding_sets.len());
        for bindings in binding_sets {
            let source = read_from_start(input)?;
            tracing::debug!(
                filename,
                engine = self.engine.name(),
                bindings = %bindings,
                "instantiating"
            );
            fragments.push(self.engine.instantiate(filename, &source, bindings)?);
        }

        let assembled = Assembler::new(&self.options).assemble(&fragments);
        let output = format::normalize(filename, &assembled)?;

        tracing::info!(
            filename,
            engine = self.engine.name(),
            instantiations = fragments.len(),
            bytes = output.len(),
            "generated"
        );
        Ok(output.into_bytes())
    }
}

fn read_from_start<R: Read + Seek>(input: &mut R) -> Result<String> {
    input.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

/// Instantiate `template_name` from `input` for every binding set
pub fn instantiate<R: Read + Seek>(
    template_name: &str,
    output_package: Option<&str>,
    input: &mut R,
    binding_sets: &[BindingSet],
    extra_imports: &[String],
    strip_tag: Option<&str>,
    engine: EngineKind,
) -> Result<Vec<u8>> {
    let options = GenerateOptions {
        package_name: output_package.map(str::to_string),
        extra_imports: extra_imports.to_vec(),
        strip_tag: strip_tag.map(str::to_string),
        engine,
    };
    Instantiator::new(options).generate(template_name, input, binding_sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TEMPLATE: &str = r#"package queue

import "github.com/kelindar/genny/generic"

type Generic generic.Type

// GenericQueue holds Generic values
type GenericQueue struct {
	items []Generic
}

func (q *GenericQueue) Len() int {
	return len(q.items)
}
"#;

    /// Fails the test if it is ever asked to instantiate
    struct PanickingEngine;

    impl SubstitutionEngine for PanickingEngine {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn instantiate(&self, _: &str, _: &str, _: &BindingSet) -> Result<String> {
            panic!("substitution must not start before validation succeeds");
        }
    }

    #[test]
    fn test_generate_two_instantiations() -> Result<()> {
        let sets = vec![
            BindingSet::from_pairs([("Generic", "int")])?,
            BindingSet::from_pairs([("Generic", "string")])?,
        ];
        let mut input = Cursor::new(TEMPLATE.as_bytes().to_vec());
        let output = Instantiator::new(GenerateOptions::default()).generate(
            "queue.go",
            &mut input,
            &sets,
        )?;
        let text = String::from_utf8(output)?;

        assert_eq!(text.matches("package queue").count(), 1);
        assert!(!text.contains("generic."));
        assert!(!text.contains("import"));
        let int_queue = text.find("type IntQueue struct");
        let string_queue = text.find("type StringQueue struct");
        assert!(int_queue.is_some() && string_queue.is_some() && int_queue < string_queue);
        Ok(())
    }

    #[test]
    fn test_validation_precedes_substitution() -> Result<()> {
        let sets = vec![
            BindingSet::from_pairs([("Generic", "int")])?,
            BindingSet::from_pairs([("Other", "int")])?,
        ];
        let mut input = Cursor::new(TEMPLATE.as_bytes().to_vec());
        let instantiator =
            Instantiator::with_engine(GenerateOptions::default(), Box::new(PanickingEngine));
        match instantiator.generate("queue.go", &mut input, &sets) {
            Err(GenericsError::MissingBinding { placeholder }) => {
                assert_eq!(placeholder, "Generic")
            }
            other => panic!("expected missing binding, got {:?}", other.map(|b| b.len())),
        }
        Ok(())
    }

    #[test]
    fn test_stream_is_rewound() -> Result<()> {
        let sets = vec![BindingSet::from_pairs([("Generic", "bool")])?];
        let mut input = Cursor::new(TEMPLATE.as_bytes().to_vec());
        input.seek(SeekFrom::End(0))?;
        let output = instantiate("queue.go", None, &mut input, &sets, &[], None, EngineKind::Tree)?;
        assert!(String::from_utf8(output)?.contains("type BoolQueue struct"));
        Ok(())
    }

    #[test]
    fn test_no_binding_sets_rejected() {
        let mut input = Cursor::new(TEMPLATE.as_bytes().to_vec());
        assert!(matches!(
            instantiate("queue.go", None, &mut input, &[], &[], None, EngineKind::Line),
            Err(GenericsError::InvalidBinding(_))
        ));
    }
}
