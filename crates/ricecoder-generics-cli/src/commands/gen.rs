// Instantiate a single template

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use ricecoder_generics::{parse_binding_sets, EngineKind, GenerateOptions, Instantiator};

use super::Command;
use crate::error::CliError;
use crate::lazy_file::LazyFile;

/// Template name used when reading from standard input
pub const STDIN_NAME: &str = "stdin";

/// `rice-generics gen`
#[derive(Debug, Clone)]
pub struct GenCommand {
    pub types: String,
    /// Template path, or `-` for standard input
    pub input: String,
    pub output: Option<PathBuf>,
    pub options: GenerateOptions,
}

impl GenCommand {
    pub fn new(types: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            types: types.into(),
            input: input.into(),
            output: None,
            options: GenerateOptions::default(),
        }
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_package(mut self, package: Option<String>) -> Self {
        self.options.package_name = package;
        self
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.options.extra_imports = imports
            .into_iter()
            .map(|import| import.trim().to_string())
            .filter(|import| !import.is_empty())
            .collect();
        self
    }

    pub fn with_strip_tag(mut self, tag: Option<String>) -> Self {
        self.options.strip_tag = tag;
        self
    }

    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.options.engine = engine;
        self
    }

    /// Produce the generated source without writing it anywhere
    pub fn generate(&self) -> anyhow::Result<Vec<u8>> {
        let binding_sets = parse_binding_sets(&self.types)?;
        let instantiator = Instantiator::new(self.options.clone());

        if self.input == "-" {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read template from standard input")?;
            let mut cursor = Cursor::new(buffer);
            return Ok(instantiator.generate(STDIN_NAME, &mut cursor, &binding_sets)?);
        }

        let mut file = File::open(&self.input).map_err(|_| CliError::TemplateNotFound {
            path: self.input.clone(),
        })?;
        Ok(instantiator.generate(&self.input, &mut file, &binding_sets)?)
    }
}

impl Command for GenCommand {
    fn execute(&self) -> anyhow::Result<()> {
        let generated = self.generate()?;

        match &self.output {
            Some(path) => {
                let mut file = LazyFile::new(path);
                file.write_all(&generated)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                file.close()
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(output = %path.display(), "wrote generated file");
            }
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(&generated)?;
                handle.flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ricecoder_generics::GenericsError;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "package queue\n\nimport \"github.com/kelindar/genny/generic\"\n\ntype Generic generic.Type\n\ntype GenericQueue struct {\n\titems []Generic\n}\n";

    #[test]
    fn test_gen_writes_output_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let template = dir.path().join("queue.go");
        fs::write(&template, TEMPLATE)?;
        let output = dir.path().join("out").join("gen-queue.go");

        GenCommand::new("Generic=string,int", template.to_string_lossy())
            .with_output(Some(output.clone()))
            .with_package(Some("queues".to_string()))
            .execute()?;

        let generated = fs::read_to_string(&output)?;
        assert!(generated.starts_with("// Code generated by ricecoder-generics. DO NOT EDIT."));
        assert!(generated.contains("package queues"));
        assert!(generated.contains("type StringQueue struct"));
        assert!(generated.contains("type IntQueue struct"));
        assert!(!generated.contains("generic.Type"));
        Ok(())
    }

    #[test]
    fn test_failed_gen_leaves_no_output_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let template = dir.path().join("queue.go");
        fs::write(&template, TEMPLATE)?;
        let output = dir.path().join("gen-queue.go");

        let result = GenCommand::new("Other=int", template.to_string_lossy())
            .with_output(Some(output.clone()))
            .execute();

        let error = match result {
            Ok(()) => panic!("expected a missing binding error"),
            Err(error) => error,
        };
        assert!(matches!(
            error.downcast_ref::<GenericsError>(),
            Some(GenericsError::MissingBinding { .. })
        ));
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_missing_template() {
        let result = GenCommand::new("T=int", "/nonexistent/template.go").generate();
        assert!(matches!(
            result.map_err(|e| e.downcast::<CliError>()),
            Err(Ok(CliError::TemplateNotFound { .. }))
        ));
    }

    #[test]
    fn test_blank_imports_are_dropped() {
        let command = GenCommand::new("T=int", "-")
            .with_imports(vec![" fmt ".to_string(), "".to_string()]);
        assert_eq!(command.options.extra_imports, vec!["fmt".to_string()]);
    }
}
