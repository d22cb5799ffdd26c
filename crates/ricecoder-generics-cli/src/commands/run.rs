// Run the jobs of a generation manifest

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use ricecoder_generics::{ConfigLoader, GenerationJob, Instantiator};

use super::Command;
use crate::error::CliError;
use crate::lazy_file::LazyFile;

/// `rice-generics run`
#[derive(Debug, Clone)]
pub struct RunCommand {
    pub manifest: PathBuf,
}

impl RunCommand {
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
        }
    }

    fn run_job(&self, job: &GenerationJob) -> anyhow::Result<()> {
        let binding_sets = job.binding_sets()?;
        let mut template = File::open(&job.template).map_err(|_| CliError::TemplateNotFound {
            path: job.template.display().to_string(),
        })?;
        let name = job.template.display().to_string();
        let generated =
            Instantiator::new(job.options()).generate(&name, &mut template, &binding_sets)?;

        match &job.output {
            Some(path) => {
                let mut file = LazyFile::new(path);
                file.write_all(&generated)?;
                file.close()?;
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&generated)?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Command for RunCommand {
    fn execute(&self) -> anyhow::Result<()> {
        let manifest = ConfigLoader::load(&self.manifest)?;

        for (index, job) in manifest.jobs.iter().enumerate() {
            tracing::debug!(job = index + 1, template = %job.template.display(), "running job");
            self.run_job(job).with_context(|| {
                format!("Job {} ({}) failed", index + 1, job.template.display())
            })?;
        }

        tracing::info!(
            manifest = %self.manifest.display(),
            jobs = manifest.jobs.len(),
            "manifest complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{exit_code, EXIT_MISSING_BINDING};
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "package queue\n\nimport \"github.com/kelindar/genny/generic\"\n\ntype Generic generic.Type\n\ntype GenericQueue struct {\n\titems []Generic\n}\n";

    #[test]
    fn test_run_manifest_jobs() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("queue.go"), TEMPLATE)?;
        let manifest = dir.path().join("generics.yaml");
        fs::write(
            &manifest,
            r#"jobs:
  - template: queue.go
    output: gen/string_queue.go
    package: strings
    types: Generic=string
  - template: queue.go
    output: gen/int_queue.go
    types: Generic=int
    engine: tree
"#,
        )?;

        RunCommand::new(&manifest).execute()?;

        let strings = fs::read_to_string(dir.path().join("gen/string_queue.go"))?;
        assert!(strings.contains("package strings"));
        assert!(strings.contains("type StringQueue struct"));

        let ints = fs::read_to_string(dir.path().join("gen/int_queue.go"))?;
        assert!(ints.contains("package queue"));
        assert!(ints.contains("type IntQueue struct"));
        Ok(())
    }

    #[test]
    fn test_run_stops_on_first_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("queue.go"), TEMPLATE)?;
        let manifest = dir.path().join("generics.json");
        fs::write(
            &manifest,
            r#"{"jobs": [
  {"template": "queue.go", "output": "first.go", "types": "Missing=int"},
  {"template": "queue.go", "output": "second.go", "types": "Generic=int"}
]}"#,
        )?;

        let error = match RunCommand::new(&manifest).execute() {
            Ok(()) => panic!("expected the first job to fail"),
            Err(error) => error,
        };
        assert_eq!(exit_code(&error), EXIT_MISSING_BINDING);
        assert!(format!("{:#}", error).starts_with("Job 1"));
        assert!(!dir.path().join("first.go").exists());
        assert!(!dir.path().join("second.go").exists());
        Ok(())
    }
}
