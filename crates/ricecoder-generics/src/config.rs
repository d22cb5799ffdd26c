//! Generation manifests.
//!
//! A manifest lists generation jobs, each one instantiating a template for
//! a binding expression. YAML and JSON are accepted, chosen by extension.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenericsError, Result};
use crate::typesets::parse_binding_sets;
use crate::types::{BindingSet, EngineKind, GenerateOptions};

/// One template instantiation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationJob {
    /// Template file, relative to the manifest
    pub template: PathBuf,
    /// Output file, relative to the manifest; standard output when absent
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Package name for the generated file
    #[serde(default)]
    pub package: Option<String>,
    /// Binding expression, e.g. `KeyType=string ValueType=int,int64`
    pub types: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub strip_tag: Option<String>,
    #[serde(default)]
    pub engine: EngineKind,
}

impl GenerationJob {
    /// Run options derived from this job
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            package_name: self.package.clone(),
            extra_imports: self.imports.clone(),
            strip_tag: self.strip_tag.clone(),
            engine: self.engine,
        }
    }

    pub fn binding_sets(&self) -> Result<Vec<BindingSet>> {
        parse_binding_sets(&self.types)
    }
}

/// A list of generation jobs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationManifest {
    #[serde(default)]
    pub jobs: Vec<GenerationJob>,
}

impl GenerationManifest {
    /// Make relative template and output paths relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for job in &mut self.jobs {
            if job.template.is_relative() {
                job.template = base.join(&job.template);
            }
            if let Some(output) = job.output.as_mut().filter(|output| output.is_relative()) {
                *output = base.join(&*output);
            }
        }
    }
}

/// Loads generation manifests from files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a manifest from a YAML file
    pub fn load_from_yaml(path: &Path) -> Result<GenerationManifest> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GenericsError::Config(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;

        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load a manifest from a JSON file
    pub fn load_from_json(path: &Path) -> Result<GenerationManifest> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GenericsError::Config(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Load a manifest (format from the extension), resolve its paths and validate it
    pub fn load(path: &Path) -> Result<GenerationManifest> {
        let mut manifest = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::load_from_yaml(path)?,
            Some("json") => Self::load_from_json(path)?,
            _ => {
                return Err(GenericsError::Config(format!(
                    "Unsupported manifest format: {}",
                    path.display()
                )))
            }
        };

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.resolve_paths(base);
        Self::validate(&manifest)?;

        tracing::info!(manifest = %path.display(), jobs = manifest.jobs.len(), "loaded manifest");
        Ok(manifest)
    }

    /// Validate a manifest
    pub fn validate(manifest: &GenerationManifest) -> Result<()> {
        if manifest.jobs.is_empty() {
            return Err(GenericsError::Config(
                "Manifest must declare at least one job".to_string(),
            ));
        }

        let mut outputs = HashSet::new();
        for (index, job) in manifest.jobs.iter().enumerate() {
            if job.template.as_os_str().is_empty() {
                return Err(GenericsError::Config(format!(
                    "Job {} has an empty template path",
                    index
                )));
            }
            if job.types.trim().is_empty() {
                return Err(GenericsError::Config(format!(
                    "Job {} has an empty types expression",
                    index
                )));
            }
            if let Some(output) = &job.output {
                if !outputs.insert(output.clone()) {
                    return Err(GenericsError::Config(format!(
                        "Output {} is written by more than one job",
                        output.display()
                    )));
                }
            }
        }

        Ok(())
    }
}
