//! Merges the fragments of one run into a single source file.
//!
//! Every fragment is a complete Go file. The assembler keeps the first
//! package clause, pulls every import out into one block, drops generation
//! directives and per-fragment banners, then appends the bodies in order.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::GenerateOptions;

/// Banner written once at the top of every generated file
pub const GENERATED_BANNER: &str = "// Code generated by ricecoder-generics. DO NOT EDIT.\n// Any changes will be lost if this file is regenerated.";

/// Lines before this comment are only kept from the first fragment
pub const START_MARKER: &str = "//genny:start";

const GENERATE_DIRECTIVES: &[&str] = &[
    "//go:generate genny ",
    "//go:generate $GOPATH/bin/genny ",
    "//go:generate rice-generics ",
];

lazy_static! {
    static ref BANNER_LINE: Regex =
        Regex::new(r"^// Code generated .* DO NOT EDIT\.$").unwrap();
}

const BANNER_FOLLOW_UP: &str = "// Any changes will be lost if this file is regenerated.";

/// Import specs collected across the fragments of one run, deduplicated in
/// first-seen order
#[derive(Debug, Default, Clone)]
pub struct ImportSet {
    specs: Vec<String>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an import spec such as `"fmt"` or `str "strings"`
    pub fn insert(&mut self, spec: &str) {
        let spec = spec.trim();
        if spec.is_empty() || spec.starts_with("//") {
            return;
        }
        if !self.specs.iter().any(|existing| existing == spec) {
            self.specs.push(spec.to_string());
        }
    }

    pub fn specs(&self) -> &[String] {
        &self.specs
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    fn block(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.specs.len() + 2);
        lines.push("import (".to_string());
        lines.extend(self.specs.iter().map(|spec| format!("\t{}", spec)));
        lines.push(")".to_string());
        lines
    }
}

/// Fragment merger configured for one run
#[derive(Debug, Clone)]
pub struct Assembler {
    unwanted_prefixes: Vec<String>,
    package_name: Option<String>,
    extra_imports: Vec<String>,
}

impl Assembler {
    pub fn new(options: &GenerateOptions) -> Self {
        let mut unwanted_prefixes: Vec<String> =
            GENERATE_DIRECTIVES.iter().map(|p| p.to_string()).collect();
        if let Some(tag) = options.strip_tag.as_deref().filter(|tag| !tag.is_empty()) {
            unwanted_prefixes.push(format!("// +build {}", tag));
            unwanted_prefixes.push(format!("//go:build {}", tag));
        }

        Self {
            unwanted_prefixes,
            package_name: options.package_name.clone().filter(|name| !name.is_empty()),
            extra_imports: options.extra_imports.clone(),
        }
    }

    fn is_unwanted(&self, line: &str) -> bool {
        self.unwanted_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }

    fn is_banner(line: &str) -> bool {
        BANNER_LINE.is_match(line) || line == BANNER_FOLLOW_UP
    }

    /// Merge fragments, in order, into one file ready for normalization
    pub fn assemble(&self, fragments: &[String]) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut imports = ImportSet::new();
        let mut import_index: Option<usize> = None;
        let mut package_index: Option<usize> = None;
        let mut file_has_start = false;

        for (index, fragment) in fragments.iter().enumerate() {
            let mut inside_import_block = false;
            let mut package_in_fragment = false;
            let mut past_start = false;

            for line in fragment.lines() {
                if line.starts_with(START_MARKER) {
                    past_start = true;
                    file_has_start = true;
                    continue;
                }

                if inside_import_block {
                    if line.trim_end().ends_with(')') {
                        inside_import_block = false;
                    } else {
                        imports.insert(line);
                    }
                    continue;
                }

                if Self::is_banner(line) {
                    continue;
                }

                if line.starts_with("package ") {
                    package_in_fragment = true;
                    if package_index.is_none() {
                        package_index = Some(lines.len());
                        lines.push(line.to_string());
                    }
                    continue;
                }

                if let Some(rest) = line.strip_prefix("import") {
                    if rest.is_empty() || rest.starts_with(&[' ', '\t', '('][..]) {
                        import_index.get_or_insert(lines.len());
                        if rest.trim_end().ends_with('(') {
                            inside_import_block = true;
                        } else {
                            imports.insert(rest);
                        }
                        continue;
                    }
                }

                if index != 0 && !package_in_fragment {
                    continue;
                }
                if file_has_start && !past_start {
                    continue;
                }
                if self.is_unwanted(line) {
                    continue;
                }

                lines.push(line.to_string());
            }

            if index != 0 && !package_in_fragment {
                tracing::warn!(fragment = index, "fragment has no package clause, skipped");
            }
        }

        if !imports.is_empty() {
            let at = import_index
                .or(package_index.map(|i| i + 1))
                .unwrap_or(0);
            lines.splice(at..at, imports.block());
        }

        if let Some(index) = package_index {
            if let Some(name) = &self.package_name {
                lines[index] = format!("package {}", name);
            }
            let extra = self
                .extra_imports
                .iter()
                .filter(|path| !path.trim().is_empty())
                .map(|path| format!("import \"{}\"", path.trim()));
            lines.splice(index + 1..index + 1, extra);
        }

        let mut output = String::from(GENERATED_BANNER);
        output.push_str("\n\n");
        output.push_str(&lines.join("\n"));
        output.push('\n');
        output
    }
}
