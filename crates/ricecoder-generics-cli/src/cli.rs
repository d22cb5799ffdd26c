// Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ricecoder_generics::EngineKind;

/// rice-generics - specialize generic Go templates for concrete types
#[derive(Parser, Debug)]
#[command(name = "rice-generics")]
#[command(bin_name = "rice-generics")]
#[command(about = "Specialize generic Go templates for concrete types")]
#[command(
    long_about = "Reads a Go template declaring placeholder types with generic.Type or generic.Number\nand writes one specialized copy of its code per binding set, merged into a single file.\n\nExamples:\n  rice-generics gen \"Generic=string,int\" --in queue.go --out gen-queue.go\n  rice-generics run generics.yaml"
)]
#[command(version)]
#[command(author = "RiceCoder Contributors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Instantiate one template
    #[command(about = "Instantiate a template for every combination in TYPES")]
    Gen {
        /// Binding expression, e.g. "KeyType=string,int ValueType=BUILTINS"
        #[arg(value_name = "TYPES")]
        types: String,

        /// Template file, or - for standard input
        #[arg(long = "in", value_name = "FILE", default_value = "-")]
        input: String,

        /// Output file (default: standard output)
        #[arg(long = "out", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Package name of the generated file
        #[arg(long = "pkg", value_name = "NAME")]
        package: Option<String>,

        /// Extra import paths, comma separated
        #[arg(long, value_name = "PATHS", value_delimiter = ',')]
        imports: Vec<String>,

        /// Build tag whose directive is removed from the output
        #[arg(long = "tag", value_name = "TAG")]
        strip_tag: Option<String>,

        /// Use the syntax-tree engine instead of the line engine
        #[arg(long)]
        ast: bool,
    },

    /// Run every job of a manifest
    #[command(about = "Run every generation job listed in a YAML or JSON manifest")]
    Run {
        /// Manifest file
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },
}

/// Engine selected by the `--ast` flag
pub fn engine_from_flag(ast: bool) -> EngineKind {
    if ast {
        EngineKind::Tree
    } else {
        EngineKind::Line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gen() {
        let cli = Cli::try_parse_from([
            "rice-generics",
            "gen",
            "Generic=int,string",
            "--in",
            "queue.go",
            "--out",
            "out.go",
            "--pkg",
            "ints",
            "--imports",
            "fmt,sync",
            "--tag",
            "genny",
            "--ast",
            "-v",
        ])
        .expect("arguments parse");

        assert!(cli.verbose);
        match cli.command {
            Commands::Gen {
                types,
                input,
                output,
                package,
                imports,
                strip_tag,
                ast,
            } => {
                assert_eq!(types, "Generic=int,string");
                assert_eq!(input, "queue.go");
                assert_eq!(output, Some(PathBuf::from("out.go")));
                assert_eq!(package.as_deref(), Some("ints"));
                assert_eq!(imports, vec!["fmt".to_string(), "sync".to_string()]);
                assert_eq!(strip_tag.as_deref(), Some("genny"));
                assert_eq!(engine_from_flag(ast), EngineKind::Tree);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_gen_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["rice-generics", "gen", "T=int"]).expect("arguments parse");
        match cli.command {
            Commands::Gen { input, output, ast, .. } => {
                assert_eq!(input, "-");
                assert_eq!(output, None);
                assert!(!ast);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["rice-generics", "-v", "-q", "run", "m.yaml"]).is_err());
    }
}
