// Command routing and dispatch

use clap::Parser;

use crate::cli::{engine_from_flag, Cli, Commands};
use crate::commands::{Command, GenCommand, RunCommand};
use crate::error::CliError;
use crate::logging;

/// Routes parsed arguments to their command handler
pub struct CommandRouter;

impl CommandRouter {
    /// Parse the process arguments and execute the selected command
    pub fn route() -> anyhow::Result<()> {
        let cli = match Cli::try_parse() {
            Ok(cli) => cli,
            // --help and --version
            Err(e) if !e.use_stderr() => {
                e.print()?;
                return Ok(());
            }
            Err(e) => return Err(CliError::Usage(e).into()),
        };
        logging::init_logging(cli.verbose, cli.quiet);
        Self::execute(&cli.command)
    }

    /// Execute a parsed command
    pub fn execute(command: &Commands) -> anyhow::Result<()> {
        Self::handler(command).execute()
    }

    fn handler(command: &Commands) -> Box<dyn Command> {
        match command {
            Commands::Gen {
                types,
                input,
                output,
                package,
                imports,
                strip_tag,
                ast,
            } => Box::new(
                GenCommand::new(types.clone(), input.clone())
                    .with_output(output.clone())
                    .with_package(package.clone())
                    .with_imports(imports.clone())
                    .with_strip_tag(strip_tag.clone())
                    .with_engine(engine_from_flag(*ast)),
            ),
            Commands::Run { manifest } => Box::new(RunCommand::new(manifest.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_route_gen_command() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let template = dir.path().join("box.go");
        fs::write(
            &template,
            "package box\n\nimport \"github.com/kelindar/genny/generic\"\n\ntype T generic.Type\n\nfunc WrapT(v T) []T {\n\treturn []T{v}\n}\n",
        )?;
        let output = dir.path().join("gen-box.go");

        let cli = Cli::try_parse_from([
            "rice-generics".to_string(),
            "gen".to_string(),
            "T=int".to_string(),
            "--in".to_string(),
            template.to_string_lossy().to_string(),
            "--out".to_string(),
            output.to_string_lossy().to_string(),
            "--ast".to_string(),
        ])?;
        CommandRouter::execute(&cli.command)?;

        let generated = fs::read_to_string(&output)?;
        assert!(generated.contains("func WrapInt(v int) []int {"));
        Ok(())
    }
}
