// Command handlers for rice-generics

pub mod gen;
pub mod run;

pub use gen::GenCommand;
pub use run::RunCommand;

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self) -> anyhow::Result<()>;
}
