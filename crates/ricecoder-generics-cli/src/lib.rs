//! Command-line front end for `ricecoder-generics`.
//!
//! `rice-generics gen` instantiates one template; `rice-generics run` executes
//! every job of a YAML or JSON manifest. Errors are reported through
//! [`error::user_message`] and mapped to exit codes by [`error::exit_code`].

pub mod cli;
pub mod commands;
pub mod error;
pub mod lazy_file;
pub mod logging;
pub mod output;
pub mod router;

pub use error::{exit_code, CliError};
pub use lazy_file::LazyFile;
