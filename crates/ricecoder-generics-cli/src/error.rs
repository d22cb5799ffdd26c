// Mapping of failures to process exit codes

use ricecoder_generics::GenericsError;
use thiserror::Error;

/// Errors raised by the command layer itself
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Template not found: {path}")]
    TemplateNotFound { path: String },
}

/// Exit code for bad usage and unclassified failures
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the template does not parse
pub const EXIT_SOURCE: i32 = 2;
/// Exit code when a placeholder has no binding
pub const EXIT_MISSING_BINDING: i32 = 3;
/// Exit code when the generated output cannot be normalized
pub const EXIT_FORMAT: i32 = 4;

/// Exit code for an error returned by a command
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<GenericsError>() {
        Some(GenericsError::Source { .. }) => EXIT_SOURCE,
        Some(GenericsError::MissingBinding { .. }) => EXIT_MISSING_BINDING,
        Some(GenericsError::Format { .. }) => EXIT_FORMAT,
        _ => EXIT_FAILURE,
    }
}

/// User-facing message with a hint for the common failure kinds
pub fn user_message(error: &anyhow::Error) -> String {
    let hint = match error.downcast_ref::<GenericsError>() {
        Some(GenericsError::MissingBinding { placeholder }) => Some(format!(
            "Add {}=<type> to the types expression.",
            placeholder
        )),
        Some(GenericsError::Format { .. }) => {
            Some("The generated code is invalid; please report this template.".to_string())
        }
        Some(GenericsError::InvalidBinding(_)) => {
            Some("Types are written as Name=type1,type2 Other=type3.".to_string())
        }
        _ => None,
    };

    let message = format!("{:#}", error);
    match hint {
        Some(hint) => format!("{}\n\n{}", message, hint),
        None => message,
    }
}
