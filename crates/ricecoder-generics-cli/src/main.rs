// rice-generics entry point

use ricecoder_generics_cli::{error, output, router::CommandRouter};

fn main() {
    if let Err(e) = CommandRouter::route() {
        output::print_error(&error::user_message(&e));
        std::process::exit(error::exit_code(&e));
    }
}
