//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use mealpick_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    match mealpick_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("mealpick: {err}");
            std::process::exit(1);
        }
    }
}
