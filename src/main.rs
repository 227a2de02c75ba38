//! dupsweep - duplicate file finder and pruner
//!
//! Entry point for the dupsweep CLI application.

use clap::Parser;
use dupsweep::{
    cli::Cli,
    error::{is_abort, ExitCode},
    logging,
};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    match dupsweep::run_app(cli) {
        Ok(code) => {
            println!("Done!");
            std::process::exit(code.as_i32());
        }
        Err(err) if is_abort(&err) => {
            println!("Exiting");
            std::process::exit(ExitCode::Aborted.as_i32());
        }
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
