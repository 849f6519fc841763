//! # Stockroom Entry Point
//!
//! ```bash
//! stockroom products list --search widget --sort quantity
//! stockroom stock adjust 7 --type sale --quantity 5 --reason "Walk-in"
//! stockroom --memory stock alert
//! ```
//!
//! Success prints the JSON payload on stdout and exits 0. Failure prints an
//! `ApiError` on stderr and exits with a per-code status.

use clap::Parser;
use std::process::ExitCode;

use stockroom_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let pretty = cli.pretty;

    match stockroom_cli::run(cli).await {
        Ok(value) => {
            println!("{}", stockroom_cli::render(&value, pretty));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", stockroom_cli::render(&err, pretty));
            ExitCode::from(err.code.exit_status())
        }
    }
}
