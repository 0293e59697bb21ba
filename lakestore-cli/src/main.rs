//! lakestore command-line entry point.
//!
//! Usage:
//!   lakestore join --account contoso --path /a/1.txt --path /a/2.txt --destination /a/out.txt --force
//!
//! Prints the fully-qualified destination path on success.

use clap::Parser;
use lakestore_cli::{exit_code, init_tracing, run, Cli};
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
