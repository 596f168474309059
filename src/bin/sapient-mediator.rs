use std::process::ExitCode;

use clap::Parser;
use med_cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    med_cli::run(args).await
}
