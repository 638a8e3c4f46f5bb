//! LicenseGate license check
//!
//! Verifies one license key and prints the outcome name. Exits 0 when the
//! key is `VALID`, 1 for any other outcome.
//!
//! Usage:
//!   licensegate-cli --user-id d32af1 --public-key-file key.pem LICENSE-KEY
//!   licensegate-cli --user-id d32af1 --server http://localhost:8080 --verbose test123

use anyhow::Result;
use clap::Parser;
use licensegate_cli::Args;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let gate = args.build_gate()?;
    info!(
        server = %gate.config().validation_server,
        challenges = gate.uses_challenges(),
        "verifying license"
    );

    let outcome = gate.verify_request(args.request()).await;
    println!("{outcome}");

    Ok(if outcome.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
