//! Argument handling for the `licensegate-cli` binary.

use anyhow::{Context, Result};
use clap::Parser;
use licensegate::{ChallengeStrategy, LicenseGate, VerificationRequest, DEFAULT_SERVER};
use std::{fs, path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(name = "licensegate-cli")]
#[command(about = "Verify a license key against a LicenseGate server")]
pub struct Args {
    /// License key to verify
    pub license_key: String,

    /// User ID of the license owner's LicenseGate account
    #[arg(short, long)]
    pub user_id: String,

    /// Account public key (PEM text); enables challenges
    #[arg(long, conflicts_with = "public_key_file")]
    pub public_key: Option<String>,

    /// Path to a PEM file with the account public key; enables challenges
    #[arg(long)]
    pub public_key_file: Option<PathBuf>,

    /// Validation server base URL (self-hosted deployments)
    #[arg(short, long, default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Scope the license must cover
    #[arg(long)]
    pub scope: Option<String>,

    /// Metadata recorded with the request
    #[arg(long)]
    pub metadata: Option<String>,

    /// Use a random challenge instead of a timestamp
    #[arg(long)]
    pub random_challenge: bool,

    /// Network timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns the public key text from `--public-key` or `--public-key-file`.
    pub fn load_public_key(&self) -> Result<Option<String>> {
        if let Some(pem) = &self.public_key {
            return Ok(Some(pem.clone()));
        }
        match &self.public_key_file {
            Some(path) => {
                let pem = fs::read_to_string(path)
                    .with_context(|| format!("failed to read public key {}", path.display()))?;
                Ok(Some(pem))
            }
            None => Ok(None),
        }
    }

    /// Builds the verification client these arguments describe.
    ///
    /// Challenge mode is on exactly when a public key is given.
    pub fn build_gate(&self) -> Result<LicenseGate> {
        let public_key = self.load_public_key()?;
        let mut builder = LicenseGate::builder(&self.user_id)
            .validation_server(&self.server)
            .timeout(Duration::from_secs(self.timeout))
            .debug(self.verbose);
        if let Some(pem) = public_key {
            builder = builder.public_key(pem);
        }
        if self.random_challenge {
            builder = builder.challenge_strategy(ChallengeStrategy::Random);
        }

        builder.build().context("invalid client configuration")
    }

    /// Builds the request for the positional license key.
    pub fn request(&self) -> VerificationRequest {
        VerificationRequest {
            license_key: self.license_key.clone(),
            scope: self.scope.clone(),
            metadata: self.metadata.clone(),
            challenge: None,
        }
    }
}
