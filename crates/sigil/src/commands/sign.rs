//! `sigil sign` and `sigil base-string` command implementations.

use std::io::{self, Write};

use clap::Args;
use sigil_oauth::{OAuthOptions, OptionKey, RequestHeader};

use super::{CredentialArgs, RequestArgs};
use crate::error::CliError;

/// Arguments for the sign and base-string commands.
#[derive(Args)]
pub(crate) struct SignArgs {
    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    credentials: CredentialArgs,

    /// Fixed nonce (default: 16 random bytes, hex encoded).
    #[arg(long)]
    nonce: Option<String>,

    /// Fixed Unix timestamp (default: now).
    #[arg(long)]
    timestamp: Option<u64>,
}

impl SignArgs {
    /// Execute the sign command.
    pub(crate) fn execute_sign(self) -> Result<(), CliError> {
        let header = self.header()?;
        writeln!(io::stdout(), "{}", header.to_header_value()?)?;
        Ok(())
    }

    /// Execute the base-string command.
    pub(crate) fn execute_base_string(self) -> Result<(), CliError> {
        let header = self.header()?;
        writeln!(io::stdout(), "{}", header.signature_base_string())?;
        Ok(())
    }

    /// Build the header from config, CLI overrides and fresh defaults.
    fn header(&self) -> Result<RequestHeader, CliError> {
        let config = self.credentials.load()?;
        let oauth = config.require_oauth()?;

        let mut options = OAuthOptions::defaults().merge(&oauth.to_options());
        if let Some(nonce) = &self.nonce {
            options.insert(OptionKey::Nonce, nonce.as_str());
        }
        if let Some(timestamp) = self.timestamp {
            options.insert(OptionKey::Timestamp, timestamp.to_string());
        }

        Ok(RequestHeader::from_parts(self.request.context()?, options)
            .with_realm(oauth.realm.as_str()))
    }
}
