//! `sigil verify` command implementation.

use std::io::{self, Write};

use clap::Args;
use sigil_oauth::{OAuthOptions, OptionKey, RequestHeader};
use tracing::info;

use super::{CredentialArgs, RequestArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the verify command.
#[derive(Args)]
pub(crate) struct VerifyArgs {
    /// Inbound Authorization header value (`OAuth oauth_consumer_key="…", …`).
    #[arg(long = "header")]
    header: String,

    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    credentials: CredentialArgs,
}

impl VerifyArgs {
    /// Execute the verify command.
    ///
    /// Prints `valid` or `invalid`; an invalid signature is reported as an
    /// error so the process exits non-zero.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.credentials.load()?;
        let oauth = config.require_oauth()?;

        let inbound = OAuthOptions::from_authorization_header(&self.header)?;
        if inbound.get(OptionKey::ConsumerKey) != Some(oauth.consumer_key.as_str()) {
            output.warning(&format!(
                "Warning: header consumer key {:?} differs from configured {:?}",
                inbound.get(OptionKey::ConsumerKey).unwrap_or_default(),
                oauth.consumer_key
            ));
        }

        // Secrets come from config only; the header never carries them
        let secrets = oauth.to_options();
        let mut overlay = OAuthOptions::new();
        for key in [OptionKey::ConsumerSecret, OptionKey::TokenSecret] {
            if let Some(value) = secrets.get(key) {
                overlay.insert(key, value);
            }
        }

        let header = RequestHeader::from_parts(self.request.context()?, inbound);
        let valid = header.is_valid(&overlay)?;
        info!(valid, "Verified inbound header");

        writeln!(io::stdout(), "{}", if valid { "valid" } else { "invalid" })?;
        if valid {
            Ok(())
        } else {
            Err(CliError::InvalidSignature)
        }
    }
}
