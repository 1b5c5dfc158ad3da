//! CLI command implementations.

pub(crate) mod sign;
pub(crate) mod verify;

pub(crate) use sign::SignArgs;
pub(crate) use verify::VerifyArgs;

use std::path::PathBuf;

use clap::Args;
use sigil_config::{CliSettings, Config};
use sigil_oauth::RequestContext;

use crate::error::CliError;

/// Request being signed or verified.
#[derive(Args)]
pub(crate) struct RequestArgs {
    /// HTTP method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request URL (query parameters are included in the signature).
    #[arg(short, long)]
    url: String,

    /// Request parameter as key=value (repeatable).
    #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
    params: Vec<(String, String)>,
}

impl RequestArgs {
    /// Parse the URL and collect parameters.
    pub(crate) fn context(&self) -> Result<RequestContext, CliError> {
        Ok(RequestContext::new(
            &self.method,
            &self.url,
            self.params.iter().cloned(),
        )?)
    }
}

/// Credentials; each flag overrides the config file.
#[derive(Args)]
pub(crate) struct CredentialArgs {
    /// Path to configuration file (default: auto-discover sigil.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OAuth consumer key.
    #[arg(long, env = "SIGIL_CONSUMER_KEY")]
    consumer_key: Option<String>,

    /// OAuth consumer secret (PEM key text for RSA-SHA1).
    #[arg(long, env = "SIGIL_CONSUMER_SECRET", hide_env_values = true)]
    consumer_secret: Option<String>,

    /// OAuth access token.
    #[arg(long)]
    token: Option<String>,

    /// OAuth access token secret.
    #[arg(long, env = "SIGIL_TOKEN_SECRET", hide_env_values = true)]
    token_secret: Option<String>,

    /// Signature method (HMAC-SHA1, RSA-SHA1, PLAINTEXT).
    #[arg(short = 's', long)]
    signature_method: Option<String>,

    /// Realm emitted in the header.
    #[arg(long)]
    realm: Option<String>,
}

impl CredentialArgs {
    /// Load config and apply CLI overrides.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            consumer_key: self.consumer_key.clone(),
            consumer_secret: self.consumer_secret.clone(),
            token: self.token.clone(),
            token_secret: self.token_secret.clone(),
            signature_method: self.signature_method.clone(),
            realm: self.realm.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Parse a `key=value` argument. A missing `=` yields an empty value.
fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
    if key.is_empty() {
        return Err(format!("parameter name missing in {arg:?}"));
    }
    Ok((key.to_owned(), value.to_owned()))
}
