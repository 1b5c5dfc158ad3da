//! CLI error types.

use sigil_config::ConfigError;
use sigil_oauth::SignError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Sign(#[from] SignError),

    #[error("signature does not match")]
    InvalidSignature,
}
