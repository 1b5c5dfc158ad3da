//! OAuth 1.0 signature methods (RFC 5849 Section 3.4).

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use hmac::{Hmac, Mac};
use rsa::RsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha1::Sha1;

use crate::encode::oauth_encode;
use crate::error::SignError;
use crate::key::load_private_key;

type HmacSha1 = Hmac<Sha1>;

/// Supported signature methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureMethod {
    HmacSha1,
    RsaSha1,
    Plaintext,
}

impl SignatureMethod {
    /// Canonical identifier as sent in `oauth_signature_method`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha1 => "HMAC-SHA1",
            Self::RsaSha1 => "RSA-SHA1",
            Self::Plaintext => "PLAINTEXT",
        }
    }

    /// Sign `base_string` with this method.
    ///
    /// For RSA-SHA1, `consumer_secret` holds the PEM-encoded private key and
    /// `token_secret` is unused.
    pub fn sign(
        self,
        base_string: &str,
        consumer_secret: &str,
        token_secret: &str,
    ) -> Result<String, SignError> {
        match self {
            Self::HmacSha1 => {
                sign_hmac_sha1(&signing_secret(consumer_secret, token_secret), base_string)
            }
            Self::Plaintext => Ok(signing_secret(consumer_secret, token_secret)),
            Self::RsaSha1 => {
                let private_key = load_private_key(consumer_secret)?;
                sign_rsa_sha1(&private_key, base_string)
            }
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureMethod {
    type Err = SignError;

    /// Parse case-insensitively; `-` and `_` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "hmac_sha1" => Ok(Self::HmacSha1),
            "rsa_sha1" => Ok(Self::RsaSha1),
            "plaintext" => Ok(Self::Plaintext),
            _ => Err(SignError::UnsupportedSignatureMethod(s.to_owned())),
        }
    }
}

/// Signing key for HMAC-SHA1 and the PLAINTEXT signature itself:
/// `encode(consumer_secret)&encode(token_secret)`.
pub fn signing_secret(consumer_secret: &str, token_secret: &str) -> String {
    format!("{}&{}", oauth_encode(consumer_secret), oauth_encode(token_secret))
}

/// Sign data with HMAC-SHA1 and return base64-encoded digest.
fn sign_hmac_sha1(key: &str, data: &str) -> Result<String, SignError> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| SignError::CryptoFailure(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

/// Sign data with RSA-SHA1 and return base64-encoded signature.
fn sign_rsa_sha1(private_key: &RsaPrivateKey, data: &str) -> Result<String, SignError> {
    let signing_key = SigningKey::<Sha1>::new(private_key.clone());
    let signature = signing_key
        .try_sign(data.as_bytes())
        .map_err(|e| SignError::CryptoFailure(e.to_string()))?;
    Ok(BASE64_STANDARD.encode(signature.to_bytes()))
}
