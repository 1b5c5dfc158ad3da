//! Error types for OAuth header signing.

/// Error from signing or validating an OAuth request.
///
/// A signature mismatch during validation is not an error; see
/// [`RequestHeader::is_valid`](crate::RequestHeader::is_valid).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SignError {
    /// Request URL could not be parsed.
    #[error("malformed URL: {0}")]
    MalformedUrl(#[from] url::ParseError),

    /// Signature method identifier is not one of HMAC-SHA1, RSA-SHA1, PLAINTEXT.
    #[error("unsupported signature method: {0}")]
    UnsupportedSignatureMethod(String),

    /// RSA private key could not be parsed from the consumer secret.
    #[error("invalid key material")]
    InvalidKeyMaterial(#[from] RsaKeyError),

    /// Digest or signing primitive failed.
    #[error("crypto failure: {0}")]
    CryptoFailure(String),

    /// A required option is absent.
    #[error("missing OAuth option: {0}")]
    MissingOption(&'static str),

    /// Inbound `Authorization` header could not be parsed.
    #[error("malformed OAuth header: {0}")]
    MalformedHeader(String),
}

/// RSA key loading/parsing error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RsaKeyError {
    /// PKCS#1 key parsing error.
    #[error("PKCS#1 key error")]
    Pkcs1(#[from] rsa::pkcs1::Error),

    /// PKCS#8 key parsing error (returned when both formats fail).
    #[error("PKCS#8 key error")]
    Pkcs8(#[from] rsa::pkcs8::Error),
}
