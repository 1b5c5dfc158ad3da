//! OAuth option set: credentials and protocol parameters for one request.

use std::collections::BTreeMap;

use crate::encode::oauth_decode;
use crate::error::SignError;
use crate::source::{Clock, NonceSource, OsNonceSource, SystemClock};

/// Recognized option keys.
///
/// Variants are declared in name order so a [`BTreeMap`] keyed on them
/// iterates alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
    ConsumerKey,
    ConsumerSecret,
    Nonce,
    /// Transient; only set when validating an inbound signature.
    Signature,
    SignatureMethod,
    Timestamp,
    Token,
    TokenSecret,
    Version,
}

/// Options that become `oauth_*` attributes, in header order.
pub const ATTRIBUTE_KEYS: [OptionKey; 6] = [
    OptionKey::ConsumerKey,
    OptionKey::Nonce,
    OptionKey::SignatureMethod,
    OptionKey::Timestamp,
    OptionKey::Token,
    OptionKey::Version,
];

impl OptionKey {
    /// Option name without the `oauth_` prefix.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConsumerKey => "consumer_key",
            Self::ConsumerSecret => "consumer_secret",
            Self::Nonce => "nonce",
            Self::Signature => "signature",
            Self::SignatureMethod => "signature_method",
            Self::Timestamp => "timestamp",
            Self::Token => "token",
            Self::TokenSecret => "token_secret",
            Self::Version => "version",
        }
    }

    /// Look up a key by name. Unrecognized names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "consumer_key" => Self::ConsumerKey,
            "consumer_secret" => Self::ConsumerSecret,
            "nonce" => Self::Nonce,
            "signature" => Self::Signature,
            "signature_method" => Self::SignatureMethod,
            "timestamp" => Self::Timestamp,
            "token" => Self::Token,
            "token_secret" => Self::TokenSecret,
            "version" => Self::Version,
            _ => return None,
        };
        Some(key)
    }

    /// Header attribute name (`oauth_` + option name).
    pub fn attribute_name(self) -> String {
        format!("oauth_{}", self.as_str())
    }
}

/// Mapping from [`OptionKey`] to string value.
///
/// Each signing operation owns its own value. Merging never mutates either
/// side; it returns a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthOptions {
    values: BTreeMap<OptionKey, String>,
}

impl OAuthOptions {
    /// Create an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default options with a random nonce and the current time.
    #[must_use]
    pub fn defaults() -> Self {
        Self::with_defaults(&OsNonceSource, &SystemClock)
    }

    /// Default options drawing nonce and timestamp from the given sources.
    ///
    /// Sets `nonce`, `signature_method` (`HMAC-SHA1`), `timestamp`,
    /// `version` (`1.0`) and `token` (empty).
    #[must_use]
    pub fn with_defaults(nonce: &dyn NonceSource, clock: &dyn Clock) -> Self {
        Self::new()
            .with(OptionKey::Nonce, nonce.nonce())
            .with(OptionKey::SignatureMethod, "HMAC-SHA1")
            .with(OptionKey::Timestamp, clock.unix_timestamp().to_string())
            .with(OptionKey::Version, "1.0")
            .with(OptionKey::Token, "")
    }

    /// Build options from untyped `(name, value)` pairs.
    ///
    /// Unrecognized names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .filter_map(|(name, value)| {
                OptionKey::from_name(name.as_ref()).map(|key| (key, value.into()))
            })
            .collect();
        Self { values }
    }

    /// Parse the `oauth_*` attributes of an `Authorization` header.
    ///
    /// Values are percent-decoded and `oauth_signature` becomes the
    /// [`OptionKey::Signature`] option. `realm` and anything that is not a
    /// header attribute (including secrets) is ignored.
    pub fn from_authorization_header(header: &str) -> Result<Self, SignError> {
        let mut options = Self::new();
        for (name, value) in parse_header_params(header)? {
            let key = name
                .strip_prefix("oauth_")
                .and_then(OptionKey::from_name)
                .filter(|key| *key == OptionKey::Signature || ATTRIBUTE_KEYS.contains(key));
            if let Some(key) = key {
                options.insert(key, oauth_decode(value));
            }
        }
        Ok(options)
    }

    /// Return a copy with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: OptionKey, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: OptionKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: OptionKey) -> Option<String> {
        self.values.remove(&key)
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: OptionKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: OptionKey) -> bool {
        self.values.contains_key(&key)
    }

    /// New option set with `overlay` values taking precedence by key.
    #[must_use]
    pub fn merge(&self, overlay: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &overlay.values {
            merged.values.insert(*key, value.clone());
        }
        merged
    }

    /// Iterate over present options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Number of present options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Split `OAuth k1="v1", k2="v2"` into raw `(k, v)` pairs.
fn parse_header_params(header: &str) -> Result<Vec<(&str, &str)>, SignError> {
    let header = header.trim();
    let rest = match header.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("OAuth") => rest,
        _ if header.eq_ignore_ascii_case("OAuth") => "",
        _ => return Err(SignError::MalformedHeader("missing OAuth scheme".to_owned())),
    };

    let mut params = Vec::new();
    let mut rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    while !rest.is_empty() {
        let malformed = || SignError::MalformedHeader(format!("malformed parameter near {rest:?}"));
        let (name, after_eq) = rest.split_once('=').ok_or_else(malformed)?;
        let quoted = after_eq.strip_prefix('"').ok_or_else(malformed)?;
        let (value, after_value) = quoted.split_once('"').ok_or_else(malformed)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(malformed());
        }
        params.push((name, value));
        rest = after_value.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    }
    Ok(params)
}
