//! OAuth 1.0a request signing for Sigil.
//!
//! Builds the `Authorization` header for a request and validates inbound
//! signatures (RFC 5849). Signing is a pure, synchronous pipeline:
//!
//! 1. **Collect** `oauth_*` attributes, request parameters and URL query
//!    pairs ([`RequestContext`]).
//! 2. **Canonicalize** them into the signature base string
//!    ([`signature_base_string`], [`normalize_params`]).
//! 3. **Sign** with HMAC-SHA1, RSA-SHA1 or PLAINTEXT ([`SignatureMethod`]).
//! 4. **Assemble** the header or **validate** an asserted signature
//!    ([`RequestHeader`]).
//!
//! Each [`RequestHeader`] owns its [`OAuthOptions`]; nothing is shared
//! between calls, so signing is safe from any thread.
//!
//! # Example
//!
//! ```ignore
//! use sigil_oauth::{OAuthOptions, OptionKey, RequestHeader};
//!
//! let oauth = OAuthOptions::new()
//!     .with(OptionKey::ConsumerKey, "dpf43f3p2l4k3l03")
//!     .with(OptionKey::ConsumerSecret, "kd94hf93k423kf44");
//! let header = RequestHeader::new(
//!     "GET",
//!     "http://photos.example.net/photos?size=original",
//!     [("file", "vacation.jpg")],
//!     &oauth,
//! )?;
//! let value = header.to_header_value()?;
//! ```

mod canonical;
mod encode;
mod error;
mod header;
mod key;
mod options;
mod request;
mod signature;
mod source;
#[cfg(test)]
mod test_keys;

pub use canonical::{normalize_params, signature_base_string};
pub use encode::{oauth_decode, oauth_encode};
pub use error::{RsaKeyError, SignError};
pub use header::{DEFAULT_REALM, RequestHeader};
pub use key::load_private_key;
pub use options::{ATTRIBUTE_KEYS, OAuthOptions, OptionKey};
pub use request::RequestContext;
pub use signature::{SignatureMethod, signing_secret};
pub use source::{Clock, FixedClock, FixedNonce, NonceSource, OsNonceSource, SystemClock};
