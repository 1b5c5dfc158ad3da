//! Authorization header assembly and signature validation.

use std::collections::BTreeMap;

use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{normalize_params, signature_base_string};
use crate::encode::oauth_encode;
use crate::error::SignError;
use crate::options::{ATTRIBUTE_KEYS, OAuthOptions, OptionKey};
use crate::request::RequestContext;
use crate::signature::SignatureMethod;

/// Realm sent when none is configured. Informational only; never signed.
pub const DEFAULT_REALM: &str = "http://www.opentable.com/";

/// OAuth 1.0 request header for one request.
///
/// Holds the request context and the option set for a single signing
/// operation. Every derived value (attributes, base string, signature,
/// header) is recomputed on access.
#[derive(Debug, Clone)]
pub struct RequestHeader {
    context: RequestContext,
    options: OAuthOptions,
    realm: String,
}

impl RequestHeader {
    /// Create a header with fresh default options overlaid by `oauth`.
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `url` - Full request URL (query string participates in the signature)
    /// * `params` - Request parameters to include in the signature
    /// * `oauth` - Caller options; override the defaults by key
    pub fn new<I, K, V>(
        method: &str,
        url: &str,
        params: I,
        oauth: &OAuthOptions,
    ) -> Result<Self, SignError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let options = OAuthOptions::defaults().merge(oauth);
        Ok(Self::from_parts(RequestContext::new(method, url, params)?, options))
    }

    /// Create a header from an existing context and complete option set.
    ///
    /// No defaults are applied; use this with
    /// [`OAuthOptions::with_defaults`] for reproducible signatures.
    pub fn from_parts(context: RequestContext, options: OAuthOptions) -> Self {
        Self {
            context,
            options,
            realm: DEFAULT_REALM.to_owned(),
        }
    }

    /// Replace the realm emitted in the header.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    /// Uppercased HTTP method.
    pub fn method(&self) -> &str {
        self.context.method()
    }

    /// Canonical base URL used in the signature.
    pub fn url(&self) -> &str {
        self.context.base_url()
    }

    /// Caller-supplied request parameters.
    pub fn params(&self) -> &[(String, String)] {
        self.context.params()
    }

    /// Option set used for signing.
    pub fn options(&self) -> &OAuthOptions {
        &self.options
    }

    /// Realm emitted in the header.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// `oauth_*` attributes for every attribute option present.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        attributes_of(&self.options)
    }

    /// Attributes plus `oauth_signature`.
    pub fn signed_attributes(&self) -> Result<BTreeMap<String, String>, SignError> {
        let mut attributes = self.attributes();
        attributes.insert(OptionKey::Signature.attribute_name(), self.signature()?);
        Ok(attributes)
    }

    /// Signature base string for this request.
    pub fn signature_base_string(&self) -> String {
        base_string_of(&self.context, &self.options)
    }

    /// Compute the signature using the configured method.
    pub fn signature(&self) -> Result<String, SignError> {
        compute_signature(&self.context, &self.options)
    }

    /// Render the `Authorization` header value.
    ///
    /// Format: `OAuth realm="…", oauth_consumer_key="…", …` with attributes
    /// sorted by name and values percent-encoded.
    pub fn to_header_value(&self) -> Result<String, SignError> {
        let attributes = self
            .signed_attributes()?
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, oauth_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth realm=\"{}\", {attributes}", self.realm))
    }

    /// Check the asserted `signature` option against a recomputed signature.
    ///
    /// `secrets` (typically `consumer_secret` and `token_secret`) are overlaid
    /// on a copy of the options for this check only; the header itself is
    /// never modified. A mismatch or absent signature returns `Ok(false)`.
    /// Comparison is constant-time.
    pub fn is_valid(&self, secrets: &OAuthOptions) -> Result<bool, SignError> {
        let options = self.options.merge(secrets);
        let Some(asserted) = options.get(OptionKey::Signature) else {
            debug!("No signature asserted");
            return Ok(false);
        };

        let expected = compute_signature(&self.context, &options)?;
        let valid: bool = asserted.as_bytes().ct_eq(expected.as_bytes()).into();
        debug!(
            valid,
            method = %self.context.method(),
            url = %self.context.base_url(),
            "Validated OAuth signature"
        );
        Ok(valid)
    }
}

/// Re-key present attribute options with the `oauth_` prefix.
fn attributes_of(options: &OAuthOptions) -> BTreeMap<String, String> {
    ATTRIBUTE_KEYS
        .iter()
        .filter_map(|key| {
            options
                .get(*key)
                .map(|value| (key.attribute_name(), value.to_owned()))
        })
        .collect()
}

fn base_string_of(context: &RequestContext, options: &OAuthOptions) -> String {
    let attributes = attributes_of(options);
    let params = context.collect_params(attributes.iter().map(|(k, v)| (k.clone(), v.as_str())));
    let base = signature_base_string(
        context.method(),
        context.base_url(),
        &normalize_params(&params),
    );
    debug!(base_string = %base, "Built OAuth signature base string");
    base
}

fn compute_signature(
    context: &RequestContext,
    options: &OAuthOptions,
) -> Result<String, SignError> {
    let method: SignatureMethod = options
        .get(OptionKey::SignatureMethod)
        .ok_or(SignError::MissingOption("signature_method"))?
        .parse()?;
    let consumer_secret = options.get(OptionKey::ConsumerSecret).unwrap_or_default();
    let token_secret = options.get(OptionKey::TokenSecret).unwrap_or_default();

    if method == SignatureMethod::RsaSha1 && consumer_secret.is_empty() {
        return Err(SignError::MissingOption("consumer_secret"));
    }

    debug!(signature_method = %method, "Signing OAuth request");
    method.sign(
        &base_string_of(context, options),
        consumer_secret,
        token_secret,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::source::{FixedClock, FixedNonce};
    use crate::test_keys::PKCS8_KEY;

    const PHOTOS_URL: &str = "http://photos.example.net/photos?size=original&file=vacation.jpg";

    fn photos_options() -> OAuthOptions {
        OAuthOptions::with_defaults(
            &FixedNonce("kllo9940pd9333jh".to_owned()),
            &FixedClock(1_191_242_096),
        )
        .with(OptionKey::ConsumerKey, "dpf43f3p2l4k3l03")
        .with(OptionKey::ConsumerSecret, "kd94hf93k423kf44")
    }

    fn photos_header(options: OAuthOptions) -> RequestHeader {
        let context =
            RequestContext::new("GET", PHOTOS_URL, Vec::<(String, String)>::new()).unwrap();
        RequestHeader::from_parts(context, options)
    }

    #[test]
    fn test_photos_signature_base_string() {
        let header = photos_header(photos_options());
        assert_eq!(
            header.signature_base_string(),
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26oauth_token%3D%26oauth_version%3D1.0%26size%3Doriginal"
        );
    }

    #[test]
    fn test_photos_hmac_signature() {
        let header = photos_header(photos_options());
        assert_eq!(header.signature().unwrap(), "B8FubascSZlA9UWgcPo0xnt3VLQ=");
    }

    #[test]
    fn test_photos_header_value() {
        let header = photos_header(photos_options());
        assert_eq!(
            header.to_header_value().unwrap(),
            r#"OAuth realm="http://www.opentable.com/", oauth_consumer_key="dpf43f3p2l4k3l03", oauth_nonce="kllo9940pd9333jh", oauth_signature="B8FubascSZlA9UWgcPo0xnt3VLQ%3D", oauth_signature_method="HMAC-SHA1", oauth_timestamp="1191242096", oauth_token="", oauth_version="1.0""#
        );
    }

    #[test]
    fn test_rfc5849_example_with_token() {
        let options = photos_options()
            .with(OptionKey::Token, "nnch734d00sl2jdk")
            .with(OptionKey::TokenSecret, "pfkkdhi9sl3r4s00");
        let header = photos_header(options);
        assert_eq!(header.signature().unwrap(), "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn test_custom_realm() {
        let header = photos_header(photos_options()).with_realm("Photos");
        assert!(
            header
                .to_header_value()
                .unwrap()
                .starts_with(r#"OAuth realm="Photos", oauth_consumer_key="#)
        );
        // Realm is not signed
        assert_eq!(header.signature().unwrap(), "B8FubascSZlA9UWgcPo0xnt3VLQ=");
    }

    #[test]
    fn test_attributes_exclude_secrets() {
        let options = photos_options().with(OptionKey::TokenSecret, "ts");
        let attributes = photos_header(options).attributes();
        let names: Vec<&str> = attributes.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "oauth_consumer_key",
                "oauth_nonce",
                "oauth_signature_method",
                "oauth_timestamp",
                "oauth_token",
                "oauth_version",
            ]
        );
    }

    #[test]
    fn test_absent_attribute_is_omitted() {
        let mut options = photos_options();
        options.remove(OptionKey::Token);
        let value = photos_header(options).to_header_value().unwrap();
        assert!(!value.contains("oauth_token"));
    }

    #[test]
    fn test_plaintext_header() {
        let options = photos_options()
            .with(OptionKey::SignatureMethod, "PLAINTEXT")
            .with(OptionKey::ConsumerSecret, "secretA")
            .with(OptionKey::TokenSecret, "secretB");
        let header = photos_header(options);
        assert_eq!(header.signature().unwrap(), "secretA&secretB");
        assert!(
            header
                .to_header_value()
                .unwrap()
                .contains(r#"oauth_signature="secretA%26secretB""#)
        );
    }

    #[test]
    fn test_unsupported_method() {
        let options = photos_options().with(OptionKey::SignatureMethod, "FOO-BAR");
        let header = photos_header(options);
        assert!(matches!(
            header.signature(),
            Err(SignError::UnsupportedSignatureMethod(m)) if m == "FOO-BAR"
        ));
        assert!(header.to_header_value().is_err());
    }

    #[test]
    fn test_missing_signature_method() {
        let mut options = photos_options();
        options.remove(OptionKey::SignatureMethod);
        let result = photos_header(options).signature();
        assert!(matches!(result, Err(SignError::MissingOption("signature_method"))));
    }

    #[test]
    fn test_rsa_sha1_header() {
        let options = photos_options()
            .with(OptionKey::SignatureMethod, "RSA-SHA1")
            .with(OptionKey::ConsumerSecret, PKCS8_KEY);
        let value = photos_header(options).to_header_value().unwrap();
        assert!(value.contains(r#"oauth_signature_method="RSA-SHA1""#));
        assert!(value.contains(r#"oauth_signature="fXQLfi%2B0mjWZoWOWmKhIn1eyAb5NXWZe6Ups"#));
    }

    #[test]
    fn test_rsa_sha1_requires_key() {
        let mut options = photos_options().with(OptionKey::SignatureMethod, "RSA-SHA1");
        options.remove(OptionKey::ConsumerSecret);
        let result = photos_header(options).signature();
        assert!(matches!(result, Err(SignError::MissingOption("consumer_secret"))));
    }

    #[test]
    fn test_param_order_independence() {
        let forward = [("b", "2"), ("a", "1"), ("c", "3")];
        let mut reversed = forward;
        reversed.reverse();

        let first = RequestContext::new("POST", "http://example.com/resource", forward).unwrap();
        let second = RequestContext::new("POST", "http://example.com/resource", reversed).unwrap();
        assert_eq!(
            RequestHeader::from_parts(first, photos_options()).signature_base_string(),
            RequestHeader::from_parts(second, photos_options()).signature_base_string()
        );
    }

    #[test]
    fn test_request_params_merged_with_query() {
        let context = RequestContext::new("post", PHOTOS_URL, [("status", "hello world")]).unwrap();
        let base = RequestHeader::from_parts(context, photos_options()).signature_base_string();
        assert!(base.starts_with("POST&"));
        assert!(base.contains("size%3Doriginal%26status%3Dhello%2520world"));
    }

    #[test]
    fn test_sign_then_validate() {
        let signer = photos_header(photos_options().with(OptionKey::TokenSecret, "ts"));
        let signature = signer.signature().unwrap();

        let mut inbound = photos_options().with(OptionKey::Signature, signature);
        inbound.remove(OptionKey::ConsumerSecret);
        let verifier = photos_header(inbound);
        let secrets = OAuthOptions::new()
            .with(OptionKey::ConsumerSecret, "kd94hf93k423kf44")
            .with(OptionKey::TokenSecret, "ts");
        assert!(verifier.is_valid(&secrets).unwrap());
    }

    #[test]
    fn test_validate_parsed_header() {
        let value = photos_header(photos_options()).to_header_value().unwrap();
        let inbound = OAuthOptions::from_authorization_header(&value).unwrap();
        let verifier = photos_header(inbound);
        let secrets = OAuthOptions::new().with(OptionKey::ConsumerSecret, "kd94hf93k423kf44");
        assert!(verifier.is_valid(&secrets).unwrap());
    }

    #[test]
    fn test_wrong_signature_is_invalid_and_options_unchanged() {
        let options = photos_options().with(OptionKey::Signature, "bogus=");
        let header = photos_header(options.clone());
        let secrets = OAuthOptions::new().with(OptionKey::TokenSecret, "temporary");

        assert!(!header.is_valid(&secrets).unwrap());
        assert_eq!(header.options(), &options);
        assert!(!header.options().contains(OptionKey::TokenSecret));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let signature = photos_header(photos_options()).signature().unwrap();
        let header = photos_header(photos_options().with(OptionKey::Signature, signature));
        let secrets = OAuthOptions::new().with(OptionKey::ConsumerSecret, "not-the-secret");
        assert!(!header.is_valid(&secrets).unwrap());
    }

    #[test]
    fn test_missing_signature_is_invalid() {
        let header = photos_header(photos_options());
        assert!(!header.is_valid(&OAuthOptions::new()).unwrap());
    }

    #[test]
    fn test_validation_errors_propagate() {
        let options = photos_options()
            .with(OptionKey::Signature, "x")
            .with(OptionKey::SignatureMethod, "FOO-BAR");
        let header = photos_header(options.clone());
        assert!(header.is_valid(&OAuthOptions::new()).is_err());
        assert_eq!(header.options(), &options);
    }

    #[test]
    fn test_new_applies_fresh_defaults() {
        let caller = OAuthOptions::new().with(OptionKey::ConsumerKey, "key");
        let first =
            RequestHeader::new("GET", "http://example.com/", [("a", "1")], &caller).unwrap();
        let second =
            RequestHeader::new("GET", "http://example.com/", [("a", "1")], &caller).unwrap();

        assert_eq!(first.options().get(OptionKey::SignatureMethod), Some("HMAC-SHA1"));
        assert_eq!(first.options().get(OptionKey::Version), Some("1.0"));
        assert_eq!(first.options().get(OptionKey::ConsumerKey), Some("key"));
        assert_ne!(first.options().get(OptionKey::Nonce), second.options().get(OptionKey::Nonce));
        // Caller options are not modified
        assert_eq!(caller.len(), 1);
    }

    #[test]
    fn test_new_caller_overrides_defaults() {
        let caller = OAuthOptions::new()
            .with(OptionKey::Nonce, "fixed")
            .with(OptionKey::Timestamp, "42");
        let header =
            RequestHeader::new("GET", "http://example.com/", [("a", "1")], &caller).unwrap();
        assert_eq!(header.options().get(OptionKey::Nonce), Some("fixed"));
        assert_eq!(header.options().get(OptionKey::Timestamp), Some("42"));
    }

    #[test]
    fn test_new_malformed_url() {
        let result = RequestHeader::new("GET", "::not a url", [("a", "1")], &OAuthOptions::new());
        assert!(matches!(result, Err(SignError::MalformedUrl(_))));
    }
}
