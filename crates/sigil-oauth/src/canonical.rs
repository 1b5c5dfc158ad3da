//! Signature base string construction (RFC 5849 Section 3.4.1).

use crate::encode::oauth_encode;

/// Normalize parameters: encode keys/values, sort by encoded key then
/// encoded value, join as `k=v` pairs with `&`.
pub fn normalize_params<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (oauth_encode(k.as_ref()), oauth_encode(v.as_ref())))
        .collect();
    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build OAuth signature base string.
///
/// Format: `METHOD&encoded_base_url&encoded_parameters`. The method is used
/// as given; an empty method still yields an empty leading segment.
pub fn signature_base_string(method: &str, base_url: &str, normalized_params: &str) -> String {
    format!(
        "{}&{}&{}",
        oauth_encode(method),
        oauth_encode(base_url),
        oauth_encode(normalized_params)
    )
}
