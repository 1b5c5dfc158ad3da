//! Request context and parameter collection.

use url::{Position, Url};

use crate::error::SignError;

/// Immutable inputs of one signing operation.
///
/// The URL is parsed into a private copy: scheme and host are lowercased,
/// the fragment is dropped and the query is split off into
/// [`query_params`](Self::query_params).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    method: String,
    base_url: String,
    params: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
}

impl RequestContext {
    /// Build a context from a method, URL and caller-supplied parameters.
    ///
    /// # Arguments
    /// * `method` - HTTP method (uppercased here)
    /// * `url` - Absolute request URL; its query participates in signing
    /// * `params` - Request parameters (form body or extra query), duplicates allowed
    pub fn new<I, K, V>(method: &str, url: &str, params: I) -> Result<Self, SignError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let parsed = Url::parse(url)?;

        let query_params = parsed
            .query()
            .map(|_| group_query_pairs(&parsed))
            .unwrap_or_default();

        Ok(Self {
            method: method.to_uppercase(),
            base_url: base_url_of(url, &parsed),
            params: params
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            query_params,
        })
    }

    /// Uppercased HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Canonical base URL: no query, no fragment.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Caller-supplied request parameters, in the order given.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Decoded URL query pairs, grouped by key with each key's values sorted.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Collect every parameter that participates in the signature.
    ///
    /// Returns `attributes`, then request parameters, then URL query pairs.
    /// Order is irrelevant to the signature since the result is sorted during
    /// canonicalization.
    pub fn collect_params<'a>(
        &'a self,
        attributes: impl IntoIterator<Item = (String, &'a str)>,
    ) -> Vec<(String, &'a str)> {
        attributes
            .into_iter()
            .chain(
                self.params
                    .iter()
                    .chain(&self.query_params)
                    .map(|(key, value)| (key.clone(), value.as_str())),
            )
            .collect()
    }
}

/// Base URL without query or fragment (RFC 5849 Section 3.4.1.2).
///
/// Scheme, host and port come from the parsed URL; the path is taken
/// verbatim from `raw` so dot segments and separators are signed as sent.
fn base_url_of(raw: &str, parsed: &Url) -> String {
    let raw = raw.trim();
    let raw = raw.find(['?', '#']).map_or(raw, |end| &raw[..end]);
    let Some((_, rest)) = raw.split_once("://") else {
        return parsed[..Position::AfterPath].to_owned();
    };

    let authority = &parsed[..Position::AfterPort];
    match rest.find(['/', '\\']) {
        Some(start) => format!("{authority}{}", &rest[start..]),
        None => format!("{authority}/"),
    }
}

/// Decode query pairs, grouping repeated keys (first-appearance order) and
/// sorting the values of each key.
fn group_query_pairs(url: &Url) -> Vec<(String, String)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in url.query_pairs() {
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => groups.push((key.into_owned(), vec![value.into_owned()])),
        }
    }

    groups
        .into_iter()
        .flat_map(|(key, mut values)| {
            values.sort();
            values.into_iter().map(move |value| (key.clone(), value))
        })
        .collect()
}
