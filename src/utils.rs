//! Utility functions and helpers

use crate::error::{Result, RequestsError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::collections::BTreeMap;
use url::form_urlencoded;
use url::Url;

/// Key to ordered, non-empty value list. Used for headers, query and form params.
pub type Params = BTreeMap<String, Vec<String>>;

/// Result of URL normalization: canonical base plus the extracted query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// `scheme://host[:port]/path`, without query or fragment
    pub base: String,
    pub query: Params,
}

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate a user-supplied URL and split it into base and query params.
    ///
    /// Input without a scheme separator gets `http://` prepended. Input that
    /// names any scheme other than http or https is rejected.
    pub fn normalize(input: &str) -> Result<NormalizedUrl> {
        let url = match Url::parse(input) {
            Ok(url) if Self::is_http(&url) => url,
            Ok(url) if Self::has_explicit_scheme(input) => {
                return Err(RequestsError::InvalidUrl(format!(
                    "Unsupported scheme '{}' in '{}': only http and https are accepted",
                    url.scheme(),
                    input
                )));
            }
            Err(e) if Self::has_explicit_scheme(input) => {
                return Err(RequestsError::InvalidUrl(format!(
                    "Invalid URL '{}': {}",
                    input, e
                )));
            }
            _ => Self::parse_with_default_scheme(input)?,
        };

        let mut query = Params::new();
        for (key, value) in url.query_pairs() {
            query
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        Ok(NormalizedUrl {
            base: Self::base_of(&url),
            query,
        })
    }

    fn parse_with_default_scheme(input: &str) -> Result<Url> {
        let url = Url::parse(&format!("http://{}", input))
            .map_err(|e| RequestsError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))?;
        if !Self::is_http(&url) {
            return Err(RequestsError::InvalidUrl(format!(
                "Unsupported scheme '{}' in '{}'",
                url.scheme(),
                input
            )));
        }
        Ok(url)
    }

    // `scheme://` at the start of the input, before any path, query or fragment.
    fn has_explicit_scheme(input: &str) -> bool {
        match input.find("://") {
            Some(pos) => pos > 0 && !input[..pos].contains(['/', '?', '#']),
            None => false,
        }
    }

    fn is_http(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    fn base_of(url: &Url) -> String {
        let host = url.host_str().unwrap_or_default();
        match url.port() {
            Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
            None => format!("{}://{}{}", url.scheme(), host, url.path()),
        }
    }
}

/// Parameter map utilities
pub struct ParamUtils;

impl ParamUtils {
    /// Encode every value of every key as `application/x-www-form-urlencoded`
    pub fn encode(params: &Params) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Replace the key's values, or remove the key when no values are given
    pub fn set<I, V>(params: &mut Params, key: String, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            params.remove(&key);
        } else {
            params.insert(key, values);
        }
    }
}

/// Header utilities
pub struct HeaderUtils;

impl HeaderUtils {
    /// Flatten a header map into wire headers.
    ///
    /// `content_type` replaces any caller-set Content-Type. `Accept: */*` and
    /// the given User-Agent are added when the caller did not set them.
    pub fn build(headers: &Params, content_type: Option<&str>, user_agent: &str) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (key, values) in headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| RequestsError::InvalidHeader(format!("'{}': {}", key, e)))?;
            for value in values {
                map.append(name.clone(), Self::value(key, value)?);
            }
        }

        if let Some(content_type) = content_type {
            map.insert(CONTENT_TYPE, Self::value("Content-Type", content_type)?);
        }
        if !map.contains_key(ACCEPT) {
            map.insert(ACCEPT, HeaderValue::from_static("*/*"));
        }
        if !map.contains_key(USER_AGENT) {
            map.insert(USER_AGENT, Self::value("User-Agent", user_agent)?);
        }
        Ok(map)
    }

    fn value(key: &str, value: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(value)
            .map_err(|e| RequestsError::InvalidHeader(format!("'{}: {}': {}", key, value, e)))
    }
}

/// Cookie header utilities
pub struct CookieUtils;

impl CookieUtils {
    /// Cookie names present in a `Cookie` header value (`a=1; b=2`)
    pub fn names(header: &str) -> Vec<&str> {
        header
            .split(';')
            .filter_map(|pair| {
                let name = pair.split_once('=').map_or(pair, |(name, _)| name).trim();
                (!name.is_empty()).then_some(name)
            })
            .collect()
    }
}
