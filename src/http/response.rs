//! HTTP response handling

use crate::error::{Result, RequestsError};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, CONTENT_TYPE, SET_COOKIE};
use reqwest::{StatusCode, Version};
use serde::de::DeserializeOwned;
use url::Url;

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    url: Url,
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(url: Url, status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            url,
            status,
            version: Version::HTTP_11,
            headers,
            body,
        }
    }

    /// Read a transport response to completion
    pub fn from_blocking(response: reqwest::blocking::Response) -> Result<Self> {
        let url = response.url().clone();
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| RequestsError::ResponseParse(format!("failed to read body from {}: {}", url, e)))?
            .to_vec();
        Ok(Self {
            url,
            status,
            version,
            headers,
            body,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and valid text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Raw `Set-Cookie` values sent by the server
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Body decoded with the charset named in Content-Type, UTF-8 otherwise
    pub fn text(&self) -> String {
        let encoding = self
            .charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        let (text, _, had_errors) = encoding.decode(&self.body);
        if had_errors {
            log::warn!(
                "response body from {} is not valid {}",
                self.url,
                encoding.name()
            );
        }
        text.into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    fn charset(&self) -> Option<&str> {
        self.content_type()?
            .split(';')
            .filter_map(|param| param.trim().split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde::Deserialize;

    fn response(content_type: Option<&'static str>, body: &[u8]) -> Response {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        Response::new(
            Url::parse("http://example.com/").expect("valid url"),
            StatusCode::OK,
            headers,
            body.to_vec(),
        )
    }

    #[test]
    fn text_defaults_to_utf8() {
        let response = response(Some("text/plain"), "héllo".as_bytes());
        assert_eq!(response.text(), "héllo");
    }

    #[test]
    fn text_uses_declared_charset() {
        let response = response(Some("text/plain; charset=\"windows-1252\""), &[0x63, 0x61, 0x66, 0xE9]);
        assert_eq!(response.text(), "café");
    }

    #[test]
    fn json_deserializes_body() {
        #[derive(Deserialize)]
        struct Payload {
            ok: bool,
        }

        let response = response(Some("application/json"), br#"{"ok":true}"#);
        let payload: Payload = response.json().expect("json");
        assert!(payload.ok);
    }

    #[test]
    fn json_reports_invalid_body() {
        let response = response(None, b"not json");
        let err = response.json::<serde_json::Value>().expect_err("invalid json");
        assert!(matches!(err, RequestsError::Json(_)));
    }

    #[test]
    fn set_cookies_lists_every_value() {
        let mut response = response(None, b"");
        response
            .headers
            .append(SET_COOKIE, HeaderValue::from_static("a=1; Path=/"));
        response
            .headers
            .append(SET_COOKIE, HeaderValue::from_static("b=2"));
        assert_eq!(response.set_cookies(), vec!["a=1; Path=/", "b=2"]);
    }
}
