//! HTTP request building
//!
//! A [`Request`] accumulates headers, params, files and body through chained
//! mutators, then encodes everything into one wire request on [`Request::send`].

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use crate::config::Method;
use crate::error::{Result, RequestsError};
use crate::http::auth::Auth;
use crate::http::body::{BodySource, EncodedBody, FormFile};
use crate::http::response::Response;
use crate::session::Session;
use crate::utils::{HeaderUtils, ParamUtils, Params, UrlUtils};

/// A single request bound to the session that created it.
///
/// Mutators replace a key's whole value list; passing no values removes the
/// key. Accessors return independent copies.
#[derive(Debug, Clone)]
pub struct Request {
    session: Session,
    method: Method,
    base_url: String,
    headers: Params,
    query_params: Params,
    form_params: Params,
    body: Vec<u8>,
    is_json: bool,
    files: BTreeMap<String, FormFile>,
}

impl Request {
    pub(crate) fn new(session: Session, method: Method, url: &str) -> Result<Self> {
        let normalized = UrlUtils::normalize(url)?;
        Ok(Self {
            session,
            method,
            base_url: normalized.base,
            headers: Params::new(),
            query_params: normalized.query,
            form_params: Params::new(),
            body: Vec::new(),
            is_json: false,
            files: BTreeMap::new(),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Canonical `scheme://host/path` this request was created with
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_header<K, I, V>(&mut self, key: K, values: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        ParamUtils::set(&mut self.headers, key.into(), values);
        self
    }

    pub fn remove_header(&mut self, key: &str) -> &mut Self {
        self.headers.remove(key);
        self
    }

    pub fn headers(&self) -> Params {
        self.headers.clone()
    }

    pub fn set_query_param<K, I, V>(&mut self, key: K, values: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        ParamUtils::set(&mut self.query_params, key.into(), values);
        self
    }

    pub fn remove_query_param(&mut self, key: &str) -> &mut Self {
        self.query_params.remove(key);
        self
    }

    pub fn query_params(&self) -> Params {
        self.query_params.clone()
    }

    pub fn set_form_param<K, I, V>(&mut self, key: K, values: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        ParamUtils::set(&mut self.form_params, key.into(), values);
        self
    }

    pub fn remove_form_param(&mut self, key: &str) -> &mut Self {
        self.form_params.remove(key);
        self
    }

    pub fn form_params(&self) -> Params {
        self.form_params.clone()
    }

    /// Full URL including the encoded query string
    pub fn url_path(&self) -> String {
        if self.query_params.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}?{}", self.base_url, ParamUtils::encode(&self.query_params))
        }
    }

    /// Set a JSON body; it is sent with `Content-Type: application/json`
    pub fn set_json(&mut self, json: impl Into<String>) -> &mut Self {
        self.is_json = true;
        self.body = json.into().into_bytes();
        self
    }

    /// Serialize `value` and set it as the JSON body
    pub fn set_json_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        let json = serde_json::to_string(value)?;
        Ok(self.set_json(json))
    }

    /// Set a raw body. No Content-Type is added; set one with [`Request::set_header`].
    pub fn set_raw_body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.is_json = false;
        self.body = body.into();
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_json(&self) -> bool {
        self.is_json
    }

    /// Attach a file for a multipart upload. Ignored if any argument is empty.
    pub fn add_file(
        &mut self,
        field: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> &mut Self {
        let (field, filename, content) = (field.into(), filename.into(), content.into());
        if !field.is_empty() && !filename.is_empty() && !content.is_empty() {
            self.files.insert(field, FormFile { filename, content });
        }
        self
    }

    pub fn files(&self) -> BTreeMap<String, FormFile> {
        self.files.clone()
    }

    pub fn basic_auth(&mut self, username: &str, password: &str) -> &mut Self {
        self.set_header("Authorization", [Auth::basic_auth(username, password)])
    }

    pub fn bearer_auth(&mut self, token: &str) -> &mut Self {
        self.set_header("Authorization", [Auth::bearer_token(token)])
    }

    /// Encode the body as it would be sent, without sending
    pub fn encode_body(&self) -> Result<EncodedBody> {
        BodySource {
            body: &self.body,
            is_json: self.is_json,
            files: &self.files,
            form_params: &self.form_params,
        }
        .encode()
    }

    /// Encode, send through the owning session and wait for the response
    pub fn send(&self) -> Result<Response> {
        let encoded = self.encode_body()?;
        self.dispatch(encoded.content_type.as_deref(), encoded.payload)
    }

    /// Send an already-encoded payload, bypassing body selection.
    ///
    /// No Content-Type is added for the payload.
    pub fn send_raw(&self, payload: impl Into<Vec<u8>>) -> Result<Response> {
        self.dispatch(None, payload.into())
    }

    fn dispatch(&self, content_type: Option<&str>, payload: Vec<u8>) -> Result<Response> {
        let url_path = self.url_path();
        let url = Url::parse(&url_path)
            .map_err(|e| RequestsError::InvalidUrl(format!("Invalid URL '{}': {}", url_path, e)))?;
        let headers = HeaderUtils::build(&self.headers, content_type, self.session.user_agent())?;
        self.session.execute(self.method, url, headers, payload)
    }
}
