//! One-off requests without a cookie store
//!
//! Each function builds a fresh stateless [`Session`] with default settings;
//! nothing is shared between calls. Use a [`Session`] directly to keep
//! cookies or reuse connections.

use crate::config::Method;
use crate::error::Result;
use crate::http::request::Request;
use crate::session::Session;

/// Create a request after checking `method` against the supported set
pub fn method(method: &str, url: &str) -> Result<Request> {
    let method = method.parse::<Method>()?;
    request(method, url)
}

pub fn request(method: Method, url: &str) -> Result<Request> {
    Session::stateless()?.request(method, url)
}

pub fn get(url: &str) -> Result<Request> {
    request(Method::Get, url)
}

pub fn post(url: &str) -> Result<Request> {
    request(Method::Post, url)
}

pub fn put(url: &str) -> Result<Request> {
    request(Method::Put, url)
}

pub fn delete(url: &str) -> Result<Request> {
    request(Method::Delete, url)
}

pub fn head(url: &str) -> Result<Request> {
    request(Method::Head, url)
}

pub fn options(url: &str) -> Result<Request> {
    request(Method::Options, url)
}

pub fn patch(url: &str) -> Result<Request> {
    request(Method::Patch, url)
}
