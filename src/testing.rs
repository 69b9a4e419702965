//! In-memory transport for unit tests

use std::sync::{Arc, Mutex};

use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
use reqwest::StatusCode;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::http::{Response, Transport, WireRequest};
use crate::session::Session;

/// Records every request and answers 200 with the configured Set-Cookie values
#[derive(Clone, Default)]
pub(crate) struct RecordingTransport {
    pub requests: Arc<Mutex<Vec<WireRequest>>>,
    pub set_cookies: Vec<&'static str>,
}

impl RecordingTransport {
    pub fn session(&self, config: SessionConfig) -> Session {
        Session::with_transport(config, self.clone())
    }

    pub fn sent(&self) -> Vec<WireRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn last(&self) -> WireRequest {
        self.sent().pop().expect("a request was sent")
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: WireRequest) -> Result<Response> {
        let mut headers = HeaderMap::new();
        for cookie in self.set_cookies.iter().copied() {
            headers.append(SET_COOKIE, HeaderValue::from_static(cookie));
        }
        let url = request.url.clone();
        self.requests.lock().expect("requests lock").push(request);
        Ok(Response::new(url, StatusCode::OK, headers, b"ok".to_vec()))
    }
}
