//! Sessions: a transport, a cookie store and cookie overrides shared by the
//! requests created from them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use url::Url;

use crate::config::{Method, SessionConfig};
use crate::error::{Result, RequestsError};
use crate::http::request::Request;
use crate::http::{ReqwestTransport, Response, Transport, WireRequest};
use crate::utils::CookieUtils;

/// A reusable binding of a transport, a cookie store and default headers.
///
/// Cloning is cheap and clones share all state. Sessions are `Send + Sync`:
/// cookie overrides are guarded by a mutex and the cookie store synchronizes
/// internally, but the merge steps of concurrent sends may interleave.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    transport: Arc<dyn Transport>,
    cookie_store: Option<Arc<Jar>>,
    cookie_overrides: Mutex<BTreeMap<String, String>>,
    config: SessionConfig,
}

impl Session {
    /// Create a session with a cookie store and default settings
    pub fn new() -> Result<Self> {
        Self::with_config(SessionConfig::default())
    }

    /// Create a session without a cookie store, for one-off calls
    pub fn stateless() -> Result<Self> {
        Self::with_config(SessionConfig::stateless())
    }

    pub fn with_config(config: SessionConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create a session that sends through a custom transport
    pub fn with_transport(config: SessionConfig, transport: impl Transport + 'static) -> Self {
        let cookie_store = config.cookie_store.then(|| Arc::new(Jar::default()));
        Self {
            inner: Arc::new(SessionInner {
                transport: Arc::new(transport),
                cookie_store,
                cookie_overrides: Mutex::new(BTreeMap::new()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn user_agent(&self) -> &str {
        &self.inner.config.user_agent
    }

    /// The persistent cookie store, if this session keeps one
    pub fn cookie_store(&self) -> Option<Arc<Jar>> {
        self.inner.cookie_store.clone()
    }

    /// Add cookie overrides; a later value for the same name wins.
    ///
    /// Overrides only fill in names the cookie store does not already hold
    /// for the request URL.
    pub fn set_cookies<I, K, V>(&self, cookies: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut overrides = self.overrides();
        for (name, value) in cookies {
            overrides.insert(name.into(), value.into());
        }
        self
    }

    /// Copy of the cookie overrides
    pub fn cookies(&self) -> BTreeMap<String, String> {
        self.overrides().clone()
    }

    /// Create a request after checking `method` against the supported set
    pub fn method(&self, method: &str, url: &str) -> Result<Request> {
        let method = method.parse::<Method>()?;
        self.request(method, url)
    }

    pub fn request(&self, method: Method, url: &str) -> Result<Request> {
        Request::new(self.clone(), method, url)
    }

    pub fn get(&self, url: &str) -> Result<Request> {
        self.request(Method::Get, url)
    }

    pub fn post(&self, url: &str) -> Result<Request> {
        self.request(Method::Post, url)
    }

    pub fn put(&self, url: &str) -> Result<Request> {
        self.request(Method::Put, url)
    }

    pub fn delete(&self, url: &str) -> Result<Request> {
        self.request(Method::Delete, url)
    }

    pub fn head(&self, url: &str) -> Result<Request> {
        self.request(Method::Head, url)
    }

    pub fn options(&self, url: &str) -> Result<Request> {
        self.request(Method::Options, url)
    }

    pub fn patch(&self, url: &str) -> Result<Request> {
        self.request(Method::Patch, url)
    }

    /// Merge cookies, attach them and hand the request to the transport.
    pub(crate) fn execute(
        &self,
        method: Method,
        url: Url,
        mut headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<Response> {
        if let Some(store) = &self.inner.cookie_store {
            let stored = stored_cookies(store, &url)?;
            let pending = self.pending_overrides(stored.as_deref(), &url);
            // The header is built before the store is touched, so a failure leaves it unchanged.
            let cookie = cookie_header(&headers, stored.as_deref(), &pending)?;
            persist_overrides(store, &url, &pending);
            if let Some(cookie) = cookie {
                headers.insert(COOKIE, cookie);
            }
        }

        log::debug!("{} {}", method, url);
        let response = self.inner.transport.send(WireRequest {
            method,
            url: url.clone(),
            headers,
            body,
        })?;
        log::debug!("{} {} -> {}", method, url, response.status());

        if let Some(store) = &self.inner.cookie_store {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
            store.set_cookies(&mut set_cookies, &url);
        }
        Ok(response)
    }

    /// Add every override whose name the store does not yet hold for `url`.
    pub(crate) fn merge_cookies(&self, store: &Jar, url: &Url) -> Result<()> {
        let stored = stored_cookies(store, url)?;
        let pending = self.pending_overrides(stored.as_deref(), url);
        persist_overrides(store, url, &pending);
        Ok(())
    }

    fn pending_overrides(&self, stored: Option<&str>, url: &Url) -> Vec<(String, String)> {
        let existing_names = stored.map(CookieUtils::names).unwrap_or_default();
        self.overrides()
            .iter()
            .filter(|(name, _)| {
                let known = existing_names.contains(&name.as_str());
                if known {
                    log::trace!("cookie '{}' already stored for {}, keeping it", name, url);
                }
                !known
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn overrides(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.inner
            .cookie_overrides
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn stored_cookies(store: &Jar, url: &Url) -> Result<Option<String>> {
    store
        .cookies(url)
        .map(|value| {
            value
                .to_str()
                .map(str::to_string)
                .map_err(|e| RequestsError::InvalidHeader(format!("stored Cookie: {}", e)))
        })
        .transpose()
}

fn persist_overrides(store: &Jar, url: &Url, pending: &[(String, String)]) {
    for (name, value) in pending {
        log::trace!("adding session cookie '{}' for {}", name, url);
        store.add_cookie_str(&format!("{}={}", name, value), url);
    }
}

// Every caller-set Cookie value comes first, then stored cookies, then new overrides.
fn cookie_header(
    headers: &HeaderMap,
    stored: Option<&str>,
    pending: &[(String, String)],
) -> Result<Option<HeaderValue>> {
    let mut parts = Vec::new();
    for value in headers.get_all(COOKIE) {
        let value = value
            .to_str()
            .map_err(|e| RequestsError::InvalidHeader(format!("Cookie: {}", e)))?;
        parts.push(value.to_string());
    }
    parts.extend(stored.map(str::to_string));
    parts.extend(pending.iter().map(|(name, value)| format!("{}={}", name, value)));

    if parts.is_empty() {
        return Ok(None);
    }
    HeaderValue::from_str(&parts.join("; "))
        .map(Some)
        .map_err(|e| RequestsError::InvalidHeader(format!("Cookie: {}", e)))
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cookie_store", &self.inner.cookie_store.is_some())
            .field("cookie_overrides", &self.cookies())
            .field("user_agent", &self.user_agent())
            .finish()
    }
}
