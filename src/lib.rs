//! requests - fluent HTTP requests with cookie-aware sessions
//!
//! This crate accumulates a request's headers, params, files and body through
//! chained mutators, encodes them into a single HTTP request and sends it
//! through a blocking transport.
//!
//! ```no_run
//! use requests::Session;
//!
//! # fn main() -> requests::Result<()> {
//! let session = Session::new()?;
//! session.set_cookies([("theme", "dark")]);
//!
//! let response = session
//!     .post("example.com/upload")?
//!     .set_form_param("title", ["notes"])
//!     .add_file("file", "notes.txt", b"hello".to_vec())
//!     .send()?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod session;
pub mod ssl;
pub mod utils;

#[cfg(test)]
mod testing;

pub use api::{delete, get, head, method, options, patch, post, put, request};
pub use config::{Method, SessionConfig};
pub use error::{RequestsError, Result};
pub use http::request::Request;
pub use http::{Response, Transport, WireRequest};
pub use session::Session;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
