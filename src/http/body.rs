//! Request body encoding
//!
//! Exactly one body source is encoded per send, picked in this order:
//! an explicit body (JSON or raw), attached files (multipart), then form
//! params (urlencoded). The request method never changes the choice.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::http::multipart::MultipartWriter;
use crate::utils::{ParamUtils, Params};

pub const APPLICATION_JSON: &str = "application/json";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A file attached to a multipart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFile {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Wire payload plus the Content-Type it requires, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: Option<String>,
    pub payload: Vec<u8>,
}

/// Borrowed view of the body-related request state
pub struct BodySource<'a> {
    pub body: &'a [u8],
    pub is_json: bool,
    pub files: &'a BTreeMap<String, FormFile>,
    pub form_params: &'a Params,
}

impl BodySource<'_> {
    pub fn encode(&self) -> Result<EncodedBody> {
        if !self.body.is_empty() {
            return Ok(EncodedBody {
                content_type: self.is_json.then(|| APPLICATION_JSON.to_string()),
                payload: self.body.to_vec(),
            });
        }

        if !self.files.is_empty() {
            return self.encode_multipart();
        }

        Ok(EncodedBody {
            content_type: Some(FORM_URLENCODED.to_string()),
            payload: ParamUtils::encode(self.form_params).into_bytes(),
        })
    }

    fn encode_multipart(&self) -> Result<EncodedBody> {
        let mut writer = MultipartWriter::new();
        for (name, values) in self.form_params {
            // Only the first value of each form field is sent.
            if let Some(first) = values.first() {
                writer.write_field(name, first)?;
            }
        }
        for (name, file) in self.files {
            writer.write_file(name, &file.filename, &file.content)?;
        }

        let content_type = writer.content_type();
        let payload = writer.finish()?;
        log::trace!(
            "encoded multipart body with {} field(s) and {} file(s)",
            self.form_params.len(),
            self.files.len()
        );
        Ok(EncodedBody {
            content_type: Some(content_type),
            payload,
        })
    }
}
