//! multipart/form-data writer

use crate::error::{Result, RequestsError};
use std::io::Write;

/// Writes text fields and file parts into an in-memory multipart body
pub struct MultipartWriter {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartWriter {
    /// Create a writer with a freshly generated random boundary
    pub fn new() -> Self {
        let form = reqwest::multipart::Form::new();
        Self::with_boundary(form.boundary())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's Content-Type header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn write_field(&mut self, name: &str, value: &str) -> Result<()> {
        let disposition = format!("form-data; name=\"{}\"", Self::escape(name)?);
        self.write_part(&disposition, None, value.as_bytes())
    }

    pub fn write_file(&mut self, name: &str, filename: &str, data: &[u8]) -> Result<()> {
        let disposition = format!(
            "form-data; name=\"{}\"; filename=\"{}\"",
            Self::escape(name)?,
            Self::escape(filename)?
        );
        self.write_part(&disposition, Some("application/octet-stream"), data)
    }

    /// Write the closing boundary and return the encoded body
    pub fn finish(mut self) -> Result<Vec<u8>> {
        write!(self.buf, "--{}--\r\n", self.boundary).map_err(Self::io_error)?;
        Ok(self.buf)
    }

    fn write_part(&mut self, disposition: &str, content_type: Option<&str>, data: &[u8]) -> Result<()> {
        write!(
            self.buf,
            "--{}\r\nContent-Disposition: {}\r\n",
            self.boundary, disposition
        )
        .map_err(Self::io_error)?;
        if let Some(content_type) = content_type {
            write!(self.buf, "Content-Type: {}\r\n", content_type).map_err(Self::io_error)?;
        }
        self.buf.write_all(b"\r\n").map_err(Self::io_error)?;
        self.buf.write_all(data).map_err(Self::io_error)?;
        self.buf.write_all(b"\r\n").map_err(Self::io_error)
    }

    // CR/LF would end the part header early; quotes and backslashes are escaped.
    fn escape(value: &str) -> Result<String> {
        if value.contains(['\r', '\n']) {
            return Err(RequestsError::Encoding(format!(
                "line break in multipart header value {:?}",
                value
            )));
        }
        Ok(value.replace('\\', "\\\\").replace('"', "\\\""))
    }

    fn io_error(err: std::io::Error) -> RequestsError {
        RequestsError::Encoding(format!("failed to write multipart body: {}", err))
    }
}

impl Default for MultipartWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::MultipartWriter;
    use crate::error::RequestsError;

    #[test]
    fn writes_fields_and_files() {
        let mut writer = MultipartWriter::with_boundary("XYZ");
        writer.write_field("name", "value").expect("field");
        writer.write_file("upload", "a.txt", b"hello").expect("file");
        assert_eq!(writer.content_type(), "multipart/form-data; boundary=XYZ");

        let body = String::from_utf8(writer.finish().expect("finish")).expect("utf8");
        assert_eq!(
            body,
            "--XYZ\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nvalue\r\n\
             --XYZ\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\
             Content-Type: application/octet-stream\r\n\r\nhello\r\n\
             --XYZ--\r\n"
        );
    }

    #[test]
    fn escapes_quotes_in_names() {
        let mut writer = MultipartWriter::with_boundary("B");
        writer.write_file("f", "say \"hi\".txt", b"x").expect("file");
        let body = String::from_utf8(writer.finish().expect("finish")).expect("utf8");
        assert!(body.contains("filename=\"say \\\"hi\\\".txt\""));
    }

    #[test]
    fn rejects_line_breaks() {
        let mut writer = MultipartWriter::with_boundary("B");
        let err = writer
            .write_field("bad\r\nX-Injected: 1", "v")
            .expect_err("line break");
        assert!(matches!(err, RequestsError::Encoding(_)));
    }

    #[test]
    fn generated_boundaries_differ() {
        let first = MultipartWriter::new();
        let second = MultipartWriter::new();
        assert!(!first.boundary().is_empty());
        assert_ne!(first.boundary(), second.boundary());
    }
}
