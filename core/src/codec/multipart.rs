/*
 * multipart.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Staffetta, a format-agnostic request/response layer.
 *
 * Staffetta is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Staffetta is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Staffetta.  If not, see <http://www.gnu.org/licenses/>.
 */

//! multipart/form-data request encoding. The bound body must be an object;
//! each top-level field becomes one boundary-delimited part. Nested
//! objects and arrays are rejected rather than guessed at. There is no
//! multipart response decoder; multipart responses are never decoded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use serde_json::Value;

use crate::codec::{charset, RequestEncoder};
use crate::error::EncodeError;

/// Distinguishes boundaries generated within the same second.
static BOUNDARY_SEQ: AtomicU64 = AtomicU64::new(0);

fn generate_boundary() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!(
        "_part_{}_{}_{}",
        std::process::id(),
        secs,
        BOUNDARY_SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

/// Builds a multipart boundary-delimited body from the bound object's
/// fields. The boundary is fixed per encoder instance so `content_type`
/// and `produce_body` agree.
pub struct MultipartEncoder {
    boundary: String,
    body: Option<Value>,
}

impl MultipartEncoder {
    pub fn new() -> Self {
        Self {
            boundary: generate_boundary(),
            body: None,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }
}

impl Default for MultipartEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestEncoder for MultipartEncoder {
    fn bind(&mut self, body: Value) {
        self.body = Some(body);
    }

    fn produce_body(&self, charset_name: Option<&str>) -> Result<Bytes, EncodeError> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| EncodeError::serialize("no body object bound"))?;
        let Value::Object(fields) = body else {
            return Err(EncodeError::serialize(
                "multipart body must be an object of fields",
            ));
        };
        let mut out: Vec<u8> = Vec::new();
        for (name, value) in fields {
            let text = field_text(value)?;
            let encoded = charset::encode(&text, charset_name)?;
            out.extend_from_slice(b"--");
            out.extend_from_slice(self.boundary.as_bytes());
            out.extend_from_slice(b"\r\n");
            out.extend_from_slice(b"Content-Disposition: form-data; name=\"");
            out.extend_from_slice(escape_name(name).as_bytes());
            out.extend_from_slice(b"\"\r\n\r\n");
            out.extend_from_slice(&encoded);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"--");
        out.extend_from_slice(self.boundary.as_bytes());
        out.extend_from_slice(b"--\r\n");
        Ok(Bytes::from(out))
    }

    fn content_type(&self, charset_name: Option<&str>) -> String {
        format!(
            "multipart/form-data; boundary={}; charset={}",
            self.boundary,
            charset_name.unwrap_or(charset::DEFAULT_CHARSET)
        )
    }
}

fn field_text(value: &Value) -> Result<String, EncodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(EncodeError::serialize(
            "multipart fields must be scalar values",
        )),
    }
}

fn escape_name(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_boundary_delimited_parts() {
        let mut encoder = MultipartEncoder::new();
        encoder.bind(json!({"title": "hello", "count": 3}));
        let bytes = encoder.produce_body(None).unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let boundary = encoder.boundary().to_string();
        assert!(text.contains(&format!("--{}\r\n", boundary)));
        assert!(text.contains("Content-Disposition: form-data; name=\"title\"\r\n\r\nhello\r\n"));
        assert!(text.contains("Content-Disposition: form-data; name=\"count\"\r\n\r\n3\r\n"));
        assert!(text.ends_with(&format!("--{}--\r\n", boundary)));
    }

    #[test]
    fn content_type_names_the_same_boundary() {
        let encoder = MultipartEncoder::new();
        let content_type = encoder.content_type(None);
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert!(content_type.contains(encoder.boundary()));
    }

    #[test]
    fn boundaries_are_unique_per_encoder() {
        assert_ne!(MultipartEncoder::new().boundary, MultipartEncoder::new().boundary);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let mut encoder = MultipartEncoder::new();
        encoder.bind(json!(["a", "b"]));
        assert!(matches!(
            encoder.produce_body(None),
            Err(EncodeError::Serialize(_))
        ));
    }

    #[test]
    fn nested_field_is_rejected() {
        let mut encoder = MultipartEncoder::new();
        encoder.bind(json!({"nested": {"a": 1}}));
        assert!(matches!(
            encoder.produce_body(None),
            Err(EncodeError::Serialize(_))
        ));
    }
}
