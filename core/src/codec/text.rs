/*
 * text.rs
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

//! Plain-text codec. Decoding is unconditional passthrough; a specifier is
//! not required and not checked against the text.

use bytes::Bytes;
use serde_json::Value;

use crate::codec::{charset, RequestEncoder, ResponseDecoder, ResponseSpecifier};
use crate::error::{DecodeError, EncodeError};
use crate::request::response::DecodedBody;

/// Sends the bound value as its text form: strings as-is, anything else in
/// JSON text form.
pub struct TextEncoder {
    body: Option<Value>,
}

impl TextEncoder {
    pub fn new() -> Self {
        Self { body: None }
    }
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestEncoder for TextEncoder {
    fn bind(&mut self, body: Value) {
        self.body = Some(body);
    }

    fn produce_body(&self, charset_name: Option<&str>) -> Result<Bytes, EncodeError> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| EncodeError::serialize("no body object bound"))?;
        let text = match body {
            Value::String(s) => s.clone(),
            other => serde_json::to_string(other)
                .map_err(|e| EncodeError::serialize(e.to_string()))?,
        };
        charset::encode(&text, charset_name)
    }

    fn content_type(&self, charset_name: Option<&str>) -> String {
        format!(
            "text/plain; charset={}",
            charset_name.unwrap_or(charset::DEFAULT_CHARSET)
        )
    }
}

/// Passes the response body through unchanged.
pub struct TextDecoder {
    accept: String,
}

impl TextDecoder {
    pub fn new(accept: String) -> Self {
        Self { accept }
    }
}

impl ResponseDecoder for TextDecoder {
    fn accept_header_value(&self) -> &str {
        &self.accept
    }

    fn decode(
        &self,
        raw: &str,
        _specifier: Option<ResponseSpecifier>,
    ) -> Result<Option<DecodedBody>, DecodeError> {
        Ok(Some(DecodedBody::Text(raw.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_body_passes_through() {
        let mut encoder = TextEncoder::new();
        encoder.bind(json!("ciao"));
        let bytes = encoder.produce_body(None).unwrap();
        assert_eq!(bytes.as_ref(), b"ciao");
    }

    #[test]
    fn non_string_body_encodes_as_json_text() {
        let mut encoder = TextEncoder::new();
        encoder.bind(json!({"a": 1}));
        let bytes = encoder.produce_body(None).unwrap();
        assert_eq!(bytes.as_ref(), br#"{"a":1}"#);
    }

    #[test]
    fn decodes_without_a_specifier() {
        let decoder = TextDecoder::new("text/plain".to_string());
        assert_eq!(
            decoder.decode("hello", None).unwrap(),
            Some(DecodedBody::Text("hello".to_string()))
        );
    }
}
