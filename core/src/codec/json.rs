/*
 * json.rs
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

//! JSON codec. Also serves JSON-HAL requests, which encode as plain JSON
//! under the HAL media type.

use bytes::Bytes;
use serde_json::Value;

use crate::codec::{charset, check_specifier, RequestEncoder, ResponseDecoder, ResponseSpecifier};
use crate::error::{DecodeError, EncodeError};
use crate::format::ResponseFormat;
use crate::request::response::DecodedBody;

/// Serializes the bound body value to a JSON byte body.
pub struct JsonEncoder {
    media_type: &'static str,
    body: Option<Value>,
}

impl JsonEncoder {
    pub fn new(media_type: &'static str) -> Self {
        Self {
            media_type,
            body: None,
        }
    }
}

impl RequestEncoder for JsonEncoder {
    fn bind(&mut self, body: Value) {
        self.body = Some(body);
    }

    fn produce_body(&self, charset_name: Option<&str>) -> Result<Bytes, EncodeError> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| EncodeError::serialize("no body object bound"))?;
        let text = serde_json::to_string(body).map_err(|e| EncodeError::serialize(e.to_string()))?;
        charset::encode(&text, charset_name)
    }

    fn content_type(&self, charset_name: Option<&str>) -> String {
        format!(
            "{}; charset={}",
            self.media_type,
            charset_name.unwrap_or(charset::DEFAULT_CHARSET)
        )
    }
}

/// Parses a JSON response body into a value tree.
pub struct JsonDecoder {
    accept: String,
}

impl JsonDecoder {
    pub fn new(accept: String) -> Self {
        Self { accept }
    }
}

impl ResponseDecoder for JsonDecoder {
    fn accept_header_value(&self) -> &str {
        &self.accept
    }

    fn decode(
        &self,
        raw: &str,
        specifier: Option<ResponseSpecifier>,
    ) -> Result<Option<DecodedBody>, DecodeError> {
        let Some(specifier) = specifier else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| DecodeError::malformed(ResponseFormat::Json, e.to_string()))?;
        check_specifier(&value, specifier)?;
        Ok(Some(DecodedBody::Value(value)))
    }
}
