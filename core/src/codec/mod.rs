/*
 * mod.rs
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

//! Codec layer: per-format request encoders and response decoders behind two
//! capability traits, selected through a registry keyed on the format enums.
//! Strategies are created per request and share no mutable state; the only
//! injected configuration is the Accept media-type table.

pub mod charset;

mod hal;
mod json;
mod multipart;
mod text;
mod xml;

pub use hal::HalDecoder;
pub use json::{JsonDecoder, JsonEncoder};
pub use multipart::MultipartEncoder;
pub use text::{TextDecoder, TextEncoder};
pub use xml::{XmlDecoder, XmlEncoder};

use std::collections::HashMap;

use bytes::Bytes;
use serde_json::Value;

use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::format::{MediaTypes, RequestFormat, ResponseFormat};
use crate::request::response::DecodedBody;

/// Target shape for decoded response data. Absent on the descriptor means
/// no structured decode is requested (text passthrough still decodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSpecifier {
    /// Whatever the document holds.
    Any,
    /// Top level must be an object.
    Object,
    /// Top level must be an array.
    Array,
}

/// Produces the request body for one format. Bound to the descriptor's body
/// object; one instance per request.
pub trait RequestEncoder: Send + Sync {
    /// Capture the structured body value to encode.
    fn bind(&mut self, body: Value);

    /// Render the bound body as wire bytes in the given charset.
    fn produce_body(&self, charset: Option<&str>) -> Result<Bytes, EncodeError>;

    /// Content-Type header value: format media type plus charset suffix.
    fn content_type(&self, charset: Option<&str>) -> String;
}

/// Decodes the response body for one format.
pub trait ResponseDecoder: Send + Sync {
    /// Media type to advertise in the Accept header.
    fn accept_header_value(&self) -> &str;

    /// Decode the raw body text. `Ok(None)` when the format only decodes on
    /// request and no specifier was supplied.
    fn decode(
        &self,
        raw: &str,
        specifier: Option<ResponseSpecifier>,
    ) -> Result<Option<DecodedBody>, DecodeError>;
}

type EncoderFactory = Box<dyn Fn() -> Box<dyn RequestEncoder> + Send + Sync>;
type DecoderFactory = Box<dyn Fn(&MediaTypes) -> Box<dyn ResponseDecoder> + Send + Sync>;

/// Encoder/decoder factories keyed by format, plus the immutable media-type
/// table handed to decoders at creation. `with_defaults` covers every
/// format; a custom registry with a gap fails fast at descriptor
/// construction with a `ConfigError`.
pub struct CodecRegistry {
    media_types: MediaTypes,
    encoders: HashMap<RequestFormat, EncoderFactory>,
    decoders: HashMap<ResponseFormat, DecoderFactory>,
}

impl CodecRegistry {
    /// Registry with the standard codec set and default media types.
    pub fn with_defaults() -> Self {
        Self::with_media_types(MediaTypes::default())
    }

    /// Registry with the standard codec set and a custom media-type table.
    pub fn with_media_types(media_types: MediaTypes) -> Self {
        let mut registry = Self::empty(media_types);
        registry.register_encoder(RequestFormat::Json, || {
            Box::new(JsonEncoder::new("application/json"))
        });
        registry.register_encoder(RequestFormat::JsonHal, || {
            Box::new(JsonEncoder::new("application/hal+json"))
        });
        registry.register_encoder(RequestFormat::Xml, || Box::new(XmlEncoder::new()));
        registry.register_encoder(RequestFormat::Text, || Box::new(TextEncoder::new()));
        registry.register_encoder(RequestFormat::Multipart, || {
            Box::new(MultipartEncoder::new())
        });
        registry.register_decoder(ResponseFormat::Json, |table| {
            Box::new(JsonDecoder::new(table.json.clone()))
        });
        registry.register_decoder(ResponseFormat::JsonHal, |table| {
            Box::new(HalDecoder::new(table.hal.clone()))
        });
        registry.register_decoder(ResponseFormat::Xml, |table| {
            Box::new(XmlDecoder::new(table.xml.clone()))
        });
        registry.register_decoder(ResponseFormat::Text, |table| {
            Box::new(TextDecoder::new(table.text.clone()))
        });
        registry
    }

    /// Registry with no codecs registered. Useful as a base for callers
    /// replacing the whole set.
    pub fn empty(media_types: MediaTypes) -> Self {
        Self {
            media_types,
            encoders: HashMap::new(),
            decoders: HashMap::new(),
        }
    }

    pub fn register_encoder(
        &mut self,
        format: RequestFormat,
        factory: impl Fn() -> Box<dyn RequestEncoder> + Send + Sync + 'static,
    ) {
        self.encoders.insert(format, Box::new(factory));
    }

    pub fn register_decoder(
        &mut self,
        format: ResponseFormat,
        factory: impl Fn(&MediaTypes) -> Box<dyn ResponseDecoder> + Send + Sync + 'static,
    ) {
        self.decoders.insert(format, Box::new(factory));
    }

    /// Create the request encoder for a format.
    pub fn request_encoder(
        &self,
        format: RequestFormat,
    ) -> Result<Box<dyn RequestEncoder>, ConfigError> {
        match self.encoders.get(&format) {
            Some(factory) => Ok(factory()),
            None => Err(ConfigError::MissingEncoder(format)),
        }
    }

    /// Create the response decoder for a format.
    pub fn response_decoder(
        &self,
        format: ResponseFormat,
    ) -> Result<Box<dyn ResponseDecoder>, ConfigError> {
        match self.decoders.get(&format) {
            Some(factory) => Ok(factory(&self.media_types)),
            None => Err(ConfigError::MissingDecoder(format)),
        }
    }

    pub fn media_types(&self) -> &MediaTypes {
        &self.media_types
    }
}

/// Shape check shared by the structured decoders.
fn check_specifier(value: &Value, specifier: ResponseSpecifier) -> Result<(), DecodeError> {
    let found = value_kind(value);
    match specifier {
        ResponseSpecifier::Any => Ok(()),
        ResponseSpecifier::Object if value.is_object() => Ok(()),
        ResponseSpecifier::Object => Err(DecodeError::UnexpectedShape {
            expected: "object",
            found,
        }),
        ResponseSpecifier::Array if value.is_array() => Ok(()),
        ResponseSpecifier::Array => Err(DecodeError::UnexpectedShape {
            expected: "array",
            found,
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_format() {
        let registry = CodecRegistry::with_defaults();
        for format in [
            RequestFormat::Json,
            RequestFormat::Xml,
            RequestFormat::JsonHal,
            RequestFormat::Text,
            RequestFormat::Multipart,
        ] {
            assert!(registry.request_encoder(format).is_ok(), "{:?}", format);
        }
        for format in [
            ResponseFormat::Json,
            ResponseFormat::Xml,
            ResponseFormat::JsonHal,
            ResponseFormat::Text,
        ] {
            assert!(registry.response_decoder(format).is_ok(), "{:?}", format);
        }
    }

    #[test]
    fn empty_registry_reports_missing_codecs() {
        let registry = CodecRegistry::empty(MediaTypes::default());
        assert_eq!(
            registry.request_encoder(RequestFormat::Json).err(),
            Some(ConfigError::MissingEncoder(RequestFormat::Json))
        );
        assert_eq!(
            registry.response_decoder(ResponseFormat::Xml).err(),
            Some(ConfigError::MissingDecoder(ResponseFormat::Xml))
        );
    }

    #[test]
    fn decoders_take_accept_values_from_the_table() {
        let mut table = MediaTypes::default();
        table.json = "application/vnd.example+json".to_string();
        let registry = CodecRegistry::with_media_types(table);
        let decoder = registry.response_decoder(ResponseFormat::Json).unwrap();
        assert_eq!(decoder.accept_header_value(), "application/vnd.example+json");
    }
}
