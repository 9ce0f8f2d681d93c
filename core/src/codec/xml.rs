/*
 * xml.rs
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

//! XML codec over the quick_xml event API; no regex or hand parsing.
//!
//! Mapping between XML and the value tree: attributes become `"@name"`
//! entries, child elements become entries by element name (repeats collect
//! into an array), text in an element that also has attributes or children
//! goes under `"$text"`, and an element with neither becomes a plain
//! string. Requests are encoded under a `<request>` document element by
//! inverting the same mapping.

use bytes::Bytes;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use serde_json::{Map, Value};

use crate::codec::{charset, check_specifier, RequestEncoder, ResponseDecoder, ResponseSpecifier};
use crate::error::{DecodeError, EncodeError};
use crate::format::ResponseFormat;
use crate::request::response::DecodedBody;

const ROOT_ELEMENT: &str = "request";

/// Serializes the bound body value to an XML byte body.
pub struct XmlEncoder {
    body: Option<Value>,
}

impl XmlEncoder {
    pub fn new() -> Self {
        Self { body: None }
    }
}

impl Default for XmlEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestEncoder for XmlEncoder {
    fn bind(&mut self, body: Value) {
        self.body = Some(body);
    }

    fn produce_body(&self, charset_name: Option<&str>) -> Result<Bytes, EncodeError> {
        let body = self
            .body
            .as_ref()
            .ok_or_else(|| EncodeError::serialize("no body object bound"))?;
        let name = charset_name.unwrap_or(charset::DEFAULT_CHARSET);
        if !charset::is_supported(name) {
            return Err(EncodeError::UnsupportedCharset(name.to_string()));
        }
        let mut out = Vec::new();
        let mut writer = Writer::new(&mut out);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some(name), None)))
            .map_err(|e| EncodeError::serialize(e.to_string()))?;
        write_element(&mut writer, ROOT_ELEMENT, body)?;
        let text =
            String::from_utf8(out).map_err(|e| EncodeError::serialize(e.to_string()))?;
        charset::encode(&text, charset_name)
    }

    fn content_type(&self, charset_name: Option<&str>) -> String {
        format!(
            "application/xml; charset={}",
            charset_name.unwrap_or(charset::DEFAULT_CHARSET)
        )
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> Result<(), EncodeError> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            let mut start = BytesStart::new(name);
            for (key, attr_value) in map {
                if let Some(attr_name) = key.strip_prefix('@') {
                    start.push_attribute((attr_name, scalar_text(attr_value)?.as_str()));
                }
            }
            writer
                .write_event(Event::Start(start))
                .map_err(|e| EncodeError::serialize(e.to_string()))?;
            for (key, child) in map {
                if key == "$text" {
                    writer
                        .write_event(Event::Text(BytesText::new(&scalar_text(child)?)))
                        .map_err(|e| EncodeError::serialize(e.to_string()))?;
                } else if !key.starts_with('@') {
                    write_element(writer, key, child)?;
                }
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| EncodeError::serialize(e.to_string()))
        }
        Value::Null => writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(|e| EncodeError::serialize(e.to_string())),
        scalar => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(|e| EncodeError::serialize(e.to_string()))?;
            writer
                .write_event(Event::Text(BytesText::new(&scalar_text(scalar)?)))
                .map_err(|e| EncodeError::serialize(e.to_string()))?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(|e| EncodeError::serialize(e.to_string()))
        }
    }
}

/// Text form of a scalar value. Arrays and objects have no scalar text.
fn scalar_text(value: &Value) -> Result<String, EncodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(EncodeError::serialize(
            "attribute and text values must be scalar",
        )),
    }
}

/// Parses an XML response body into a value tree (see the module doc for
/// the mapping). The decoded value is the document element's content.
pub struct XmlDecoder {
    accept: String,
}

impl XmlDecoder {
    pub fn new(accept: String) -> Self {
        Self { accept }
    }
}

impl ResponseDecoder for XmlDecoder {
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
        let value = xml_to_value(raw)?;
        check_specifier(&value, specifier)?;
        Ok(Some(DecodedBody::Value(value)))
    }
}

struct Frame {
    attrs: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(attrs: Map<String, Value>) -> Self {
        Self {
            attrs,
            children: Map::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> Value {
        if self.attrs.is_empty() && self.children.is_empty() {
            return Value::String(self.text);
        }
        let mut map = self.attrs;
        for (key, value) in self.children {
            map.insert(key, value);
        }
        if !self.text.is_empty() {
            map.insert("$text".to_string(), Value::String(self.text));
        }
        Value::Object(map)
    }
}

/// Insert a child value; a repeated element name collects into an array.
fn attach_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

fn attributes_of(start: &BytesStart<'_>) -> Result<Map<String, Value>, DecodeError> {
    let mut attrs = Map::new();
    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| DecodeError::malformed(ResponseFormat::Xml, e.to_string()))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DecodeError::malformed(ResponseFormat::Xml, e.to_string()))?
            .into_owned();
        attrs.insert(format!("@{}", name), Value::String(value));
    }
    Ok(attrs)
}

fn xml_to_value(raw: &str) -> Result<Value, DecodeError> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    // (element name, frame) for each open element; the root closes into `document`.
    let mut stack: Vec<(String, Frame)> = Vec::new();
    let mut document: Option<Value> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Err(e) => return Err(DecodeError::malformed(ResponseFormat::Xml, e.to_string())),
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attrs = attributes_of(&e)?;
                stack.push((name, Frame::new(attrs)));
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let value = Frame::new(attributes_of(&e)?).into_value();
                match stack.last_mut() {
                    Some((_, parent)) => attach_child(&mut parent.children, name, value),
                    None => document = Some(value),
                }
            }
            Ok(Event::Text(e)) => {
                if let Some((_, frame)) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| {
                            DecodeError::malformed(ResponseFormat::Xml, err.to_string())
                        })?;
                    frame.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some((_, frame)) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                let Some((name, frame)) = stack.pop() else {
                    return Err(DecodeError::malformed(
                        ResponseFormat::Xml,
                        "unbalanced end tag",
                    ));
                };
                let value = frame.into_value();
                match stack.last_mut() {
                    Some((_, parent)) => attach_child(&mut parent.children, name, value),
                    None => document = Some(value),
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(DecodeError::malformed(
            ResponseFormat::Xml,
            "unclosed element",
        ));
    }
    document.ok_or_else(|| DecodeError::malformed(ResponseFormat::Xml, "no document element"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_object_under_request_root() {
        let mut encoder = XmlEncoder::new();
        encoder.bind(json!({"name": "aldo", "age": 7}));
        let bytes = encoder.produce_body(None).unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(text.contains("<request>"));
        assert!(text.contains("<name>aldo</name>"));
        assert!(text.contains("<age>7</age>"));
        assert!(text.ends_with("</request>"));
    }

    #[test]
    fn encodes_attributes_and_arrays() {
        let mut encoder = XmlEncoder::new();
        encoder.bind(json!({"item": ["a", "b"], "meta": {"@id": "1", "$text": "x"}}));
        let bytes = encoder.produce_body(None).unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("<item>a</item><item>b</item>"));
        assert!(text.contains("<meta id=\"1\">x</meta>"));
    }

    #[test]
    fn unsupported_charset_is_an_error() {
        let mut encoder = XmlEncoder::new();
        encoder.bind(json!({"a": 1}));
        assert!(matches!(
            encoder.produce_body(Some("utf-7")),
            Err(EncodeError::UnsupportedCharset(_))
        ));
    }

    #[test]
    fn decodes_elements_into_object() {
        let decoder = XmlDecoder::new("application/xml".to_string());
        let decoded = decoder
            .decode(
                "<root><name>aldo</name><age>7</age></root>",
                Some(ResponseSpecifier::Object),
            )
            .unwrap();
        assert_eq!(
            decoded,
            Some(DecodedBody::Value(json!({"name": "aldo", "age": "7"})))
        );
    }

    #[test]
    fn repeated_elements_collect_into_array() {
        let value = xml_to_value("<root><item>a</item><item>b</item><item>c</item></root>")
            .unwrap();
        assert_eq!(value, json!({"item": ["a", "b", "c"]}));
    }

    #[test]
    fn attributes_and_text_are_kept() {
        let value = xml_to_value(r#"<root status="ok">done</root>"#).unwrap();
        assert_eq!(value, json!({"@status": "ok", "$text": "done"}));
    }

    #[test]
    fn text_only_root_is_a_string() {
        let value = xml_to_value("<root>plain</root>").unwrap();
        assert_eq!(value, json!("plain"));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(xml_to_value("<root><open></root>").is_err());
        assert!(xml_to_value("").is_err());
    }

    #[test]
    fn no_specifier_means_no_decode() {
        let decoder = XmlDecoder::new("application/xml".to_string());
        assert_eq!(decoder.decode("<root/>", None).unwrap(), None);
    }
}
