/*
 * hal.rs
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

//! JSON-HAL response decoding: plain JSON parsing plus extraction of the
//! `_links` object into a flat link list. The `_links` entry is lifted out
//! of the resource; `_embedded` and everything else stay in place.

use serde_json::Value;

use crate::codec::{check_specifier, ResponseDecoder, ResponseSpecifier};
use crate::error::DecodeError;
use crate::format::ResponseFormat;
use crate::request::response::{DecodedBody, HalLink};

pub struct HalDecoder {
    accept: String,
}

impl HalDecoder {
    pub fn new(accept: String) -> Self {
        Self { accept }
    }
}

impl ResponseDecoder for HalDecoder {
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
        let mut value: Value = serde_json::from_str(raw)
            .map_err(|e| DecodeError::malformed(ResponseFormat::JsonHal, e.to_string()))?;
        check_specifier(&value, specifier)?;
        let links = match value.as_object_mut() {
            Some(map) => map.remove("_links").map(extract_links).unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(Some(DecodedBody::Hal {
            resource: value,
            links,
        }))
    }
}

/// Flatten a `_links` object. Each relation maps to a link object or an
/// array of them; entries without an `href` are skipped.
fn extract_links(links_value: Value) -> Vec<HalLink> {
    let Value::Object(relations) = links_value else {
        return Vec::new();
    };
    let mut links = Vec::new();
    for (rel, entry) in relations {
        match entry {
            Value::Array(items) => {
                for item in items {
                    if let Some(link) = link_from(&rel, &item) {
                        links.push(link);
                    }
                }
            }
            other => {
                if let Some(link) = link_from(&rel, &other) {
                    links.push(link);
                }
            }
        }
    }
    links
}

fn link_from(rel: &str, entry: &Value) -> Option<HalLink> {
    let href = entry.get("href")?.as_str()?;
    let templated = entry
        .get("templated")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(HalLink {
        rel: rel.to_string(),
        href: href.to_string(),
        templated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOCUMENT: &str = r#"{
        "name": "order-17",
        "total": 12.5,
        "_links": {
            "self": {"href": "/orders/17"},
            "items": [
                {"href": "/orders/17/items/1"},
                {"href": "/orders/17/items/2"}
            ],
            "search": {"href": "/orders{?name}", "templated": true}
        }
    }"#;

    #[test]
    fn extracts_links_and_strips_them_from_the_resource() {
        let decoder = HalDecoder::new("application/hal+json".to_string());
        let decoded = decoder
            .decode(DOCUMENT, Some(ResponseSpecifier::Object))
            .unwrap()
            .unwrap();
        let DecodedBody::Hal { resource, links } = decoded else {
            panic!("expected HAL body");
        };
        assert_eq!(resource, json!({"name": "order-17", "total": 12.5}));
        assert_eq!(links.len(), 4);
        assert!(links.contains(&HalLink {
            rel: "self".to_string(),
            href: "/orders/17".to_string(),
            templated: false,
        }));
        assert!(links.contains(&HalLink {
            rel: "search".to_string(),
            href: "/orders{?name}".to_string(),
            templated: true,
        }));
    }

    #[test]
    fn document_without_links_yields_empty_list() {
        let decoder = HalDecoder::new("application/hal+json".to_string());
        let decoded = decoder
            .decode(r#"{"a": 1}"#, Some(ResponseSpecifier::Object))
            .unwrap()
            .unwrap();
        assert_eq!(
            decoded,
            DecodedBody::Hal {
                resource: json!({"a": 1}),
                links: Vec::new(),
            }
        );
    }

    #[test]
    fn no_specifier_means_no_decode() {
        let decoder = HalDecoder::new("application/hal+json".to_string());
        assert_eq!(decoder.decode(DOCUMENT, None).unwrap(), None);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let decoder = HalDecoder::new("application/hal+json".to_string());
        assert!(decoder.decode("{", Some(ResponseSpecifier::Any)).is_err());
    }
}
