/*
 * format.rs
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

//! Request method and payload format enums, plus the media-type table the
//! codec registry is constructed with.

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
    Put,
    Head,
    Options,
    Trace,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Put => "PUT",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

/// Wire format of the request body. Selects the request encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestFormat {
    Json,
    Xml,
    JsonHal,
    Text,
    Multipart,
}

impl RequestFormat {
    /// Response format implied by this request format. Multipart responses
    /// are not decodable; they fall back to JSON with a warning.
    pub fn to_response(self) -> ResponseFormat {
        match self {
            RequestFormat::Json => ResponseFormat::Json,
            RequestFormat::Xml => ResponseFormat::Xml,
            RequestFormat::JsonHal => ResponseFormat::JsonHal,
            RequestFormat::Text => ResponseFormat::Text,
            RequestFormat::Multipart => {
                log::warn!("multipart response isn't supported, using JSON");
                ResponseFormat::Json
            }
        }
    }
}

/// Wire format of the response body. Selects the response decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    Json,
    Xml,
    JsonHal,
    Text,
}

/// Media types advertised in the Accept header, keyed by response format.
/// One immutable table is injected at codec-registry construction; decoders
/// read their accept value from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypes {
    pub json: String,
    pub xml: String,
    pub hal: String,
    pub text: String,
}

impl Default for MediaTypes {
    fn default() -> Self {
        Self {
            json: "application/json".to_string(),
            xml: "application/xml".to_string(),
            hal: "application/hal+json".to_string(),
            text: "text/plain".to_string(),
        }
    }
}

impl MediaTypes {
    /// Accept header value for the given response format.
    pub fn accept_value(&self, format: ResponseFormat) -> &str {
        match format {
            ResponseFormat::Json => &self.json,
            ResponseFormat::Xml => &self.xml,
            ResponseFormat::JsonHal => &self.hal,
            ResponseFormat::Text => &self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Trace.as_str(), "TRACE");
    }

    #[test]
    fn response_format_derived_from_request_format() {
        assert_eq!(RequestFormat::Json.to_response(), ResponseFormat::Json);
        assert_eq!(RequestFormat::Xml.to_response(), ResponseFormat::Xml);
        assert_eq!(RequestFormat::JsonHal.to_response(), ResponseFormat::JsonHal);
        assert_eq!(RequestFormat::Text.to_response(), ResponseFormat::Text);
    }

    #[test]
    fn multipart_response_substituted_with_json() {
        assert_eq!(RequestFormat::Multipart.to_response(), ResponseFormat::Json);
    }

    #[test]
    fn default_accept_values() {
        let table = MediaTypes::default();
        assert_eq!(table.accept_value(ResponseFormat::Json), "application/json");
        assert_eq!(table.accept_value(ResponseFormat::Xml), "application/xml");
        assert_eq!(table.accept_value(ResponseFormat::JsonHal), "application/hal+json");
        assert_eq!(table.accept_value(ResponseFormat::Text), "text/plain");
    }
}
