/*
 * transport.rs
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

//! Transport collaborator surface. The engine behind `TransportQueue`
//! (sockets, pooling, retry) is not this crate's concern: it receives
//! descriptors, performs the exchange, and fires exactly one terminal hook
//! per descriptor — `on_network_success` or `on_network_error`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::codec::charset;
use crate::request::RequestDescriptor;

/// External transport queue. Implementations choose their own execution
/// contexts for the exchange and the hook calls; cancellation is observed
/// cooperatively through `RequestDescriptor::is_cancelled`.
///
/// A descriptor whose `body()` returns `Ok(None)` falls back to the
/// transport's default key/value-encoded body built from
/// `post_parameters()` (see `uri::form_urlencode`).
pub trait TransportQueue: Send + Sync {
    fn enqueue(&self, request: Arc<RequestDescriptor>);
}

/// Raw response as observed by the transport.
#[derive(Debug, Clone, Default)]
pub struct NetworkResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    /// Raw body payload; `None` when the exchange produced no body at all.
    pub data: Option<Bytes>,
}

impl NetworkResponse {
    /// Charset parameter of the Content-Type header, if any. Header name
    /// lookup is case-insensitive per HTTP.
    pub fn charset(&self) -> Option<&str> {
        let content_type = self
            .headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())?;
        content_type.split(';').skip(1).find_map(|param| {
            let mut parts = param.splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();
            if name.eq_ignore_ascii_case("charset") {
                Some(value.trim_matches('"'))
            } else {
                None
            }
        })
    }

    /// Body decoded as text using the response charset (UTF-8 when absent
    /// or unknown). `None` when there was no body payload.
    pub fn body_string(&self) -> Option<String> {
        self.data
            .as_ref()
            .map(|data| charset::decode(data, self.charset()))
    }
}

/// Kind of transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Could not reach the peer at all.
    Connection,
    Timeout,
    /// The exchange completed with an error status.
    Http,
    Other,
}

/// Transport failure, possibly carrying the response that accompanied it
/// (an HTTP error status still has headers and often a body).
#[derive(Debug, Clone)]
pub struct NetworkError {
    pub kind: NetworkErrorKind,
    pub message: String,
    pub response: Option<NetworkResponse>,
}

impl NetworkError {
    pub fn new(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(
        kind: NetworkErrorKind,
        message: impl Into<String>,
        response: NetworkResponse,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            response: Some(response),
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NetworkErrorKind::Connection => write!(f, "connection failed: {}", self.message),
            NetworkErrorKind::Timeout => write!(f, "timed out: {}", self.message),
            NetworkErrorKind::Http => match &self.response {
                Some(response) => {
                    write!(f, "http error {}: {}", response.status_code, self.message)
                }
                None => write!(f, "http error: {}", self.message),
            },
            NetworkErrorKind::Other => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for NetworkError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_content_type(value: &str) -> NetworkResponse {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), value.to_string());
        NetworkResponse {
            status_code: 200,
            headers,
            data: Some(Bytes::from_static(b"h\xe9llo")),
        }
    }

    #[test]
    fn charset_read_from_content_type() {
        let response = response_with_content_type("text/plain; charset=iso-8859-1");
        assert_eq!(response.charset(), Some("iso-8859-1"));
        assert_eq!(response.body_string().as_deref(), Some("héllo"));
    }

    #[test]
    fn missing_charset_defaults_to_utf8() {
        let mut response = response_with_content_type("application/json");
        response.data = Some(Bytes::from_static(b"{}"));
        assert_eq!(response.charset(), None);
        assert_eq!(response.body_string().as_deref(), Some("{}"));
    }

    #[test]
    fn no_data_means_no_body_string() {
        let response = NetworkResponse::default();
        assert_eq!(response.body_string(), None);
    }
}
