/*
 * response.rs
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

//! Normalized request outcome. One `ResponseData` per descriptor, created
//! empty, filled in place exactly once when the terminal hook fires.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::DecodeError;
use crate::transport::NetworkError;

/// Uniform result record for one request, regardless of wire format.
///
/// Success and failure both land here: a transport failure sets `error`,
/// any observed response (even one attached to a failure) sets
/// `status_code`, `headers`, and `response_string`. Decoder output lands in
/// `decoded`; a decoder failure on the success path is recorded in
/// `decode_error` without aborting delivery.
#[derive(Debug, Clone, Default)]
pub struct ResponseData {
    /// Present iff the network call failed (transport- or HTTP-level).
    pub error: Option<NetworkError>,
    /// Set whenever any response was observed; stays `None` for failures
    /// with no network response (e.g. connectivity loss).
    pub status_code: Option<u16>,
    /// Copied from the observed response.
    pub headers: HashMap<String, String>,
    /// Raw decoded text body, present whenever any body was observed.
    pub response_string: Option<String>,
    /// Structured value produced by the response decoder.
    pub decoded: Option<DecodedBody>,
    /// Decoder failure on the primary (success) path.
    pub decode_error: Option<DecodeError>,
}

impl ResponseData {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a network failure has been recorded.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Structured payload produced by a response decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// Generic value tree: JSON documents directly, XML mapped to one.
    Value(Value),
    /// JSON-HAL: the resource with `_links` lifted out.
    Hal {
        resource: Value,
        links: Vec<HalLink>,
    },
    /// Plain-text passthrough.
    Text(String),
}

/// One hypermedia link extracted from a HAL `_links` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalLink {
    pub rel: String,
    pub href: String,
    pub templated: bool,
}
