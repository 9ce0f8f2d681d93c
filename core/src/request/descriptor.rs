/*
 * descriptor.rs
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

//! The request lifecycle object: configured by the caller, submitted to the
//! transport queue, driven to exactly one outcome by the transport's
//! terminal hooks.
//!
//! Configuration happens on `&mut self` before the descriptor is wrapped in
//! an `Arc` for submission, so headers and parameters are single-writer by
//! construction. The hooks and `cancel` take `&self` and touch only the
//! interior-mutable outcome state: the result slot, the cancelled flag, and
//! the completion signal.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::codec::{CodecRegistry, RequestEncoder, ResponseDecoder, ResponseSpecifier};
use crate::error::{ConfigError, EncodeError};
use crate::format::{Method, RequestFormat, ResponseFormat};
use crate::request::listener::ResponseListener;
use crate::request::response::ResponseData;
use crate::request::signal::CompletionSignal;
use crate::transport::{NetworkError, NetworkResponse, TransportQueue};
use crate::uri;

const ACCEPT_HEADER: &str = "Accept";

/// One outbound request and its single owned result slot.
///
/// The result (`Arc<Mutex<ResponseData>>`) is created empty at construction
/// and keeps its identity for the descriptor's lifetime; the terminal hook
/// fills it in place. `perform` returns the same slot on both the
/// synchronous and asynchronous paths — a synchronous caller gets it
/// populated, an asynchronous caller holds it and relies on the listener
/// for freshness.
pub struct RequestDescriptor {
    method: Method,
    base_url: String,
    request_format: RequestFormat,
    response_format: ResponseFormat,
    response_specifier: Option<ResponseSpecifier>,
    default_charset: Option<String>,
    headers: HashMap<String, String>,
    get_parameters: Option<HashMap<String, String>>,
    post_parameters: Option<HashMap<String, String>>,
    body_object: Option<Value>,
    listener: Option<Arc<dyn ResponseListener>>,
    encoder: Box<dyn RequestEncoder>,
    decoder: Box<dyn ResponseDecoder>,
    result: Arc<Mutex<ResponseData>>,
    signal: CompletionSignal,
    cancelled: AtomicBool,
    terminal_fired: AtomicBool,
}

impl RequestDescriptor {
    /// Descriptor with the default codec registry; the response format is
    /// derived from the request format.
    pub fn new(
        method: Method,
        url: impl Into<String>,
        request_format: RequestFormat,
    ) -> Result<Self, ConfigError> {
        Self::with_registry(
            method,
            url,
            request_format,
            None,
            &CodecRegistry::with_defaults(),
        )
    }

    /// Descriptor with an explicit response format.
    pub fn with_response_format(
        method: Method,
        url: impl Into<String>,
        request_format: RequestFormat,
        response_format: ResponseFormat,
    ) -> Result<Self, ConfigError> {
        Self::with_registry(
            method,
            url,
            request_format,
            Some(response_format),
            &CodecRegistry::with_defaults(),
        )
    }

    /// Descriptor against a caller-supplied registry. Fails fast when the
    /// registry has no codec for either format.
    pub fn with_registry(
        method: Method,
        url: impl Into<String>,
        request_format: RequestFormat,
        response_format: Option<ResponseFormat>,
        registry: &CodecRegistry,
    ) -> Result<Self, ConfigError> {
        let response_format = response_format.unwrap_or_else(|| request_format.to_response());
        let encoder = registry.request_encoder(request_format)?;
        let decoder = registry.response_decoder(response_format)?;
        let mut headers = HashMap::new();
        headers.insert(
            ACCEPT_HEADER.to_string(),
            decoder.accept_header_value().to_string(),
        );
        Ok(Self {
            method,
            base_url: url.into(),
            request_format,
            response_format,
            response_specifier: None,
            default_charset: None,
            headers,
            get_parameters: None,
            post_parameters: None,
            body_object: None,
            listener: None,
            encoder,
            decoder,
            result: Arc::new(Mutex::new(ResponseData::new())),
            signal: CompletionSignal::new(),
            cancelled: AtomicBool::new(false),
            terminal_fired: AtomicBool::new(false),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn request_format(&self) -> RequestFormat {
        self.request_format
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    /// Base URL as given at construction, without query parameters.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn response_specifier(&self) -> Option<ResponseSpecifier> {
        self.response_specifier
    }

    /// Shape the response decoder should materialize. Without one, the
    /// structured formats skip decoding entirely.
    pub fn set_response_specifier(&mut self, specifier: ResponseSpecifier) {
        self.response_specifier = Some(specifier);
    }

    pub fn default_charset(&self) -> Option<&str> {
        self.default_charset.as_deref()
    }

    /// Charset used when encoding the post body.
    pub fn set_default_charset(&mut self, charset: impl Into<String>) {
        self.default_charset = Some(charset.into());
    }

    pub fn set_listener(&mut self, listener: Arc<dyn ResponseListener>) {
        self.listener = Some(listener);
    }

    // ── Headers ───────────────────────────────────────────────────────

    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    /// Replace the header map wholesale. Note this discards the seeded
    /// Accept header.
    pub fn set_headers(&mut self, headers: HashMap<String, String>) {
        self.headers = headers;
    }

    pub fn add_headers(&mut self, headers: HashMap<String, String>) {
        self.headers.extend(headers);
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Transport-computed defaults overlaid with the explicit headers;
    /// explicit entries win.
    pub fn merged_headers(
        &self,
        transport_defaults: &HashMap<String, String>,
    ) -> HashMap<String, String> {
        let mut merged = transport_defaults.clone();
        merged.extend(
            self.headers
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        merged
    }

    // ── Query parameters ──────────────────────────────────────────────

    /// Add one query parameter. `None` removes the key instead of
    /// inserting an empty value. The map is allocated on first use.
    pub fn add_get_parameter(&mut self, key: impl Into<String>, value: Option<String>) {
        let params = self.get_parameters.get_or_insert_with(HashMap::new);
        let key = key.into();
        match value {
            Some(value) => {
                params.insert(key, value);
            }
            None => {
                params.remove(&key);
            }
        }
    }

    pub fn set_get_parameters(&mut self, params: HashMap<String, String>) {
        self.get_parameters = Some(params);
    }

    pub fn add_get_parameters(&mut self, params: HashMap<String, String>) {
        match &mut self.get_parameters {
            Some(existing) => existing.extend(params),
            None => self.get_parameters = Some(params),
        }
    }

    /// `None` when never set; the transport default stays in effect.
    pub fn get_parameters(&self) -> Option<&HashMap<String, String>> {
        self.get_parameters.as_ref()
    }

    /// Full request URL. Recomputed on every call so parameters added
    /// between calls are picked up; with no query parameters the base URL
    /// is returned unchanged.
    pub fn url(&self) -> String {
        match &self.get_parameters {
            Some(params) if !params.is_empty() => uri::append_query_parameters(
                &self.base_url,
                params.iter().map(|(key, value)| (key.as_str(), value.as_str())),
            ),
            _ => self.base_url.clone(),
        }
    }

    // ── Post parameters and body ──────────────────────────────────────

    /// Add one post parameter. `None` removes the key. A non-empty post
    /// parameter map takes precedence over a bound body object.
    pub fn add_post_parameter(&mut self, key: impl Into<String>, value: Option<String>) {
        let params = self.post_parameters.get_or_insert_with(HashMap::new);
        let key = key.into();
        match value {
            Some(value) => {
                params.insert(key, value);
            }
            None => {
                params.remove(&key);
            }
        }
    }

    pub fn set_post_parameters(&mut self, params: HashMap<String, String>) {
        self.post_parameters = Some(params);
    }

    pub fn add_post_parameters(&mut self, params: HashMap<String, String>) {
        match &mut self.post_parameters {
            Some(existing) => existing.extend(params),
            None => self.post_parameters = Some(params),
        }
    }

    pub fn post_parameters(&self) -> Option<&HashMap<String, String>> {
        self.post_parameters.as_ref()
    }

    /// Bind a structured body. The value is encoded by the request
    /// encoder when the transport asks for the body.
    pub fn set_body_object<T: Serialize>(&mut self, body: &T) -> Result<(), EncodeError> {
        let value =
            serde_json::to_value(body).map_err(|e| EncodeError::serialize(e.to_string()))?;
        self.set_body_value(value);
        Ok(())
    }

    /// Bind an already-structured body value.
    pub fn set_body_value(&mut self, value: Value) {
        self.encoder.bind(value.clone());
        self.body_object = Some(value);
    }

    pub fn body_object(&self) -> Option<&Value> {
        self.body_object.as_ref()
    }

    /// Request body bytes. `Ok(None)` when no body object is bound or post
    /// parameters are set — the transport then falls through to its
    /// default key/value-encoded body. An unsupported charset is surfaced,
    /// never papered over with an empty body.
    pub fn body(&self) -> Result<Option<Bytes>, EncodeError> {
        if self.body_object.is_some() && self.post_parameters.is_none() {
            self.encoder
                .produce_body(self.default_charset.as_deref())
                .map(Some)
        } else {
            Ok(None)
        }
    }

    /// Content-Type for the encoded body; `None` when the transport
    /// default applies.
    pub fn body_content_type(&self) -> Option<String> {
        if self.body_object.is_some() {
            Some(self.encoder.content_type(self.default_charset.as_deref()))
        } else {
            None
        }
    }

    // ── Submission and outcome ────────────────────────────────────────

    /// Submit to the transport queue. With `synchronous` the calling
    /// thread blocks on the completion signal — success, error, and
    /// cancellation all unblock it — and the returned result slot is
    /// already populated. Without it the slot is returned as-is and the
    /// listener reports completion.
    ///
    /// Takes the `Arc` handle; keep a clone to cancel or inspect the
    /// descriptor afterwards. Failures are never raised from here; they
    /// land in `ResponseData::error`.
    pub fn perform(
        self: Arc<Self>,
        synchronous: bool,
        queue: &dyn TransportQueue,
    ) -> Arc<Mutex<ResponseData>> {
        queue.enqueue(Arc::clone(&self));
        if synchronous {
            let _ = self.signal.wait();
        }
        Arc::clone(&self.result)
    }

    /// The descriptor's result slot.
    pub fn result(&self) -> Arc<Mutex<ResponseData>> {
        Arc::clone(&self.result)
    }

    /// Cancel the request: resolves the completion signal with the no-value
    /// sentinel (unblocking any synchronous waiter) and flags the transport
    /// operation as cancelled. The hooks check the flag and leave the
    /// result untouched afterwards. Cancellation is not an error.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.signal.resolve_success(None);
    }

    /// True once `cancel` has been called. Transports poll this to stop
    /// work on abandoned requests.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn result_lock(&self) -> MutexGuard<'_, ResponseData> {
        self.result
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy status, headers, and body text into the result, then run the
    /// response decoder. Decoder failures are recorded only on the primary
    /// path; the error path swallows them since the error is the signal.
    fn populate_from_response(
        &self,
        result: &mut ResponseData,
        response: &NetworkResponse,
        raw: &str,
        record_decode_failure: bool,
    ) {
        result.status_code = Some(response.status_code);
        result.headers = response.headers.clone();
        result.response_string = Some(raw.to_string());
        match self.decoder.decode(raw, self.response_specifier) {
            Ok(decoded) => result.decoded = decoded,
            Err(error) => {
                if record_decode_failure {
                    result.decode_error = Some(error);
                }
            }
        }
    }

    /// Terminal success hook, called by the transport exactly once. A
    /// response without a body counts as an empty JSON payload rather than
    /// an error.
    pub fn on_network_success(&self, response: NetworkResponse) {
        if self.terminal_fired.swap(true, Ordering::SeqCst) {
            log::debug!(
                "terminal hook fired twice for {}, ignoring late success",
                self.base_url
            );
            return;
        }
        let raw = response
            .body_string()
            .unwrap_or_else(|| "{}".to_string());
        if !self.is_cancelled() {
            {
                let mut result = self.result_lock();
                self.populate_from_response(&mut result, &response, &raw, true);
            }
            if let Some(listener) = &self.listener {
                let snapshot = self.result_lock().clone();
                listener.on_response(&snapshot, self);
            }
        }
        self.signal.resolve_success(Some(raw));
    }

    /// Terminal error hook, called by the transport exactly once. A
    /// response attached to the error still contributes status, headers,
    /// and a best-effort body decode.
    pub fn on_network_error(&self, error: NetworkError) {
        if self.terminal_fired.swap(true, Ordering::SeqCst) {
            log::debug!(
                "terminal hook fired twice for {}, ignoring late error",
                self.base_url
            );
            return;
        }
        if !self.is_cancelled() {
            {
                let mut result = self.result_lock();
                if let Some(attached) = &error.response {
                    let raw = attached
                        .body_string()
                        .unwrap_or_else(|| "{}".to_string());
                    self.populate_from_response(&mut result, attached, &raw, false);
                }
                result.error = Some(error.clone());
            }
            if let Some(listener) = &self.listener {
                listener.on_error(&error, self);
            }
        }
        self.signal.resolve_error(error);
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("base_url", &self.base_url)
            .field("request_format", &self.request_format)
            .field("response_format", &self.response_format)
            .field("response_specifier", &self.response_specifier)
            .field("default_charset", &self.default_charset)
            .field("headers", &self.headers)
            .field("get_parameters", &self.get_parameters)
            .field("post_parameters", &self.post_parameters)
            .field("body_object", &self.body_object)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Configuration equality: two descriptors describe the same request. The
/// outcome state (result, signal, flags) does not participate.
impl PartialEq for RequestDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.base_url == other.base_url
            && self.request_format == other.request_format
            && self.response_format == other.response_format
            && self.response_specifier == other.response_specifier
            && self.default_charset == other.default_charset
            && self.headers == other.headers
            && self.get_parameters == other.get_parameters
            && self.post_parameters == other.post_parameters
            && self.body_object == other.body_object
    }
}
