/*
 * listener.rs
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

//! Asynchronous delivery callbacks.

use crate::request::descriptor::RequestDescriptor;
use crate::request::response::ResponseData;
use crate::transport::NetworkError;

/// Callback for asynchronous result delivery. Invoked on whatever context
/// the transport drives delivery from, always before the completion signal
/// resolves — a synchronous caller never observes a result the listener has
/// not already seen.
pub trait ResponseListener: Send + Sync {
    /// The exchange completed; `data` is the populated result.
    fn on_response(&self, data: &ResponseData, request: &RequestDescriptor);

    /// The exchange failed. The result carries the same error, plus
    /// whatever could be salvaged from a response attached to it.
    fn on_error(&self, error: &NetworkError, request: &RequestDescriptor);
}
