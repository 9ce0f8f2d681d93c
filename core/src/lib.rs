/*
 * lib.rs
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

//! Format-agnostic request/response layer over an external transport.
//!
//! A caller configures a [`RequestDescriptor`] (method, URL, headers, query
//! and post parameters, or a structured body in one of the payload
//! formats), submits it to a [`TransportQueue`], and reads back one
//! [`ResponseData`] — through a [`ResponseListener`] callback, or by
//! blocking on the descriptor's completion signal via
//! `perform(true, queue)`. The wire formats live behind the codec
//! registry; the transport engine (sockets, pooling, retry) is an external
//! collaborator reached only through the `TransportQueue` trait and the
//! descriptor's two terminal hooks.

pub mod codec;
pub mod error;
pub mod format;
pub mod request;
pub mod transport;
pub mod uri;

pub use codec::{CodecRegistry, RequestEncoder, ResponseDecoder, ResponseSpecifier};
pub use error::{ConfigError, DecodeError, EncodeError};
pub use format::{MediaTypes, Method, RequestFormat, ResponseFormat};
pub use request::{
    DecodedBody, HalLink, RequestDescriptor, ResponseData, ResponseListener, SignalOutcome,
};
pub use transport::{NetworkError, NetworkErrorKind, NetworkResponse, TransportQueue};
