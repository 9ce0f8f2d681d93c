/*
 * error.rs
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

//! Codec and registry errors. Transport-level failures live in `transport`.

use std::fmt;

use crate::format::{RequestFormat, ResponseFormat};

/// Registry misconfiguration: a format without a registered codec. Fatal;
/// raised at descriptor construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingEncoder(RequestFormat),
    MissingDecoder(ResponseFormat),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingEncoder(format) => {
                write!(f, "no request encoder registered for {:?}", format)
            }
            ConfigError::MissingDecoder(format) => {
                write!(f, "no response decoder registered for {:?}", format)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure while producing request body bytes. An unsupported charset is
/// surfaced here, never replaced by an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Charset name the encoder cannot produce bytes in.
    UnsupportedCharset(String),
    /// Body object cannot be rendered in the request format.
    Serialize(String),
}

impl EncodeError {
    pub fn serialize(msg: impl Into<String>) -> Self {
        Self::Serialize(msg.into())
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnsupportedCharset(name) => {
                write!(f, "unsupported charset: {}", name)
            }
            EncodeError::Serialize(detail) => write!(f, "body encoding failed: {}", detail),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Failure while decoding a response body. Recorded on the result; delivery
/// still happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload is not well-formed for the declared format.
    Malformed {
        format: ResponseFormat,
        detail: String,
    },
    /// Payload parsed, but its top-level shape does not match the specifier.
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },
}

impl DecodeError {
    pub fn malformed(format: ResponseFormat, detail: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed { format, detail } => {
                write!(f, "malformed {:?} response: {}", format, detail)
            }
            DecodeError::UnexpectedShape { expected, found } => {
                write!(f, "expected {} at top level, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for DecodeError {}
