/*
 * charset.rs
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

//! Charset support for body bytes. UTF-8, US-ASCII, and ISO-8859-1 are
//! handled in-tree; anything else is an encode error on the request side and
//! falls back to lossy UTF-8 on the response side (the response already
//! arrived; refusing to read it helps nobody).

use bytes::Bytes;

use crate::error::EncodeError;

/// Charset applied when none is configured.
pub const DEFAULT_CHARSET: &str = "utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Known {
    Utf8,
    Ascii,
    Latin1,
}

fn lookup(name: &str) -> Option<Known> {
    match name.to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => Some(Known::Utf8),
        "us-ascii" | "ascii" => Some(Known::Ascii),
        "iso-8859-1" | "latin1" | "latin-1" => Some(Known::Latin1),
        _ => None,
    }
}

/// True if `encode` can produce bytes in the named charset.
pub fn is_supported(name: &str) -> bool {
    lookup(name).is_some()
}

/// Encode text into body bytes. Characters unmappable in the target charset
/// are replaced with `?`, matching common platform encoders. An unknown
/// charset name is an error.
pub fn encode(text: &str, charset: Option<&str>) -> Result<Bytes, EncodeError> {
    let name = charset.unwrap_or(DEFAULT_CHARSET);
    match lookup(name) {
        Some(Known::Utf8) => Ok(Bytes::from(text.as_bytes().to_vec())),
        Some(Known::Ascii) => {
            let bytes = text
                .chars()
                .map(|c| {
                    if c.is_ascii() {
                        c as u8
                    } else {
                        b'?'
                    }
                })
                .collect::<Vec<u8>>();
            Ok(Bytes::from(bytes))
        }
        Some(Known::Latin1) => {
            let bytes = text
                .chars()
                .map(|c| {
                    let code = c as u32;
                    if code <= 0xFF {
                        code as u8
                    } else {
                        b'?'
                    }
                })
                .collect::<Vec<u8>>();
            Ok(Bytes::from(bytes))
        }
        None => Err(EncodeError::UnsupportedCharset(name.to_string())),
    }
}

/// Decode response bytes into text. Unknown charsets and invalid sequences
/// decode lossily as UTF-8.
pub fn decode(data: &[u8], charset: Option<&str>) -> String {
    let name = charset.unwrap_or(DEFAULT_CHARSET);
    match lookup(name) {
        Some(Known::Latin1) => data.iter().map(|&b| b as char).collect(),
        Some(Known::Utf8) | Some(Known::Ascii) | None => {
            String::from_utf8_lossy(data).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_roundtrip() {
        let bytes = encode("héllo", Some("utf-8")).unwrap();
        assert_eq!(decode(&bytes, Some("utf-8")), "héllo");
    }

    #[test]
    fn default_is_utf8() {
        let bytes = encode("héllo", None).unwrap();
        assert_eq!(bytes.as_ref(), "héllo".as_bytes());
    }

    #[test]
    fn ascii_replaces_unmappable() {
        let bytes = encode("héllo", Some("us-ascii")).unwrap();
        assert_eq!(bytes.as_ref(), b"h?llo");
    }

    #[test]
    fn latin1_roundtrip() {
        let bytes = encode("héllo", Some("iso-8859-1")).unwrap();
        assert_eq!(bytes.as_ref(), b"h\xe9llo");
        assert_eq!(decode(&bytes, Some("iso-8859-1")), "héllo");
    }

    #[test]
    fn unknown_charset_is_an_error() {
        let err = encode("x", Some("utf-7")).unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedCharset("utf-7".to_string()));
    }

    #[test]
    fn unknown_charset_decodes_lossily() {
        assert_eq!(decode(b"plain", Some("utf-7")), "plain");
    }
}
