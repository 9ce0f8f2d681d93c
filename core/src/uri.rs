/*
 * uri.rs
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

//! Query-string assembly. Keys and values are percent-encoded; a base URL
//! that already carries a query gets additional pairs appended with `&`.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Query component safe set: encode everything that would terminate or
/// structure the query, plus space and percent itself.
const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'#')
    .add(b'?')
    .add(b'&')
    .add(b'=')
    .add(b'+')
    .add(b'%')
    .add(b'[')
    .add(b']');

/// Percent-encode one query key or value.
pub fn encode_query_component(component: &str) -> String {
    utf8_percent_encode(component, QUERY).to_string()
}

/// Append query parameters to a base URL. Pairs are encoded and joined in
/// iteration order; a `?` already present in the base switches the first
/// separator to `&`. The base is otherwise taken as-is.
pub fn append_query_parameters<'a>(
    base: &str,
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut url = String::from(base);
    let mut separator = if base.contains('?') {
        '&'
    } else {
        '?'
    };
    for (key, value) in params {
        url.push(separator);
        url.push_str(&encode_query_component(key));
        url.push('=');
        url.push_str(&encode_query_component(value));
        separator = '&';
    }
    url
}

/// Render parameters as an `application/x-www-form-urlencoded` string, for
/// transports implementing the default key/value request body.
pub fn form_urlencode<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::new();
    for (key, value) in params {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&encode_query_component(key));
        out.push('=');
        out.push_str(&encode_query_component(value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_pairs_with_question_mark_then_ampersand() {
        let url = append_query_parameters("http://h/p", [("a", "1"), ("b", "2")]);
        assert_eq!(url, "http://h/p?a=1&b=2");
    }

    #[test]
    fn base_with_existing_query_gets_ampersand() {
        let url = append_query_parameters("http://h/p?x=0", [("a", "1")]);
        assert_eq!(url, "http://h/p?x=0&a=1");
    }

    #[test]
    fn components_are_escaped() {
        let url = append_query_parameters("http://h/p", [("key name", "a&b=c")]);
        assert_eq!(url, "http://h/p?key%20name=a%26b%3Dc");
    }

    #[test]
    fn no_params_leaves_base_unchanged() {
        let url = append_query_parameters("http://h/p", []);
        assert_eq!(url, "http://h/p");
    }

    #[test]
    fn form_urlencode_joins_pairs() {
        let body = form_urlencode([("a", "1"), ("b", "x y")]);
        assert_eq!(body, "a=1&b=x%20y");
    }
}
