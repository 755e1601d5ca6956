// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sanitized identifiers derived from source type names.

use regex::Regex;
use std::sync::OnceLock;

static TRAILING_CLOSERS: OnceLock<Regex> = OnceLock::new();
static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
static PADDED_PUNCTUATION: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

/// Map a source type name to an identifier usable as a file base and as a
/// fragment of generated symbols.
///
/// Trailing `>` are dropped, then `::` and every remaining `<`, `>`, `,`
/// or `:` becomes `_`. Whitespace around punctuation is dropped and any
/// other run of whitespace becomes a single `_`, so `unsigned int` and
/// `unsignedint` stay distinct.
///
/// ```
/// use typegen::naming::wrapper_name;
///
/// assert_eq!(wrapper_name("vector<Foo>"), "vector_Foo");
/// assert_eq!(wrapper_name("map<string,jsonstr>"), "map_string_jsonstr");
/// assert_eq!(wrapper_name("Foo::Bar"), "Foo_Bar");
/// assert_eq!(wrapper_name("vector<unsigned int>"), "vector_unsigned_int");
/// ```
pub fn wrapper_name(type_name: &str) -> String {
    #[allow(clippy::expect_used)] // literal patterns
    let trailing = TRAILING_CLOSERS.get_or_init(|| Regex::new(r">+$").expect("valid regex"));
    #[allow(clippy::expect_used)]
    let punct = PUNCTUATION.get_or_init(|| Regex::new(r"::|[<>,:]").expect("valid regex"));

    #[allow(clippy::expect_used)]
    let padded = PADDED_PUNCTUATION.get_or_init(|| Regex::new(r"\s*([<>,:])\s*").expect("valid regex"));
    #[allow(clippy::expect_used)]
    let spaces = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let tight = padded.replace_all(type_name.trim(), "$1");
    let compact = spaces.replace_all(&tight, "_");
    let trimmed = trailing.replace(&compact, "");
    punct.replace_all(&trimmed, "_").into_owned()
}

/// True when `name` is a usable wrapper name.
pub fn is_valid_wrapper_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['<', '>', ',', ':'])
}
