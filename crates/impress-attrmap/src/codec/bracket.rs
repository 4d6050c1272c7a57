//! Bracketed file-name codecs (`v2` and `v3`)
//!
//! When the map starts with a non-empty `title`, that value is written as
//! plain text before the bracket. Every other entry goes inside as
//! `key=value`, separated by `;`. Backslash escapes the separator, `=`, the
//! brackets and itself, and whitespace at either end of a key, value or title.

use super::{Decoder, Encoder};
use crate::error::{AttrError, Result};
use crate::map::AttributeMap;

pub(crate) const TITLE: &str = "title";

/// A `Title <k=v;...>` codec with configurable delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketCodec {
    name: &'static str,
    open: char,
    close: char,
    separator: &'static str,
}

impl BracketCodec {
    /// `Title [k=v; k=v]`
    pub fn v3() -> Self {
        Self {
            name: "v3",
            open: '[',
            close: ']',
            separator: "; ",
        }
    }

    /// `Title {k=v;k=v}`
    pub fn v2() -> Self {
        Self {
            name: "v2",
            open: '{',
            close: '}',
            separator: ";",
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn escape_entry(&self, s: &str) -> String {
        escape(s, &['\\', ';', '=', self.open, self.close])
    }

    fn escape_title(&self, s: &str) -> String {
        escape(s, &['\\', self.open, self.close])
    }

    /// Encode already-rendered pairs.
    pub fn encode_pairs(&self, pairs: &[(String, String)]) -> String {
        let (mut out, rest) = match pairs.split_first() {
            Some(((key, title), rest)) if key == TITLE && !title.is_empty() => {
                (self.escape_title(title), rest)
            }
            _ => (String::new(), pairs),
        };
        if rest.is_empty() {
            return out;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        let body: Vec<String> = rest
            .iter()
            .map(|(k, v)| format!("{}={}", self.escape_entry(k), self.escape_entry(v)))
            .collect();
        out.push(self.open);
        out.push_str(&body.join(self.separator));
        out.push(self.close);
        out
    }
}

impl Encoder for BracketCodec {
    fn encode(&self, map: &AttributeMap) -> Result<String> {
        Ok(self.encode_pairs(&map.rendered()?))
    }
}

impl Decoder for BracketCodec {
    fn decode(&self, s: &str) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();

        let Some(open) = find_unescaped(s, self.open) else {
            let title = unescape(trim_unescaped(s));
            if !title.is_empty() {
                pairs.push((TITLE.to_string(), title));
            }
            return Ok(pairs);
        };

        let title = unescape(trim_unescaped(&s[..open]));
        if !title.is_empty() {
            pairs.push((TITLE.to_string(), title));
        }

        let inner = &s[open + self.open.len_utf8()..];
        let close = find_unescaped(inner, self.close)
            .ok_or_else(|| AttrError::decode(self.name, s, format!("missing '{}'", self.close)))?;
        if !inner[close + self.close.len_utf8()..].trim().is_empty() {
            return Err(AttrError::decode(
                self.name,
                s,
                format!("text after '{}'", self.close),
            ));
        }

        for entry in split_unescaped(&inner[..close], ';') {
            let entry = trim_unescaped(entry);
            if entry.is_empty() {
                continue;
            }
            let eq = find_unescaped(entry, '=')
                .ok_or_else(|| AttrError::decode(self.name, s, format!("no '=' in {entry:?}")))?;
            let key = unescape(trim_unescaped(&entry[..eq]));
            if key.is_empty() {
                return Err(AttrError::decode(self.name, s, format!("empty key in {entry:?}")));
            }
            pairs.push((key, unescape(&entry[eq + 1..])));
        }

        Ok(pairs)
    }
}

fn escape(s: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    let last = s.chars().count().saturating_sub(1);
    for (i, c) in s.chars().enumerate() {
        let edge = (i == 0 || i == last) && c.is_whitespace();
        if edge || specials.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Trim whitespace from both ends, keeping a trailing whitespace character
/// that is escaped.
fn trim_unescaped(s: &str) -> &str {
    let s = s.trim_start();
    let trimmed = s.trim_end();
    let backslashes = trimmed.chars().rev().take_while(|&c| c == '\\').count();
    if backslashes % 2 == 0 {
        return trimmed;
    }
    match s[trimmed.len()..].chars().next() {
        Some(c) => &s[..trimmed.len() + c.len_utf8()],
        None => trimmed,
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            _ => out.push(c),
        }
    }
    out
}

/// Byte offset of the first `target` not preceded by a backslash escape.
fn find_unescaped(s: &str, target: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == target {
            return Some(i);
        }
    }
    None
}

fn split_unescaped(s: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s;
    while let Some(i) = find_unescaped(rest, delim) {
        parts.push(&rest[..i]);
        rest = &rest[i + delim.len_utf8()..];
    }
    parts.push(rest);
    parts
}
