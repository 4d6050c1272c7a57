//! ISBN (International Standard Book Number)

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::warn;

use crate::error::{Result, ValueError};
use crate::ranges::RangeTable;
use crate::validators::{ean13_check_digit, is_valid_ean13, is_valid_isbn10, mod11_check_digit};

/// An ISBN, stored as an unsplit ISBN-13.
///
/// Registration segments are computed on first use and cached.
#[derive(Debug, Clone)]
pub struct Isbn {
    value: String,
    parts: OnceCell<Vec<String>>,
}

impl Isbn {
    /// Parse an ISBN-10 or ISBN-13, with or without hyphens and spaces,
    /// optionally prefixed by `isbn:` or `urn:isbn:`.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(Isbn {
            value: as13(s)?,
            parts: OnceCell::new(),
        })
    }

    /// The unsplit ISBN-13.
    pub fn isbn13(&self) -> &str {
        &self.value
    }

    /// The unsplit ISBN-10, for `978` ISBNs only.
    pub fn isbn10(&self) -> Option<String> {
        let body = self.value.strip_prefix("978")?.get(..9)?;
        let check = mod11_check_digit(body)?;
        Some(format!("{body}{check}"))
    }

    /// Registration segments from the process-wide range table.
    pub fn split(&self) -> &[String] {
        self.parts.get_or_init(|| self.split_with(RangeTable::global()))
    }

    /// Registration segments from a specific table, uncached.
    pub fn split_with(&self, table: &RangeTable) -> Vec<String> {
        match table.split(&self.value) {
            Some(parts) => parts,
            None => {
                warn!("ISBN {} not found in split table", self.value);
                vec![self.value.clone()]
            }
        }
    }

    /// Hyphenated ISBN-13.
    pub fn split13(&self) -> String {
        self.split().join("-")
    }

    /// Hyphenated ISBN-10, for `978` ISBNs only.
    pub fn split10(&self) -> Option<String> {
        let parts = self.split();
        if parts.len() < 3 || parts[0] != "978" {
            return None;
        }
        let check = mod11_check_digit(self.value.get(3..12)?)?;
        Some(format!("{}-{}", parts[1..parts.len() - 1].join("-"), check))
    }
}

impl PartialEq for Isbn {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Isbn {}

impl Hash for Isbn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Normalize to an unsplit ISBN-13.
fn as13(s: &str) -> Result<String> {
    let trimmed = s.trim();
    let lower = trimmed.to_ascii_lowercase();
    let body = if lower.starts_with("urn:isbn:") {
        &trimmed[9..]
    } else if lower.starts_with("isbn:") {
        &trimmed[5..]
    } else {
        trimmed
    };

    let compact: String = body.chars().filter(|c| *c != '-' && *c != ' ').collect();

    if !compact.is_ascii() {
        return Err(ValueError::malformed("isbn", s));
    }

    match compact.len() {
        10 => {
            let digits = &compact[..9];
            let last = compact[9..].to_ascii_uppercase();
            if !digits.bytes().all(|b| b.is_ascii_digit())
                || !(last == "X" || last.bytes().all(|b| b.is_ascii_digit()))
            {
                return Err(ValueError::malformed("isbn", s));
            }
            if !is_valid_isbn10(&compact) {
                return Err(ValueError::InvalidChecksum {
                    kind: "isbn",
                    input: s.to_string(),
                });
            }
            let body = format!("978{digits}");
            let check = ean13_check_digit(&body).ok_or_else(|| ValueError::malformed("isbn", s))?;
            Ok(format!("{body}{check}"))
        }
        13 => {
            if !compact.bytes().all(|b| b.is_ascii_digit())
                || !(compact.starts_with("978") || compact.starts_with("979"))
            {
                return Err(ValueError::malformed("isbn", s));
            }
            if !is_valid_ean13(&compact) {
                return Err(ValueError::InvalidChecksum {
                    kind: "isbn",
                    input: s.to_string(),
                });
            }
            Ok(compact)
        }
        _ => Err(ValueError::malformed("isbn", s)),
    }
}
