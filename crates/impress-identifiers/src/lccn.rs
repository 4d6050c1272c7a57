//! LCCN - Library of Congress Control Number

use std::fmt;

/// A normalized LCCN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lccn(String);

impl Lccn {
    /// Normalize according to the `info:lccn` rules. Never fails.
    pub fn new(s: &str) -> Self {
        Lccn(normalize(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lccn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip spaces, drop anything from a `/` on, zero-pad the serial number
/// after a `-` to six digits, and lowercase.
pub fn normalize(s: &str) -> String {
    let mut s: String = s.chars().filter(|c| *c != ' ').collect();

    if let Some(n) = s.find('/').filter(|&n| n > 0) {
        s.truncate(n);
    }

    if let Some(n) = s.find('-').filter(|&n| n > 0) {
        let serial = &s[n + 1..];
        let serial = if !serial.is_empty() && serial.bytes().all(|b| b.is_ascii_digit()) {
            let trimmed = serial.trim_start_matches('0');
            format!("{trimmed:0>6}")
        } else {
            format!("{serial:0>6}")
        };
        s = format!("{}{}", &s[..n], serial);
    }

    s.to_lowercase()
}
