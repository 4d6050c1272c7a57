//! DOIs (Digital Object Identifiers) and Handles
//!
//! A DOI is a Handle whose prefix starts with `10`. Both are stored as a
//! numeric dotted prefix and a case-folded suffix.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, ValueError};

lazy_static! {
    // Accepts bare `prefix/suffix` or `prefix,suffix`, `doi:`, `doi/`, `hdl/`,
    // `info:doi/`, `info:hdl/`, and the doi.org / hdl.handle.net resolvers.
    static ref DOI_PATTERN: Regex = Regex::new(
        r"^(?P<scheme>https?://(?:(?:dx\.)?doi\.org|hdl\.handle\.net)/|(?:info:)?(?:hdl|doi)/|doi:/*)?(?P<prefix>\d[\d.]*)[/,](?P<suffix>.+)$"
    ).unwrap();
}

/// Whether an identifier is a DOI or a generic Handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoiKind {
    Doi,
    Handle,
}

impl DoiKind {
    /// Authority used in `info:` URIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DoiKind::Doi => "doi",
            DoiKind::Handle => "hdl",
        }
    }

    /// Host of the HTTP resolver.
    pub fn resolver(&self) -> &'static str {
        match self {
            DoiKind::Doi => "doi.org",
            DoiKind::Handle => "hdl.handle.net",
        }
    }
}

/// A DOI or Handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Doi {
    prefix: Vec<u64>,
    suffix: String,
}

impl Doi {
    /// Build from components. Both must be non-empty.
    pub fn new(prefix: Vec<u64>, suffix: &str) -> Result<Self> {
        if prefix.is_empty() || suffix.is_empty() {
            return Err(ValueError::malformed("doi", format!("{prefix:?}/{suffix}")));
        }
        Ok(Doi {
            prefix,
            suffix: suffix.to_lowercase(),
        })
    }

    /// Parse any of the accepted surface syntaxes.
    pub fn parse(s: &str) -> Result<Self> {
        let caps = DOI_PATTERN
            .captures(s)
            .ok_or_else(|| ValueError::malformed("doi", s))?;

        let scheme = caps.name("scheme").map_or("", |m| m.as_str());
        let prefix = parse_prefix(&caps["prefix"]).ok_or_else(|| ValueError::malformed("doi", s))?;

        let raw_suffix = &caps["suffix"];
        let suffix = if scheme.starts_with("http") || scheme.starts_with("info") {
            urlencoding::decode(raw_suffix)
                .map_err(|_| ValueError::malformed("doi", s))?
                .into_owned()
        } else {
            raw_suffix.to_string()
        };

        Doi::new(prefix, &suffix)
    }

    pub fn prefix(&self) -> &[u64] {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn kind(&self) -> DoiKind {
        if self.prefix[0] == 10 {
            DoiKind::Doi
        } else {
            DoiKind::Handle
        }
    }

    pub fn prefix_string(&self) -> String {
        self.prefix
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// `prefix/suffix`, the path used when casting.
    pub fn spath(&self) -> String {
        format!("{}/{}", self.prefix_string(), self.suffix)
    }

    /// `info:hdl/prefix/suffix`
    pub fn hdl(&self) -> String {
        format!("info:hdl/{}", self.spath())
    }

    /// `doi:prefix/suffix` for DOIs, `info:hdl/…` for other Handles.
    pub fn long(&self) -> String {
        match self.kind() {
            DoiKind::Doi => format!("doi:{}/{}", self.prefix_string(), escape_path(&self.suffix)),
            DoiKind::Handle => self.hdl(),
        }
    }
}

impl fmt::Display for Doi {
    /// The short form `prefix,suffix`, which contains no `/`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.prefix_string(), self.suffix)
    }
}

fn parse_prefix(s: &str) -> Option<Vec<u64>> {
    s.split('.').map(|p| p.parse::<u64>().ok()).collect()
}

/// Percent-encode the characters that would end a URI path.
pub(crate) fn escape_path(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare() {
        let doi = Doi::parse("10.1234/5678-90").unwrap();
        assert_eq!(doi.prefix(), &[10, 1234]);
        assert_eq!(doi.suffix(), "5678-90");
        assert_eq!(doi.kind(), DoiKind::Doi);
        assert_eq!(doi.to_string(), "10.1234,5678-90");
    }

    #[test]
    fn test_parse_comma_form() {
        assert_eq!(
            Doi::parse("10.1234,5678-90").unwrap(),
            Doi::parse("10.1234/5678-90").unwrap()
        );
    }

    #[test]
    fn test_suffix_is_case_folded() {
        let doi = Doi::parse("10.1038/Nature12373").unwrap();
        assert_eq!(doi.suffix(), "nature12373");
    }

    #[test]
    fn test_http_suffix_is_decoded() {
        let doi = Doi::parse("https://doi.org/10.1000/a%2Fb").unwrap();
        assert_eq!(doi.suffix(), "a/b");
        // no decoding without an HTTP or info origin
        let doi = Doi::parse("doi:10.1000/a%2Fb").unwrap();
        assert_eq!(doi.suffix(), "a%2fb");
    }

    #[test]
    fn test_handle() {
        let hdl = Doi::parse("hdl/2027/mdp.39015").unwrap();
        assert_eq!(hdl.kind(), DoiKind::Handle);
        assert_eq!(hdl.long(), "info:hdl/2027/mdp.39015");
    }

    #[test]
    fn test_long_form() {
        let doi = Doi::parse("10.1000/what is#this").unwrap();
        assert_eq!(doi.long(), "doi:10.1000/what%20is%23this");
    }

    #[test]
    fn test_malformed() {
        assert!(Doi::parse("nature12373").is_err());
        assert!(Doi::parse("10.1234/").is_err());
        assert!(Doi::parse("10..1/x").is_err());
        assert!(Doi::parse("ftp://doi.org/10.1/x").is_err());
    }
}
