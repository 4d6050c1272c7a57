//! Generic URIs and URLs
//!
//! A [`Uri`] keeps the five RFC 3986 components separately. The delimiter
//! layout is recorded in [`UriForm`] so that `info:` and `urn:` identifiers
//! print the way they are conventionally written.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, ValueError};

lazy_static! {
    // RFC 3986 appendix B, restricted to absolute references without spaces
    static ref URI_PATTERN: Regex = Regex::new(
        r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*):(?P<rest>[^?#\s]*)(?:\?(?P<query>[^#\s]*))?(?:#(?P<fragment>\S*))?$"
    ).unwrap();
}

/// How the scheme, authority and path are joined when printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UriForm {
    /// `scheme://authority/path`
    #[default]
    Hierarchical,
    /// `scheme:authority/path`, as in `info:doi/10.1000/182`
    Info,
    /// `scheme:authority:path`, as in `urn:isbn:9780123456786`
    Urn,
}

/// A URI split into components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Uri {
    pub scheme: String,
    pub form: UriForm,
    pub authority: Option<String>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl Uri {
    /// Parse an absolute URI. Relative references are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let caps = URI_PATTERN
            .captures(s)
            .ok_or_else(|| ValueError::malformed("uri", s))?;

        let scheme = caps["scheme"].to_string();
        let rest = &caps["rest"];
        let query = caps.name("query").map(|m| m.as_str().to_string());
        let fragment = caps.name("fragment").map(|m| m.as_str().to_string());

        let (form, authority, path) = if let Some(hier) = rest.strip_prefix("//") {
            match hier.split_once('/') {
                Some((a, p)) => (UriForm::Hierarchical, Some(a.to_string()), p.to_string()),
                None => (UriForm::Hierarchical, Some(hier.to_string()), String::new()),
            }
        } else if scheme.eq_ignore_ascii_case("urn") {
            match rest.split_once(':') {
                Some((a, p)) => (UriForm::Urn, Some(a.to_string()), p.to_string()),
                None => (UriForm::Urn, None, rest.to_string()),
            }
        } else if scheme.eq_ignore_ascii_case("info") {
            match rest.split_once('/') {
                Some((a, p)) => (UriForm::Info, Some(a.to_string()), p.to_string()),
                None => (UriForm::Info, None, rest.to_string()),
            }
        } else {
            (UriForm::Hierarchical, None, rest.to_string())
        };

        Ok(Uri {
            scheme,
            form,
            authority,
            path,
            query,
            fragment,
        })
    }

    /// Interpret free text as an `http` URL: the text up to the first `/`
    /// is the authority and the remainder is the path.
    pub fn from_text(s: &str) -> Self {
        if let Ok(uri) = Uri::parse(s) {
            return uri;
        }
        let (authority, path) = s.split_once('/').unwrap_or((s, ""));
        Uri {
            scheme: "http".to_string(),
            authority: Some(authority.to_string()),
            path: path.to_string(),
            ..Uri::default()
        }
    }

    /// True when the URI can be dereferenced over HTTP(S).
    pub fn is_web(&self) -> bool {
        self.form == UriForm::Hierarchical
            && self.authority.is_some()
            && (self.scheme.eq_ignore_ascii_case("http") || self.scheme.eq_ignore_ascii_case("https"))
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scheme)?;
        match (self.form, &self.authority) {
            (UriForm::Hierarchical, Some(a)) => {
                write!(f, "://{a}")?;
                if !self.path.is_empty() {
                    write!(f, "/{}", self.path)?;
                }
            }
            (UriForm::Info, Some(a)) => write!(f, ":{a}/{}", self.path)?,
            (UriForm::Urn, Some(a)) => write!(f, ":{a}:{}", self.path)?,
            (_, None) => write!(f, ":{}", self.path)?,
        }
        if let Some(q) = &self.query {
            write!(f, "?{q}")?;
        }
        if let Some(fr) = &self.fragment {
            write!(f, "#{fr}")?;
        }
        Ok(())
    }
}
