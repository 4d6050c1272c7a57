//! Identifiers for configured web sites
//!
//! A [`Site`] describes how an identifier maps onto a URL: each of the
//! `path`, `query` and `fragment` templates may contain `{}`, which is
//! replaced by the identifier. The same templates recover the identifier
//! from a URL on the site.

use std::fmt;
use std::rc::Rc;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, ValueError};
use crate::uri::Uri;

fn default_scheme() -> String {
    "https".to_string()
}

/// A site definition, as read from a `[site.KEY]` configuration table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Site {
    pub name: String,
    pub host: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub fragment: Option<String>,
}

impl Site {
    pub fn new(name: impl Into<String>, host: impl Into<String>, path: impl Into<String>) -> Self {
        Site {
            name: name.into(),
            host: host.into(),
            scheme: default_scheme(),
            path: path.into(),
            query: None,
            fragment: None,
        }
    }

    /// Fill the templates with `id`.
    pub fn url(&self, id: &str) -> Uri {
        Uri {
            scheme: self.scheme.clone(),
            authority: Some(self.host.clone()),
            path: fill(&self.path, id),
            query: self.query.as_deref().map(|q| fill(q, id)),
            fragment: self.fragment.as_deref().map(|f| fill(f, id)),
            ..Uri::default()
        }
    }

    /// Recover an identifier from a URL on this site.
    pub fn id_from_url(&self, url: &Uri) -> Option<String> {
        let host = url.authority.as_deref()?;
        if !same_host(host, &self.host) {
            return None;
        }
        let slots = [
            (Some(self.path.as_str()), Some(url.path.as_str())),
            (self.query.as_deref(), url.query.as_deref()),
            (self.fragment.as_deref(), url.fragment.as_deref()),
        ];
        slots.iter().find_map(|(template, actual)| match (template, actual) {
            (Some(t), Some(a)) if t.contains("{}") => match_template(t, a),
            _ => None,
        })
    }
}

/// An identifier on a particular [`Site`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteId {
    site: Rc<Site>,
    id: String,
}

impl SiteId {
    /// Accept either the bare identifier or a URL on the site.
    pub fn parse(site: Rc<Site>, s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(ValueError::malformed("site", s));
        }
        if let Ok(url) = Uri::parse(s) {
            if url.is_web() {
                return match site.id_from_url(&url) {
                    Some(id) => Ok(SiteId { site, id }),
                    None => Err(ValueError::malformed("site", s)),
                };
            }
        }
        Ok(SiteId {
            site,
            id: s.to_string(),
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> Uri {
        self.site.url(&self.id)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

fn fill(template: &str, id: &str) -> String {
    template.replace("{}", id)
}

fn same_host(a: &str, b: &str) -> bool {
    let a = a.trim_start_matches("www.");
    let b = b.trim_start_matches("www.");
    a.eq_ignore_ascii_case(b)
}

fn match_template(template: &str, actual: &str) -> Option<String> {
    let pattern = format!(
        "^{}$",
        regex::escape(template).replacen(r"\{\}", "(?P<id>.+?)", 1)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(actual)
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str().to_string())
}
