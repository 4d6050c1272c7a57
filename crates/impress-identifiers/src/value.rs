//! The closed set of attribute values
//!
//! Every [`Value`] has a short form (its `Display`), a long URI-like form,
//! and a `repr` form naming its kind. Casting to a URI or URL goes through
//! [`Value::cast_params`], which supplies the path plus the remaining
//! components for each variant; [`Value::cast`] assembles them.

use std::fmt;
use std::rc::Rc;

use crate::doi::{escape_path, Doi};
use crate::error::{Result, ValueError};
use crate::isbn::Isbn;
use crate::lccn::Lccn;
use crate::site::{Site, SiteId};
use crate::uri::{Uri, UriForm};

/// What a value is being cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastTarget {
    /// A location-independent identifier (`info:`, `urn:`, ...)
    Uri,
    /// A dereferenceable web address
    Url,
}

impl CastTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CastTarget::Uri => "uri",
            CastTarget::Url => "url",
        }
    }
}

/// URI components other than the path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CastParams {
    pub scheme: String,
    pub form: UriForm,
    pub authority: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl CastParams {
    fn new(scheme: &str, form: UriForm, authority: &str) -> Self {
        CastParams {
            scheme: scheme.to_string(),
            form,
            authority: Some(authority.to_string()),
            ..CastParams::default()
        }
    }

    fn into_uri(self, path: String) -> Uri {
        Uri {
            scheme: self.scheme,
            form: self.form,
            authority: self.authority,
            path,
            query: self.query,
            fragment: self.fragment,
        }
    }
}

impl From<Uri> for (String, CastParams) {
    fn from(uri: Uri) -> Self {
        (
            uri.path,
            CastParams {
                scheme: uri.scheme,
                form: uri.form,
                authority: uri.authority,
                query: uri.query,
                fragment: uri.fragment,
            },
        )
    }
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Doi(Doi),
    Lccn(Lccn),
    Isbn(Isbn),
    Uri(Uri),
    Url(Uri),
    Site(SiteId),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Kind name, as used by the `repr` form.
    pub fn kind_name(&self) -> &str {
        match self {
            Value::Text(_) => "text",
            Value::Doi(d) => d.kind().as_str(),
            Value::Lccn(_) => "lccn",
            Value::Isbn(_) => "isbn",
            Value::Uri(_) => "uri",
            Value::Url(_) => "url",
            Value::Site(s) => &s.site().name,
        }
    }

    fn error_kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Doi(d) => d.kind().as_str(),
            Value::Lccn(_) => "lccn",
            Value::Isbn(_) => "isbn",
            Value::Uri(_) => "uri",
            Value::Url(_) => "url",
            Value::Site(_) => "site",
        }
    }

    fn unsupported(&self, target: CastTarget) -> ValueError {
        ValueError::UnsupportedCast {
            kind: self.error_kind(),
            target: target.as_str(),
        }
    }

    /// The path and remaining components of the cast to `target`.
    pub fn cast_params(&self, target: CastTarget) -> Result<(String, CastParams)> {
        match (self, target) {
            (Value::Text(s), CastTarget::Url) => Ok(Uri::from_text(s).into()),
            (Value::Text(s), CastTarget::Uri) => Uri::parse(s)
                .map(Into::into)
                .map_err(|_| self.unsupported(target)),

            (Value::Doi(d), CastTarget::Uri) => Ok((
                d.spath(),
                CastParams::new("info", UriForm::Info, d.kind().as_str()),
            )),
            (Value::Doi(d), CastTarget::Url) => Ok((
                format!("{}/{}", d.prefix_string(), escape_path(d.suffix())),
                CastParams::new("https", UriForm::Hierarchical, d.kind().resolver()),
            )),

            (Value::Lccn(l), CastTarget::Uri) => Ok((
                l.to_string(),
                CastParams::new("info", UriForm::Info, "lccn"),
            )),
            (Value::Lccn(l), CastTarget::Url) => Ok((
                l.to_string(),
                CastParams::new("https", UriForm::Hierarchical, "lccn.loc.gov"),
            )),

            (Value::Isbn(i), CastTarget::Uri) => Ok((
                i.isbn13().to_string(),
                CastParams::new("urn", UriForm::Urn, "isbn"),
            )),

            (Value::Uri(u), CastTarget::Uri) | (Value::Url(u), _) => Ok(u.clone().into()),
            (Value::Uri(u), CastTarget::Url) if u.is_web() => Ok(u.clone().into()),

            (Value::Site(s), CastTarget::Url) => Ok(s.url().into()),

            _ => Err(self.unsupported(target)),
        }
    }

    pub fn cast(&self, target: CastTarget) -> Result<Uri> {
        let (path, params) = self.cast_params(target)?;
        Ok(params.into_uri(path))
    }

    pub fn uri(&self) -> Result<Uri> {
        self.cast(CastTarget::Uri)
    }

    pub fn url(&self) -> Result<Uri> {
        self.cast(CastTarget::Url)
    }

    /// The short form; identical to `Display`.
    pub fn short(&self) -> String {
        self.to_string()
    }

    /// The long, URI-like form.
    pub fn long(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Doi(d) => d.long(),
            Value::Lccn(l) => format!("info:lccn/{l}"),
            Value::Isbn(i) => format!("urn:isbn:{}", i.isbn13()),
            Value::Uri(u) | Value::Url(u) => u.to_string(),
            Value::Site(s) => s.url().to_string(),
        }
    }

    /// `kind(short)`
    pub fn repr(&self) -> String {
        format!("{}({})", self.kind_name(), self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Doi(d) => write!(f, "{d}"),
            Value::Lccn(l) => write!(f, "{l}"),
            Value::Isbn(i) => write!(f, "{i}"),
            Value::Uri(u) | Value::Url(u) => write!(f, "{u}"),
            Value::Site(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// A value constructor, selected by attribute key in typed factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Doi,
    Lccn,
    Isbn,
    Uri,
    Url,
    Site(Rc<Site>),
}

impl ValueKind {
    pub fn parse(&self, raw: &str) -> Result<Value> {
        Ok(match self {
            ValueKind::Text => Value::text(raw),
            ValueKind::Doi => Value::Doi(Doi::parse(raw)?),
            ValueKind::Lccn => Value::Lccn(Lccn::new(raw)),
            ValueKind::Isbn => Value::Isbn(Isbn::parse(raw)?),
            ValueKind::Uri => Value::Uri(Uri::parse(raw)?),
            ValueKind::Url => Value::Url(Uri::from_text(raw)),
            ValueKind::Site(site) => Value::Site(SiteId::parse(Rc::clone(site), raw)?),
        })
    }
}

/// Attribute keys with a built-in value kind.
pub fn standard_kinds() -> Vec<(&'static str, ValueKind)> {
    vec![
        ("doi", ValueKind::Doi),
        ("hdl", ValueKind::Doi),
        ("lccn", ValueKind::Lccn),
        ("isbn", ValueKind::Isbn),
        ("uri", ValueKind::Uri),
        ("url", ValueKind::Url),
    ]
}
