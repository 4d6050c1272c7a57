//! Identifier values for file-name attributes
//!
//! This crate provides the typed values that attribute maps hold:
//! - plain text
//! - DOIs and Handles
//! - LCCNs (Library of Congress Control Numbers)
//! - ISBNs, split into registration segments using the ISBN range message
//! - generic URIs and URLs
//! - identifiers for configured web sites
//!
//! Every value has a short and a long string form and can be cast to a URI
//! or URL where a mapping exists.

pub mod doi;
pub mod error;
pub mod isbn;
pub mod lccn;
pub mod ranges;
pub mod site;
pub mod uri;
pub mod validators;
pub mod value;

pub use doi::{Doi, DoiKind};
pub use error::{Result, ValueError};
pub use isbn::Isbn;
pub use lccn::Lccn;
pub use ranges::RangeTable;
pub use site::{Site, SiteId};
pub use uri::{Uri, UriForm};
pub use value::{standard_kinds, CastParams, CastTarget, Value, ValueKind};
