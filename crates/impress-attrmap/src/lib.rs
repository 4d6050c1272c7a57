//! Impress AttrMap - ordered multi-valued attribute maps for file names
//!
//! - **Registry**: named strategies with a shared, switchable default
//! - **Factory**: builds typed values from raw strings by key (`raw`, `loose`, `strict`)
//! - **Codec**: `v3` (`Title [k=v; k=v]`), `v2` (`Title {k=v;k=v}`) and `json`
//! - **Mode**: value rendering (`short`, `long`, `repr`)
//! - **AttributeMap**: the map itself, holding handles to a session's registries

pub mod codec;
pub mod error;
pub mod factory;
pub mod map;
pub mod mode;
pub mod registry;
pub mod session;

pub use codec::{BracketCodec, Decoder, Encoder, JsonCodec};
pub use error::{AttrError, Result};
pub use factory::{Factory, MappedFactory, RawFactory};
pub use map::{AttributeMap, IntoValue};
pub use mode::Mode;
pub use registry::{Registry, Shared};
pub use session::{Registries, RegistryKind};
