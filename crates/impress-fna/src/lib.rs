//! fna - file-name attributes
//!
//! A small command language for reading, editing and writing the key/value
//! attributes embedded in file names. Commands are run in order by a
//! [`Runner`] against one [`AttributeMap`](impress_attrmap::AttributeMap).
//!
//! ```text
//! fna file 'Mr. Book [isbn=9780123456786].pdf' add a 'Paul Penman' rename
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod filename;
pub mod logging;
pub mod rename;
pub mod runner;

pub use command::{Builtin, CommandSpec, Op, Selection, COMMANDS};
pub use config::{Config, Options};
pub use error::{Result, RunError};
pub use filename::FileContext;
pub use rename::{FsRenamer, Renamer};
pub use runner::Runner;
