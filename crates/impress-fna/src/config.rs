//! Configuration files
//!
//! Configuration is TOML. Files named on the command line are read in
//! order; otherwise the first match of each standard name is taken from
//! the XDG configuration directories. All files are merged into one table
//! before use.
//!
//! ```toml
//! [option]
//! decoder = "v3"
//! encoder = "v3"
//! factory = "loose"
//! mode = "short"
//! isbn_ranges = "/path/to/RangeMessage.xml"
//!
//! [site.danbooru]
//! name = "Danbooru"
//! host = "danbooru.donmai.us"
//! path = "posts/{}"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use impress_attrmap::{Registries, RegistryKind};
use impress_identifiers::{RangeTable, Site};
use serde::Deserialize;
use toml::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, RunError};

/// File names searched for in each configuration directory.
pub const CONFIG_NAMES: [&str; 4] = ["vlju.toml", "fnattr/vlju.toml", "fna.toml", "fnattr/fna.toml"];

/// The `[option]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub decoder: Option<String>,
    pub encoder: Option<String>,
    pub factory: Option<String>,
    pub mode: Option<String>,
    pub isbn_ranges: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub option: Options,
    pub site: BTreeMap<String, Site>,
}

impl Config {
    /// Load `explicit` files, or search the standard locations when there
    /// are none and `search` is set.
    pub fn load(explicit: &[PathBuf], search: bool) -> Result<Self> {
        let files: Vec<PathBuf> = if !explicit.is_empty() {
            explicit.to_vec()
        } else if search {
            let dirs = config_dirs();
            CONFIG_NAMES
                .iter()
                .filter_map(|name| find_first(&dirs, name))
                .collect()
        } else {
            Vec::new()
        };
        Self::from_files(&files)
    }

    /// Read and merge `files` in order.
    ///
    /// A file that is not valid TOML is skipped with a warning.
    pub fn from_files(files: &[PathBuf]) -> Result<Self> {
        let mut merged = Value::Table(toml::Table::new());
        for path in files {
            let text = fs::read_to_string(path).map_err(|e| RunError::Config {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            let table: toml::Table = match toml::from_str(&text) {
                Ok(table) => table,
                Err(e) => {
                    warn!("{}: {}", path.display(), e);
                    continue;
                }
            };
            debug!("config {}", path.display());
            merge(&mut merged, Value::Table(table)).map_err(|reason| RunError::Config {
                path: path.clone(),
                reason,
            })?;
        }
        merged.try_into().map_err(|e: toml::de::Error| RunError::Config {
            path: files.last().cloned().unwrap_or_default(),
            reason: e.to_string(),
        })
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RunError::Config {
            path: PathBuf::new(),
            reason: e.to_string(),
        })
    }

    /// Build session registries: register sites, select the configured
    /// defaults and install the ISBN range table.
    pub fn registries(&self) -> Result<Registries> {
        let registries = Registries::standard();
        registries.configure_sites(self.site.clone());

        for (kind, name) in [
            (RegistryKind::Factory, &self.option.factory),
            (RegistryKind::Encoder, &self.option.encoder),
            (RegistryKind::Decoder, &self.option.decoder),
            (RegistryKind::Mode, &self.option.mode),
        ] {
            if let Some(name) = name {
                registries
                    .select(kind, name)
                    .map_err(|source| RunError::Command {
                        command: format!("option.{}", kind.as_str()),
                        source,
                    })?;
            }
        }

        if let Some(path) = &self.option.isbn_ranges {
            install_ranges(path)?;
        }
        Ok(registries)
    }
}

/// Replace the bundled ISBN ranges with a registration range message.
pub fn install_ranges(path: &Path) -> Result<()> {
    let xml = fs::read_to_string(path).map_err(|e| RunError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let table = RangeTable::from_xml(&xml).map_err(|e| RunError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!("{} ISBN ranges from {}", table.len(), path.display());
    if RangeTable::install(table).is_err() {
        warn!("ISBN ranges already in use; ignoring {}", path.display());
    }
    Ok(())
}

/// Merge `other` into `base`: tables merge, arrays append, scalars replace.
pub fn merge(base: &mut Value, other: Value) -> std::result::Result<(), String> {
    match (base, other) {
        (Value::Table(base), Value::Table(other)) => {
            for (key, value) in other {
                match base.get_mut(&key) {
                    Some(existing) => {
                        merge(existing, value).map_err(|reason| format!("{key}: {reason}"))?
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (Value::Array(base), Value::Array(other)) => {
            base.extend(other);
            Ok(())
        }
        (Value::Table(_), other) | (Value::Array(_), other) => Err(format!(
            "cannot merge {} into a table or array",
            other.type_str()
        )),
        (base, other @ (Value::Table(_) | Value::Array(_))) => Err(format!(
            "cannot merge {} into {}",
            other.type_str(),
            base.type_str()
        )),
        (base, other) => {
            *base = other;
            Ok(())
        }
    }
}

/// XDG configuration directories, most specific first.
pub fn config_dirs() -> Vec<PathBuf> {
    config_dirs_from(dirs::config_dir(), std::env::var("XDG_CONFIG_DIRS").ok())
}

fn config_dirs_from(home: Option<PathBuf>, system: Option<String>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = home.into_iter().filter(|d| d.is_dir()).collect();
    match system {
        Some(list) => dirs.extend(
            list.split(':')
                .map(PathBuf::from)
                .filter(|d| d.is_absolute() && d.is_dir()),
        ),
        None => {
            let etc = PathBuf::from("/etc/xdg");
            if etc.is_dir() {
                dirs.push(etc);
            }
        }
    }
    dirs
}

/// The first existing `dir/name`.
pub fn find_first(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter().map(|d| d.join(name)).find(|p| p.exists())
}
