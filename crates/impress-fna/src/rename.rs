//! Moving files to their encoded names

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, RunError};

/// Moves a file from its original name to a new one.
pub trait Renamer {
    fn rename(&mut self, from: &Path, to: &Path) -> Result<()>;
}

/// Renames on the local file system.
///
/// Parent directories of the target are created. An existing target is
/// only accepted when it is the source file itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRenamer;

impl Renamer for FsRenamer {
    fn rename(&mut self, from: &Path, to: &Path) -> Result<()> {
        if to.exists() {
            if same_file(from, to)? {
                debug!("{} is already named {}", from.display(), to.display());
                return Ok(());
            }
            return Err(RunError::Rename {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                reason: "target exists".to_string(),
            });
        }
        if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::rename(from, to).map_err(|e| RunError::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!("renamed {} to {}", from.display(), to.display());
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> Result<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}
