//! Bundled default resources and the host that owns them.

pub mod directory;
pub mod embedded;

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ConfigError;
pub use directory::DirectoryResources;
pub use embedded::EmbeddedResources;

/// What happened when a bundled resource was copied out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// The resource was written to the data folder.
    Written,
    /// The target already existed and replacement was not requested.
    AlreadyExists,
}

/// The plugin host: a data folder plus a set of bundled resources.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceProvider: Send + Sync {
    /// Directory where live configuration files are kept.
    fn data_folder(&self) -> PathBuf;

    /// Copies the bundled resource `name` into the data folder.
    ///
    /// An existing file is only overwritten when `replace` is true.
    fn save_resource(&self, name: &str, replace: bool) -> Result<ResourceOutcome, ConfigError>;
}

/// Normalises a resource name to forward slashes and rejects names that could
/// escape the data folder.
pub fn normalize_name(name: &str) -> Result<String, ConfigError> {
    let normalized = name.replace('\\', "/");
    let invalid = || ConfigError::InvalidResourceName {
        name: name.to_string(),
    };

    if normalized.is_empty() {
        return Err(invalid());
    }

    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }

    Ok(normalized)
}

/// Writes resource bytes to `data_folder/name`.
pub(crate) fn write_resource(
    data_folder: &Path,
    name: &str,
    bytes: &[u8],
    replace: bool,
) -> Result<ResourceOutcome, ConfigError> {
    let target = data_folder.join(name);

    if target.exists() && !replace {
        warn!(
            resource = name,
            path = %target.display(),
            "Could not save resource because the target already exists"
        );
        return Ok(ResourceOutcome::AlreadyExists);
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(&target, bytes).map_err(|e| ConfigError::WriteFailed {
        path: target.clone(),
        source: e,
    })?;

    debug!(resource = name, path = %target.display(), "Saved bundled resource");
    Ok(ResourceOutcome::Written)
}
