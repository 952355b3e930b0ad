//! Resources stored as plain files under a directory.

use std::path::{Path, PathBuf};

use super::{normalize_name, write_resource, ResourceOutcome, ResourceProvider};
use crate::error::ConfigError;

/// A host whose bundled resources live in a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    /// Directory holding the bundled defaults.
    resources_root: PathBuf,
    /// Directory holding the live configuration.
    data_folder: PathBuf,
}

impl DirectoryResources {
    /// Creates a provider copying from `resources_root` into `data_folder`.
    pub fn new(resources_root: impl Into<PathBuf>, data_folder: impl Into<PathBuf>) -> Self {
        Self {
            resources_root: resources_root.into(),
            data_folder: data_folder.into(),
        }
    }

    /// Returns the directory the bundled resources are read from.
    pub fn resources_root(&self) -> &Path {
        &self.resources_root
    }
}

impl ResourceProvider for DirectoryResources {
    fn data_folder(&self) -> PathBuf {
        self.data_folder.clone()
    }

    fn save_resource(&self, name: &str, replace: bool) -> Result<ResourceOutcome, ConfigError> {
        let name = normalize_name(name)?;
        let source = self.resources_root.join(&name);

        if !source.is_file() {
            return Err(ConfigError::ResourceNotFound { name });
        }

        let bytes = std::fs::read(&source).map_err(|e| ConfigError::ReadFailed {
            path: source.clone(),
            source: e,
        })?;

        write_resource(&self.data_folder, &name, &bytes, replace)
    }
}
