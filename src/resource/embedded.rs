//! Resources compiled into the binary.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;

use super::{normalize_name, write_resource, ResourceOutcome, ResourceProvider};
use crate::error::ConfigError;

/// A host whose bundled resources are in-memory byte blobs.
///
/// ```
/// use plugin_config::resource::EmbeddedResources;
///
/// let host = EmbeddedResources::new("plugins/Lobby")
///     .with_resource("config.yml", &b"motd: Welcome\n"[..]);
/// assert!(host.contains("config.yml"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    data_folder: PathBuf,
    resources: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedResources {
    /// Creates an empty provider writing into `data_folder`.
    pub fn new(data_folder: impl Into<PathBuf>) -> Self {
        Self {
            data_folder: data_folder.into(),
            resources: HashMap::new(),
        }
    }

    /// Registers a resource under `name`.
    pub fn with_resource(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        let name = name.into().replace('\\', "/");
        self.resources.insert(name, bytes.into());
        self
    }

    /// Returns true if a resource is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(&name.replace('\\', "/"))
    }
}

impl ResourceProvider for EmbeddedResources {
    fn data_folder(&self) -> PathBuf {
        self.data_folder.clone()
    }

    fn save_resource(&self, name: &str, replace: bool) -> Result<ResourceOutcome, ConfigError> {
        let name = normalize_name(name)?;
        let bytes = self
            .resources
            .get(&name)
            .ok_or_else(|| ConfigError::ResourceNotFound { name: name.clone() })?;

        write_resource(&self.data_folder, &name, bytes, replace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saves_registered_resource() {
        let data = tempfile::tempdir().unwrap();
        let provider = EmbeddedResources::new(data.path())
            .with_resource("lang\\en.yml", &b"greeting: hi\n"[..]);

        assert!(provider.contains("lang/en.yml"));
        let outcome = provider.save_resource("lang/en.yml", false).unwrap();

        assert_eq!(outcome, ResourceOutcome::Written);
        assert_eq!(
            std::fs::read_to_string(data.path().join("lang/en.yml")).unwrap(),
            "greeting: hi\n"
        );
    }

    #[test]
    fn test_unregistered_resource_is_an_error() {
        let data = tempfile::tempdir().unwrap();
        let provider = EmbeddedResources::new(data.path());

        let err = provider.save_resource("config.yml", true).unwrap_err();
        assert!(matches!(err, ConfigError::ResourceNotFound { .. }));
    }
}
