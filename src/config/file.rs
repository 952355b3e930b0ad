//! A YAML configuration file backed by an in-memory mapping.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::codec;
use super::path;
use super::task::{ConfigTask, Execution};
use crate::error::ConfigError;
use crate::resource::{normalize_name, ResourceOutcome, ResourceProvider};

/// Result of loading a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read and the cache replaced.
    Loaded,
    /// No file exists at the target path; the cache was left untouched.
    Missing,
}

/// Result of materializing the bundled default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultOutcome {
    /// The bundled default was written to the data folder.
    Written,
    /// A file was already present and replacement was not requested.
    AlreadyExists,
    /// No owner is bound, so nothing was done.
    NoOwner,
}

impl From<ResourceOutcome> for DefaultOutcome {
    fn from(outcome: ResourceOutcome) -> Self {
        match outcome {
            ResourceOutcome::Written => DefaultOutcome::Written,
            ResourceOutcome::AlreadyExists => DefaultOutcome::AlreadyExists,
        }
    }
}

/// Options for [`ConfigFile::save_default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveDefaultOptions {
    /// Overwrite a file already present in the data folder. Defaults to false.
    pub replace: bool,
}

impl SaveDefaultOptions {
    /// Sets whether an existing file is overwritten.
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }
}

/// A YAML configuration file and its cached contents.
///
/// `ConfigFile` is a handle: clones share the same path and cache, which is
/// what lets background operations act on the caller's instance. Nothing
/// touches the filesystem until `load`, `save` or `save_default` is called.
///
/// Concurrent background operations on one handle are not ordered; the last
/// to finish wins.
#[derive(Clone)]
pub struct ConfigFile {
    inner: Arc<Inner>,
}

struct Inner {
    location: RwLock<Location>,
    cache: RwLock<Mapping>,
}

struct Location {
    /// Where the live file is read from and written to.
    file: PathBuf,
    /// Name of the bundled default resource.
    resource: String,
    owner: Option<Arc<dyn ResourceProvider>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl ConfigFile {
    /// Creates a config file at `file` with no owner.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let resource = file.to_string_lossy().into_owned();

        Self {
            inner: Arc::new(Inner {
                location: RwLock::new(Location {
                    file,
                    resource,
                    owner: None,
                }),
                cache: RwLock::new(Mapping::new()),
            }),
        }
    }

    /// Creates a config file bound to an owner that supplies its default.
    pub fn with_owner(owner: Arc<dyn ResourceProvider>, file: impl Into<PathBuf>) -> Self {
        let config = Self::new(file);
        config.set_owner(Some(owner));
        config
    }

    /// Returns the bound owner, if any.
    pub fn owner(&self) -> Option<Arc<dyn ResourceProvider>> {
        read(&self.inner.location).owner.clone()
    }

    /// Binds or unbinds the owner.
    pub fn set_owner(&self, owner: Option<Arc<dyn ResourceProvider>>) -> &Self {
        write(&self.inner.location).owner = owner;
        self
    }

    /// Returns the path of the live file.
    pub fn file(&self) -> PathBuf {
        read(&self.inner.location).file.clone()
    }

    /// Returns the path of the live file as a string.
    pub fn file_path(&self) -> String {
        read(&self.inner.location).file.to_string_lossy().into_owned()
    }

    /// Repoints the live file. Does not load or save.
    pub fn set_file(&self, file: impl Into<PathBuf>) -> &Self {
        write(&self.inner.location).file = file.into();
        self
    }

    /// Returns the name of the bundled default resource.
    pub fn resource(&self) -> String {
        read(&self.inner.location).resource.clone()
    }

    /// Sets the name of the bundled default resource.
    pub fn set_resource(&self, name: impl Into<String>) -> &Self {
        write(&self.inner.location).resource = name.into();
        self
    }

    /// Returns true if the live file currently exists.
    pub fn exist(&self) -> bool {
        self.file().exists()
    }

    /// Reads the live file into the cache.
    ///
    /// A missing file is not an error: the cache is left as it is and
    /// [`LoadOutcome::Missing`] is returned. On a read or parse failure the
    /// cache is also left as it is.
    pub fn load(&self) -> Result<LoadOutcome, ConfigError> {
        let file = self.file();

        if !file.exists() {
            debug!(path = %file.display(), "Config file not found, keeping cache");
            return Ok(LoadOutcome::Missing);
        }

        let mapping = codec::read_mapping(&file)?;
        let entries = mapping.len();
        *write(&self.inner.cache) = mapping;

        debug!(path = %file.display(), entries, "Config loaded");
        Ok(LoadOutcome::Loaded)
    }

    /// Runs [`load`](Self::load) inline or in the background.
    pub fn load_in(&self, execution: Execution) -> ConfigTask<LoadOutcome> {
        let config = self.clone();
        ConfigTask::run(execution, move || config.load())
    }

    /// Writes the cache to the live file, creating parent directories.
    pub fn save(&self) -> Result<(), ConfigError> {
        let file = self.file();
        let cache = read(&self.inner.cache);

        codec::write_mapping(&file, &cache)?;

        debug!(path = %file.display(), entries = cache.len(), "Config saved");
        Ok(())
    }

    /// Runs [`save`](Self::save) inline or in the background.
    pub fn save_in(&self, execution: Execution) -> ConfigTask<()> {
        let config = self.clone();
        ConfigTask::run(execution, move || config.save())
    }

    /// Copies the bundled default into the owner's data folder and repoints
    /// the live file there.
    ///
    /// Without an owner this does nothing and returns
    /// [`DefaultOutcome::NoOwner`].
    pub fn save_default(&self, options: SaveDefaultOptions) -> Result<DefaultOutcome, ConfigError> {
        match self.owner() {
            Some(owner) => self.save_default_from(owner.as_ref(), options),
            None => {
                debug!(resource = %self.resource(), "No owner bound, skipping default");
                Ok(DefaultOutcome::NoOwner)
            }
        }
    }

    /// Runs [`save_default`](Self::save_default) inline or in the background.
    pub fn save_default_in(
        &self,
        options: SaveDefaultOptions,
        execution: Execution,
    ) -> ConfigTask<DefaultOutcome> {
        let config = self.clone();
        ConfigTask::run(execution, move || config.save_default(options))
    }

    /// Like [`save_default`](Self::save_default), against an explicit owner
    /// rather than the bound one.
    pub fn save_default_from(
        &self,
        owner: &dyn ResourceProvider,
        options: SaveDefaultOptions,
    ) -> Result<DefaultOutcome, ConfigError> {
        let resource = normalize_name(&self.resource())?;
        let outcome = owner.save_resource(&resource, options.replace)?;

        let file = owner.data_folder().join(&resource);
        debug!(
            resource = %resource,
            path = %file.display(),
            ?outcome,
            "Default config materialized"
        );
        self.set_file(file);

        Ok(outcome.into())
    }

    /// Empties the cache without touching the filesystem.
    pub fn clear_config(&self) -> &Self {
        write(&self.inner.cache).clear();
        self
    }

    /// Shared access to the live cache.
    ///
    /// Holding the guard blocks writers, including background loads.
    pub fn cache(&self) -> RwLockReadGuard<'_, Mapping> {
        read(&self.inner.cache)
    }

    /// Exclusive access to the live cache. Changes are persisted by the next
    /// [`save`](Self::save).
    pub fn cache_mut(&self) -> RwLockWriteGuard<'_, Mapping> {
        write(&self.inner.cache)
    }

    /// Returns an owned copy of the cache.
    pub fn snapshot(&self) -> Mapping {
        self.cache().clone()
    }

    /// Returns the value at a dotted path such as `server.slots`.
    pub fn get(&self, key: &str) -> Option<Value> {
        path::get(&self.cache(), key).cloned()
    }

    /// Sets the value at a dotted path, creating sections as needed.
    ///
    /// A path with an empty segment (`""`, `a..b`) is rejected and the cache
    /// is left unchanged.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<&Self, ConfigError> {
        if !path::set(&mut self.cache_mut(), key, value.into()) {
            return Err(ConfigError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self)
    }

    /// Removes and returns the value at a dotted path.
    pub fn remove(&self, key: &str) -> Option<Value> {
        path::remove(&mut self.cache_mut(), key)
    }

    /// Returns true if a value exists at a dotted path.
    pub fn contains(&self, key: &str) -> bool {
        path::get(&self.cache(), key).is_some()
    }

    /// Returns the top-level keys in file order.
    pub fn keys(&self) -> Vec<String> {
        self.cache()
            .keys()
            .map(|key| match key {
                Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Returns true if `other` is a handle to the same config file.
    pub fn same_as(&self, other: &ConfigFile) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let location = read(&self.inner.location);
        f.debug_struct("ConfigFile")
            .field("file", &location.file)
            .field("resource", &location.resource)
            .field("has_owner", &location.owner.is_some())
            .field("entries", &read(&self.inner.cache).len())
            .finish()
    }
}
