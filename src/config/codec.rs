//! YAML file reading and writing.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

/// Reads a YAML file from disk and parses its top-level mapping.
///
/// An empty document parses as an empty mapping.
pub fn read_mapping(path: &Path) -> Result<Mapping, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_mapping(path, &content)
}

/// Parses YAML text whose top level must be a mapping.
pub fn parse_mapping(path: &Path, content: &str) -> Result<Mapping, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        Value::Tagged(tagged) => match tagged.value {
            Value::Mapping(mapping) => Ok(mapping),
            _ => Err(top_level_error(path)),
        },
        _ => Err(top_level_error(path)),
    }
}

fn top_level_error(path: &Path) -> ConfigError {
    ConfigError::ParseFailed {
        path: path.to_path_buf(),
        message: "top level is not a mapping".to_string(),
    }
}

/// Serializes a mapping and writes it to disk, creating parent directories.
pub fn write_mapping(path: &Path, mapping: &Mapping) -> Result<(), ConfigError> {
    let content = if mapping.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(mapping).map_err(|e| ConfigError::SerializeFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
