//! Dotted-path access into nested YAML mappings.
//!
//! A path such as `database.pool.size` walks one mapping per segment.

use serde_yaml::{Mapping, Value};

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Looks up the value at `path`.
pub fn get<'a>(root: &'a Mapping, path: &str) -> Option<&'a Value> {
    let (parents, leaf) = split(path)?;

    let mut current = root;
    for segment in parents {
        current = current.get(segment)?.as_mapping()?;
    }

    current.get(leaf)
}

/// Sets the value at `path`, creating intermediate mappings as needed.
///
/// Non-mapping values standing where a section is needed are replaced.
/// Returns false, leaving `root` untouched, if `path` is not a valid path.
pub fn set(root: &mut Mapping, path: &str, value: Value) -> bool {
    let Some((parents, leaf)) = split(path) else {
        return false;
    };

    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(Value::from(segment))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !slot.is_mapping() {
            *slot = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(section) = slot else {
            return false;
        };
        current = section;
    }

    current.insert(Value::from(leaf), value);
    true
}

/// Removes and returns the value at `path`.
pub fn remove(root: &mut Mapping, path: &str) -> Option<Value> {
    let (parents, leaf) = split(path)?;

    let mut current = root;
    for segment in parents {
        current = current.get_mut(segment)?.as_mapping_mut()?;
    }

    current.shift_remove(leaf)
}

fn split(path: &str) -> Option<(Vec<&str>, &str)> {
    let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }

    let leaf = segments.pop()?;
    Some((segments, leaf))
}
