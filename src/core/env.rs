//! Environment variable mappings.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

use serde::{Serialize, Serializer};

/// An immutable-by-convention mapping of environment variables.
///
/// Values are built fresh for each subprocess and handed to it explicitly;
/// nothing here ever touches the orchestrator's own environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Environment {
            vars: BTreeMap::new(),
        }
    }

    /// Snapshot the current process environment.
    pub fn ambient() -> Self {
        std::env::vars_os().collect()
    }

    /// Set a variable, replacing any existing value.
    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Builder-style [`Environment::set`].
    pub fn with(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a variable as UTF-8, if present and valid.
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&str> {
        self.get_os(key).and_then(|v| v.to_str())
    }

    /// Get a variable's raw value.
    pub fn get_os(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(|v| v.as_os_str())
    }

    pub fn contains_key(&self, key: impl AsRef<OsStr>) -> bool {
        self.vars.contains_key(key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    /// Return a new mapping with `layer` applied on top of `self`.
    ///
    /// Keys in `layer` win on collision. No key is ever removed.
    pub fn layered(&self, layer: &Environment) -> Environment {
        let mut merged = self.clone();
        for (key, value) in &layer.vars {
            merged.vars.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<OsString>,
    V: Into<OsString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Environment {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.vars
                .iter()
                .map(|(k, v)| (k.to_string_lossy(), v.to_string_lossy())),
        )
    }
}
