//! Parsed Fab configuration.
//!
//! The configuration is ingested once (the CLI reads it from `fab.toml`)
//! and is read-only afterwards. The `build` map is order-significant: its
//! insertion order defines build execution order, so it is backed by an
//! `IndexMap` rather than a sorted or hashed map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single plugin argument value.
///
/// Arguments are scalars; patterns are written as strings and compiled by
/// the plugin that consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value (also used for patterns).
    Str(String),
}

impl ArgValue {
    /// The value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<i64> for ArgValue {
    fn from(n: i64) -> Self {
        ArgValue::Int(n)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

/// Arguments configured for one plugin, in configuration order.
///
/// Immutable once read from config; an absent argument is a missing key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginArgs(IndexMap<String, ArgValue>);

impl PluginArgs {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Look up an argument by name.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    /// Look up a string argument by name.
    pub fn str_arg(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    /// Look up an integer argument by name.
    pub fn int_arg(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_int)
    }

    /// Look up a boolean argument by name.
    pub fn bool_arg(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ArgValue::as_bool)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no arguments were configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over arguments in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for PluginArgs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The build section of the configuration: plugin identifier to arguments,
/// in build execution order.
pub type BuildConfig = IndexMap<String, PluginArgs>;

/// Flat per-environment settings exposed to responders at request time.
pub type FabSettings = BTreeMap<String, String>;

/// The parsed Fab configuration.
///
/// Read once at build start and never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FabConfig {
    /// Build plugins, in execution order.
    #[serde(default)]
    pub build: BuildConfig,

    /// Runtime plugin identifiers, in chain order.
    #[serde(default)]
    pub runtime: Vec<String>,

    /// Per-environment settings.
    #[serde(default)]
    pub settings: BTreeMap<String, FabSettings>,
}

impl FabConfig {
    /// Settings for one deployment environment.
    ///
    /// An unknown environment yields an empty map, not an error: settings
    /// are optional and responders must tolerate their absence.
    pub fn settings_for(&self, env: &str) -> FabSettings {
        self.settings.get(env).cloned().unwrap_or_default()
    }
}
