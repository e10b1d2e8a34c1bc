//! Plugin descriptor parsing.
//!
//! A plugin's entry module is a `plugin.toml` file that names the
//! implementation supplying the module's capabilities, plus optional
//! display metadata and plugin-specific configuration.

use crate::error::{ResolveError, ResolveResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A parsed plugin descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Plugin identity.
    pub plugin: DescriptorMeta,

    /// Custom configuration key-value pairs.
    #[serde(default)]
    pub config: HashMap<String, toml::Value>,
}

/// Identity section of a descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorMeta {
    /// Registered implementation this module binds to.
    pub implementation: String,

    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,

    /// Version string.
    #[serde(default)]
    pub version: Option<String>,

    /// Plugin description.
    #[serde(default)]
    pub description: Option<String>,
}

impl PluginDescriptor {
    /// Load a descriptor from a TOML file.
    pub fn from_file(path: &Path) -> ResolveResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a descriptor from a TOML string.
    pub fn from_str(content: &str) -> ResolveResult<Self> {
        let descriptor: PluginDescriptor = toml::from_str(content)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Validate the descriptor.
    fn validate(&self) -> ResolveResult<()> {
        if self.plugin.implementation.is_empty() {
            return Err(ResolveError::InvalidDescriptor(
                "plugin implementation cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptor() {
        let toml = r#"
[plugin]
implementation = "render-shell"
name = "Render Shell"
version = "0.1.0"

[config]
greeting = "hello"
"#;

        let descriptor = PluginDescriptor::from_str(toml).unwrap();
        assert_eq!(descriptor.plugin.implementation, "render-shell");
        assert_eq!(descriptor.plugin.name.as_deref(), Some("Render Shell"));
        assert_eq!(
            descriptor.config.get("greeting"),
            Some(&toml::Value::String("hello".to_string()))
        );
    }

    #[test]
    fn test_minimal_descriptor() {
        let descriptor = PluginDescriptor::from_str("[plugin]\nimplementation = \"assets\"\n").unwrap();
        assert_eq!(descriptor.plugin.implementation, "assets");
        assert!(descriptor.plugin.name.is_none());
        assert!(descriptor.config.is_empty());
    }

    #[test]
    fn test_empty_implementation_rejected() {
        let result = PluginDescriptor::from_str("[plugin]\nimplementation = \"\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_plugin_section_rejected() {
        assert!(PluginDescriptor::from_str("config = {}\n").is_err());
    }
}
