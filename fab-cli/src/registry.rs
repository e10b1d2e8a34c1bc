//! Built-in plugin registrations.

use fab_runtime::ModuleRegistry;
use std::sync::Arc;

/// A module registry with every built-in plugin implementation.
///
/// Plugin descriptors bind to these by implementation id.
pub fn builtin_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register("assets", Arc::new(plugin_assets::AssetsPlugin::new()));
    registry.register("render-shell", Arc::new(plugin_render_shell::RenderShellPlugin::new()));
    registry.register("redirects", Arc::new(plugin_redirects::RedirectsPlugin::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_implementations_registered() {
        let registry = builtin_registry();
        assert!(registry.contains("assets"));
        assert!(registry.contains("render-shell"));
        assert!(registry.contains("redirects"));
        assert_eq!(registry.len(), 3);
    }
}
