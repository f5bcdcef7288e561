// LayerRegistry — Explicit name → factory lookup
//
// Layers are constructed by type name through a registry the host owns and
// populates at initialization. There is no global mutable registry and no
// static registration side effects: a host that wants the built-in layers
// calls register_builtin() on its own registry instance.

use std::collections::HashMap;

use tracing::debug;

use shunt_core::element::Element;
use shunt_core::error::Result;

use crate::config::LayerConfig;
use crate::layer::Layer;
use crate::switch::Switch;

/// Builds a layer instance from its configuration.
pub type LayerFactory<T> =
    Box<dyn Fn(&LayerConfig) -> Result<Box<dyn Layer<T>>> + Send + Sync + 'static>;

/// Maps layer type names to factories.
///
/// The host creates one registry per element type it routes, registers the
/// factories it wants available, and asks for instances by config.
pub struct LayerRegistry<T: Element> {
    factories: HashMap<String, LayerFactory<T>>,
}

impl<T: Element> LayerRegistry<T> {
    /// An empty registry.
    pub fn new() -> Self {
        LayerRegistry {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under a type name. A later registration under
    /// the same name replaces the earlier one.
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(&LayerConfig) -> Result<Box<dyn Layer<T>>> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        debug!(%type_name, "registered layer factory");
        self.factories.insert(type_name, Box::new(factory));
    }

    /// Whether a type name is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build a layer from its configuration.
    pub fn create(&self, config: &LayerConfig) -> Result<Box<dyn Layer<T>>> {
        match self.factories.get(&config.layer_type) {
            Some(factory) => factory(config),
            None => shunt_core::bail!(
                "unknown layer type {:?} for layer {:?} (registered: {:?})",
                config.layer_type,
                config.name,
                self.type_names()
            ),
        }
    }
}

impl<T: Element> Default for LayerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the layers this crate ships. Hosts call this once at
/// initialization on a registry they own.
pub fn register_builtin<T: Element>(registry: &mut LayerRegistry<T>) {
    registry.register("Switch", |config: &LayerConfig| {
        let options = config.switch.unwrap_or_default();
        Ok(Box::new(Switch::from_config(&options)) as Box<dyn Layer<T>>)
    });
}
