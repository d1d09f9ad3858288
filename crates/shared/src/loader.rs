use std::sync::{Arc, LazyLock, Mutex};

use anyhow::{Result, bail};
use indexmap::IndexMap;
use log::*;

use crate::ModuleHandle;
use crate::component::ComponentData;

/// The registry of known components, ordered by registration.
///
/// Discovery and dependency resolution live in the component subsystem
/// proper; this type only holds the resolved descriptors and exposes the
/// traversal and lookup operations the launcher consumes.
pub struct ComponentLoader {
    components: IndexMap<String, ComponentData>,
    initialized: bool,
}

impl ComponentLoader {
    pub fn new() -> Self {
        Self {
            components: IndexMap::new(),
            initialized: false,
        }
    }

    /// The process-wide registry instance. The component subsystem registers
    /// descriptors here before the host calls into the launcher.
    pub fn global() -> Arc<Mutex<ComponentLoader>> {
        static GLOBAL: LazyLock<Arc<Mutex<ComponentLoader>>> =
            LazyLock::new(|| Arc::new(Mutex::new(ComponentLoader::new())));
        GLOBAL.clone()
    }

    /// Registers a component descriptor. Component names are unique;
    /// registering the same name twice is an error.
    pub fn register(&mut self, data: ComponentData) -> Result<()> {
        if self.components.contains_key(data.name()) {
            bail!("component '{}' is already registered", data.name());
        }

        self.components.insert(data.name().to_owned(), data);
        Ok(())
    }

    /// Returns whether a component with the given name is registered.
    pub fn knows_component(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Visits every registered descriptor in registration order.
    pub fn for_all_components(&self, mut visitor: impl FnMut(&ComponentData)) {
        for data in self.components.values() {
            visitor(data);
        }
    }

    /// One-shot initialization of the loader itself. The heavy lifting
    /// (discovery, dependency resolution) happens in the component subsystem;
    /// repeated calls are ignored.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        self.initialized = true;
        debug!("component loader initialized ({} components)", self.components.len());
    }

    /// Notifies the component subsystem that the game module has been mapped.
    pub fn do_game_load(&self, module: ModuleHandle) {
        debug!("game module loaded at {:#x}", module.0);
    }
}

impl Default for ComponentLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_follows_registration_order() {
        let mut loader = ComponentLoader::new();
        for name in ["gta:core", "adhesive", "net"] {
            loader.register(ComponentData::new(name)).unwrap();
        }

        let mut names = Vec::new();
        loader.for_all_components(|data| names.push(data.name().to_owned()));
        assert_eq!(names, ["gta:core", "adhesive", "net"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut loader = ComponentLoader::new();
        loader.register(ComponentData::new("net")).unwrap();
        assert!(loader.register(ComponentData::new("net")).is_err());
    }

    #[test]
    fn knows_component_by_name() {
        let mut loader = ComponentLoader::new();
        loader.register(ComponentData::new("adhesive")).unwrap();
        assert!(loader.knows_component("adhesive"));
        assert!(!loader.knows_component("gta:core"));
    }

    #[test]
    fn initialize_is_one_shot() {
        let mut loader = ComponentLoader::new();
        loader.initialize();
        loader.initialize();
    }
}
