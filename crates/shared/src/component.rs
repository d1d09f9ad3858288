use std::sync::Arc;

use anyhow::Result;

/// The base capability every component instance implements.
///
/// Instances are owned by their [ComponentData] descriptor; the launcher only
/// invokes capabilities on them and never takes ownership itself.
pub trait Component: Send + Sync {
    /// Initializes this instance. Called once per instance during the
    /// pre-load phase, before the game binary runs any of its own code.
    fn initialize(&self) -> Result<()>;

    /// Queries this instance for the richer lifecycle capability set.
    ///
    /// Components that want the per-category lifecycle notifications override
    /// this to return themselves. The default is [None], which the dispatcher
    /// treats as "not interested" rather than an error.
    fn life_cycle(&self) -> Option<&dyn LifeCycleComponent> {
        None
    }
}

/// Lifecycle notifications delivered to at most one instance per component,
/// around the moment the game starts executing.
pub trait LifeCycleComponent: Send + Sync {
    /// Called right before the game's main thread is resumed.
    fn pre_resume_game(&self);

    /// Called before the game initializes its own subsystems.
    fn pre_init_game(&self);
}

/// A named component descriptor owning the instances registered for it.
pub struct ComponentData {
    name: String,
    instances: Vec<Arc<dyn Component>>,
}

impl ComponentData {
    /// Creates a descriptor with no instances.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instances: Vec::new(),
        }
    }

    /// Creates a descriptor owning the given instances, in order.
    pub fn with_instances(
        name: impl Into<String>,
        instances: impl IntoIterator<Item = Arc<dyn Component>>,
    ) -> Self {
        Self {
            name: name.into(),
            instances: instances.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The instances this descriptor owns, in insertion order.
    pub fn instances(&self) -> &[Arc<dyn Component>] {
        &self.instances
    }

    /// Adds an instance at the end of the insertion order.
    pub fn add_instance(&mut self, instance: Arc<dyn Component>) {
        self.instances.push(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Component for Plain {
        fn initialize(&self) -> Result<()> {
            Ok(())
        }
    }

    struct WithLifeCycle;

    impl Component for WithLifeCycle {
        fn initialize(&self) -> Result<()> {
            Ok(())
        }

        fn life_cycle(&self) -> Option<&dyn LifeCycleComponent> {
            Some(self)
        }
    }

    impl LifeCycleComponent for WithLifeCycle {
        fn pre_resume_game(&self) {}
        fn pre_init_game(&self) {}
    }

    #[test]
    fn life_cycle_query_defaults_to_none() {
        assert!(Plain.life_cycle().is_none());
    }

    #[test]
    fn life_cycle_query_succeeds_when_overridden() {
        assert!(WithLifeCycle.life_cycle().is_some());
    }

    #[test]
    fn instances_keep_insertion_order() {
        let mut data = ComponentData::new("a");
        assert!(data.instances().is_empty());

        data.add_instance(Arc::new(Plain));
        data.add_instance(Arc::new(WithLifeCycle));
        assert_eq!(data.instances().len(), 2);
        assert!(data.instances()[0].life_cycle().is_none());
        assert!(data.instances()[1].life_cycle().is_some());
    }
}
