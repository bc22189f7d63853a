//! Name → component lookup table.
//!
//! Built once, immutable afterwards. A miss is not an error: the renderer
//! turns it into a fallback node.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::components;
use super::{Element, Props};

/// A renderable card. Props are the only configuration input.
pub trait Component: Send + Sync {
    fn render(&self, props: &Props) -> Element;
}

pub struct ComponentRegistry {
    components: HashMap<String, Box<dyn Component>>,
}

impl ComponentRegistry {
    /// An empty registry. Every name resolves to `None`.
    #[must_use]
    pub fn new() -> Self {
        Self { components: HashMap::new() }
    }

    /// A registry seeded with the built-in medspa cards.
    #[must_use]
    pub fn with_defaults() -> Self {
        components::register_defaults(Self::new())
    }

    /// Process-wide default registry, initialized on first use.
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<ComponentRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::with_defaults)
    }

    /// Add (or replace) a component. Consumes the registry so registration
    /// only happens while building it.
    #[must_use]
    pub fn register(mut self, name: impl Into<String>, component: impl Component + 'static) -> Self {
        self.components.insert(name.into(), Box::new(component));
        self
    }

    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&dyn Component> {
        self.components.get(name).map(|c| &**c)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Component for F
where
    F: Fn(&Props) -> Element + Send + Sync,
{
    fn render(&self, props: &Props) -> Element {
        self(props)
    }
}
