//! `ShapeRegistry` — shapes registered by name.
//!
//! Applications look shapes up by a stable string (from config files, debug
//! commands, scenario scripts) rather than by concrete type.  Custom shapes
//! register alongside the built-ins under their [`SlotShape::name`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::builtin::{Circle, Column, Grid, Line, Scatter, Wedge};
use crate::SlotShape;

/// A name → shape table.  Registering a shape under an existing name
/// replaces the previous entry (applications override built-ins this way).
#[derive(Default)]
pub struct ShapeRegistry {
    shapes: HashMap<&'static str, Arc<dyn SlotShape>>,
}

impl ShapeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with every built-in shape at its default
    /// parameters.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(Line::default()));
        reg.register(Arc::new(Column::default()));
        reg.register(Arc::new(Circle::default()));
        reg.register(Arc::new(Grid::default()));
        reg.register(Arc::new(Wedge::default()));
        reg.register(Arc::new(Scatter::default()));
        reg
    }

    /// Register `shape` under its own name.
    pub fn register(&mut self, shape: Arc<dyn SlotShape>) {
        self.shapes.insert(shape.name(), shape);
    }

    /// The shape registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<Arc<dyn SlotShape>> {
        self.shapes.get(name).cloned()
    }

    /// All registered names, sorted for stable listings.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.shapes.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
