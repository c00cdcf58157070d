//! Generators by name.

use std::collections::BTreeMap;

use crate::builtin;
use crate::error::{CourseError, CourseResult};
use crate::generator::Generator;

/// Maps generator names to generators.
///
/// # Example
///
/// ```
/// use terrain_course::GeneratorRegistry;
///
/// let registry = GeneratorRegistry::with_reference_generators();
/// assert!(registry.resolve("gaps").is_ok());
/// assert!(registry.resolve("spiral").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<String, Generator>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the reference generators: `flat`,
    /// `single_step`, `gaps`, `hurdles` and `stairs_or_gaps`.
    #[must_use]
    pub fn with_reference_generators() -> Self {
        let mut registry = Self::new();
        registry.register("flat", builtin::flat());
        registry.register("single_step", builtin::single_step());
        registry.register("gaps", builtin::gaps());
        registry.register("hurdles", builtin::hurdles());
        registry.register("stairs_or_gaps", builtin::stairs_or_gaps());
        registry
    }

    /// Registers a generator, replacing any previous one of the same name.
    /// Returns the replaced generator.
    pub fn register(&mut self, name: impl Into<String>, generator: Generator) -> Option<Generator> {
        self.generators.insert(name.into(), generator)
    }

    /// Looks up a generator.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::Configuration`] for an unknown name.
    pub fn resolve(&self, name: &str) -> CourseResult<&Generator> {
        self.generators
            .get(name)
            .ok_or_else(|| CourseError::Configuration(format!("unknown generator '{name}'")))
    }

    /// Whether a generator is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    /// Number of registered generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Whether no generator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
