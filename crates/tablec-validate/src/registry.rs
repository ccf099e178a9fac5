//! Validator registry.
//!
//! Maps declaration tags to factories. Built-in validators are registered in
//! [`default_registry`]; callers that need extra rules build their own
//! registry with [`ValidatorRegistry::with_builtins`] and register on top.
//!
//! # Example
//!
//! ```ignore
//! use tablec_validate::{ValidatorRegistry, default_registry};
//!
//! let factory = default_registry().get("codename").expect("built-in");
//! println!("{}: {}", factory.tag(), factory.description());
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::validator::ValidatorFactory;
use crate::validators::{CodenameFactory, RangeFactory, SetFactory};

/// Validator factories indexed by tag.
///
/// # Thread Safety
///
/// The registry is immutable once built and can be shared across threads.
/// The default registry is cached using [`OnceLock`].
#[derive(Default)]
pub struct ValidatorRegistry {
    factories: BTreeMap<&'static str, Box<dyn ValidatorFactory>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CodenameFactory));
        registry.register(Box::new(RangeFactory));
        registry.register(Box::new(SetFactory));
        registry
    }

    /// Registers a factory under its tag.
    ///
    /// If a factory with the same tag is already registered, it is replaced.
    pub fn register(&mut self, factory: Box<dyn ValidatorFactory>) {
        self.factories.insert(factory.tag(), factory);
    }

    /// Gets the factory for a tag.
    pub fn get(&self, tag: &str) -> Option<&dyn ValidatorFactory> {
        self.factories.get(tag).map(|factory| factory.as_ref())
    }

    /// Returns the number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Registered factories in tag order.
    pub fn factories(&self) -> impl Iterator<Item = &dyn ValidatorFactory> + '_ {
        self.factories.values().map(|factory| factory.as_ref())
    }
}

static DEFAULT_REGISTRY: OnceLock<ValidatorRegistry> = OnceLock::new();

/// Returns the registry with all built-in validators.
///
/// The registry is cached on first access.
///
/// # Registered Validators
///
/// - `codename`: normalized value unique within the table
/// - `range`: numeric bounds
/// - `set`: value from a fixed list
pub fn default_registry() -> &'static ValidatorRegistry {
    DEFAULT_REGISTRY.get_or_init(ValidatorRegistry::with_builtins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = default_registry();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.tags().collect::<Vec<_>>(),
            vec!["codename", "range", "set"]
        );
        assert!(registry.get("codename").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn empty_registry() {
        let registry = ValidatorRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("codename").is_none());
    }
}
