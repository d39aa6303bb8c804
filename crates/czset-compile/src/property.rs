//! `PropertySet` for pass communication.
//!
//! Passes share the active [`ConversionConfig`] and arbitrary typed results
//! through the property set handed to every pass by the pass manager.
//!
//! ```
//! use czset_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct RewriteStats {
//!     rewritten: usize,
//! }
//!
//! let mut props = PropertySet::new();
//! props.insert(RewriteStats { rewritten: 4 });
//! assert_eq!(props.get::<RewriteStats>().unwrap().rewritten, 4);
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

use crate::config::ConversionConfig;

/// Properties shared between compilation passes.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Configuration of the conversion pipeline.
    ///
    /// Read by the verification pass to decide which `CZ` powers are legal
    /// and whether violations are fatal.
    pub conversion: ConversionConfig,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new property set with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the conversion configuration.
    #[must_use]
    pub fn with_conversion(mut self, config: ConversionConfig) -> Self {
        self.conversion = config;
        self
    }

    /// Insert a custom property, replacing any previous value of that type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}
