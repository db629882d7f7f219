//! Compiled spec caching.
//!
//! Parsing a rule spec resolves names and parameters against the registry,
//! so every distinct spec string is compiled once and shared afterwards.
//! The cache must be cleared whenever the registry changes.

use crate::core::error::ValidatorResult;
use crate::rules::registry::RuleRegistry;
use crate::validation::tags::{self, CompiledSpec};
use log::trace;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
}

impl CacheStats {
    /// Calculate hit ratio.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// Thread-safe cache of compiled rule specs, keyed by spec text.
#[derive(Debug, Default)]
pub struct SpecCache {
    specs: RwLock<HashMap<String, Arc<CompiledSpec>>>,
    stats: Mutex<CacheStats>,
}

impl SpecCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled form of `spec`, compiling it on first use.
    ///
    /// Specs that fail to compile are not cached.
    pub fn get_or_compile(
        &self,
        spec: &str,
        registry: &RuleRegistry,
    ) -> ValidatorResult<Arc<CompiledSpec>> {
        if let Some(compiled) = self.specs.read().get(spec) {
            self.stats.lock().hits += 1;
            return Ok(Arc::clone(compiled));
        }

        self.stats.lock().misses += 1;
        let compiled = Arc::new(tags::compile(spec, registry)?);
        trace!("Compiled rule spec \"{}\"", spec);

        let mut specs = self.specs.write();
        let entry = specs
            .entry(spec.to_string())
            .or_insert_with(|| Arc::clone(&compiled));
        Ok(Arc::clone(entry))
    }

    /// Drop every compiled spec.
    pub fn clear(&self) {
        self.specs.write().clear();
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Number of cached specs.
    pub fn len(&self) -> usize {
        self.specs.read().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
