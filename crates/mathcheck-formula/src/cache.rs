//! Formula tree cache
//!
//! Parsing is memoized by exact formula text. The lookup, build and insert
//! run under a single lock, so each distinct text is built at most once even
//! when the cache is shared between threads.

use crate::ast::ExpressionTree;
use crate::error::FormulaResult;
use crate::evaluator::Bindings;
use crate::parser::parse_formula;
use ahash::AHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Options for the formula cache
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Store built trees. When false every call parses from scratch.
    pub enabled: bool,
    /// Maximum number of stored trees (default: unbounded). Once full, new
    /// formulas are still built and returned but not stored.
    pub max_entries: Option<usize>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: None,
        }
    }
}

/// Memoizes expression trees by formula text
#[derive(Debug, Default)]
pub struct FormulaCache {
    options: CacheOptions,
    entries: Mutex<AHashMap<String, Arc<ExpressionTree>>>,
}

impl FormulaCache {
    /// Create a cache with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache with custom options
    pub fn with_options(options: CacheOptions) -> Self {
        Self {
            options,
            entries: Mutex::new(AHashMap::new()),
        }
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Return the cached tree for `formula`, building and storing it if absent
    ///
    /// Failed builds are not stored.
    pub fn get_or_build(&self, formula: &str) -> FormulaResult<Arc<ExpressionTree>> {
        if !self.options.enabled {
            return parse_formula(formula).map(Arc::new);
        }

        let mut entries = self.lock();
        if let Some(tree) = entries.get(formula) {
            log::trace!("formula cache hit for {:?}", formula);
            return Ok(Arc::clone(tree));
        }

        log::debug!("formula cache miss for {:?}", formula);
        let tree = Arc::new(parse_formula(formula)?);
        let full = self
            .options
            .max_entries
            .is_some_and(|max| entries.len() >= max);
        if !full {
            entries.insert(formula.to_string(), Arc::clone(&tree));
        }
        Ok(tree)
    }

    /// Parse (or reuse) `formula` and evaluate it against `bindings`
    ///
    /// # Example
    /// ```rust
    /// use mathcheck_formula::{Bindings, FormulaCache};
    ///
    /// let cache = FormulaCache::new();
    /// let bindings = Bindings::new().with("x", 56.0);
    /// assert_eq!(cache.calculate("x*3", &bindings).unwrap(), 168.0);
    /// ```
    pub fn calculate(&self, formula: &str, bindings: &Bindings) -> FormulaResult<f64> {
        self.get_or_build(formula)?.evaluate(bindings)
    }

    /// Whether a tree for exactly `formula` is stored
    pub fn contains(&self, formula: &str) -> bool {
        self.lock().contains_key(formula)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every stored tree. Trees already handed out stay valid.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // Entries are inserted whole, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, AHashMap<String, Arc<ExpressionTree>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use pretty_assertions::assert_eq;
    use std::thread;

    #[test]
    fn test_get_or_build_reuses_tree() {
        let cache = FormulaCache::new();
        let first = cache.get_or_build("x+1").unwrap();
        let second = cache.get_or_build("x+1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keyed_by_exact_text() {
        let cache = FormulaCache::new();
        let a = cache.get_or_build("x+1").unwrap();
        let b = cache.get_or_build("(x+1)").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = FormulaCache::new();
        assert!(matches!(
            cache.get_or_build("(2+3"),
            Err(FormulaError::Lexical(_))
        ));
        assert!(!cache.contains("(2+3"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_calculate() {
        let cache = FormulaCache::new();
        assert_eq!(cache.calculate("2+2", &Bindings::new()).unwrap(), 4.0);
        let err = cache.calculate("2+2/0", &Bindings::new()).unwrap_err();
        assert!(matches!(err, FormulaError::Arithmetic(_)));
        // The tree built fine, so it stays cached.
        assert!(cache.contains("2+2/0"));
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = FormulaCache::with_options(CacheOptions {
            enabled: false,
            ..Default::default()
        });
        let first = cache.get_or_build("x").unwrap();
        let second = cache.get_or_build("x").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_max_entries() {
        let cache = FormulaCache::with_options(CacheOptions {
            max_entries: Some(1),
            ..Default::default()
        });
        cache.get_or_build("1").unwrap();
        let tree = cache.get_or_build("2").unwrap();
        assert_eq!(tree.evaluate(&Bindings::new()).unwrap(), 2.0);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("1"));
        assert!(!cache.contains("2"));
    }

    #[test]
    fn test_clear_keeps_handed_out_trees() {
        let cache = FormulaCache::new();
        let tree = cache.get_or_build("x*x").unwrap();
        cache.clear();
        assert!(cache.is_empty());
        let bindings = Bindings::new().with("x", 3.0);
        assert_eq!(tree.evaluate(&bindings).unwrap(), 9.0);
    }

    #[test]
    fn test_shared_between_threads() {
        let cache = Arc::new(FormulaCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let bindings = Bindings::new().with("x", i as f64);
                    cache.calculate("x*2+1", &bindings).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), i as f64 * 2.0 + 1.0);
        }
        assert_eq!(cache.len(), 1);
    }
}
