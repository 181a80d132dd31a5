use std::hash::Hash;

use ahash::HashMap;

#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum CacheFlag {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct CacheEntry<M> {
    pub(super) value: i32,
    pub(super) best_move: Option<M>,
    pub(super) level: u8,
    pub(super) flag: CacheFlag,
}

impl<M> CacheEntry<M> {
    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn best_move(&self) -> Option<&M> {
        self.best_move.as_ref()
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

/// Transposition storage for one search invocation.
pub trait Cache<S, M> {
    fn cache(&mut self, state: &S, entry: CacheEntry<M>);
    fn lookup(&mut self, state: &S) -> Option<CacheEntry<M>>;
    fn len(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct HashMapCache<S, M>(HashMap<S, CacheEntry<M>>);

impl<S, M> Default for HashMapCache<S, M> {
    fn default() -> Self {
        Self(HashMap::default())
    }
}

impl<S, M> Cache<S, M> for HashMapCache<S, M> where S: Eq + Hash + Clone, M: Clone {
    fn cache(&mut self, state: &S, entry: CacheEntry<M>) {
        self.0.insert(state.clone(), entry);
    }

    fn lookup(&mut self, state: &S) -> Option<CacheEntry<M>> {
        self.0.get(state).cloned()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Default)]
pub struct NullCache;

impl<S, M> Cache<S, M> for NullCache {
    fn cache(&mut self, _state: &S, _entry: CacheEntry<M>) {}

    fn lookup(&mut self, _state: &S) -> Option<CacheEntry<M>> {
        None
    }

    fn len(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(value: i32, level: u8) -> CacheEntry<usize> {
        CacheEntry { value, best_move: Some(4), level, flag: CacheFlag::Exact }
    }

    #[test]
    fn hash_map_cache_overwrites() {
        let mut cache = HashMapCache::<u32, usize>::default();
        assert_eq!(cache.lookup(&7), None);

        cache.cache(&7, entry(10, 2));
        cache.cache(&7, entry(-3, 5));
        assert_eq!(cache.len(), 1);

        let found = cache.lookup(&7).unwrap();
        assert_eq!(found.value(), -3);
        assert_eq!(found.level(), 5);
        assert_eq!(found.best_move(), Some(&4));
    }

    #[test]
    fn null_cache_forgets() {
        let mut cache = NullCache;
        Cache::<u32, usize>::cache(&mut cache, &7, entry(1, 1));
        assert_eq!(Cache::<u32, usize>::lookup(&mut cache, &7), None);
        assert_eq!(Cache::<u32, usize>::len(&cache), 0);
    }
}
