use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use super::{LanguageModel, Token};

/// Fixed-capacity memo table. Once full, the oldest insertion is evicted.
/// Safe to share between threads.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    capacity: usize,
    inner: Mutex<CacheInner<K, V>>,
}

#[derive(Debug)]
struct CacheInner<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.get(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.entries.insert(key.clone(), value).is_some() {
            return;
        }
        inner.order.push_back(key);
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    /// The lock is not held while `compute` runs.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Memoizing adapter around a language model. Tokenization is keyed by the
/// exact input text, membership by the `(word, category)` pair.
#[derive(Debug)]
pub struct CachedModel<M> {
    inner: M,
    tokens: BoundedCache<String, Vec<Token>>,
    membership: BoundedCache<(String, String), bool>,
}

impl<M: LanguageModel> CachedModel<M> {
    #[must_use]
    pub fn new(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            tokens: BoundedCache::new(capacity),
            membership: BoundedCache::new(capacity),
        }
    }

    pub const fn inner(&self) -> &M {
        &self.inner
    }

    pub fn cached_tokenizations(&self) -> usize {
        self.tokens.len()
    }

    pub fn cached_memberships(&self) -> usize {
        self.membership.len()
    }
}

impl<M: LanguageModel> LanguageModel for CachedModel<M> {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        self.tokens
            .get_or_insert_with(text.to_string(), || self.inner.tokenize(text))
    }

    fn is_category_member(&self, word: &str, category: &str) -> bool {
        self.membership
            .get_or_insert_with((word.to_string(), category.to_string()), || {
                self.inner.is_category_member(word, category)
            })
    }
}
