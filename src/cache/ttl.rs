use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

struct Entry<V> {
    value: V,
    deadline: Instant,
}

struct State<V> {
    entries: HashMap<String, Entry<V>>,
    /// Bumped on every invalidation of a key.
    generations: HashMap<String, u64>,
    hits: u64,
    misses: u64,
}

/// Snapshot of a key's invalidation counter, taken before a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub keys: usize,
}

/// Mutex-guarded key/value store whose entries expire after a TTL.
///
/// An entry past its deadline is a miss and is dropped on access. If the
/// lock is poisoned, reads and fills degrade to misses and no-ops, while
/// invalidation still removes the entry.
pub struct TtlCache<V> {
    state: Mutex<State<V>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            state: Mutex::new(State {
                entries: HashMap::new(),
                generations: HashMap::new(),
                hits: 0,
                misses: 0,
            }),
            default_ttl,
        }
    }

    fn try_lock(&self) -> Option<MutexGuard<'_, State<V>>> {
        match self.state.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("cache lock poisoned, bypassing cache");
                None
            }
        }
    }

    fn force_lock(&self) -> MutexGuard<'_, State<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `None` when the TTL reaches past what `Instant` can represent.
    fn deadline(&self, ttl: Option<Duration>) -> Option<Instant> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let deadline = Instant::now().checked_add(ttl);
        if deadline.is_none() {
            warn!(ttl_secs = ttl.as_secs(), "cache ttl out of range, value not stored");
        }
        deadline
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.try_lock()?;
        let now = Instant::now();

        let live = state
            .entries
            .get(key)
            .filter(|entry| entry.deadline > now)
            .map(|entry| entry.value.clone());

        if live.is_some() {
            state.hits += 1;
        } else {
            state.entries.remove(key);
            state.misses += 1;
        }
        live
    }

    /// Stores `value`, replacing any existing entry. `None` uses the
    /// default TTL.
    pub fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        let Some(deadline) = self.deadline(ttl) else {
            return;
        };
        if let Some(mut state) = self.try_lock() {
            state
                .entries
                .insert(key.to_owned(), Entry { value, deadline });
        }
    }

    pub fn generation(&self, key: &str) -> Generation {
        let state = self.force_lock();
        Generation(state.generations.get(key).copied().unwrap_or(0))
    }

    /// Stores `value` only if `key` has not been invalidated since
    /// `observed` was taken. Returns whether the value was stored.
    pub fn set_if_current(
        &self,
        key: &str,
        value: V,
        observed: Generation,
        ttl: Option<Duration>,
    ) -> bool {
        let Some(deadline) = self.deadline(ttl) else {
            return false;
        };
        let Some(mut state) = self.try_lock() else {
            return false;
        };
        let current = state.generations.get(key).copied().unwrap_or(0);
        if current != observed.0 {
            return false;
        }

        state
            .entries
            .insert(key.to_owned(), Entry { value, deadline });
        true
    }

    pub fn invalidate(&self, key: &str) {
        let mut state = self.force_lock();
        state.entries.remove(key);
        *state.generations.entry(key.to_owned()).or_insert(0) += 1;
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.force_lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            keys: state.entries.len(),
        }
    }
}
