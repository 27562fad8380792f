use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use crate::models::SearchResult;

struct CacheEntry {
    result: SearchResult,
    stored_at: DateTime<Utc>,
}

/// Search results keyed by normalized query. Entries expire after `ttl`;
/// at capacity the oldest insertion is evicted.
pub struct SearchCache {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<String, CacheEntry>,
    insertion_order: VecDeque<String>,
}

impl SearchCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Option<SearchResult> {
        let fresh = match self.entries.get(key) {
            Some(entry) => now - entry.stored_at < self.ttl,
            None => return None,
        };

        if fresh {
            self.entries.get(key).map(|entry| entry.result.clone())
        } else {
            self.remove(key);
            None
        }
    }

    pub fn insert(&mut self, key: String, result: SearchResult, now: DateTime<Utc>) {
        if self.entries.contains_key(&key) {
            self.remove(&key);
        }

        while self.entries.len() >= self.capacity {
            match self.insertion_order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.insertion_order.push_back(key.clone());
        self.entries.insert(
            key,
            CacheEntry {
                result,
                stored_at: now,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.insertion_order.retain(|existing| existing != key);
    }
}
