//! Raw two-tier keyed storage with memory accounting
//!
//! Each tier is an insertion-ordered map: the front is the oldest entry and a
//! read moves an entry to the back, so the front is always the tier's least
//! recently used entry. The store enforces tier exclusivity and tracks the
//! charged memory; capacity and budget policy live in the unified cache.

use indexmap::IndexMap;
use lumen_core::Tier;

use crate::entry::CacheEntry;

/// Two ordered tier maps plus memory accounting
#[derive(Debug)]
pub struct CacheStore<V> {
    active: IndexMap<String, CacheEntry<V>>,
    nearby: IndexMap<String, CacheEntry<V>>,
    current_memory_mb: f64,
}

impl<V> CacheStore<V> {
    pub fn new() -> Self {
        Self {
            active: IndexMap::new(),
            nearby: IndexMap::new(),
            current_memory_mb: 0.0,
        }
    }

    fn map(&self, tier: Tier) -> &IndexMap<String, CacheEntry<V>> {
        match tier {
            Tier::Active => &self.active,
            Tier::Nearby => &self.nearby,
        }
    }

    fn map_mut(&mut self, tier: Tier) -> &mut IndexMap<String, CacheEntry<V>> {
        match tier {
            Tier::Active => &mut self.active,
            Tier::Nearby => &mut self.nearby,
        }
    }

    /// Which tier holds the key, if any
    pub fn tier_of(&self, key: &str) -> Option<Tier> {
        if self.active.contains_key(key) {
            Some(Tier::Active)
        } else if self.nearby.contains_key(key) {
            Some(Tier::Nearby)
        } else {
            None
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tier_of(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<(Tier, &CacheEntry<V>)> {
        let tier = self.tier_of(key)?;
        self.map(tier).get(key).map(|entry| (tier, entry))
    }

    /// Insert into a tier, replacing the key wherever it lived before
    ///
    /// Returns the replaced entry.
    pub fn insert(&mut self, tier: Tier, key: String, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        let previous = self.take(&key).map(|(_, old)| old);
        self.current_memory_mb += entry.size_mb;
        self.map_mut(tier).insert(key, entry);
        previous
    }

    /// Remove a key from whichever tier holds it
    pub fn take(&mut self, key: &str) -> Option<(Tier, CacheEntry<V>)> {
        let tier = self.tier_of(key)?;
        self.take_from(tier, key).map(|entry| (tier, entry))
    }

    /// Remove a key from one tier
    pub fn take_from(&mut self, tier: Tier, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.map_mut(tier).shift_remove(key)?;
        self.release(entry.size_mb);
        Some(entry)
    }

    /// Record a read: move the entry to the back of its tier
    ///
    /// Returns the tier and a reference to the refreshed entry.
    pub fn touch(&mut self, key: &str) -> Option<(Tier, &CacheEntry<V>)> {
        let tier = self.tier_of(key)?;
        let map = self.map_mut(tier);
        let (key, mut entry) = map.shift_remove_entry(key)?;
        entry.touch();
        map.insert(key.clone(), entry);
        map.get(&key).map(|entry| (tier, entry))
    }

    /// Move an entry to the back of the other tier without touching it
    pub fn move_to(&mut self, key: &str, tier: Tier) -> bool {
        let from = match self.tier_of(key) {
            Some(current) if current != tier => current,
            _ => return false,
        };
        match self.map_mut(from).shift_remove_entry(key) {
            Some((key, entry)) => {
                self.map_mut(tier).insert(key, entry);
                true
            }
            None => false,
        }
    }

    /// Front (least recently used) key of a tier
    pub fn oldest(&self, tier: Tier) -> Option<&str> {
        self.map(tier).keys().next().map(String::as_str)
    }

    /// Oldest key of a tier other than `exclude`
    pub fn oldest_except(&self, tier: Tier, exclude: &str) -> Option<&str> {
        self.map(tier)
            .keys()
            .map(String::as_str)
            .find(|key| *key != exclude)
    }

    pub fn len(&self, tier: Tier) -> usize {
        self.map(tier).len()
    }

    pub fn total_items(&self) -> usize {
        self.active.len() + self.nearby.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Keys of a tier, oldest first
    pub fn keys(&self, tier: Tier) -> Vec<String> {
        self.map(tier).keys().cloned().collect()
    }

    pub fn memory_mb(&self) -> f64 {
        self.current_memory_mb
    }

    /// Memory charged to one tier, summed from its entries
    pub fn tier_memory_mb(&self, tier: Tier) -> f64 {
        self.map(tier).values().map(|entry| entry.size_mb).sum()
    }

    /// Drop every entry, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.total_items();
        self.active.clear();
        self.nearby.clear();
        self.current_memory_mb = 0.0;
        removed
    }

    fn release(&mut self, size_mb: f64) {
        self.current_memory_mb -= size_mb;
        // Floating-point residue must not leave phantom usage behind
        if self.is_empty() || self.current_memory_mb < 0.0 {
            self.current_memory_mb = if self.is_empty() {
                0.0
            } else {
                self.active
                    .values()
                    .chain(self.nearby.values())
                    .map(|entry| entry.size_mb)
                    .sum()
            };
        }
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
