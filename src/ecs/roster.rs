//! Insertion-ordered collection with generation-checked handles
//!
//! Every species and structure lives in a `Roster`. Handles are slotmap keys,
//! so a cached target that has since been removed simply fails to resolve
//! instead of pointing at whatever reused its slot. Iteration follows
//! insertion order, which is the processing order of the simulation step.
//!
//! A step pass walks a frozen copy of the order kept in a buffer owned by
//! the roster, so agents may add or remove entries mid-pass and the buffer
//! is reused from step to step.

use slotmap::{Key, SlotMap};

use crate::core::types::Vec2;
use crate::spatial::query::Positioned;

#[derive(Debug, Clone)]
pub struct Roster<K: Key, T> {
    items: SlotMap<K, T>,
    order: Vec<K>,
    pass: Vec<K>,
}

impl<K: Key, T> Default for Roster<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, T> Roster<K, T> {
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            order: Vec::new(),
            pass: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn insert(&mut self, item: T) -> K {
        let id = self.items.insert(item);
        self.order.push(id);
        id
    }

    /// Remove `id`, keeping the relative order of the survivors
    pub fn remove(&mut self, id: K) -> Option<T> {
        let item = self.items.remove(id)?;
        if let Some(idx) = self.order.iter().position(|&k| k == id) {
            self.order.remove(idx);
        }
        Some(item)
    }

    pub fn contains(&self, id: K) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: K) -> Option<&T> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: K) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    /// First live entry in insertion order
    pub fn first(&self) -> Option<(K, &T)> {
        let id = *self.order.first()?;
        self.items.get(id).map(|item| (id, item))
    }

    /// Freeze the current order for a step pass; returns its length
    ///
    /// Entries inserted during the pass are not visited. Handles that die
    /// mid-pass still come back from [`Roster::pass_handle`] and simply fail
    /// to resolve.
    pub fn begin_pass(&mut self) -> usize {
        self.pass.clear();
        self.pass.extend_from_slice(&self.order);
        self.pass.len()
    }

    pub fn pass_handle(&self, index: usize) -> Option<K> {
        self.pass.get(index).copied()
    }

    /// Visit entries in insertion order, dropping those `keep` rejects
    pub fn retain(&mut self, mut keep: impl FnMut(K, &mut T) -> bool) {
        let items = &mut self.items;
        self.order.retain(|&id| {
            let Some(item) = items.get_mut(id) else {
                return false;
            };
            if keep(id, item) {
                return true;
            }
            items.remove(id);
            false
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.items.get(id).map(|item| (id, item)))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, item)| item)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.items.values_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
        self.pass.clear();
    }
}

impl<K: Key, T: Positioned> Roster<K, T> {
    /// Nearest entry to `source`; the first-seen entry wins ties
    pub fn nearest(&self, source: Vec2) -> Option<(K, &T)> {
        self.nearest_where(source, |_| true)
    }

    /// Nearest entry satisfying `filter`
    pub fn nearest_where(
        &self,
        source: Vec2,
        filter: impl Fn(&T) -> bool,
    ) -> Option<(K, &T)> {
        crate::spatial::query::find_nearest(
            source,
            self.iter().filter(|(_, item)| filter(item)),
            |(_, item)| item.position(),
        )
    }

    /// Number of entries strictly closer than `radius`
    pub fn count_within(&self, source: Vec2, radius: f32) -> usize {
        self.values()
            .filter(|item| item.position().distance(&source) < radius)
            .count()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.values().map(|item| item.position())
    }
}
