//! Keyed storage - insertion-ordered entities indexed by a derived key
//!
//! Entries live in an arena and are addressed by generational [`Handle`]s.
//! A side index maps each entry's derived key (for tiles, `y * 1000 + x`) to
//! its handle, and a doubly linked list threads the live entries in insertion
//! order. Lookup, insert, remove and rekey are all O(1) on average.
//!
//! The key is derived from mutable fields of the entry. Whoever mutates those
//! fields through [`KeyedCollection::get_mut`] must rekey the entry before the
//! index is read again ([`KeyedCollection::reassign_key`]), or use
//! [`KeyedCollection::modify`] which does both.

use std::collections::HashMap;

use crate::error::KeyedError;

/// An entity that knows the key it is stored under.
pub trait Keyed {
    fn key(&self) -> i32;
}

/// Stable reference to an entry.
///
/// A handle outlives moves and rekeys of its entry. Once the entry is removed
/// the handle goes stale and never resolves again, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    /// Key the index currently holds for this entry.
    key: i32,
    prev: Option<u32>,
    next: Option<u32>,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

#[derive(Debug, Clone)]
pub struct KeyedCollection<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    index: HashMap<i32, Handle>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl<T: Keyed> KeyedCollection<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `item` at the end of the iteration order.
    ///
    /// Returns `None` and drops `item` when its key is already present.
    pub fn insert(&mut self, item: T) -> Option<Handle> {
        let key = item.key();
        if self.index.contains_key(&key) {
            return None;
        }

        let entry = Entry {
            item,
            key,
            prev: self.tail,
            next: None,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].entry = Some(entry);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                (self.slots.len() - 1) as u32
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(prev) = self.slots[tail as usize].entry.as_mut() {
                    prev.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);

        let handle = Handle {
            index,
            generation: self.slots[index as usize].generation,
        };
        self.index.insert(key, handle);
        self.len += 1;
        Some(handle)
    }

    /// Remove the entry behind `handle`, returning it.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if !self.is_live(handle) {
            return None;
        }
        let slot = &mut self.slots[handle.index as usize];
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        match entry.prev {
            Some(prev) => {
                if let Some(e) = self.slots[prev as usize].entry.as_mut() {
                    e.next = entry.next;
                }
            }
            None => self.head = entry.next,
        }
        match entry.next {
            Some(next) => {
                if let Some(e) = self.slots[next as usize].entry.as_mut() {
                    e.prev = entry.prev;
                }
            }
            None => self.tail = entry.prev,
        }

        if self.index.get(&entry.key) == Some(&handle) {
            self.index.remove(&entry.key);
        }
        self.free.push(handle.index);
        self.len -= 1;
        Some(entry.item)
    }

    pub fn lookup(&self, key: i32) -> Option<Handle> {
        self.index.get(&key).copied()
    }

    pub fn get_by_key(&self, key: i32) -> Option<&T> {
        self.lookup(key).and_then(|h| self.get(h))
    }

    /// Whether an entry is stored under `item`'s key.
    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(&item.key())
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|s| s.generation == handle.generation && s.entry.is_some())
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref().map(|e| &e.item)
    }

    /// Mutable access without rekeying. See the module docs.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_mut().map(|e| &mut e.item)
    }

    /// Move the entry stored under `old_key` to the key its item now derives.
    ///
    /// Iteration position is unchanged.
    pub fn reassign_key(&mut self, old_key: i32, handle: Handle) -> Result<(), KeyedError> {
        let entry = self.entry(handle)?;
        if entry.key != old_key {
            return Err(KeyedError::KeyMismatch(old_key));
        }
        self.reassign_keys(&[handle])
    }

    /// Rekey several entries at once.
    ///
    /// All of their old keys are released before any new key is claimed, so
    /// entries may trade keys (two tiles swapping cells).
    pub fn reassign_keys(&mut self, handles: &[Handle]) -> Result<(), KeyedError> {
        for &handle in handles {
            self.entry(handle)?;
        }

        for &handle in handles {
            let key = self.entry(handle)?.key;
            if self.index.get(&key) == Some(&handle) {
                self.index.remove(&key);
            }
        }

        for &handle in handles {
            let entry = self.entry_mut(handle)?;
            let key = entry.item.key();
            entry.key = key;
            if let Some(holder) = self.index.insert(key, handle) {
                if holder != handle {
                    self.index.insert(key, holder);
                    return Err(KeyedError::KeyTaken(key));
                }
            }
        }
        Ok(())
    }

    /// Mutate an entry and rekey it in one step.
    pub fn modify<R>(
        &mut self,
        handle: Handle,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, KeyedError> {
        let entry = self.entry_mut(handle)?;
        let result = f(&mut entry.item);
        if entry.item.key() != entry.key {
            self.reassign_keys(&[handle])?;
        }
        Ok(result)
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            collection: self,
            cursor: self.head,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, item)| item)
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.iter().map(|(handle, _)| handle)
    }

    /// Visit every live entry mutably, in insertion order.
    ///
    /// The closure must not change key fields.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            match self.slots[index as usize].entry.as_mut() {
                Some(entry) => {
                    f(&mut entry.item);
                    cursor = entry.next;
                }
                None => break,
            }
        }
    }

    fn entry(&self, handle: Handle) -> Result<&Entry<T>, KeyedError> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.entry.as_ref())
            .ok_or(KeyedError::StaleHandle)
    }

    fn entry_mut(&mut self, handle: Handle) -> Result<&mut Entry<T>, KeyedError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.entry.as_mut())
            .ok_or(KeyedError::StaleHandle)
    }
}

impl<T: Keyed> Default for KeyedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Insertion-order iterator over `(Handle, &T)`.
pub struct Iter<'a, T> {
    collection: &'a KeyedCollection<T>,
    cursor: Option<u32>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let slot = &self.collection.slots[index as usize];
        let entry = slot.entry.as_ref()?;
        self.cursor = entry.next;
        Some((
            Handle {
                index,
                generation: slot.generation,
            },
            &entry.item,
        ))
    }
}

impl<'a, T: Keyed> IntoIterator for &'a KeyedCollection<T> {
    type Item = (Handle, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
