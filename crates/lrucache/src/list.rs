//! Recency list: doubly linked list of entries stored in an index arena
//!
//! Entries live in a `Vec` of slots and link to each other by [`EntryId`],
//! so splicing is O(1) without reference cycles. The front is the most
//! recently used entry, the back the least recently used.

use std::iter::FusedIterator;

/// Stable handle to an entry in a [`RecencyList`]
///
/// A handle stays valid until its entry is removed. After that the slot may
/// be reused by a later `add`, so a stale handle can address another entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

/// Key/value record plus its position links
#[derive(Debug)]
pub struct Entry<K, V> {
    key: K,
    value: V,
    prev: Option<EntryId>,
    next: Option<EntryId>,
}

impl<K, V> Entry<K, V> {
    /// Key of this entry
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Value of this entry
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable value of this entry
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Neighbour toward the front, `None` if this is the front
    pub fn prev(&self) -> Option<EntryId> {
        self.prev
    }

    /// Neighbour toward the back, `None` if this is the back
    pub fn next(&self) -> Option<EntryId> {
        self.next
    }
}

/// Entries in strict recency order
///
/// `front` is `None` exactly when `back` is `None`, which is exactly when the
/// list holds no entries.
#[derive(Debug)]
pub struct RecencyList<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    free_list: Vec<usize>,
    front: Option<EntryId>,
    back: Option<EntryId>,
    len: usize,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            front: None,
            back: None,
            len: 0,
        }
    }

    /// Number of linked entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently used entry
    pub fn front(&self) -> Option<EntryId> {
        self.front
    }

    /// Least recently used entry, the eviction candidate
    pub fn back(&self) -> Option<EntryId> {
        self.back
    }

    /// Look up an entry by handle
    pub fn get(&self, id: EntryId) -> Option<&Entry<K, V>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Look up an entry mutably by handle
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Insert a new entry at the front
    pub fn add(&mut self, key: K, value: V) -> EntryId {
        let id = self.alloc(Entry {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_front(id);
        self.len += 1;
        id
    }

    /// Move an entry to the front, keeping the order of the others
    ///
    /// No-op if the entry is already the front or is not in the list.
    pub fn promote(&mut self, id: EntryId) {
        if self.front == Some(id) || self.get(id).is_none() {
            return;
        }

        self.unlink(id);
        self.link_front(id);
    }

    /// Remove the least recently used entry
    pub fn remove_back(&mut self) -> Option<(K, V)> {
        let back = self.back?;
        self.remove(back)
    }

    /// Remove an entry from anywhere in the list
    pub fn remove(&mut self, id: EntryId) -> Option<(K, V)> {
        self.get(id)?;
        self.unlink(id);

        let entry = self.slots.get_mut(id.0).and_then(Option::take)?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some((entry.key, entry.value))
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.front = None;
        self.back = None;
        self.len = 0;
    }

    /// Iterate entries front to back
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.front,
            remaining: self.len,
        }
    }

    fn alloc(&mut self, entry: Entry<K, V>) -> EntryId {
        match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                EntryId(idx)
            }
            None => {
                self.slots.push(Some(entry));
                EntryId(self.slots.len() - 1)
            }
        }
    }

    fn link_front(&mut self, id: EntryId) {
        let old_front = self.front;

        if let Some(entry) = self.get_mut(id) {
            entry.prev = None;
            entry.next = old_front;
        }

        match old_front {
            Some(front_id) => {
                if let Some(front) = self.get_mut(front_id) {
                    front.prev = Some(id);
                }
            }
            None => {
                // First entry is both front and back
                self.back = Some(id);
            }
        }

        self.front = Some(id);
    }

    fn unlink(&mut self, id: EntryId) {
        let (prev, next) = match self.get_mut(id) {
            Some(entry) => (entry.prev.take(), entry.next.take()),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_entry) = self.get_mut(prev_id) {
                    prev_entry.next = next;
                }
            }
            None => {
                self.front = next;
            }
        }

        match next {
            Some(next_id) => {
                if let Some(next_entry) = self.get_mut(next_id) {
                    next_entry.prev = prev;
                }
            }
            None => {
                self.back = prev;
            }
        }
    }
}

/// Front-to-back iterator over a [`RecencyList`]
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<EntryId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.get(self.cursor?)?;
        self.cursor = entry.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
