//! Ordered, id-keyed callback storage used for both resize and update events.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(1);

/// Handle returned when a callback is registered.
///
/// Ids carry the tag of the registry that issued them, so an id from one
/// registry never matches an entry of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId {
    registry: u64,
    serial: u64,
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.registry, self.serial)
    }
}

struct Entry<F: ?Sized> {
    id: CallbackId,
    // Empty while the callback is running inside `for_each`.
    callback: Option<Box<F>>,
}

/// Callbacks kept in insertion order, addressable by [`CallbackId`].
pub struct CallbackRegistry<F: ?Sized> {
    tag: u64,
    next_serial: u64,
    entries: Vec<Entry<F>>,
    positions: HashMap<CallbackId, usize>,
}

impl<F: ?Sized> CallbackRegistry<F> {
    pub fn new() -> Self {
        Self {
            tag: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            next_serial: 0,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Append a callback and return its fresh id.
    pub fn add(&mut self, callback: Box<F>) -> CallbackId {
        let id = CallbackId {
            registry: self.tag,
            serial: self.next_serial,
        };
        self.next_serial += 1;

        self.positions.insert(id, self.entries.len());
        self.entries.push(Entry {
            id,
            callback: Some(callback),
        });
        id
    }

    /// Remove a callback. Unknown ids are ignored.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&mut self, id: CallbackId) -> bool {
        let Some(position) = self.positions.remove(&id) else {
            return false;
        };

        self.entries.remove(position);
        for slot in self.positions.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        true
    }

    pub fn contains(&self, id: CallbackId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in firing order.
    pub fn ids(&self) -> Vec<CallbackId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Invoke every callback in insertion order.
    ///
    /// The pass walks a snapshot of the ids taken on entry. Each callback is
    /// detached while it runs and `invoke` receives the registry itself, so a
    /// callback may add or remove entries: removed entries that have not fired
    /// yet are skipped, added entries fire from the next pass on.
    pub fn for_each(&mut self, mut invoke: impl FnMut(&mut F, &mut Self)) {
        for id in self.ids() {
            let Some(&position) = self.positions.get(&id) else {
                continue;
            };
            let Some(mut callback) = self.entries[position].callback.take() else {
                continue;
            };

            invoke(&mut *callback, self);

            // The callback may have removed itself or shifted positions.
            if let Some(&position) = self.positions.get(&id) {
                self.entries[position].callback = Some(callback);
            }
        }
    }
}

impl<F: ?Sized> Default for CallbackRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for CallbackRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("tag", &self.tag)
            .field("len", &self.entries.len())
            .finish()
    }
}
