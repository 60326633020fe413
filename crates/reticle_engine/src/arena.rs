//! Slot arenas addressed by typed integer handles.
//!
//! Every node and token in the network lives in an [`Arena`] and refers to
//! others by handle, so the graph has no reference cycles. Freed slots are
//! recycled through a free list.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A typed handle into an [`Arena`].
pub trait ArenaId: Copy {
    /// Builds a handle from a slot index.
    fn from_index(index: usize) -> Self;
    /// Returns the slot index of this handle.
    fn index(self) -> usize;
}

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Returns the raw slot number of this handle.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl $crate::arena::ArenaId for $name {
            fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).expect("arena exceeded u32::MAX slots"))
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

pub(crate) use arena_id;

/// Slot storage with a free list.
#[derive(Clone, Debug)]
pub(crate) struct Arena<I, T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    live: usize,
    _id: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            _id: PhantomData,
        }
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Stores a value, reusing a freed slot when one is available.
    pub fn alloc(&mut self, value: T) -> I {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(value);
            I::from_index(index)
        } else {
            self.slots.push(Some(value));
            I::from_index(self.slots.len() - 1)
        }
    }

    /// Removes and returns the value, freeing its slot.
    pub fn remove(&mut self, id: I) -> Option<T> {
        let value = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id.index());
        self.live -= 1;
        Some(value)
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Iterates live values with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (I::from_index(i), v)))
    }

    /// Iterates live values mutably.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id).expect("handle refers to a freed arena slot")
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
            .expect("handle refers to a freed arena slot")
    }
}
