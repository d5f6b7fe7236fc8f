use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use crate::error::{ReassembleError, Result};

/// Number of slots added whenever a store runs out of room.
pub const STORE_GROWTH: usize = 32;

/// A typed index handed out by a [`Store`].
pub trait StoreId: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

/// Append-only array addressed by typed ids.
///
/// Capacity grows in fixed steps of [`STORE_GROWTH`]; a failed growth leaves
/// the store exactly as it was and reports [`ReassembleError::OutOfMemory`].
#[derive(Debug, Clone)]
pub struct Store<I, T> {
    items: Vec<T>,
    name: &'static str,
    _id: PhantomData<I>,
}

impl<I: StoreId, T> Store<I, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            items: Vec::new(),
            name,
            _id: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Makes sure the next `push` cannot fail.
    pub fn ensure_insertable(&mut self) -> Result<()> {
        if self.items.len() == self.items.capacity() {
            self.items
                .try_reserve_exact(STORE_GROWTH)
                .map_err(|_| ReassembleError::OutOfMemory(self.name))?;
        }
        Ok(())
    }

    /// Appends `item` and returns its id. Ids of earlier items never change.
    pub fn push(&mut self, item: T) -> Result<I> {
        self.ensure_insertable()?;
        let id = I::from_index(self.items.len());
        self.items.push(item);
        Ok(id)
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.items.get_mut(id.index())
    }

    /// Id the next `push` will return.
    pub fn next_id(&self) -> I {
        I::from_index(self.items.len())
    }

    pub fn last_id(&self) -> Option<I> {
        self.items.len().checked_sub(1).map(I::from_index)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (I, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_index(i), item))
    }

    pub fn ids(&self) -> impl ExactSizeIterator<Item = I> {
        (0..self.items.len()).map(I::from_index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Drops every item from `len` on. Ids below `len` stay valid.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Drops every item but keeps the allocation for the next run.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drops every item and frees the backing buffer.
    pub fn release(&mut self) {
        self.items = Vec::new();
    }
}

impl<I: StoreId, T> Index<I> for Store<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.items[id.index()]
    }
}

impl<I: StoreId, T> IndexMut<I> for Store<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.index()]
    }
}

/// Ordered member list of a complex.
///
/// Most complexes hold a handful of members, so they stay inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildList<I: StoreId> {
    members: SmallVec<[I; 4]>,
}

impl<I: StoreId> Default for ChildList<I> {
    fn default() -> Self {
        Self {
            members: SmallVec::new(),
        }
    }
}

impl<I: StoreId> ChildList<I> {
    pub fn single(first: I) -> Self {
        let mut members = SmallVec::new();
        members.push(first);
        Self { members }
    }

    pub fn push(&mut self, id: I) -> Result<()> {
        if self.members.len() == self.members.capacity() {
            self.members
                .try_reserve(STORE_GROWTH)
                .map_err(|_| ReassembleError::OutOfMemory("child list"))?;
        }
        self.members.push(id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn first(&self) -> Option<I> {
        self.members.first().copied()
    }

    pub fn last(&self) -> Option<I> {
        self.members.last().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = I> + ExactSizeIterator + '_ {
        self.members.iter().copied()
    }

    pub fn as_slice(&self) -> &[I] {
        &self.members
    }
}
