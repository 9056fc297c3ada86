//! GrowableArray: index-addressable sequence that doubles when full.
//!
//! Every "list of X" the record manager hands out, and every sequence the
//! sort routines operate on, is a `GrowableArray`.
//!
//! Invariants
//! - `len() <= capacity()`; capacity starts at [`INITIAL_CAPACITY`] (or the
//!   requested value) and only ever doubles. Removing never shrinks it.
//! - Growth moves elements into the new storage in order; no element is
//!   cloned, dropped or reordered.
//! - Index-taking accessors fail with [`IndexOutOfRange`] outside `[0, len)`.

use crate::error::IndexOutOfRange;
use core::fmt;

/// Capacity of an array created with [`GrowableArray::new`].
pub const INITIAL_CAPACITY: usize = 10;

pub struct GrowableArray<T> {
    // `data.len()` is the logical size; `capacity` is tracked separately so
    // growth is exactly "double when full" regardless of allocator slack.
    data: Vec<T>,
    capacity: usize,
}

impl<T> GrowableArray<T> {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty array with room for `capacity` elements (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn check(&self, index: usize) -> Result<(), IndexOutOfRange> {
        if index < self.data.len() {
            Ok(())
        } else {
            Err(IndexOutOfRange {
                index,
                len: self.data.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        self.check(index)?;
        Ok(&self.data[index])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfRange> {
        self.check(index)?;
        Ok(&mut self.data[index])
    }

    /// Replaces the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, IndexOutOfRange> {
        self.check(index)?;
        Ok(core::mem::replace(&mut self.data[index], value))
    }

    /// Appends `value`, doubling the capacity first when the array is full.
    pub fn add(&mut self, value: T) {
        if self.data.len() == self.capacity {
            self.grow();
        }
        self.data.push(value);
    }

    /// Removes the element at `index`, shifting every later element left by one.
    pub fn remove(&mut self, index: usize) -> Result<T, IndexOutOfRange> {
        self.check(index)?;
        Ok(self.data.remove(index))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), IndexOutOfRange> {
        self.check(a)?;
        self.check(b)?;
        self.data.swap(a, b);
        Ok(())
    }

    /// Index of the first element matching `pred`.
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.data.iter().position(pred)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        let mut moved = Vec::with_capacity(new_capacity);
        moved.extend(self.data.drain(..));
        self.data = moved;
        self.capacity = new_capacity;
    }
}

impl<T: Clone> Clone for GrowableArray<T> {
    fn clone(&self) -> Self {
        let mut data = Vec::with_capacity(self.capacity);
        data.extend(self.data.iter().cloned());
        Self {
            data,
            capacity: self.capacity,
        }
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for GrowableArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for GrowableArray<T> {}

impl<T> FromIterator<T> for GrowableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = GrowableArray::new();
        for v in iter {
            out.add(v);
        }
        out
    }
}

impl<T> Extend<T> for GrowableArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.add(v);
        }
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<T> IntoIterator for GrowableArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
