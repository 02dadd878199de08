use std::iter::FusedIterator;

use super::list::Slot;
use super::{ItemPolicy, List};

/// Borrowing iterator over a [`List`], from head to tail.
pub struct Iter<'a, T> {
    slots: &'a [Slot<T>],
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(slots: &'a [Slot<T>], head: Option<usize>, len: usize) -> Self {
        Iter {
            slots,
            front: head,
            back: head.map(|index| slots[index].prev),
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front?;
        self.remaining -= 1;
        self.front = Some(self.slots[index].next);
        self.slots[index].value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back?;
        self.remaining -= 1;
        self.back = Some(self.slots[index].prev);
        self.slots[index].value.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T, P: ItemPolicy<T>> IntoIterator for List<T, P> {
    type Item = T;

    type IntoIter = IntoIter<T, P>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

/// Owning iterator; values still in the list when it is dropped go through the policy's
/// destructor.
pub struct IntoIter<T, P: ItemPolicy<T>> {
    // Popping from the list does all the work.
    list: List<T, P>,
}

impl<T, P: ItemPolicy<T>> Iterator for IntoIter<T, P> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, P: ItemPolicy<T>> DoubleEndedIterator for IntoIter<T, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back().ok()
    }
}

impl<T, P: ItemPolicy<T>> ExactSizeIterator for IntoIter<T, P> {}

impl<T, P: ItemPolicy<T>> FusedIterator for IntoIter<T, P> {}
