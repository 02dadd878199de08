use std::fmt::{self, Debug, Formatter};
use std::ops::ControlFlow;

use super::{ItemPolicy, Iter, ListError, Plain};

/// Handle to a single item of a [`List`].
///
/// Keys stay valid while the item is in the list, independently of insertions and removals of
/// other items. Once the item is removed the key becomes stale and every keyed operation rejects
/// it, even if the underlying slot is later reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    index: usize,
    generation: u32,
}

pub(crate) struct Slot<T> {
    generation: u32,
    pub(crate) prev: usize,
    /// For vacant slots this threads the free chain; a slot pointing at itself ends it.
    pub(crate) next: usize,
    pub(crate) value: Option<T>,
}

/// A circular, doubly-linked list of owned values.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `push/pop` | `O(1)` |
/// | `append/pop_back` | `O(1)` |
/// | `get/remove/delete` | `O(min(i, n-i))` |
/// | `insert` | `O(min(i, n-i))`, plus the gap when `i > n` |
/// | `item_data/remove_item` | `O(1)` |
/// | `index_of/position` | `O(n)` |
pub struct List<T, P: ItemPolicy<T> = Plain> {
    pub(crate) slots: Vec<Slot<T>>,
    free: Option<usize>,
    pub(crate) head: Option<usize>,
    len: usize,
    policy: P,
}

impl<T, P: ItemPolicy<T> + Default> List<T, P> {
    pub fn new() -> Self {
        Self::with_policy(P::default())
    }
}

impl<T, P: ItemPolicy<T> + Default> Default for List<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: ItemPolicy<T>> List<T, P> {
    pub fn with_policy(policy: P) -> Self {
        List {
            slots: Vec::new(),
            free: None,
            head: None,
            len: 0,
            policy,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Inserts `value` so that it ends up at `position`.
    ///
    /// When `position` is past the end, the list first grows with placeholder items built by the
    /// policy until `position` is reachable, the way an auto-extending array would.
    pub fn insert(&mut self, value: T, position: usize) -> Result<(), ListError> {
        while self.len < position {
            let filler = self.policy.construct(None);
            let index = self.alloc(filler)?;
            self.link(index, None);
        }

        let value = self.policy.construct(Some(value));
        let before = self.seek(position);
        let index = self.alloc(value)?;
        self.link(index, before);
        if position == 0 {
            self.head = Some(index);
        }
        Ok(())
    }

    /// Inserts at the head.
    pub fn push(&mut self, value: T) -> Result<(), ListError> {
        self.insert(value, 0)
    }

    /// Inserts at the tail.
    pub fn append(&mut self, value: T) -> Result<(), ListError> {
        self.insert(value, self.len)
    }

    /// Detaches the head value and hands it to the caller.
    pub fn pop(&mut self) -> Result<T, ListError> {
        self.remove(0)
    }

    /// Detaches the tail value and hands it to the caller.
    pub fn pop_back(&mut self) -> Result<T, ListError> {
        match self.len.checked_sub(1) {
            Some(last) => self.remove(last),
            None => Err(ListError::NotFound(0)),
        }
    }

    /// Detaches the value at `position` without running the policy's destructor.
    pub fn remove(&mut self, position: usize) -> Result<T, ListError> {
        let index = self.seek(position).ok_or(ListError::NotFound(position))?;
        self.unlink(index)
    }

    /// Removes the value at `position` and passes it to the policy's destructor.
    pub fn delete(&mut self, position: usize) -> Result<(), ListError> {
        let value = self.remove(position)?;
        self.policy.destruct(value);
        Ok(())
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        let index = self.seek(position)?;
        self.slots[index].value.as_ref()
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut T> {
        let index = self.seek(position)?;
        self.slots[index].value.as_mut()
    }

    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn back(&self) -> Option<&T> {
        let head = self.head?;
        self.slots[self.slots[head].prev].value.as_ref()
    }

    /// Returns the position of the item that holds exactly `value` (compared by address, not by
    /// equality).
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.iter().position(|item| std::ptr::eq(item, value))
    }

    /// Returns the position of the first value matching `pred`.
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().position(pred)
    }

    /// Calls `f` on every value from head to tail.
    ///
    /// `f` returns [`ControlFlow::Break`] to stop early (the walk still succeeds) or an error to
    /// abort it, in which case the error is handed back unchanged.
    pub fn walk<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<ControlFlow<()>, E>,
    {
        for value in self.iter() {
            if f(value)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Like [`walk`](Self::walk) with mutable access to the values.
    pub fn walk_mut<E, F>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut T) -> Result<ControlFlow<()>, E>,
    {
        let mut cursor = self.head;
        for _ in 0..self.len {
            let Some(index) = cursor else { break };
            let next = self.slots[index].next;
            if let Some(value) = self.slots[index].value.as_mut() {
                if f(value)?.is_break() {
                    break;
                }
            }
            cursor = Some(next);
        }
        Ok(())
    }

    /// Like [`walk`](Self::walk), also passing the key of each item.
    pub fn walk_items<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(ItemKey, &T) -> Result<ControlFlow<()>, E>,
    {
        let mut cursor = self.head;
        for _ in 0..self.len {
            let Some(index) = cursor else { break };
            if let Some(value) = self.slots[index].value.as_ref() {
                if f(self.key_at(index), value)?.is_break() {
                    break;
                }
            }
            cursor = Some(self.slots[index].next);
        }
        Ok(())
    }

    /// Returns the key of the item at `position`.
    pub fn item(&self, position: usize) -> Option<ItemKey> {
        self.seek(position).map(|index| self.key_at(index))
    }

    pub fn item_data(&self, key: ItemKey) -> Option<&T> {
        let index = self.resolve(key)?;
        self.slots[index].value.as_ref()
    }

    pub fn item_data_mut(&mut self, key: ItemKey) -> Option<&mut T> {
        let index = self.resolve(key)?;
        self.slots[index].value.as_mut()
    }

    /// Detaches the item behind `key` in constant time.
    pub fn remove_item(&mut self, key: ItemKey) -> Result<T, ListError> {
        let index = self.resolve(key).ok_or(ListError::StaleItem)?;
        self.unlink(index)
    }

    /// Removes the item behind `key` and passes its value to the policy's destructor.
    pub fn delete_item(&mut self, key: ItemKey) -> Result<(), ListError> {
        let value = self.remove_item(key)?;
        self.policy.destruct(value);
        Ok(())
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.slots, self.head, self.len)
    }

    /// Destructs every value, leaving the list empty.
    pub fn clear(&mut self) {
        while let Ok(value) = self.pop() {
            self.policy.destruct(value);
        }
        self.slots.clear();
        self.free = None;
    }

    pub(crate) fn key_at(&self, index: usize) -> ItemKey {
        ItemKey {
            index,
            generation: self.slots[index].generation,
        }
    }

    pub(crate) fn resolve(&self, key: ItemKey) -> Option<usize> {
        let slot = self.slots.get(key.index)?;
        (slot.generation == key.generation && slot.value.is_some()).then_some(key.index)
    }

    pub(crate) fn seek(&self, position: usize) -> Option<usize> {
        if position >= self.len {
            return None;
        }
        let head = self.head?;
        let mut index;
        if position <= self.len / 2 {
            index = head;
            for _ in 0..position {
                index = self.slots[index].next;
            }
        } else {
            index = self.slots[head].prev;
            for _ in position + 1..self.len {
                index = self.slots[index].prev;
            }
        }
        Some(index)
    }

    fn alloc(&mut self, value: T) -> Result<usize, ListError> {
        match self.free {
            Some(index) => {
                let slot = &mut self.slots[index];
                self.free = (slot.next != index).then_some(slot.next);
                slot.value = Some(value);
                Ok(index)
            }
            None => {
                self.slots
                    .try_reserve(1)
                    .map_err(|_| ListError::AllocationFailure)?;
                let index = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    prev: index,
                    next: index,
                    value: Some(value),
                });
                Ok(index)
            }
        }
    }

    /// Links `index` in front of `before`, or at the tail when `before` is `None`.
    fn link(&mut self, index: usize, before: Option<usize>) {
        match before.or(self.head) {
            None => {
                self.slots[index].prev = index;
                self.slots[index].next = index;
                self.head = Some(index);
            }
            Some(at) => {
                let prev = self.slots[at].prev;
                self.slots[index].prev = prev;
                self.slots[index].next = at;
                self.slots[prev].next = index;
                self.slots[at].prev = index;
            }
        }
        self.len += 1;
    }

    fn unlink(&mut self, index: usize) -> Result<T, ListError> {
        let value = self.slots[index].value.take().ok_or(ListError::StaleItem)?;
        let (prev, next) = (self.slots[index].prev, self.slots[index].next);

        if next == index {
            self.head = None;
        } else {
            self.slots[prev].next = next;
            self.slots[next].prev = prev;
            if self.head == Some(index) {
                self.head = Some(next);
            }
        }
        self.len -= 1;

        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        slot.next = self.free.unwrap_or(index);
        self.free = Some(index);
        Ok(value)
    }
}

impl<T, P: ItemPolicy<T>> Drop for List<T, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Debug, P: ItemPolicy<T>> Debug for List<T, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, P: ItemPolicy<T>> PartialEq for List<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<'a, T, P: ItemPolicy<T>> IntoIterator for &'a List<T, P> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        constructed: usize,
        destructed: usize,
    }

    impl ItemPolicy<Option<&'static str>> for Counting {
        fn construct(&mut self, value: Option<Option<&'static str>>) -> Option<&'static str> {
            self.constructed += 1;
            value.flatten()
        }

        fn destruct(&mut self, _value: Option<&'static str>) {
            self.destructed += 1;
        }
    }

    fn counting() -> List<Option<&'static str>, Counting> {
        List::new()
    }

    fn list_of(values: &[&'static str]) -> List<&'static str> {
        let mut list = List::new();
        for value in values {
            list.append(*value).unwrap();
        }
        list
    }

    /// Checks the circular links in both directions against `len`.
    fn assert_links<T, P: ItemPolicy<T>>(list: &List<T, P>) {
        let Some(head) = list.head else {
            assert_eq!(list.len(), 0);
            return;
        };
        let mut index = head;
        for _ in 0..list.len() {
            let next = list.slots[index].next;
            assert_eq!(list.slots[next].prev, index);
            index = next;
        }
        assert_eq!(index, head, "walking len items must return to the head");
    }

    #[test]
    fn append_then_get_in_order() {
        let list = list_of(&["e0", "e1", "e2", "e3"]);
        assert_eq!(list.len(), 4);
        for (i, expected) in ["e0", "e1", "e2", "e3"].iter().enumerate() {
            assert_eq!(list.get(i), Some(expected));
        }
        assert_eq!(list.get(4), None);
        assert_links(&list);
    }

    #[test]
    fn push_pop_is_a_stack() {
        let mut list: List<&str> = List::new();
        list.push("e0").unwrap();
        list.push("e1").unwrap();
        list.push("e2").unwrap();
        assert_eq!(list.get(0), Some(&"e2"));
        assert_eq!(list.pop(), Ok("e2"));
        assert_eq!(list.pop(), Ok("e1"));
        assert_eq!(list.pop(), Ok("e0"));
        assert_eq!(list.pop(), Err(ListError::NotFound(0)));
        assert!(list.is_empty());
    }

    #[test]
    fn append_pop_is_a_queue() {
        let mut list = list_of(&["e0", "e1", "e2"]);
        assert_eq!(list.pop(), Ok("e0"));
        assert_eq!(list.pop(), Ok("e1"));
        assert_eq!(list.pop(), Ok("e2"));
        assert!(list.is_empty());
    }

    #[test]
    fn push_pop_does_not_destruct() {
        let mut list = counting();
        list.push(Some("item")).unwrap();
        assert_eq!(list.policy().constructed, 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.pop(), Ok(Some("item")));
        assert_eq!(list.policy().destructed, 0);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn insert_past_end_fills_gap() {
        let mut list = counting();
        list.insert(Some("0"), 0).unwrap();
        list.insert(Some("1"), 1).unwrap();
        list.insert(Some("3"), 3).unwrap();
        assert_eq!(list.len(), 4);
        // the placeholder for position 2 goes through the policy as well
        assert_eq!(list.policy().constructed, 4);
        assert_eq!(list.policy().destructed, 0);
        assert_links(&list);

        assert_eq!(list.pop(), Ok(Some("0")));
        assert_eq!(list.pop(), Ok(Some("1")));
        assert_eq!(list.pop(), Ok(None));
        assert_eq!(list.pop(), Ok(Some("3")));
    }

    #[test]
    fn insert_into_empty_at_offset() {
        let mut list: List<u32> = List::new();
        list.insert(7, 3).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 0, 0, 7]);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut list = list_of(&["a", "c"]);
        list.insert("b", 1).unwrap();
        list.insert("z", 3).unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c", "z"]);
        assert_links(&list);
    }

    #[test]
    fn remove_out_of_range() {
        let mut list = list_of(&["a"]);
        assert_eq!(list.remove(1), Err(ListError::NotFound(1)));
        assert_eq!(list.delete(5), Err(ListError::NotFound(5)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_from_both_halves() {
        let mut list = list_of(&["0", "1", "2", "3", "4", "5"]);
        assert_eq!(list.remove(4), Ok("4"));
        assert_eq!(list.remove(1), Ok("1"));
        assert_eq!(list.pop_back(), Ok("5"));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["0", "2", "3"]);
        assert_eq!(list.back(), Some(&"3"));
        assert_links(&list);
    }

    #[test]
    fn delete_runs_destructor() {
        let mut list = counting();
        for value in ["0", "1", "2"] {
            list.append(Some(value)).unwrap();
        }
        list.delete(1).unwrap();
        assert_eq!(list.policy().destructed, 1);
        assert_eq!(list.get(1), Some(&Some("2")));
    }

    #[test]
    fn clear_destructs_everything() {
        let mut list = counting();
        for value in ["0", "1", "2", "3"] {
            list.append(Some(value)).unwrap();
        }
        list.clear();
        assert_eq!(list.policy().destructed, 4);
        assert!(list.is_empty());
        list.append(Some("again")).unwrap();
        assert_eq!(list.front(), Some(&Some("again")));
    }

    #[test]
    fn index_of_compares_identity() {
        let list: List<String> = {
            let mut list = List::new();
            list.append("same".to_string()).unwrap();
            list.append("same".to_string()).unwrap();
            list
        };
        let second = list.get(1).unwrap();
        assert_eq!(list.index_of(second), Some(1));
        assert_eq!(list.position(|v| v == "same"), Some(0));

        let outsider = "same".to_string();
        assert_eq!(list.index_of(&outsider), None);
    }

    #[test]
    fn walk_visits_all() {
        let list = list_of(&["0", "1", "2", "3"]);
        let mut count = 0;
        let result: Result<(), ()> = list.walk(|_| {
            count += 1;
            Ok(ControlFlow::Continue(()))
        });
        assert_eq!(result, Ok(()));
        assert_eq!(count, 4);
    }

    #[test]
    fn walk_stops_early() {
        let list = list_of(&["0", "1", "2", "3"]);
        let mut seen = Vec::new();
        let result: Result<(), ()> = list.walk(|v| {
            seen.push(*v);
            Ok(if *v == "1" {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        });
        assert_eq!(result, Ok(()));
        assert_eq!(seen, vec!["0", "1"]);
    }

    #[test]
    fn walk_propagates_error() {
        let list = list_of(&["0", "1", "2"]);
        let result = list.walk(|v| {
            if *v == "2" {
                Err(format!("bad item {v}"))
            } else {
                Ok(ControlFlow::Continue(()))
            }
        });
        assert_eq!(result, Err("bad item 2".to_string()));
    }

    #[test]
    fn walk_mut_updates_values() {
        let mut list: List<u32> = List::new();
        for i in 0..4 {
            list.append(i).unwrap();
        }
        list.walk_mut(|v| -> Result<_, ()> {
            *v *= 10;
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![0, 10, 20, 30]);
    }

    #[test]
    fn item_keys_survive_other_removals() {
        let mut list = list_of(&["0", "1", "2", "3"]);
        let key = list.item(2).unwrap();
        list.remove(0).unwrap();
        assert_eq!(list.item_data(key), Some(&"2"));
        assert_eq!(list.remove_item(key), Ok("2"));
        assert_eq!(list.item_data(key), None);
        assert_eq!(list.remove_item(key), Err(ListError::StaleItem));
        assert_links(&list);
    }

    #[test]
    fn reused_slot_rejects_old_key() {
        let mut list = list_of(&["0"]);
        let key = list.item(0).unwrap();
        list.pop().unwrap();
        list.append("new").unwrap();
        assert_eq!(list.item_data(key), None);
        assert_eq!(list.get(0), Some(&"new"));
    }

    #[test]
    fn walk_items_hands_out_usable_keys() {
        let mut list = list_of(&["a", "b", "c"]);
        let mut keys = Vec::new();
        list.walk_items(|key, _| -> Result<_, ()> {
            keys.push(key);
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
        assert_eq!(keys.len(), 3);
        list.delete_item(keys[1]).unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn debug_lists_values() {
        let list = list_of(&["x", "y"]);
        assert_eq!(format!("{:?}", list), r#"["x", "y"]"#);
    }
}
