use super::{ItemKey, ItemPolicy, List, ListError};

/// A detached position inside a [`List`].
///
/// Unlike [`Iter`](super::Iter) a cursor does not borrow the list, so the list can be modified
/// between steps. Each call takes the list again and re-checks the cursor against it: the lap
/// boundary is always the list's current head, and a cursor whose item was removed reports
/// [`ListError::StaleItem`] instead of wandering off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    current: Option<ItemKey>,
    end: bool,
}

impl Cursor {
    /// Places a cursor on the head of `list`. A cursor over an empty list starts at the end.
    pub fn new<T, P: ItemPolicy<T>>(list: &List<T, P>) -> Self {
        let current = list.head.map(|index| list.key_at(index));
        Cursor {
            current,
            end: current.is_none(),
        }
    }

    pub const fn is_end(&self) -> bool {
        self.end
    }

    /// Key of the item under the cursor, `None` once the end is reached.
    pub fn item(&self) -> Option<ItemKey> {
        if self.end {
            None
        } else {
            self.current
        }
    }

    pub fn data<'a, T, P: ItemPolicy<T>>(&self, list: &'a List<T, P>) -> Option<&'a T> {
        list.item_data(self.item()?)
    }

    pub fn data_mut<'a, T, P: ItemPolicy<T>>(&self, list: &'a mut List<T, P>) -> Option<&'a mut T> {
        list.item_data_mut(self.item()?)
    }

    /// Advances to the next item. Stepping back onto the head completes the lap and sets the end
    /// flag.
    pub fn next<T, P: ItemPolicy<T>>(&mut self, list: &List<T, P>) -> Result<(), ListError> {
        if self.end {
            return Err(ListError::CursorEnd);
        }
        let Some(index) = self.current.and_then(|key| list.resolve(key)) else {
            self.end = true;
            return Err(ListError::StaleItem);
        };

        let next = list.slots[index].next;
        if list.head == Some(next) {
            self.end = true;
        }
        self.current = Some(list.key_at(next));
        Ok(())
    }

    /// Moves to `index`. Seeking to 0 starts a fresh lap; seeking past the last item is an error
    /// and leaves the cursor at the end.
    pub fn seek<T, P: ItemPolicy<T>>(
        &mut self,
        list: &List<T, P>,
        index: usize,
    ) -> Result<(), ListError> {
        match list.seek(index) {
            Some(slot) => {
                self.current = Some(list.key_at(slot));
                self.end = false;
                Ok(())
            }
            None => {
                self.end = true;
                Err(ListError::NotFound(index))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_3() -> List<&'static str> {
        let mut list = List::new();
        for value in ["0", "1", "2", "3"] {
            list.append(value).unwrap();
        }
        list
    }

    fn drain(cursor: &mut Cursor, list: &List<&'static str>) -> Vec<&'static str> {
        let mut seen = Vec::new();
        while !cursor.is_end() {
            seen.push(*cursor.data(list).unwrap());
            cursor.next(list).unwrap();
        }
        seen
    }

    #[test]
    fn walks_one_lap() {
        let list = list_3();
        let mut cursor = Cursor::new(&list);
        assert_eq!(drain(&mut cursor, &list), vec!["0", "1", "2", "3"]);
        assert!(cursor.is_end());
        assert_eq!(cursor.data(&list), None);
        assert_eq!(cursor.item(), None);
        assert_eq!(cursor.next(&list), Err(ListError::CursorEnd));
    }

    #[test]
    fn empty_list_is_at_end() {
        let list: List<&str> = List::new();
        let mut cursor = Cursor::new(&list);
        assert!(cursor.is_end());
        assert_eq!(cursor.data(&list), None);
        assert_eq!(cursor.next(&list), Err(ListError::CursorEnd));
    }

    #[test]
    fn seek_zero_allows_another_lap() {
        let list = list_3();
        let mut cursor = Cursor::new(&list);
        drain(&mut cursor, &list);
        cursor.seek(&list, 0).unwrap();
        assert_eq!(drain(&mut cursor, &list), vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn seek_into_the_middle() {
        let list = list_3();
        let mut cursor = Cursor::new(&list);
        cursor.seek(&list, 2).unwrap();
        assert_eq!(drain(&mut cursor, &list), vec!["2", "3"]);
    }

    #[test]
    fn seek_past_end_forces_end() {
        let list = list_3();
        let mut cursor = Cursor::new(&list);
        assert_eq!(cursor.seek(&list, 4), Err(ListError::NotFound(4)));
        assert!(cursor.is_end());
    }

    #[test]
    fn tolerates_removal_of_other_items() {
        let mut list = list_3();
        let mut cursor = Cursor::new(&list);
        cursor.next(&list).unwrap();
        // drop the head behind the cursor and the item right after it
        list.remove(0).unwrap();
        list.remove(1).unwrap();
        assert_eq!(drain(&mut cursor, &list), vec!["1", "3"]);
    }

    #[test]
    fn removal_of_cursor_target_is_reported() {
        let mut list = list_3();
        let mut cursor = Cursor::new(&list);
        cursor.next(&list).unwrap();
        let key = cursor.item().unwrap();
        list.remove_item(key).unwrap();
        assert_eq!(cursor.data(&list), None);
        assert_eq!(cursor.next(&list), Err(ListError::StaleItem));
        assert!(cursor.is_end());
    }

    #[test]
    fn data_mut_edits_in_place() {
        let mut list = list_3();
        let cursor = Cursor::new(&list);
        *cursor.data_mut(&mut list).unwrap() = "zero";
        assert_eq!(list.get(0), Some(&"zero"));
    }
}
