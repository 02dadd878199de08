/// Decides how values are stored when they enter a [`List`](super::List) and how they are
/// disposed of when the list deletes them.
///
/// `construct` receives `None` when the list needs a placeholder, which happens when
/// [`List::insert`](super::List::insert) is asked for a position past the end and backfills
/// the gap. `destruct` runs for [`List::delete`](super::List::delete),
/// [`List::delete_item`](super::List::delete_item) and for every value still held when the list
/// is dropped. Values handed back by `remove`/`pop` skip it: the caller owns them.
pub trait ItemPolicy<T> {
    fn construct(&mut self, value: Option<T>) -> T;

    fn destruct(&mut self, value: T) {
        drop(value);
    }
}

/// Stores values untouched; gaps are filled with `T::default()`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Plain;

impl<T: Default> ItemPolicy<T> for Plain {
    fn construct(&mut self, value: Option<T>) -> T {
        value.unwrap_or_default()
    }
}
