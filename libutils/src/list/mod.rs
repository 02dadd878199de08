//! A generic ordered container backed by a circular, doubly-linked list.
//!
//! Items live in an arena of slots linked by index, so the list never hands out raw pointers.
//! Every item can be addressed by position (`O(min(i, n - i))`) or through an [`ItemKey`], a
//! generation-checked handle that gives `O(1)` access and detects items that have since been
//! removed.
//!
//! How values enter and leave the list is decided by an [`ItemPolicy`] chosen at creation time.
//! The default [`Plain`] policy stores values as given and fills gaps left by [`List::insert`]
//! with `T::default()`.

mod cursor;
mod iter;
#[allow(clippy::module_inception)]
mod list;
mod policy;

pub use cursor::Cursor;
pub use iter::{IntoIter, Iter};
pub use list::{ItemKey, List};
pub use policy::{ItemPolicy, Plain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("out of memory while growing the list")]
    AllocationFailure,

    #[error("no item at position {0}")]
    NotFound(usize),

    #[error("item handle refers to a removed item")]
    StaleItem,

    #[error("cursor is past the end of the list")]
    CursorEnd,
}
