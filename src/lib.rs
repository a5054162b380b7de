//! Lazily-evaluated, memoizing cons lists.
//!
//! A [`LazyList`] is built from [`Thunk`]s: its elements and its tail may be
//! deferred computations that are evaluated at most once, when first needed.
//! Callers can build infinite or expensive sequences and only pay for the
//! prefix they consume.
//!
//! ```
//! use lazy_cons::{LazyList, Thunk};
//!
//! let list = LazyList::cons_known(1, LazyList::cons_known(2, LazyList::nil()));
//! assert_eq!(&*list.force(), [1, 2]);
//! assert_eq!(list.get_forced(-1), Ok(&2));
//!
//! // An infinite list; only the visited prefix is ever evaluated.
//! fn from(n: i64) -> LazyList<'static, i64> {
//!     LazyList::cons_deferred(Thunk::of(n), move || from(n + 1))
//! }
//! let naturals = from(0);
//! assert_eq!(naturals.get_forced(100), Ok(&100));
//! ```
//!
//! The structures here are `Rc`-based and single-threaded; memoization uses
//! unsynchronized once-cells, so forcing cannot race.

pub mod list;
pub mod thunk;

pub use list::{ConsCell, IndexError, Iter, IterForced, LazyList};
pub use thunk::Thunk;
